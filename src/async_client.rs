//! Async client for the Yutori API.
//!
//! ```no_run
//! use yutori::AsyncYutoriClient;
//!
//! # async fn run() -> yutori::Result<()> {
//! let client = AsyncYutoriClient::new(Some("yt-..."))?;
//! println!("{}", client.get_usage().await?);
//! # Ok(())
//! # }
//! ```

use crate::api::browsing::{self, BrowsingTaskParams};
use crate::api::chat::{self, ChatCompletionRequest};
use crate::api::research::{self, ResearchTaskParams};
use crate::api::scouts::{
    self, CreateScoutParams, ListScoutsParams, ScoutUpdatesParams, UpdateScoutParams,
};
use crate::api::{self, build_headers, handle_response, ApiRequest};
use crate::client::ClientBuilder;
use crate::error::Result;
use crate::polling::{wait_for_task_async, PollOptions};
use serde_json::Value;
use std::fmt;

pub struct AsyncYutoriClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for AsyncYutoriClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncYutoriClient")
            .field("base_url", &self.base_url)
            .field("api_key", &crate::auth::flow::mask_key(&self.api_key))
            .finish()
    }
}

impl AsyncYutoriClient {
    pub fn new(api_key: Option<&str>) -> Result<Self> {
        let mut builder = ClientBuilder::new();
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        builder.build_async()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn from_parts(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn execute(&self, request: &ApiRequest) -> Result<Value> {
        tracing::debug!(method = %request.method, path = %request.path, "sending request");

        let mut builder = self
            .http
            .request(request.method.clone(), request.url(&self.base_url))
            .headers(build_headers(&self.api_key, request.auth)?);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        tracing::debug!(status, bytes = text.len(), "received response");

        handle_response(status, &text)
    }

    pub async fn get_usage(&self) -> Result<Value> {
        self.execute(&api::usage()).await
    }

    pub fn chat(&self) -> AsyncChat<'_> {
        AsyncChat { client: self }
    }

    pub fn browsing(&self) -> AsyncBrowsing<'_> {
        AsyncBrowsing { client: self }
    }

    pub fn research(&self) -> AsyncResearch<'_> {
        AsyncResearch { client: self }
    }

    pub fn scouts(&self) -> AsyncScouts<'_> {
        AsyncScouts { client: self }
    }
}

pub struct AsyncChat<'a> {
    client: &'a AsyncYutoriClient,
}

impl AsyncChat<'_> {
    pub async fn completions(&self, request: &ChatCompletionRequest) -> Result<Value> {
        self.client.execute(&chat::completions(request)?).await
    }
}

pub struct AsyncBrowsing<'a> {
    client: &'a AsyncYutoriClient,
}

impl AsyncBrowsing<'_> {
    pub async fn create(&self, params: &BrowsingTaskParams) -> Result<Value> {
        self.client.execute(&browsing::create(params)?).await
    }

    pub async fn get(&self, task_id: &str) -> Result<Value> {
        self.client.execute(&browsing::get(task_id)?).await
    }

    pub async fn wait(&self, task_id: &str, options: PollOptions) -> Result<Value> {
        wait_for_task_async(|| self.get(task_id), options).await
    }
}

pub struct AsyncResearch<'a> {
    client: &'a AsyncYutoriClient,
}

impl AsyncResearch<'_> {
    pub async fn create(&self, params: &ResearchTaskParams) -> Result<Value> {
        self.client.execute(&research::create(params)?).await
    }

    pub async fn get(&self, task_id: &str) -> Result<Value> {
        self.client.execute(&research::get(task_id)?).await
    }

    pub async fn wait(&self, task_id: &str, options: PollOptions) -> Result<Value> {
        wait_for_task_async(|| self.get(task_id), options).await
    }
}

pub struct AsyncScouts<'a> {
    client: &'a AsyncYutoriClient,
}

impl AsyncScouts<'_> {
    pub async fn list(&self, params: &ListScoutsParams) -> Result<Value> {
        self.client.execute(&scouts::list(params)).await
    }

    pub async fn get(&self, scout_id: &str) -> Result<Value> {
        self.client.execute(&scouts::get(scout_id)?).await
    }

    pub async fn create(&self, params: &CreateScoutParams) -> Result<Value> {
        self.client.execute(&scouts::create(params)?).await
    }

    pub async fn update(&self, scout_id: &str, params: &UpdateScoutParams) -> Result<Value> {
        self.client.execute(&scouts::update(scout_id, params)?).await
    }

    pub async fn delete(&self, scout_id: &str) -> Result<Value> {
        self.client.execute(&scouts::delete(scout_id)?).await
    }

    pub async fn get_updates(&self, scout_id: &str, params: &ScoutUpdatesParams) -> Result<Value> {
        self.client.execute(&scouts::updates(scout_id, params)?).await
    }
}
