//! Blocking client for the Yutori API.
//!
//! ```no_run
//! use yutori::YutoriClient;
//! use yutori::api::scouts::ListScoutsParams;
//!
//! let client = YutoriClient::new(Some("yt-..."))?;
//! println!("{}", client.get_usage()?);
//! println!("{}", client.scouts().list(&ListScoutsParams::default())?);
//! # Ok::<(), yutori::YutoriError>(())
//! ```

use crate::api::browsing::{self, BrowsingTaskParams};
use crate::api::chat::{self, ChatCompletionRequest};
use crate::api::research::{self, ResearchTaskParams};
use crate::api::scouts::{
    self, CreateScoutParams, ListScoutsParams, ScoutUpdatesParams, UpdateScoutParams,
};
use crate::api::{self, build_headers, handle_response, ApiRequest};
use crate::async_client::AsyncYutoriClient;
use crate::auth::credentials::resolve_api_key;
use crate::config::{sanitize_base_url, Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::{Result, YutoriError};
use crate::polling::{wait_for_task, PollOptions};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

const NO_API_KEY: &str =
    "No API key provided. Run 'yutori auth login', set YUTORI_API_KEY, or pass api_key.";

/// Shared construction for [`YutoriClient`] and [`AsyncYutoriClient`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL and timeout from loaded settings
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .base_url(&config.api.base_url)
            .timeout(config.timeout())
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = base_url.as_ref().to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve the key (explicit > YUTORI_API_KEY > ~/.yutori/config.json)
    fn resolve(&self) -> Result<(String, String)> {
        let api_key = resolve_api_key(self.api_key.as_deref())
            .ok_or_else(|| YutoriError::Authentication(NO_API_KEY.to_string()))?;
        Ok((api_key, sanitize_base_url(&self.base_url)))
    }

    pub fn build(self) -> Result<YutoriClient> {
        let (api_key, base_url) = self.resolve()?;
        let http = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        Ok(YutoriClient {
            http,
            base_url,
            api_key,
        })
    }

    pub fn build_async(self) -> Result<AsyncYutoriClient> {
        let (api_key, base_url) = self.resolve()?;
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;
        Ok(AsyncYutoriClient::from_parts(http, base_url, api_key))
    }
}

pub struct YutoriClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for YutoriClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YutoriClient")
            .field("base_url", &self.base_url)
            .field("api_key", &crate::auth::flow::mask_key(&self.api_key))
            .finish()
    }
}

impl YutoriClient {
    /// Create a client with the default base URL and timeout.
    ///
    /// Fails with [`YutoriError::Authentication`] when no key can be resolved.
    pub fn new(api_key: Option<&str>) -> Result<Self> {
        let mut builder = ClientBuilder::new();
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        builder.build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a prepared request and classify the response.
    pub fn execute(&self, request: &ApiRequest) -> Result<Value> {
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

        let response = builder.send()?;
        let status = response.status().as_u16();
        let text = response.text()?;
        tracing::debug!(status, bytes = text.len(), "received response");

        handle_response(status, &text)
    }

    /// Usage statistics for the current API key
    pub fn get_usage(&self) -> Result<Value> {
        self.execute(&api::usage())
    }

    pub fn chat(&self) -> Chat<'_> {
        Chat { client: self }
    }

    pub fn browsing(&self) -> Browsing<'_> {
        Browsing { client: self }
    }

    pub fn research(&self) -> Research<'_> {
        Research { client: self }
    }

    pub fn scouts(&self) -> Scouts<'_> {
        Scouts { client: self }
    }
}

/// n1 chat completions
pub struct Chat<'a> {
    client: &'a YutoriClient,
}

impl Chat<'_> {
    pub fn completions(&self, request: &ChatCompletionRequest) -> Result<Value> {
        self.client.execute(&chat::completions(request)?)
    }
}

pub struct Browsing<'a> {
    client: &'a YutoriClient,
}

impl Browsing<'_> {
    pub fn create(&self, params: &BrowsingTaskParams) -> Result<Value> {
        self.client.execute(&browsing::create(params)?)
    }

    pub fn get(&self, task_id: &str) -> Result<Value> {
        self.client.execute(&browsing::get(task_id)?)
    }

    /// Poll until the task reaches a terminal status.
    pub fn wait(&self, task_id: &str, options: PollOptions) -> Result<Value> {
        wait_for_task(|| self.get(task_id), options, |_| {})
    }
}

pub struct Research<'a> {
    client: &'a YutoriClient,
}

impl Research<'_> {
    pub fn create(&self, params: &ResearchTaskParams) -> Result<Value> {
        self.client.execute(&research::create(params)?)
    }

    pub fn get(&self, task_id: &str) -> Result<Value> {
        self.client.execute(&research::get(task_id)?)
    }

    pub fn wait(&self, task_id: &str, options: PollOptions) -> Result<Value> {
        wait_for_task(|| self.get(task_id), options, |_| {})
    }
}

pub struct Scouts<'a> {
    client: &'a YutoriClient,
}

impl Scouts<'_> {
    pub fn list(&self, params: &ListScoutsParams) -> Result<Value> {
        self.client.execute(&scouts::list(params))
    }

    pub fn get(&self, scout_id: &str) -> Result<Value> {
        self.client.execute(&scouts::get(scout_id)?)
    }

    pub fn create(&self, params: &CreateScoutParams) -> Result<Value> {
        self.client.execute(&scouts::create(params)?)
    }

    pub fn update(&self, scout_id: &str, params: &UpdateScoutParams) -> Result<Value> {
        self.client.execute(&scouts::update(scout_id, params)?)
    }

    pub fn delete(&self, scout_id: &str) -> Result<Value> {
        self.client.execute(&scouts::delete(scout_id)?)
    }

    /// Reports emitted by a scout, paginated by cursor
    pub fn get_updates(&self, scout_id: &str, params: &ScoutUpdatesParams) -> Result<Value> {
        self.client.execute(&scouts::updates(scout_id, params)?)
    }
}
