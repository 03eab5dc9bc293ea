//! One-shot browser automation tasks.

use super::{path_id, ApiRequest, WebhookFormat};
use crate::error::Result;
use crate::schema::OutputSchema;
use serde::Serialize;

/// Parameters for `POST /browsing/tasks`. Unset options are omitted from the body.
#[derive(Debug, Clone, Serialize)]
pub struct BrowsingTaskParams {
    pub task: String,
    pub start_url: String,

    /// Maximum agent steps (1-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<u32>,

    /// e.g. "navigator-n1-preview-2025-11"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Use the auth-optimized browser for login flows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_auth: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_format: Option<WebhookFormat>,
}

impl BrowsingTaskParams {
    pub fn new(task: impl Into<String>, start_url: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            start_url: start_url.into(),
            max_steps: None,
            agent: None,
            require_auth: None,
            output_schema: None,
            webhook_url: None,
            webhook_format: None,
        }
    }

    pub fn max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn require_auth(mut self, require_auth: bool) -> Self {
        self.require_auth = Some(require_auth);
        self
    }

    pub fn output_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn webhook(mut self, url: impl Into<String>, format: Option<WebhookFormat>) -> Self {
        self.webhook_url = Some(url.into());
        self.webhook_format = format;
        self
    }
}

pub fn create(params: &BrowsingTaskParams) -> Result<ApiRequest> {
    ApiRequest::post("/browsing/tasks").json(params)
}

pub fn get(task_id: &str) -> Result<ApiRequest> {
    let id = path_id("task_id", task_id)?;
    Ok(ApiRequest::get(format!("/browsing/tasks/{}", id)))
}
