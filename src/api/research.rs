//! One-shot deep research tasks.

use super::{path_id, ApiRequest, WebhookFormat};
use crate::error::Result;
use crate::schema::OutputSchema;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ResearchTaskParams {
    pub query: String,

    /// e.g. "America/Los_Angeles"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_timezone: Option<String>,

    /// e.g. "San Francisco, CA, US"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_format: Option<WebhookFormat>,
}

impl ResearchTaskParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_timezone: None,
            user_location: None,
            output_schema: None,
            webhook_url: None,
            webhook_format: None,
        }
    }

    pub fn user_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.user_timezone = Some(timezone.into());
        self
    }

    pub fn user_location(mut self, location: impl Into<String>) -> Self {
        self.user_location = Some(location.into());
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

pub fn create(params: &ResearchTaskParams) -> Result<ApiRequest> {
    ApiRequest::post("/research/tasks").json(params)
}

pub fn get(task_id: &str) -> Result<ApiRequest> {
    let id = path_id("task_id", task_id)?;
    Ok(ApiRequest::get(format!("/research/tasks/{}", id)))
}
