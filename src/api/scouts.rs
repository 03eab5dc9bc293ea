//! Scouts: scheduled monitoring tasks that re-run a query and emit updates.

use super::{path_id, ApiRequest, WebhookFormat};
use crate::error::{Result, YutoriError};
use crate::schema::OutputSchema;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Default run interval for new scouts (daily)
pub const DEFAULT_OUTPUT_INTERVAL: u64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoutStatus {
    Active,
    Paused,
    Done,
}

impl ScoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoutStatus::Active => "active",
            ScoutStatus::Paused => "paused",
            ScoutStatus::Done => "done",
        }
    }

    /// Sub-resource that moves a scout into this status
    fn action(&self) -> &'static str {
        match self {
            ScoutStatus::Active => "resume",
            ScoutStatus::Paused => "pause",
            ScoutStatus::Done => "done",
        }
    }
}

impl fmt::Display for ScoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoutStatus {
    type Err = YutoriError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ScoutStatus::Active),
            "paused" => Ok(ScoutStatus::Paused),
            "done" => Ok(ScoutStatus::Done),
            other => Err(YutoriError::InvalidArgument(format!(
                "Invalid status: {}. Must be 'active', 'paused', or 'done'.",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListScoutsParams {
    pub limit: Option<u32>,
    pub status: Option<ScoutStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateScoutParams {
    pub query: String,

    /// Seconds between runs (minimum 1800)
    pub output_interval: u64,

    /// Unix timestamp to start at (0 = immediately)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_timezone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_email: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_format: Option<WebhookFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl CreateScoutParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            output_interval: DEFAULT_OUTPUT_INTERVAL,
            start_timestamp: None,
            user_timezone: None,
            user_location: None,
            output_schema: None,
            skip_email: None,
            webhook_url: None,
            webhook_format: None,
            is_public: None,
        }
    }

    pub fn output_interval(mut self, seconds: u64) -> Self {
        self.output_interval = seconds;
        self
    }

    pub fn start_timestamp(mut self, timestamp: i64) -> Self {
        self.start_timestamp = Some(timestamp);
        self
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

    pub fn skip_email(mut self, skip: bool) -> Self {
        self.skip_email = Some(skip);
        self
    }

    pub fn webhook(mut self, url: impl Into<String>, format: Option<WebhookFormat>) -> Self {
        self.webhook_url = Some(url.into());
        self.webhook_format = format;
        self
    }

    pub fn is_public(mut self, public: bool) -> Self {
        self.is_public = Some(public);
        self
    }
}

/// Field updates for an existing scout.
///
/// A status change and field edits cannot be combined: the API handles status
/// through dedicated pause/resume/done endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateScoutParams {
    #[serde(skip)]
    pub status: Option<ScoutStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_interval: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_timezone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_email: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_format: Option<WebhookFormat>,
}

impl UpdateScoutParams {
    /// Change only the status (pause, resume or archive).
    pub fn status(status: ScoutStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    fn has_field_updates(&self) -> bool {
        self.query.is_some()
            || self.output_interval.is_some()
            || self.user_timezone.is_some()
            || self.user_location.is_some()
            || self.output_schema.is_some()
            || self.skip_email.is_some()
            || self.webhook_url.is_some()
            || self.webhook_format.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoutUpdatesParams {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

pub fn list(params: &ListScoutsParams) -> ApiRequest {
    ApiRequest::get("/scouting/tasks")
        .query_param("limit", params.limit)
        .query_param("status", params.status)
}

pub fn get(scout_id: &str) -> Result<ApiRequest> {
    let id = path_id("scout_id", scout_id)?;
    Ok(ApiRequest::get(format!("/scouting/tasks/{}", id)))
}

pub fn create(params: &CreateScoutParams) -> Result<ApiRequest> {
    ApiRequest::post("/scouting/tasks").json(params)
}

pub fn update(scout_id: &str, params: &UpdateScoutParams) -> Result<ApiRequest> {
    let id = path_id("scout_id", scout_id)?;
    let has_fields = params.has_field_updates();

    match params.status {
        Some(_) if has_fields => Err(YutoriError::InvalidArgument(
            "Cannot update status and other fields simultaneously. \
             The API requires separate calls: one for status change, another for field updates."
                .to_string(),
        )),
        Some(status) => Ok(ApiRequest::post(format!(
            "/scouting/tasks/{}/{}",
            id,
            status.action()
        ))),
        None if !has_fields => Err(YutoriError::InvalidArgument(
            "At least one field must be provided for update.".to_string(),
        )),
        None => ApiRequest::patch(format!("/scouting/tasks/{}", id)).json(params),
    }
}

pub fn delete(scout_id: &str) -> Result<ApiRequest> {
    let id = path_id("scout_id", scout_id)?;
    Ok(ApiRequest::delete(format!("/scouting/tasks/{}", id)))
}

pub fn updates(scout_id: &str, params: &ScoutUpdatesParams) -> Result<ApiRequest> {
    let id = path_id("scout_id", scout_id)?;
    Ok(ApiRequest::get(format!("/scouting/tasks/{}/updates", id))
        .query_param("limit", params.limit)
        .query_param("cursor", params.cursor.as_deref()))
}
