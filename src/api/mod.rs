//! Transport-independent request construction.
//!
//! Every API operation is expressed as an [`ApiRequest`] built by a pure
//! function in one of the submodules. The blocking and async clients only
//! differ in how they send it; response classification is shared through
//! [`handle_response`].

pub mod browsing;
pub mod chat;
pub mod research;
pub mod scouts;

use crate::error::{Result, YutoriError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// How the API key is presented to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `x-api-key: <key>`, used by the task and scout endpoints
    ApiKeyHeader,
    /// `Authorization: Bearer <key>`, used by the OpenAI-compatible chat endpoint
    Bearer,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, always starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub auth: AuthScheme,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            auth: AuthScheme::ApiKeyHeader,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Add a query parameter; `None` values are left out entirely.
    pub fn query_param<T: ToString>(mut self, name: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.query.push((name.to_string(), value.to_string()));
        }
        self
    }

    pub fn bearer(mut self) -> Self {
        self.auth = AuthScheme::Bearer;
        self
    }

    /// Full URL for this request against a sanitized base URL.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.path)
    }
}

/// GET /usage
pub fn usage() -> ApiRequest {
    ApiRequest::get("/usage")
}

/// Build request headers for the given key and auth scheme.
pub fn build_headers(api_key: &str, auth: AuthScheme) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let ua = HeaderValue::from_str(&crate::version::user_agent())
        .map_err(|e| YutoriError::InvalidArgument(format!("Invalid user agent: {}", e)))?;
    headers.insert(USER_AGENT, ua);

    match auth {
        AuthScheme::ApiKeyHeader => {
            headers.insert("x-api-key", header_value(api_key)?);
        }
        AuthScheme::Bearer => {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", api_key))?);
        }
    }

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value).map_err(|_| {
        YutoriError::InvalidArgument("API key contains characters not allowed in headers".into())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Classify an HTTP response.
///
/// 401/403 map to [`YutoriError::Authentication`], any other status >= 400 to
/// [`YutoriError::Api`]. A successful empty body yields an empty JSON object.
pub fn handle_response(status: u16, body: &str) -> Result<Value> {
    if status == 401 || status == 403 {
        return Err(YutoriError::Authentication(
            "Invalid or missing API key".to_string(),
        ));
    }

    if status >= 400 {
        let message = if body.trim().is_empty() {
            "Yutori API call failed".to_string()
        } else {
            body.to_string()
        };
        return Err(YutoriError::Api {
            status,
            message,
            body: body.to_string(),
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    Ok(serde_json::from_str(body)?)
}

/// Validate an identifier before interpolating it into a path.
pub(crate) fn path_id<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(YutoriError::InvalidArgument(format!(
            "{} must not be empty",
            kind
        )));
    }
    if id.contains(['/', '?', '#']) {
        return Err(YutoriError::InvalidArgument(format!(
            "{} contains invalid characters: {}",
            kind, id
        )));
    }
    Ok(id)
}

/// Supported webhook payload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookFormat {
    Scout,
    Slack,
    Zapier,
}
