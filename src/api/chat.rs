//! OpenAI-compatible chat completions for the n1 model.

use super::ApiRequest;
use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_MODEL: &str = "n1-latest";

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    /// Messages in OpenAI chat format
    pub messages: Vec<Value>,
    /// Extra request parameters (temperature, tools, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletionRequest {
    pub fn new(messages: Vec<Value>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            messages,
            extra: Map::new(),
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn temperature(self, temperature: f64) -> Self {
        self.param("temperature", Value::from(temperature))
    }

    pub fn param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }
}

pub fn completions(request: &ChatCompletionRequest) -> Result<ApiRequest> {
    ApiRequest::post("/chat/completions").bearer().json(request)
}
