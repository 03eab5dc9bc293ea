use thiserror::Error;

#[derive(Error, Debug)]
pub enum YutoriError {
    /// The API key is missing or was rejected (HTTP 401/403).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The API answered with any other non-success status.
    #[error("{status}: {message}")]
    Api {
        status: u16,
        message: String,
        body: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl YutoriError {
    /// HTTP status carried by the error, if it came from an API response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            YutoriError::Api { status, .. } => Some(*status),
            YutoriError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, YutoriError::Authentication(_))
    }
}

pub type Result<T> = std::result::Result<T, YutoriError>;
