//! API key storage in ~/.yutori/config.json.

use crate::config::{config_dir, API_KEY_ENV};
use crate::error::Result;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "config.json";

/// Values that show up in copied snippets and are never valid keys
const PLACEHOLDER_KEYS: &[&str] = &["YOUR_API_KEY"];

/// ~/.yutori/config.json, or `None` when HOME is unset
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Read the credentials file.
///
/// Returns `None` if the file is missing, unreadable, not JSON, or not an object.
pub fn load_config() -> Option<Map<String, Value>> {
    let path = config_path()?;
    let contents = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            tracing::debug!(path = %path.display(), "credentials file is not a JSON object");
            None
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "ignoring corrupt credentials file");
            None
        }
    }
}

/// The `api_key` entry of the credentials file, if it holds a string.
pub fn stored_api_key() -> Option<String> {
    load_config()?
        .get("api_key")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Write the key to the credentials file atomically.
///
/// The directory is created with mode 0700 and the file with 0600.
pub fn save_config(api_key: &str) -> Result<PathBuf> {
    let path = config_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    std::fs::create_dir_all(&dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700))?;
    }

    let contents = serde_json::to_string_pretty(&serde_json::json!({ "api_key": api_key }))?;

    // Temp file in the same directory so the rename stays on one filesystem
    let mut tmp = tempfile::Builder::new()
        .prefix(".config_")
        .suffix(".tmp")
        .tempfile_in(&dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o600))?;
    }
    tmp.persist(&path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), "saved API key");
    Ok(path)
}

/// Delete the credentials file. Returns whether a file was removed.
pub fn clear_config() -> Result<bool> {
    let Some(path) = config_path() else {
        return Ok(false);
    };
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn is_real_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !PLACEHOLDER_KEYS.contains(&key)
}

/// Resolve an API key: explicit value, then `YUTORI_API_KEY`, then the
/// credentials file. Empty and placeholder values are skipped.
pub fn resolve_api_key(explicit: Option<&str>) -> Option<String> {
    if let Some(key) = explicit.filter(|k| is_real_key(k)) {
        return Some(key.to_string());
    }

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if is_real_key(&key) {
            return Some(key);
        }
    }

    stored_api_key().filter(|k| is_real_key(k))
}
