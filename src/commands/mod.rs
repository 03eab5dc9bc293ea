pub mod auth;
pub mod browse;
pub mod research;
pub mod scouts;
pub mod usage;
pub mod version;

use crate::auth::credentials::resolve_api_key;
use crate::client::{ClientBuilder, YutoriClient};
use crate::config::Config;
use crate::error::Result;
use crate::polling::{task_status, wait_for_task, PollOptions};
use crate::utils::format::truncate;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;

const MAX_RESULT_CHARS: usize = 2000;

/// Build a client from the resolved key, or exit with a login hint.
pub fn get_authenticated_client(config: &Config) -> Result<YutoriClient> {
    let Some(api_key) = resolve_api_key(None) else {
        eprintln!("Not authenticated. Run 'yutori auth login' first.");
        std::process::exit(1);
    };
    ClientBuilder::from_config(config).api_key(api_key).build()
}

/// Display form of a response field, `N/A` when absent or null
pub(crate) fn field(value: &Value, key: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Non-empty string field, for optional detail lines
pub(crate) fn optional_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// The task's `result` (or `output`) as display text, cut at 2000 characters.
pub(crate) fn task_output(task: &Value) -> Option<String> {
    let output = ["result", "output"]
        .iter()
        .filter_map(|key| task.get(*key))
        .find(|v| is_present(v))?;

    let text = match output {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    Some(truncate(
        &text,
        MAX_RESULT_CHARS,
        MAX_RESULT_CHARS,
        "\n... (truncated)",
    ))
}

/// Truthiness of a JSON value: null, false and empty values are absent
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}

pub(crate) fn print_task_output(task: &Value) {
    if let Some(text) = task_output(task) {
        println!("\nResult:");
        println!("{}", text);
    }
}

/// Poll a task with a spinner showing its current status.
pub(crate) fn wait_with_spinner<F>(fetch: F, options: PollOptions) -> Result<Value>
where
    F: FnMut() -> Result<Value>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("Waiting for task...");

    let result = wait_for_task(fetch, options, |task| {
        spinner.set_message(format!("Status: {}", task_status(task).unwrap_or("unknown")));
    });
    spinner.finish_and_clear();
    result
}
