//! Waiting for browsing and research tasks to finish.

use crate::config::PollingConfig;
use crate::error::{Result, YutoriError};
use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};

/// Task statuses after which the server will not change the task again
pub const TERMINAL_STATUSES: &[&str] = &["succeeded", "failed", "cancelled", "error"];

#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollOptions {
    fn from(config: &PollingConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

pub fn task_status(task: &Value) -> Option<&str> {
    task.get("status").and_then(Value::as_str)
}

pub fn is_terminal(task: &Value) -> bool {
    task_status(task).is_some_and(|s| TERMINAL_STATUSES.contains(&s))
}

/// Call `fetch` until it returns a task in a terminal status.
///
/// `on_poll` sees every intermediate snapshot (used for progress display).
pub fn wait_for_task<F, P>(mut fetch: F, options: PollOptions, mut on_poll: P) -> Result<Value>
where
    F: FnMut() -> Result<Value>,
    P: FnMut(&Value),
{
    let started = Instant::now();
    loop {
        let task = fetch()?;
        on_poll(&task);
        if is_terminal(&task) {
            return Ok(task);
        }
        check_deadline(started, &task, options.timeout)?;
        std::thread::sleep(options.interval);
    }
}

/// Async version of [`wait_for_task`].
pub async fn wait_for_task_async<F, Fut>(mut fetch: F, options: PollOptions) -> Result<Value>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let started = Instant::now();
    loop {
        let task = fetch().await?;
        if is_terminal(&task) {
            return Ok(task);
        }
        check_deadline(started, &task, options.timeout)?;
        tokio::time::sleep(options.interval).await;
    }
}

fn check_deadline(started: Instant, task: &Value, timeout: Duration) -> Result<()> {
    if started.elapsed() >= timeout {
        return Err(YutoriError::Timeout(format!(
            "task still '{}' after {}s",
            task_status(task).unwrap_or("unknown"),
            timeout.as_secs()
        )));
    }
    tracing::debug!(status = ?task_status(task), "task not finished yet");
    Ok(())
}
