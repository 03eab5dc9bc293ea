use std::process::{Command, Stdio};

/// Open `url` in the user's default browser.
///
/// Returns whether a launcher could be started; the caller prints the URL
/// for manual use otherwise.
pub fn open_url(url: &str) -> bool {
    let mut command = launcher(url);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    match command.status() {
        Ok(status) if status.success() => true,
        Ok(status) => {
            tracing::debug!(?status, "browser launcher exited with failure");
            false
        }
        Err(e) => {
            tracing::debug!(error = %e, "failed to start browser launcher");
            false
        }
    }
}

#[cfg(target_os = "macos")]
fn launcher(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn launcher(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    // Empty title argument so `start` does not treat the URL as one
    cmd.args(["/C", "start", ""]).arg(url);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launcher(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}
