//! Localhost listener that receives the OAuth redirect.

use crate::error::{Result, YutoriError};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use url::Url;

/// Bind on the IPv4 loopback; the redirect URI uses `localhost` because that
/// is what the OAuth client has registered.
pub const CALLBACK_HOST: &str = "127.0.0.1";
pub const REDIRECT_PORT: u16 = 54320;
pub const CALLBACK_PATH: &str = "/callback";
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(300);

/// Per-connection limit for receiving the request line
const READ_TIMEOUT: Duration = Duration::from_secs(10);

pub const ERROR_AUTH_TIMEOUT: &str = "Login timed out. Please try again.";
const ERROR_NO_CODE: &str = "No authorization code received";

const DASHBOARD_URL: &str = "https://platform.yutori.com/settings";

pub fn redirect_uri(port: u16) -> String {
    format!("http://localhost:{}{}", port, CALLBACK_PATH)
}

/// What the browser delivered to the callback endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Code { code: String, state: Option<String> },
    Error(String),
}

/// How a single request to the listener is answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Classified {
    /// Unrelated request (favicon, stray path): answer and keep listening
    Ignore { status: u16 },
    Resolved(CallbackOutcome),
}

/// Classify a request target such as `/callback?code=..&state=..`.
pub(crate) fn classify_target(target: &str) -> Classified {
    let Ok(url) = Url::parse(&format!("http://{}{}", CALLBACK_HOST, target)) else {
        return Classified::Ignore { status: 400 };
    };

    match url.path() {
        "/favicon.ico" => return Classified::Ignore { status: 204 },
        CALLBACK_PATH => {}
        _ => return Classified::Ignore { status: 404 },
    }

    let mut code = None;
    let mut state = None;
    let mut error = None;
    let mut error_description = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" if !value.is_empty() => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => error_description = Some(value.into_owned()),
            _ => {}
        }
    }

    let outcome = match (error, code) {
        (Some(error), _) => CallbackOutcome::Error(error_description.unwrap_or(error)),
        (None, Some(code)) => CallbackOutcome::Code { code, state },
        (None, None) => CallbackOutcome::Error(ERROR_NO_CODE.to_string()),
    };
    Classified::Resolved(outcome)
}

/// Bind the callback listener on the loopback interface.
pub async fn bind(port: u16) -> Result<TcpListener> {
    match TcpListener::bind((CALLBACK_HOST, port)).await {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => Err(YutoriError::Login(format!(
            "Port {} is already in use. Close other applications and try again.",
            port
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Serve requests until the callback resolves or `timeout` elapses.
pub async fn wait_for_callback(listener: TcpListener, timeout: Duration) -> Result<CallbackOutcome> {
    tokio::time::timeout(timeout, serve_until_resolved(&listener))
        .await
        .map_err(|_| YutoriError::Timeout(ERROR_AUTH_TIMEOUT.to_string()))?
}

/// Each connection gets its own task, so an idle one (a browser preconnect)
/// cannot hold up the redirect.
async fn serve_until_resolved(listener: &TcpListener) -> Result<CallbackOutcome> {
    let (tx, mut rx) = mpsc::channel(1);
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = accepted?;
                tracing::debug!(%peer, "callback connection");
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(outcome) = handle_connection(socket).await {
                        let _ = tx.send(outcome).await;
                    }
                });
            }
            Some(outcome) = rx.recv() => return Ok(outcome),
        }
    }
}

async fn handle_connection(mut socket: TcpStream) -> Option<CallbackOutcome> {
    let mut buffer = vec![0u8; 8192];
    let size = match tokio::time::timeout(READ_TIMEOUT, socket.read(&mut buffer)).await {
        Ok(Ok(0)) => return None,
        Ok(Ok(n)) => n,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "callback read failed");
            return None;
        }
        Err(_) => {
            tracing::debug!("callback connection sent nothing");
            return None;
        }
    };

    let request = String::from_utf8_lossy(&buffer[..size]);
    let classified = match extract_request_target(&request) {
        Some(target) => classify_target(target),
        None => Classified::Ignore { status: 400 },
    };

    let (status, body, outcome) = match classified {
        Classified::Ignore { status } => (status, String::new(), None),
        Classified::Resolved(outcome) => {
            let body = match &outcome {
                CallbackOutcome::Code { .. } => success_page(),
                CallbackOutcome::Error(message) => failure_page(message),
            };
            (200, body, Some(outcome))
        }
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line(status),
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;

    outcome
}

fn extract_request_target(request: &str) -> Option<&str> {
    let mut parts = request.lines().next()?.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    (method == "GET" && !target.is_empty()).then_some(target)
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        204 => "204 No Content",
        404 => "404 Not Found",
        _ => "400 Bad Request",
    }
}

fn success_page() -> String {
    format!(
        "<html><body><h1>Login Successful</h1><p>Redirecting to your developer dashboard...</p>\
         <script>setTimeout(function(){{window.location.href=\"{}\"}},5000)</script></body></html>",
        DASHBOARD_URL
    )
}

fn failure_page(message: &str) -> String {
    format!(
        "<html><body><h1>Login Failed</h1><p>{}</p></body></html>",
        html_escape(message)
    )
}

fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
