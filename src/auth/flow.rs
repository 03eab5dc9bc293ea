//! OAuth 2.0 + PKCE login and registration: browser authorization, local
//! callback, code exchange, then API key generation.
//!
//! Functions here return typed results and never print; the CLI decides how
//! to present them.

use super::callback::{self, CallbackOutcome, AUTH_TIMEOUT, REDIRECT_PORT};
use super::credentials::{config_path, is_real_key, save_config, stored_api_key};
use super::pkce::{generate_pkce_pair, generate_state, PkcePair};
use crate::config::{sanitize_base_url, AuthConfig, API_KEY_ENV};
use crate::error::{Result, YutoriError};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const GENERATE_KEY_ENDPOINT: &str = "/client/generate_key";

/// Suffix for generated key names, shown in the dashboard
pub const KEY_SOURCE: &str = "yutori-cli";

/// `screen_hint` that opens the Clerk sign-up page instead of sign-in
pub const SCREEN_HINT_SIGN_UP: &str = "sign_up";

const OAUTH_SCOPE: &str = "openid profile email";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const ERROR_STATE_MISMATCH: &str =
    "Security validation failed (state mismatch). Please try again.";
const ERROR_AUTH_FAILED: &str = "Authentication failed";
const ERROR_SIGN_UP_FAILED: &str = "Sign-up failed";
const ERROR_MAX_KEYS_REACHED: &str = "Maximum number of API keys reached. \
     Delete an unused key at https://platform.yutori.com/settings and try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginResult {
    pub success: bool,
    pub api_key: Option<String>,
    pub error: Option<String>,
    /// Authorization URL, so the caller can show it if the browser did not open
    pub auth_url: Option<String>,
}

impl LoginResult {
    fn failed(error: String, auth_url: Option<String>) -> Self {
        Self {
            success: false,
            api_key: None,
            error: Some(error),
            auth_url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    EnvVar,
    ConfigFile,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::EnvVar => write!(f, "{} environment variable", API_KEY_ENV),
            CredentialSource::ConfigFile => f.write_str("config file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub masked_key: Option<String>,
    pub source: Option<CredentialSource>,
    pub config_path: Option<PathBuf>,
}

/// Listener settings for [`run_login_flow_with`]
#[derive(Debug, Clone, Copy)]
pub struct LoginOptions {
    pub port: u16,
    pub timeout: Duration,
}

impl Default for LoginOptions {
    fn default() -> Self {
        Self {
            port: REDIRECT_PORT,
            timeout: AUTH_TIMEOUT,
        }
    }
}

/// Authorization URL on the Clerk instance.
///
/// `screen_hint` is passed through when set (see [`SCREEN_HINT_SIGN_UP`]).
pub fn build_auth_url(
    auth: &AuthConfig,
    redirect_uri: &str,
    code_challenge: &str,
    state: &str,
    screen_hint: Option<&str>,
) -> Result<String> {
    let endpoint = format!("{}/oauth/authorize", sanitize_base_url(&auth.clerk_instance_url));
    let mut params = vec![
        ("response_type", "code"),
        ("client_id", auth.clerk_client_id.as_str()),
        ("redirect_uri", redirect_uri),
        ("code_challenge", code_challenge),
        ("code_challenge_method", "S256"),
        ("state", state),
        ("scope", OAUTH_SCOPE),
    ];
    if let Some(hint) = screen_hint.filter(|h| !h.is_empty()) {
        params.push(("screen_hint", hint));
    }

    let url = Url::parse_with_params(&endpoint, &params).map_err(|e| {
        YutoriError::InvalidArgument(format!("Invalid Clerk URL {}: {}", endpoint, e))
    })?;
    Ok(url.into())
}

/// Exchange the authorization code for a JWT.
pub async fn exchange_code_for_token(
    http: &reqwest::Client,
    auth: &AuthConfig,
    redirect_uri: &str,
    code: &str,
    code_verifier: &str,
) -> Result<String> {
    let mut form: HashMap<&str, &str> = HashMap::new();
    form.insert("grant_type", "authorization_code");
    form.insert("client_id", auth.clerk_client_id.trim());
    form.insert("code", code.trim());
    form.insert("redirect_uri", redirect_uri);
    form.insert("code_verifier", code_verifier);

    let url = format!("{}/oauth/token", sanitize_base_url(&auth.clerk_instance_url));
    tracing::debug!(%url, "exchanging authorization code");
    let response = http.post(&url).form(&form).send().await?;

    let body = read_success_json(response, ERROR_AUTH_FAILED).await?;
    string_field(&body, "access_token")
}

/// Create a new API key for the user identified by `jwt`.
pub async fn generate_api_key(
    http: &reqwest::Client,
    auth: &AuthConfig,
    jwt: &str,
    key_name: Option<&str>,
) -> Result<String> {
    let url = format!(
        "{}{}",
        sanitize_base_url(&auth.auth_api_base_url),
        GENERATE_KEY_ENDPOINT
    );
    tracing::debug!(%url, "generating API key");

    let mut request = http.post(&url).bearer_auth(jwt);
    if let Some(name) = key_name {
        request = request.json(&serde_json::json!({ "name": name }));
    }
    let response = request.send().await?;

    let body = read_success_json(response, ERROR_AUTH_FAILED).await?;
    string_field(&body, "key")
}

/// Create (or confirm) the account behind `jwt` before a key is generated.
pub async fn validate_sign_up(http: &reqwest::Client, auth: &AuthConfig, jwt: &str) -> Result<()> {
    let url = format!(
        "{}{}",
        sanitize_base_url(&auth.auth_api_base_url),
        auth.sign_up_endpoint
    );
    tracing::debug!(%url, "validating sign-up");

    let response = http.post(&url).bearer_auth(jwt).send().await?;
    read_success_text(response, ERROR_SIGN_UP_FAILED).await?;
    Ok(())
}

/// `YYYY-MM-DD-<source>` in UTC
pub fn key_name(source: &str) -> String {
    format!("{}-{}", chrono::Utc::now().format("%Y-%m-%d"), source)
}

/// User-facing message for a failed auth API call.
pub fn format_http_error(status: u16, body: &str, fallback: &str) -> String {
    if status == 409 {
        return ERROR_MAX_KEYS_REACHED.to_string();
    }
    if body.trim().is_empty() {
        format!("{} ({})", fallback, status)
    } else {
        format!("{} ({}): {}", fallback, status, body.trim())
    }
}

async fn read_success_text(response: reqwest::Response, fallback: &str) -> Result<String> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    if !(200..300).contains(&status) {
        return Err(YutoriError::Api {
            status,
            message: format_http_error(status, &body, fallback),
            body,
        });
    }
    Ok(body)
}

async fn read_success_json(response: reqwest::Response, fallback: &str) -> Result<Value> {
    let body = read_success_text(response, fallback).await?;
    Ok(serde_json::from_str(&body)?)
}

fn string_field(body: &Value, field: &str) -> Result<String> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| YutoriError::Login(format!("Response is missing '{}'", field)))
}

/// Run the full browser login and save the generated key.
pub async fn run_login_flow(auth: &AuthConfig) -> LoginResult {
    run_login_flow_with(auth, LoginOptions::default(), crate::utils::browser::open_url).await
}

/// [`run_login_flow`] with an explicit listener and browser opener.
///
/// `open_browser` receives the authorization URL and reports whether a
/// browser was launched.
pub async fn run_login_flow_with<F>(
    auth: &AuthConfig,
    options: LoginOptions,
    open_browser: F,
) -> LoginResult
where
    F: FnOnce(&str) -> bool,
{
    run_flow(auth, options, open_browser, FlowKind::Login).await
}

/// Sign up in the browser, create the account, then generate and save a key.
pub async fn run_register_flow(auth: &AuthConfig) -> LoginResult {
    run_register_flow_with(auth, LoginOptions::default(), crate::utils::browser::open_url).await
}

/// [`run_register_flow`] with an explicit listener and browser opener.
pub async fn run_register_flow_with<F>(
    auth: &AuthConfig,
    options: LoginOptions,
    open_browser: F,
) -> LoginResult
where
    F: FnOnce(&str) -> bool,
{
    run_flow(auth, options, open_browser, FlowKind::Register).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowKind {
    Login,
    Register,
}

impl FlowKind {
    fn screen_hint(self) -> Option<&'static str> {
        match self {
            FlowKind::Login => None,
            FlowKind::Register => Some(SCREEN_HINT_SIGN_UP),
        }
    }
}

async fn run_flow<F>(
    auth: &AuthConfig,
    options: LoginOptions,
    open_browser: F,
    kind: FlowKind,
) -> LoginResult
where
    F: FnOnce(&str) -> bool,
{
    let pkce = generate_pkce_pair();
    let state = generate_state();
    let redirect_uri = callback::redirect_uri(options.port);

    let auth_url = match build_auth_url(
        auth,
        &redirect_uri,
        &pkce.code_challenge,
        &state,
        kind.screen_hint(),
    ) {
        Ok(url) => url,
        Err(e) => return LoginResult::failed(error_message(&e), None),
    };

    let attempt = LoginAttempt {
        auth,
        options,
        kind,
        pkce: &pkce,
        state: &state,
        redirect_uri: &redirect_uri,
        auth_url: &auth_url,
    };
    match attempt.run(open_browser).await {
        Ok(api_key) => LoginResult {
            success: true,
            api_key: Some(api_key),
            error: None,
            auth_url: Some(auth_url),
        },
        Err(e) => {
            tracing::debug!(error = %e, ?kind, "browser authentication failed");
            LoginResult::failed(error_message(&e), Some(auth_url))
        }
    }
}

struct LoginAttempt<'a> {
    auth: &'a AuthConfig,
    options: LoginOptions,
    kind: FlowKind,
    pkce: &'a PkcePair,
    state: &'a str,
    redirect_uri: &'a str,
    auth_url: &'a str,
}

impl LoginAttempt<'_> {
    async fn run<F: FnOnce(&str) -> bool>(&self, open_browser: F) -> Result<String> {
        let listener = callback::bind(self.options.port).await?;

        if !open_browser(self.auth_url) {
            tracing::warn!(
                "Could not open browser. Open this URL manually:\n  {}",
                self.auth_url
            );
        }

        let code = match callback::wait_for_callback(listener, self.options.timeout).await? {
            CallbackOutcome::Error(message) => return Err(YutoriError::Login(message)),
            CallbackOutcome::Code { code, state } => {
                let returned = state.unwrap_or_default();
                if !constant_time_eq(returned.as_bytes(), self.state.as_bytes()) {
                    return Err(YutoriError::Login(ERROR_STATE_MISMATCH.to_string()));
                }
                code
            }
        };

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(crate::version::user_agent())
            .build()?;

        let jwt = exchange_code_for_token(
            &http,
            self.auth,
            self.redirect_uri,
            &code,
            &self.pkce.code_verifier,
        )
        .await?;
        if self.kind == FlowKind::Register {
            validate_sign_up(&http, self.auth, &jwt).await?;
        }

        let name = key_name(KEY_SOURCE);
        let api_key = generate_api_key(&http, self.auth, &jwt, Some(&name)).await?;
        save_config(&api_key)?;

        Ok(api_key)
    }
}

fn error_message(err: &YutoriError) -> String {
    match err {
        YutoriError::Login(message) | YutoriError::Timeout(message) => message.clone(),
        YutoriError::Api { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Where the current key comes from, with the same precedence as
/// [`super::credentials::resolve_api_key`] (environment before file).
pub fn get_auth_status() -> AuthStatus {
    let config_path = config_path();

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if is_real_key(&key) {
            return AuthStatus {
                authenticated: true,
                masked_key: Some(mask_key(&key)),
                source: Some(CredentialSource::EnvVar),
                config_path,
            };
        }
    }

    if let Some(key) = stored_api_key().filter(|k| is_real_key(k)) {
        return AuthStatus {
            authenticated: true,
            masked_key: Some(mask_key(&key)),
            source: Some(CredentialSource::ConfigFile),
            config_path,
        };
    }

    AuthStatus {
        authenticated: false,
        masked_key: None,
        source: None,
        config_path,
    }
}

/// Show the first 6 and last 4 characters of keys with at least 11 characters.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 11 {
        return "***".to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
