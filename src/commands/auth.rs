use super::is_present;
use crate::auth::credentials::{clear_config, is_real_key, load_config, stored_api_key};
use crate::auth::flow::{
    get_auth_status, run_login_flow, run_register_flow, CredentialSource, LoginResult,
};
use crate::config::{Config, API_KEY_ENV};
use crate::error::Result;

/// Refuse browser authentication when a key is already in effect.
fn check_existing_credentials(action: &str) {
    if std::env::var(API_KEY_ENV).is_ok_and(|k| is_real_key(&k)) {
        eprintln!(
            "{} environment variable is set; it takes precedence over saved credentials.",
            API_KEY_ENV
        );
        eprintln!("Unset it first if you want to use browser {}.", action);
        std::process::exit(1);
    }
    if stored_api_key().is_some_and(|k| is_real_key(&k)) {
        eprintln!("You are already authenticated.");
        eprintln!("Run 'yutori auth logout' first to re-{}.", action);
        std::process::exit(1);
    }
}

fn report_failure(prefix: &str, result: &LoginResult) -> ! {
    eprintln!(
        "\n{}: {}",
        prefix,
        result.error.as_deref().unwrap_or("unknown error")
    );
    if let Some(url) = &result.auth_url {
        eprintln!("\nIf the browser didn't open, visit:\n  {}", url);
    }
    std::process::exit(1);
}

pub fn login(config: &Config) -> Result<()> {
    check_existing_credentials("authenticate");

    println!("\nOpening browser for authentication...");
    println!("Waiting for authentication...\n");

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run_login_flow(&config.auth));
    if !result.success {
        report_failure("Authentication failed", &result);
    }

    println!("Successfully authenticated!");
    println!("You can now use the Yutori CLI and SDK.");
    Ok(())
}

pub fn register(config: &Config) -> Result<()> {
    check_existing_credentials("register");

    println!("\nOpening browser for sign-up...");
    println!("Waiting for authentication...\n");

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run_register_flow(&config.auth));
    if !result.success {
        report_failure("Registration failed", &result);
    }

    println!("Registration successful! API key saved.");
    println!("You can now use the Yutori CLI and SDK.");
    Ok(())
}

pub fn status() -> Result<()> {
    let status = get_auth_status();

    if !status.authenticated {
        println!("Not authenticated.");
        println!("Run 'yutori auth login' to authenticate.");
        std::process::exit(1);
    }

    println!("Authenticated");
    println!("  API Key: {}", status.masked_key.unwrap_or_default());
    match status.source {
        Some(CredentialSource::ConfigFile) => {
            let path = status
                .config_path
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| CredentialSource::ConfigFile.to_string());
            println!("  Source: {}", path);
        }
        Some(source) => println!("  Source: {}", source),
        None => {}
    }

    Ok(())
}

pub fn logout() -> Result<()> {
    let has_key = load_config()
        .and_then(|config| config.get("api_key").cloned())
        .is_some_and(|key| is_present(&key));
    if !has_key {
        println!("No credentials found.");
        return Ok(());
    }

    clear_config()?;
    println!("Successfully logged out.");
    Ok(())
}
