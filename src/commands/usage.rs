use super::get_authenticated_client;
use crate::config::Config;
use crate::error::Result;
use crate::utils::format::{cell, truncate};
use serde_json::Value;

/// Scouts shown in the usage table
const MAX_ROWS: usize = 10;

pub fn execute(config: &Config) -> Result<()> {
    let client = get_authenticated_client(config)?;
    let data = client.get_usage()?;

    println!("\nUsage Statistics\n");
    if let Some(user_id) = data.get("user_id").and_then(Value::as_str) {
        println!("  User ID: {}", user_id);
    }
    if let Some(key_id) = data.get("api_key_id").and_then(Value::as_str) {
        println!("  API Key ID: {}", key_id);
    }

    let scouts = data
        .get("scouts")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    if scouts.is_empty() {
        println!("\n  No scouts yet.");
        return Ok(());
    }

    println!("\n  Scouts: {}", scouts.len());
    println!(
        "  {} {} {} {}",
        cell("ID", 11),
        cell("QUERY", 40),
        cell("STATUS", 8),
        "RUNS"
    );
    for scout in scouts.iter().take(MAX_ROWS) {
        println!("  {}", usage_row(scout));
    }
    if scouts.len() > MAX_ROWS {
        println!("  ... and {} more", scouts.len() - MAX_ROWS);
    }

    Ok(())
}

fn usage_row(scout: &Value) -> String {
    let text = |key: &str| scout.get(key).and_then(Value::as_str).unwrap_or("");
    let id: String = text("id").chars().take(8).collect();
    let runs = scout.get("run_count").and_then(Value::as_u64).unwrap_or(0);

    format!(
        "{} {} {} {}",
        cell(&format!("{}...", id), 11),
        cell(&truncate(text("query"), 40, 37, "..."), 40),
        cell(text("status"), 8),
        runs
    )
}
