use super::{field, get_authenticated_client, optional_field};
use crate::api::scouts::{CreateScoutParams, ListScoutsParams, ScoutStatus, ScoutUpdatesParams};
use crate::config::Config;
use crate::error::Result;
use crate::utils::format::{cell, format_interval_long, format_interval_short, interval_seconds, truncate};
use crate::utils::prompt::{confirm, prompt_required};
use serde_json::Value;

pub fn list(config: &Config, limit: Option<u32>, status: Option<&str>) -> Result<()> {
    let status = status.map(str::parse::<ScoutStatus>).transpose()?;
    let client = get_authenticated_client(config)?;

    let result = client.scouts().list(&ListScoutsParams { limit, status })?;
    let scouts = items(&result, "scouts");
    if scouts.is_empty() {
        println!("No scouts found.");
        return Ok(());
    }

    println!("Your Scouts");
    println!(
        "{} {} {} {}",
        cell("ID", 36),
        cell("QUERY", 50),
        cell("STATUS", 8),
        "INTERVAL"
    );
    println!("{}", "-".repeat(106));
    for scout in scouts {
        let query = optional_field(scout, "query").unwrap_or("");
        println!(
            "{} {} {} {}",
            cell(optional_field(scout, "id").unwrap_or(""), 36),
            cell(&truncate(query, 47, 47, "..."), 50),
            cell(optional_field(scout, "status").unwrap_or("unknown"), 8),
            format_interval_short(interval(scout))
        );
    }

    Ok(())
}

pub fn get(config: &Config, scout_id: &str) -> Result<()> {
    let client = get_authenticated_client(config)?;
    let scout = client.scouts().get(scout_id)?;

    println!(
        "\nScout: {}\n",
        optional_field(&scout, "id").unwrap_or(scout_id)
    );
    println!("  Query: {}", field(&scout, "query"));
    println!("  Status: {}", field(&scout, "status"));
    println!("  Interval: {}", format_interval_long(interval(&scout)));
    if let Some(tz) = optional_field(&scout, "user_timezone") {
        println!("  Timezone: {}", tz);
    }
    if let Some(created) = optional_field(&scout, "created_at") {
        println!("  Created: {}", created);
    }
    if let Some(next) = optional_field(&scout, "next_run_at") {
        println!("  Next Run: {}", next);
    }

    Ok(())
}

pub fn create(
    config: &Config,
    query: Option<String>,
    interval: &str,
    timezone: Option<String>,
) -> Result<()> {
    let query = match query.filter(|q| !q.trim().is_empty()) {
        Some(q) => q,
        None => prompt_required("What would you like to monitor?")?,
    };

    let client = get_authenticated_client(config)?;

    let mut params = CreateScoutParams::new(query.clone()).output_interval(interval_seconds(interval));
    if let Some(tz) = timezone {
        params = params.user_timezone(tz);
    }

    let result = client.scouts().create(&params)?;
    println!("\nScout created successfully!");
    println!("  ID: {}", field(&result, "id"));
    println!(
        "  Query: {}",
        optional_field(&result, "query").unwrap_or(&query)
    );
    println!("  Status: {}", field(&result, "status"));

    Ok(())
}

pub fn delete(config: &Config, scout_id: &str, force: bool) -> Result<()> {
    if !force && !confirm(&format!("Are you sure you want to delete scout {}?", scout_id))? {
        println!("Cancelled.");
        return Ok(());
    }

    let client = get_authenticated_client(config)?;
    client.scouts().delete(scout_id)?;
    println!("Scout {} deleted.", scout_id);

    Ok(())
}

pub fn updates(
    config: &Config,
    scout_id: &str,
    limit: Option<u32>,
    cursor: Option<String>,
) -> Result<()> {
    let client = get_authenticated_client(config)?;
    let result = client
        .scouts()
        .get_updates(scout_id, &ScoutUpdatesParams { limit, cursor })?;

    let updates = items(&result, "updates");
    if updates.is_empty() {
        println!("No updates found.");
    }
    for update in updates {
        println!(
            "\n[{}] {}",
            optional_field(update, "timestamp")
                .or_else(|| optional_field(update, "created_at"))
                .unwrap_or("-"),
            optional_field(update, "id").unwrap_or("")
        );
        if let Some(content) = optional_field(update, "content") {
            println!("{}", truncate(content, 2000, 2000, "\n... (truncated)"));
        }
    }

    if let Some(next) = optional_field(&result, "next_cursor") {
        println!("\nMore updates available: --cursor {}", next);
    }

    Ok(())
}

fn items<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn interval(scout: &Value) -> u64 {
    scout
        .get("output_interval")
        .and_then(Value::as_u64)
        .unwrap_or(0)
}
