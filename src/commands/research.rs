use super::{field, get_authenticated_client, optional_field, print_task_output, wait_with_spinner};
use crate::api::research::ResearchTaskParams;
use crate::config::Config;
use crate::error::Result;
use crate::polling::PollOptions;
use serde_json::Value;

pub struct RunArgs {
    pub query: String,
    pub timezone: Option<String>,
    pub location: Option<String>,
    pub wait: bool,
}

pub fn run(config: &Config, args: RunArgs) -> Result<()> {
    let client = get_authenticated_client(config)?;

    let mut params = ResearchTaskParams::new(args.query);
    if let Some(tz) = args.timezone {
        params = params.user_timezone(tz);
    }
    if let Some(location) = args.location {
        params = params.user_location(location);
    }

    let created = client.research().create(&params)?;
    println!("\nResearch task created!");
    println!("  Task ID: {}", field(&created, "task_id"));
    println!("  Status: {}", field(&created, "status"));

    if args.wait {
        let Some(task_id) = optional_field(&created, "task_id") else {
            return Ok(());
        };
        let task = wait_with_spinner(
            || client.research().get(task_id),
            PollOptions::from(&config.polling),
        )?;
        print_task(&task, task_id);
    }

    Ok(())
}

pub fn get(config: &Config, task_id: &str) -> Result<()> {
    let client = get_authenticated_client(config)?;
    let task = client.research().get(task_id)?;
    print_task(&task, task_id);
    Ok(())
}

fn print_task(task: &Value, task_id: &str) {
    println!(
        "\nResearch Task: {}\n",
        optional_field(task, "task_id").unwrap_or(task_id)
    );
    println!("  Status: {}", field(task, "status"));
    if let Some(query) = optional_field(task, "query") {
        println!("  Query: {}", query);
    }
    if let Some(created) = optional_field(task, "created_at") {
        println!("  Created: {}", created);
    }
    print_task_output(task);
}
