use super::{field, get_authenticated_client, optional_field, print_task_output, wait_with_spinner};
use crate::api::browsing::BrowsingTaskParams;
use crate::config::Config;
use crate::error::Result;
use crate::polling::PollOptions;
use serde_json::Value;

pub struct RunArgs {
    pub task: String,
    pub start_url: String,
    pub max_steps: Option<u32>,
    pub agent: Option<String>,
    pub require_auth: bool,
    pub wait: bool,
}

pub fn run(config: &Config, args: RunArgs) -> Result<()> {
    let client = get_authenticated_client(config)?;

    let mut params = BrowsingTaskParams::new(args.task, args.start_url);
    if let Some(steps) = args.max_steps {
        params = params.max_steps(steps);
    }
    if let Some(agent) = args.agent {
        params = params.agent(agent);
    }
    if args.require_auth {
        params = params.require_auth(true);
    }

    let created = client.browsing().create(&params)?;
    println!("\nBrowsing task created!");
    println!("  Task ID: {}", field(&created, "task_id"));
    println!("  Status: {}", field(&created, "status"));

    if args.wait {
        let Some(task_id) = optional_field(&created, "task_id") else {
            return Ok(());
        };
        let task = wait_with_spinner(
            || client.browsing().get(task_id),
            PollOptions::from(&config.polling),
        )?;
        print_task(&task, task_id);
    }

    Ok(())
}

pub fn get(config: &Config, task_id: &str) -> Result<()> {
    let client = get_authenticated_client(config)?;
    let task = client.browsing().get(task_id)?;
    print_task(&task, task_id);
    Ok(())
}

fn print_task(task: &Value, task_id: &str) {
    println!(
        "\nBrowsing Task: {}\n",
        optional_field(task, "task_id").unwrap_or(task_id)
    );
    println!("  Status: {}", field(task, "status"));
    if let Some(url) = optional_field(task, "start_url") {
        println!("  Start URL: {}", url);
    }
    if let Some(agent) = optional_field(task, "agent") {
        println!("  Agent: {}", agent);
    }
    if let Some(created) = optional_field(task, "created_at") {
        println!("  Created: {}", created);
    }
    print_task_output(task);
}
