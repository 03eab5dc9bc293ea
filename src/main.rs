#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use yutori::cli::{
    AuthCommands, BrowseCommands, Cli, Commands, ResearchCommands, ScoutsCommands,
};
use yutori::commands::{self, browse, research};
use yutori::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Version needs neither settings nor credentials
    if let Commands::Version = cli.command {
        commands::version::execute();
        return Ok(());
    }

    let mut config = Config::load()?.with_base_url(cli.base_url.as_deref());
    config.verbose = cli.verbose;

    run(cli.command, &config)
}

fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Auth { command } => match command {
            AuthCommands::Login => commands::auth::login(config)?,
            AuthCommands::Register => commands::auth::register(config)?,
            AuthCommands::Status => commands::auth::status()?,
            AuthCommands::Logout => commands::auth::logout()?,
        },
        Commands::Browse { command } => match command {
            BrowseCommands::Run {
                task,
                start_url,
                max_steps,
                agent,
                require_auth,
                wait,
            } => browse::run(
                config,
                browse::RunArgs {
                    task,
                    start_url,
                    max_steps,
                    agent,
                    require_auth,
                    wait,
                },
            )?,
            BrowseCommands::Get { task_id } => browse::get(config, &task_id)?,
        },
        Commands::Research { command } => match command {
            ResearchCommands::Run {
                query,
                timezone,
                location,
                wait,
            } => research::run(
                config,
                research::RunArgs {
                    query,
                    timezone,
                    location,
                    wait,
                },
            )?,
            ResearchCommands::Get { task_id } => research::get(config, &task_id)?,
        },
        Commands::Scouts { command } => match command {
            ScoutsCommands::List { limit, status } => {
                commands::scouts::list(config, limit, status.as_deref())?
            }
            ScoutsCommands::Get { scout_id } => commands::scouts::get(config, &scout_id)?,
            ScoutsCommands::Create {
                query,
                interval,
                timezone,
            } => commands::scouts::create(config, query, &interval, timezone)?,
            ScoutsCommands::Delete { scout_id, force } => {
                commands::scouts::delete(config, &scout_id, force)?
            }
            ScoutsCommands::Updates {
                scout_id,
                limit,
                cursor,
            } => commands::scouts::updates(config, &scout_id, limit, cursor)?,
        },
        Commands::Usage => commands::usage::execute(config)?,
        Commands::Version => commands::version::execute(),
    }

    Ok(())
}

/// Log to stderr so command output on stdout stays clean.
///
/// `RUST_LOG` wins; otherwise warnings only, or debug for this crate with
/// `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "yutori=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
