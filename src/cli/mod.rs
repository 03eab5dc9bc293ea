use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "yutori")]
#[command(about = "Yutori CLI - Manage your scouts and web automation", long_about = None)]
#[command(version = env!("YUTORI_VERSION"))]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logging on stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Override the API base URL
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Run and manage browsing tasks
    Browse {
        #[command(subcommand)]
        command: BrowseCommands,
    },

    /// Run and manage research tasks
    Research {
        #[command(subcommand)]
        command: ResearchCommands,
    },

    /// Manage scouts
    Scouts {
        #[command(subcommand)]
        command: ScoutsCommands,
    },

    /// Show API usage statistics
    Usage,

    /// Show the CLI version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Authenticate with Yutori via browser and save an API key locally
    Login,

    /// Create a new Yutori account via browser and save an API key locally
    Register,

    /// Show current authentication status
    Status,

    /// Remove stored credentials
    Logout,
}

#[derive(Subcommand, Debug)]
pub enum BrowseCommands {
    /// Start a new browsing task
    Run {
        /// Natural language description of the browsing task
        task: String,

        /// URL to start browsing from
        start_url: String,

        /// Maximum number of agent steps
        #[arg(long)]
        max_steps: Option<u32>,

        /// Agent to use
        #[arg(long)]
        agent: Option<String>,

        /// Use auth-optimized browser for login flows
        #[arg(long)]
        require_auth: bool,

        /// Wait for the task to finish and print its result
        #[arg(long)]
        wait: bool,
    },

    /// Get the status and result of a browsing task
    Get {
        /// The browsing task ID
        task_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ResearchCommands {
    /// Start a new research task
    Run {
        /// Natural language research query
        query: String,

        /// e.g., America/Los_Angeles
        #[arg(long)]
        timezone: Option<String>,

        /// e.g., San Francisco, CA, US
        #[arg(long)]
        location: Option<String>,

        /// Wait for the task to finish and print its result
        #[arg(long)]
        wait: bool,
    },

    /// Get the status and result of a research task
    Get {
        /// The research task ID
        task_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScoutsCommands {
    /// List your scouts
    List {
        /// Maximum number of scouts to return
        #[arg(long)]
        limit: Option<u32>,

        /// Filter by status: active, paused, done
        #[arg(long)]
        status: Option<String>,
    },

    /// Get details of a specific scout
    Get {
        /// The scout ID
        scout_id: String,
    },

    /// Create a new scout
    Create {
        /// What to monitor (prompted for when omitted)
        #[arg(short = 'q', long)]
        query: Option<String>,

        /// Run interval: hourly, daily, weekly
        #[arg(short = 'i', long, default_value = "daily")]
        interval: String,

        /// e.g., America/Los_Angeles
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Delete a scout
    Delete {
        /// The scout ID to delete
        scout_id: String,

        /// Skip confirmation
        #[arg(short = 'f', long)]
        force: bool,
    },

    /// Show reports emitted by a scout
    Updates {
        /// The scout ID
        scout_id: String,

        /// Maximum number of updates to return
        #[arg(long)]
        limit: Option<u32>,

        /// Pagination cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
    },
}
