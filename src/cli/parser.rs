//! Command-line interface definition
//!
//! The server commands (`serve`, `migrate`) and the API client commands
//! (`widget-a`, `widget-b`) share the global configuration flags.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::validation::{
    validate_api_url, validate_config_file_path, validate_host_address, validate_limit,
    validate_page, validate_port, validate_rollback_steps,
};

/// Widget catalogue server and client
#[derive(Parser, Debug)]
#[command(name = "widgets-rs")]
#[command(about = "REST API for WidgetA/WidgetB records, with a command-line client")]
#[command(long_about = "
widgets-rs serves a small REST API over two related record types, WidgetA and
WidgetB, and doubles as a command-line client for that API.

EXAMPLES:
    # Start the server with the layered configuration
    widgets-rs serve

    # Serve on all interfaces, port 8080
    widgets-rs serve --host 0.0.0.0 --port 8080

    # Validate the configuration without starting
    widgets-rs --env production serve --dry-run

    # Apply or preview migrations
    widgets-rs migrate
    widgets-rs migrate --dry-run

    # Browse and edit widgets on a running server
    widgets-rs widget-a list --page 2
    widgets-rs widget-a create --name Sprocket --description 'A toothed wheel'
    widgets-rs widget-b list --widget-a 1
    widgets-rs widget-b update 4 --detach
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Read this single TOML file instead of the layered configuration
    #[arg(short, long, value_name = "FILE", global = true, value_parser = validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Environment layer to load (development, test, staging, production)
    #[arg(short, long, value_enum, global = true)]
    pub env: Option<Environment>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    ///
    /// Examples:
    ///   widgets-rs serve
    ///   widgets-rs serve --host 0.0.0.0 --port 80
    ///   widgets-rs serve --dry-run
    Serve {
        /// Address to bind, e.g. 127.0.0.1 or 0.0.0.0
        #[arg(long, value_name = "ADDRESS", value_parser = validate_host_address)]
        host: Option<String>,

        /// TCP port, 1-65535
        #[arg(short, long, value_name = "PORT", value_parser = validate_port)]
        port: Option<u16>,

        /// Log level for this run; wins over --verbose/--quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate the configuration and exit
        #[arg(long)]
        dry_run: bool,
    },

    /// Apply, preview or roll back database migrations
    ///
    /// Examples:
    ///   widgets-rs migrate
    ///   widgets-rs migrate --dry-run
    ///   widgets-rs migrate --rollback 1
    Migrate {
        /// List pending migrations without applying them
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Revert the last STEPS migrations (1-100)
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = validate_rollback_steps)]
        rollback: Option<u32>,
    },

    /// Manage WidgetA records on a running server
    #[command(name = "widget-a")]
    WidgetA(WidgetACommand),

    /// Manage WidgetB records on a running server
    #[command(name = "widget-b")]
    WidgetB(WidgetBCommand),
}

/// Where the client commands send their requests.
#[derive(Args, Debug, Clone, Default)]
pub struct ApiTarget {
    /// Server root URL; overrides `client.base_url`
    #[arg(long, value_name = "URL", global = true, value_parser = validate_api_url)]
    pub api_url: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1, value_parser = validate_page)]
    pub page: u32,

    /// Items per page (1-100); defaults to `client.page_size`
    #[arg(long, value_parser = validate_limit)]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct WidgetACommand {
    #[command(flatten)]
    pub target: ApiTarget,

    #[command(subcommand)]
    pub action: WidgetAAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum WidgetAAction {
    /// List WidgetAs page by page
    List(PageArgs),

    /// Show one WidgetA
    Get { id: i32 },

    /// Create a WidgetA
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Change some fields of a WidgetA
    Update {
        id: i32,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the description
        #[arg(long)]
        clear_description: bool,
    },

    /// Delete a WidgetA; its WidgetBs are detached
    Delete { id: i32 },
}

#[derive(Args, Debug)]
pub struct WidgetBCommand {
    #[command(flatten)]
    pub target: ApiTarget,

    #[command(subcommand)]
    pub action: WidgetBAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum WidgetBAction {
    /// List WidgetBs, optionally only those of one WidgetA
    List {
        #[command(flatten)]
        paging: PageArgs,

        /// Only WidgetBs attached to this WidgetA
        #[arg(long, value_name = "ID")]
        widget_a: Option<i32>,
    },

    /// Show one WidgetB
    Get { id: i32 },

    /// Create a WidgetB
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Attach to this WidgetA
        #[arg(long, value_name = "ID")]
        widget_a: Option<i32>,
    },

    /// Change some fields of a WidgetB
    Update {
        id: i32,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the description
        #[arg(long)]
        clear_description: bool,

        /// Attach to this WidgetA
        #[arg(long, value_name = "ID", conflicts_with = "detach")]
        widget_a: Option<i32>,

        /// Detach from its WidgetA
        #[arg(long)]
        detach: bool,
    },

    /// Delete a WidgetB
    Delete { id: i32 },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

impl Cli {
    /// Client commands talk to a server instead of running one.
    pub fn is_client_command(&self) -> bool {
        matches!(
            self.command,
            Some(Commands::WidgetA(_)) | Some(Commands::WidgetB(_))
        )
    }

    /// The `--api-url` of a client command, if any.
    pub fn api_url(&self) -> Option<&str> {
        match &self.command {
            Some(Commands::WidgetA(cmd)) => cmd.target.api_url.as_deref(),
            Some(Commands::WidgetB(cmd)) => cmd.target.api_url.as_deref(),
            _ => None,
        }
    }
}
