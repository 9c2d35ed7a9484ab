//! `pragati`: command-line shell for the Pragati client core.
//!
//! Drives the same login handshake and navigation guard a UI would, with
//! the session kept in a local redb file.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::shell::Shell;

/// Pragati CLI tool.
#[derive(Parser, Debug)]
#[command(name = "pragati", about = "Pragati client", version)]
struct Cli {
    /// Path to client config file (default: ~/.pragati/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in with username, password and an emailed OTP.
    Login {
        /// Username.
        #[arg(long)]
        user: Option<String>,
        /// Password (not recommended, use the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Logout: remove the stored session.
    Logout,

    /// Show the logged-in user and their permissions.
    Whoami,

    /// Open a path through the navigation guard.
    Open {
        /// App path, e.g. /reports.
        path: String,
    },

    /// List routes and whether the current session may open them.
    Routes,

    /// GET an API path with the stored token.
    Get {
        /// API path relative to the server URL.
        path: String,
    },

    /// Show or change the client config.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective config.
    Show,
    /// Set one key: server, ip_lookup, session_db, auth_scheme.
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(config::ClientConfig::default_path);
    let client_config = config::ClientConfig::load(&config_path)?;

    let json_output = cli.output == "json";
    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&client_config, &config_path)?,
            ConfigAction::Set { key, value } => commands::config::set(&key, &value, &config_path)?,
        },
        command => run(command, &Shell::open(client_config)?, json_output).await?,
    }

    Ok(())
}

async fn run(command: Commands, shell: &Shell, json_output: bool) -> anyhow::Result<()> {
    match command {
        Commands::Login { user, password } => {
            commands::session::login(shell, user, password).await?;
        }
        Commands::Logout => {
            commands::session::logout(shell).await?;
        }
        Commands::Whoami => {
            commands::session::whoami(shell, json_output)?;
        }
        Commands::Open { path } => {
            commands::nav::open(shell, &path).await?;
        }
        Commands::Routes => {
            commands::nav::routes(shell);
        }
        Commands::Get { path } => {
            commands::nav::get(shell, &path).await?;
        }
        Commands::Config { .. } => {}
    }
    Ok(())
}
