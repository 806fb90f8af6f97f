//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use wpdb_core::config::Config;
use wpdb_core::transport::TransportMode;

mod commands;

#[derive(Parser)]
#[command(name = "wpdb")]
#[command(version)]
#[command(about = "Terminal console for a remote web-pdb debugger session")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Debugger session URL (overrides config)
    #[arg(long, env = "WPDB_URL", global = true)]
    url: Option<String>,

    /// Change notification: poll or push (overrides config)
    #[arg(long, global = true)]
    mode: Option<TransportMode>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the full-screen console (default)
    Attach,
    /// Follow the session headlessly, printing console output and moves
    Watch,
    /// Fetch one snapshot and print it
    Snapshot {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send one command line to the debugger
    Send {
        /// Command to send, e.g. `n` or `p x`
        #[arg(value_name = "COMMAND", num_args = 1.., required = true)]
        command: Vec<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file location
    Path,
    /// Write the default config file
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, url, mode } = cli;

    match command.unwrap_or(Commands::Attach) {
        // Config commands work even when the config file is broken.
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
        Commands::Attach => commands::attach::run(&load_config(url, mode)?),
        Commands::Watch => commands::watch::run(&load_config(url, mode)?).await,
        Commands::Snapshot { json } => commands::snapshot::run(&load_config(url, mode)?, json).await,
        Commands::Send { command } => {
            commands::send::run(&load_config(url, mode)?, &command.join(" ")).await
        }
    }
}

/// Loads the config file and applies command-line overrides.
fn load_config(url: Option<String>, mode: Option<TransportMode>) -> Result<Config> {
    let mut config = Config::load().context("load config")?;
    if let Some(url) = url {
        config.url = url;
    }
    if let Some(mode) = mode {
        config.mode = mode;
    }
    Ok(config)
}
