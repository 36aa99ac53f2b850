//! Waypost pins CLI
//!
//! Create, list, update, and delete annotation pins against a Waypost API,
//! and fetch the metadata document for a pin group.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::ExitCode;
use waypost_api_client::{ClientConfig, WaypostClient};

mod commands;

/// Pin management CLI for the Waypost annotation service
#[derive(Parser)]
#[command(name = "waypost-pins")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// API base URL
    #[arg(long, global = true, env = "WAYPOST_API_URL")]
    api_url: Option<String>,

    /// Bearer key (three dot-separated segments)
    #[arg(long, global = true, env = "WAYPOST_API_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create pins from a JSON array (file path, or "-" for stdin)
    Create {
        /// Path to a JSON array of pins to create
        input: String,
    },

    /// List every pin sharing a meta id
    List {
        /// Grouping key to list
        meta_id: String,
    },

    /// Apply partial updates from a JSON array (file path, or "-" for stdin)
    Update {
        /// Path to a JSON array of updates, each with an "id"
        input: String,
    },

    /// Delete pins by id
    Delete {
        /// Ids of the pins to delete
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Fetch the metadata document for a meta id
    Metadata {
        /// Grouping key to look up
        meta_id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("waypost_api_client=debug,waypost_pins=debug")
            .init();
    }

    let client = match build_client(&cli) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let result = match &cli.command {
        Commands::Create { input } => commands::create::run(&client, input, &cli.format).await,
        Commands::List { meta_id } => commands::list::run(&client, meta_id, &cli.format).await,
        Commands::Update { input } => commands::update::run(&client, input, &cli.format).await,
        Commands::Delete { ids } => commands::delete::run(&client, ids, &cli.format).await,
        Commands::Metadata { meta_id } => {
            commands::metadata::run(&client, meta_id, &cli.format).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn build_client(cli: &Cli) -> anyhow::Result<WaypostClient> {
    let mut config = ClientConfig::default();
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url);
    }
    let key = cli
        .key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("missing API key: pass --key or set WAYPOST_API_KEY"))?;
    Ok(WaypostClient::with_config(config.with_key(key))?)
}
