//! drivelink CLI - link open helpdesk tickets to Shared Drive content.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use drivelink::{Authenticator, Config, DriveClient, Runner, TicketClient};

/// Batch tool linking helpdesk tickets to matching Shared Drive files.
#[derive(Parser)]
#[command(name = "drivelink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long, env = "DRIVELINK_CONFIG", default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process all open tickets created today (the batch job).
    Run,

    /// Search the configured drive tree for a term and print the matches.
    Search {
        /// Term to search file and folder names for.
        term: String,
    },

    /// Print the raw ticket record (diagnostic).
    ViewTicket {
        /// Ticket ID.
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = Config::from_file(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;

    let auth = Authenticator::new(&config.token_file);
    let tickets = TicketClient::new(
        config.ticket_api_base.clone(),
        config.api_key.clone(),
        config.udf_field.clone(),
        config.ticket_start_index,
        config.ticket_row_count,
    );

    match cli.command {
        Commands::Run => {
            // Fail the whole run up front if no usable credential exists.
            auth.token().await.context("Failed to obtain Drive credentials")?;

            let drive = DriveClient::new(auth, config.shared_drive_id.clone());
            let report = Runner::new(config, drive, tickets).run().await;

            println!(
                "linked: {}  no-match: {}  filtered: {}  errors: {}",
                report.linked, report.no_match, report.filtered, report.errors
            );
        }

        Commands::Search { term } => {
            auth.token().await.context("Failed to obtain Drive credentials")?;

            let drive = DriveClient::new(auth, config.shared_drive_id.clone());
            let items = drivelink::search(&drive, &config.folder_id, &term, &config.excluded_extensions)
                .await
                .with_context(|| format!("Drive search failed for term: {}", term))?;

            if items.is_empty() {
                println!("No matching files or folders found.");
            } else {
                println!("{:<44} {:<40} {}", "ID", "NAME", "LINK");
                println!("{}", "-".repeat(100));
                for item in items {
                    println!("{}", item);
                }
            }
        }

        Commands::ViewTicket { id } => {
            let raw = tickets.view_ticket(&id).await;
            println!("{}", serde_json::to_string_pretty(&raw)?);
        }
    }

    Ok(())
}
