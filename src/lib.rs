//! drivelink - links helpdesk tickets to matching Google Shared Drive content.
//!
//! For each open ticket created today and belonging to an allowed account, a
//! search phrase is derived from the ticket subject, a shared-drive folder
//! tree is searched recursively for matching files and folders, and the
//! resulting links are written into a custom field on the ticket.
//!
//! # Example
//!
//! ```no_run
//! use drivelink::{Authenticator, Config, DriveClient, Runner, TicketClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_file("config.json")?;
//!
//!     let auth = Authenticator::new(&config.token_file);
//!     let drive = DriveClient::new(auth, config.shared_drive_id.clone());
//!     let tickets = TicketClient::new(
//!         config.ticket_api_base.clone(),
//!         config.api_key.clone(),
//!         config.udf_field.clone(),
//!         config.ticket_start_index,
//!         config.ticket_row_count,
//!     );
//!
//!     let report = Runner::new(config, drive, tickets).run().await;
//!     println!("linked {} ticket(s)", report.linked);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod drive;
pub mod error;
pub mod models;
pub mod run;
pub mod search;
pub mod subject;
pub mod tickets;

// Re-exports for convenience
pub use auth::Authenticator;
pub use config::Config;
pub use drive::DriveClient;
pub use error::{AuthError, ConfigError, SearchError, TicketError};
pub use models::{DriveItem, Ticket};
pub use run::{BatchReport, Outcome, Runner};
pub use search::search;
pub use tickets::TicketClient;
