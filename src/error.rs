//! Error types for the drivelink crate.

use thiserror::Error;

/// Errors from the credential provider. Fatal: the run aborts if a usable
/// access token cannot be obtained.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("re-authorization required: {0}")]
    ReauthorizationRequired(String),

    #[error("failed to read token cache: {0}")]
    TokenCacheRead(#[from] std::io::Error),

    #[error("failed to parse token cache: {0}")]
    TokenCacheParse(#[from] serde_json::Error),

    #[error("token refresh request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("token endpoint rejected refresh ({status}): {body}")]
    RefreshRejected { status: u16, body: String },
}

/// Errors from a Drive listing call. Aborts the current search only; partial
/// results collected so far are discarded with it.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("authorization failed: {0}")]
    Auth(#[from] AuthError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Drive API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("folder tree deeper than {0} levels, aborting search")]
    DepthExceeded(usize),
}

/// Errors from the ticketing API. Never fatal: fetch failures degrade to an
/// empty ticket list and update failures leave the ticket unlinked.
#[derive(Error, Debug)]
pub enum TicketError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("ticket API error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

/// Errors while loading the startup configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid Drive URL or ID: {0}")]
    InvalidUrlOrId(String),
}
