//! Startup configuration, loaded once from a JSON file and immutable for the
//! process lifetime.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::ConfigError;

/// Regex for `https://drive.google.com/drive/folders/<ID>` style URLs.
static FOLDER_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://drive\.google\.com/drive/(?:u/\d+/)?folders/([a-zA-Z0-9_-]+)")
        .expect("Invalid folder URL regex")
});

/// Valid Google Drive ID pattern (alphanumeric, underscore, hyphen).
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid ID regex"));

/// Process configuration.
///
/// `folder_id` and `shared_drive_id` accept either a raw Drive ID or a pasted
/// folder URL; both are normalized to raw IDs at load time.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Root folder the recursive search starts from.
    pub folder_id: String,
    /// Shared drive the search is scoped to.
    pub shared_drive_id: String,
    /// Base URL of the ticketing API, e.g. `https://helpdesk.example.com`.
    pub ticket_api_base: String,
    /// Static API key sent in the `authtoken` header.
    pub api_key: String,
    /// Accounts for which link automation is permitted, after prefix stripping.
    pub allowed_accounts: HashSet<String>,
    /// Name of the ticket custom field that receives the drive links.
    pub udf_field: String,
    /// Path of the cached OAuth token blob.
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
    /// Lowercase filename extensions excluded from search matches.
    #[serde(default = "default_excluded_extensions")]
    pub excluded_extensions: Vec<String>,
    /// Length (in characters) of the leading subject token to drop.
    #[serde(default = "default_subject_prefix_len")]
    pub subject_prefix_len: usize,
    /// Trailing marker stripped from the subject, if present.
    #[serde(default = "default_subject_trailing_marker")]
    pub subject_trailing_marker: String,
    /// Leading marker stripped from the subject, if present.
    #[serde(default)]
    pub subject_leading_marker: Option<String>,
    /// Row offset the ticket listing starts at.
    #[serde(default = "default_ticket_start_index")]
    pub ticket_start_index: u32,
    /// Maximum rows requested from the ticket listing.
    #[serde(default = "default_ticket_row_count")]
    pub ticket_row_count: u32,
}

fn default_token_file() -> PathBuf {
    PathBuf::from("token.json")
}

fn default_excluded_extensions() -> Vec<String> {
    vec![".png".to_string()]
}

fn default_subject_prefix_len() -> usize {
    5
}

fn default_subject_trailing_marker() -> String {
    "[UPDATED]".to_string()
}

fn default_ticket_start_index() -> u32 {
    1
}

fn default_ticket_row_count() -> u32 {
    100
}

impl Config {
    /// Load and validate the configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&content)?;
        config.folder_id = extract_id(&config.folder_id)?;
        config.shared_drive_id = extract_id(&config.shared_drive_id)?;
        Ok(config)
    }
}

/// Extract a Drive ID from a folder URL, or validate a raw ID.
fn extract_id(url_or_id: &str) -> Result<String, ConfigError> {
    let trimmed = url_or_id.trim();

    if let Some(captures) = FOLDER_URL_REGEX.captures(trimmed) {
        if let Some(id) = captures.get(1) {
            return Ok(id.as_str().to_string());
        }
    }

    if ID_REGEX.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    Err(ConfigError::InvalidUrlOrId(url_or_id.to_string()))
}
