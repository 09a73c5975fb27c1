//! Data models for the Drive and ticketing API payloads.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// MIME type Google Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// A file or folder returned by the Drive files.list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub web_view_link: Option<String>,
}

impl DriveItem {
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }
}

impl std::fmt::Display for DriveItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let link = self.web_view_link.as_deref().unwrap_or("-");
        write!(f, "{}\t{}\t{}", self.id, self.name, link)
    }
}

/// Response from the files.list API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<DriveItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Cached authorized-user token blob, persisted across runs.
///
/// Matches the token file written by Google's installed-app consent flow:
/// `token` is the short-lived access token, `expiry` an RFC 3339 timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedUser {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl AuthorizedUser {
    /// Whether the access token is still usable at `now`, with a one minute
    /// buffer before the recorded expiry. A missing expiry counts as expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry.as_deref() {
            Some(expiry) => match DateTime::parse_from_rfc3339(expiry) {
                Ok(expiry) => expiry.with_timezone(&Utc) > now + Duration::seconds(60),
                Err(_) => false,
            },
            None => false,
        }
    }
}

/// OAuth2 token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// A helpdesk ticket, as returned by the requests list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    pub id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub account: Option<NamedField>,
    #[serde(default)]
    pub created_time: Option<EpochTime>,
}

/// A nested `{"name": ...}` attribute (account, status, and the like).
#[derive(Debug, Clone, Deserialize)]
pub struct NamedField {
    pub name: String,
}

/// A timestamp attribute carrying milliseconds since the epoch as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct EpochTime {
    pub value: String,
}

impl EpochTime {
    pub fn millis(&self) -> Option<i64> {
        self.value.parse().ok()
    }
}

/// Response from the requests list endpoint.
#[derive(Debug, Deserialize)]
pub struct TicketListResponse {
    #[serde(default)]
    pub requests: Vec<Ticket>,
}
