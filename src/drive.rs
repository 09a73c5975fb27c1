//! Google Drive API client, scoped to a single shared drive.

use reqwest::Client;
use tracing::debug;

use crate::auth::Authenticator;
use crate::error::SearchError;
use crate::models::{ApiErrorResponse, DriveItem, FileListResponse};

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Page size for files.list calls. Large so the expected small fan-out fits
/// in one page, but pagination is still followed when a token comes back.
const PAGE_SIZE: &str = "1000";

/// Client for listing folder contents of a Google Shared Drive.
pub struct DriveClient {
    base_url: String,
    drive_id: String,
    auth: Authenticator,
    http: Client,
}

impl DriveClient {
    /// Create a new client against the production Drive API.
    ///
    /// # Arguments
    /// * `auth` - Authenticator for obtaining access tokens
    /// * `drive_id` - The ID of the shared drive to search in
    pub fn new(auth: Authenticator, drive_id: String) -> Self {
        Self::with_base_url(auth, drive_id, DRIVE_API_BASE.to_string())
    }

    /// Create a client against a custom API base URL (used by tests).
    pub fn with_base_url(auth: Authenticator, drive_id: String, base_url: String) -> Self {
        Self {
            base_url,
            drive_id,
            auth,
            http: Client::new(),
        }
    }

    /// Get the drive ID.
    pub fn drive_id(&self) -> &str {
        &self.drive_id
    }

    /// List all non-trashed direct children of a folder, following pagination
    /// until no next-page token remains.
    pub async fn list_children(&self, parent_id: &str) -> Result<Vec<DriveItem>, SearchError> {
        let token = self.auth.token().await?;
        let query = format!("'{}' in parents and trashed = false", parent_id);
        let mut all_items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(format!("{}/files", self.base_url))
                .bearer_auth(&token)
                .query(&[
                    ("q", query.as_str()),
                    ("pageSize", PAGE_SIZE),
                    ("driveId", &self.drive_id),
                    ("corpora", "drive"),
                    ("includeItemsFromAllDrives", "true"),
                    ("supportsAllDrives", "true"),
                    ("fields", "nextPageToken, files(id, name, mimeType, webViewLink)"),
                ]);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            let status = response.status();

            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
                    return Err(SearchError::ApiError {
                        status: api_error.error.code,
                        message: api_error.error.message,
                    });
                }
                return Err(SearchError::ApiError {
                    status: status.as_u16(),
                    message: error_body,
                });
            }

            let list_response: FileListResponse = response.json().await?;
            all_items.extend(list_response.files);

            match list_response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(parent_id, count = all_items.len(), "folder listed");
        Ok(all_items)
    }
}
