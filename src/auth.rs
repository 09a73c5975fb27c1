//! Credential provider backed by a cached authorized-user token file.
//!
//! The interactive consent flow runs out-of-band; this module only consumes
//! its token file. A still-valid cached token is returned without any network
//! call; an expired one is refreshed against the OAuth token endpoint and the
//! updated blob is written back atomically (temp file, then rename).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::AuthError;
use crate::models::{AuthorizedUser, TokenResponse};

/// Authenticator for Google APIs using a persisted authorized-user token.
#[derive(Clone)]
pub struct Authenticator {
    token_path: Arc<PathBuf>,
    http: Client,
    cached: Arc<RwLock<Option<AuthorizedUser>>>,
}

impl Authenticator {
    /// Create an authenticator reading and writing the given token file.
    /// The file is not touched until the first [`token`](Self::token) call.
    pub fn new<P: AsRef<Path>>(token_path: P) -> Self {
        Self {
            token_path: Arc::new(token_path.as_ref().to_path_buf()),
            http: Client::new(),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Get a valid access token, refreshing and persisting if necessary.
    pub async fn token(&self) -> Result<String, AuthError> {
        let now = Utc::now();

        {
            let cached = self.cached.read().await;
            if let Some(user) = cached.as_ref() {
                if user.is_valid_at(now) {
                    return Ok(user.token.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;

        // Re-check under the write lock; another caller may have refreshed.
        if let Some(user) = cached.as_ref() {
            if user.is_valid_at(now) {
                return Ok(user.token.clone());
            }
        }

        let user = match cached.take() {
            Some(user) => user,
            None => self.load_token_file()?,
        };

        if user.is_valid_at(now) {
            let token = user.token.clone();
            *cached = Some(user);
            return Ok(token);
        }

        let refreshed = self.refresh(user).await?;
        self.persist(&refreshed)?;
        let token = refreshed.token.clone();
        *cached = Some(refreshed);
        Ok(token)
    }

    fn load_token_file(&self) -> Result<AuthorizedUser, AuthError> {
        if !self.token_path.exists() {
            return Err(AuthError::ReauthorizationRequired(format!(
                "token cache {} not found; run the consent flow and place its token file there",
                self.token_path.display()
            )));
        }
        let content = fs::read_to_string(self.token_path.as_ref())?;
        let user: AuthorizedUser = serde_json::from_str(&content)?;
        debug!(path = %self.token_path.display(), "token cache loaded");
        Ok(user)
    }

    /// Exchange the refresh token for a new access token.
    async fn refresh(&self, user: AuthorizedUser) -> Result<AuthorizedUser, AuthError> {
        let refresh_token = user.refresh_token.clone().ok_or_else(|| {
            AuthError::ReauthorizationRequired(
                "cached token is expired and carries no refresh token".to_string(),
            )
        })?;

        let params = [
            ("client_id", user.client_id.as_str()),
            ("client_secret", user.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
        ];

        let response = self.http.post(&user.token_uri).form(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // invalid_grant means the refresh token itself was revoked or
            // expired, which only a new consent flow can fix.
            if body.contains("invalid_grant") {
                return Err(AuthError::ReauthorizationRequired(format!(
                    "refresh token no longer accepted: {}",
                    body
                )));
            }
            return Err(AuthError::RefreshRejected {
                status: status.as_u16(),
                body,
            });
        }

        let token_response: TokenResponse = response.json().await?;
        let expiry = Utc::now() + Duration::seconds(token_response.expires_in as i64);

        let mut refreshed = user;
        refreshed.token = token_response.access_token;
        refreshed.expiry = Some(expiry.to_rfc3339());
        // The endpoint may omit the refresh token on rotation; keep the old one.
        if let Some(new_refresh) = token_response.refresh_token {
            refreshed.refresh_token = Some(new_refresh);
        }

        info!("access token refreshed");
        Ok(refreshed)
    }

    /// Write the token blob next to its final path, then rename into place so
    /// a failed write never leaves a truncated cache behind.
    fn persist(&self, user: &AuthorizedUser) -> Result<(), AuthError> {
        let tmp_path = self.token_path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(user)?;
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, self.token_path.as_ref())?;
        debug!(path = %self.token_path.display(), "token cache persisted");
        Ok(())
    }
}
