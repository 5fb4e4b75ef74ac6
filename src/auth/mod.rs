//! Stored-token authentication for the Google Photos Library API.
//!
//! Thin collaborator: loads the OAuth user credential written by an
//! interactive consent flow, refreshes it through the token endpoint when
//! expired, and persists the refreshed credential for the next run. The
//! consent flow itself is out of scope — without a stored credential the
//! run terminates with an instructive error.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Refresh slightly before the recorded expiry so a token does not lapse
/// mid-run.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(
        "no stored credential at {path}; complete an OAuth consent flow to create it first"
    )]
    MissingCredential { path: String },

    #[error("credential file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("token refresh request failed: {0}")]
    Refresh(#[from] reqwest::Error),

    #[error("token refresh rejected with HTTP {status}: {body}")]
    RefreshRejected { status: u16, body: String },

    #[error("credential expired and no refresh token is stored")]
    NoRefreshToken,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// On-disk credential, shape-compatible with the `token.json` written by
/// Google's OAuth client libraries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_uri() -> String {
    TOKEN_URI.to_string()
}

impl StoredCredential {
    fn is_expired(&self) -> bool {
        match self.expiry {
            Some(expiry) => expiry - Duration::seconds(EXPIRY_MARGIN_SECS) <= Utc::now(),
            // No recorded expiry: assume stale and refresh.
            None => true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Load the stored credential, refreshing and re-saving it if expired.
/// Returns a bearer access token valid for the run. Failures here are not
/// isolated — they terminate the run.
pub async fn access_token(
    http: &reqwest::Client,
    token_file: &Path,
) -> Result<String, AuthError> {
    let raw = std::fs::read_to_string(token_file).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AuthError::MissingCredential {
            path: token_file.display().to_string(),
        },
        _ => AuthError::Io(e),
    })?;
    let mut credential: StoredCredential = serde_json::from_str(&raw)?;

    if credential.is_expired() {
        let refresh_token = credential
            .refresh_token
            .clone()
            .ok_or(AuthError::NoRefreshToken)?;
        tracing::info!("Stored access token expired, refreshing");

        let response = http
            .post(&credential.token_uri)
            .form(&[
                ("client_id", credential.client_id.as_str()),
                ("client_secret", credential.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::RefreshRejected {
                status: status.as_u16(),
                body,
            });
        }
        let refreshed: RefreshResponse = response.json().await?;

        credential.token = refreshed.access_token;
        credential.expiry = refreshed
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));
        std::fs::write(token_file, serde_json::to_string_pretty(&credential)?)?;
        tracing::debug!("Refreshed credential saved to {}", token_file.display());
    }

    Ok(credential.token)
}
