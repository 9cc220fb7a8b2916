//! Typed REST client for the Bugtrack API.
//!
//! Wraps the HTTP surface in typed methods and normalizes the two error
//! body shapes the server can emit: the structured `{code, message}` body
//! produced by handlers, and the `{success: false, error}` body produced
//! by the catch-all fallback.

use bugtrack_api::types::{
    BugPayload, BugResponse, DeleteBugResponse, ListBugsParams, ListBugsResponse,
};
use bugtrack_core::EntityId;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Errors produced by the client.
#[derive(Debug, thiserror::Error)]
pub enum BugClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status. The message has been
    /// normalized from whichever error body shape the server used.
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Configuration for [`BugClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API server, e.g. "http://localhost:5000".
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Typed client for the bug-tracking REST API.
#[derive(Clone)]
pub struct BugClient {
    client: reqwest::Client,
    base_url: String,
}

impl BugClient {
    pub fn new(config: &ClientConfig) -> Result<Self, BugClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// List one page of bugs, optionally filtered.
    pub async fn list_bugs(
        &self,
        params: &ListBugsParams,
    ) -> Result<ListBugsResponse, BugClientError> {
        let response = self
            .client
            .get(format!("{}/api/bugs", self.base_url))
            .query(params)
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch a single bug by identifier.
    pub async fn get_bug(&self, id: EntityId) -> Result<BugResponse, BugClientError> {
        let response = self
            .client
            .get(format!("{}/api/bugs/{}", self.base_url, id))
            .send()
            .await?;
        read_json(response).await
    }

    /// Create a new bug.
    pub async fn create_bug(&self, payload: &BugPayload) -> Result<BugResponse, BugClientError> {
        let response = self
            .client
            .post(format!("{}/api/bugs", self.base_url))
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    /// Replace an existing bug.
    pub async fn update_bug(
        &self,
        id: EntityId,
        payload: &BugPayload,
    ) -> Result<BugResponse, BugClientError> {
        let response = self
            .client
            .put(format!("{}/api/bugs/{}", self.base_url, id))
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    /// Delete a bug, returning the server's confirmation message.
    pub async fn delete_bug(&self, id: EntityId) -> Result<DeleteBugResponse, BugClientError> {
        let response = self
            .client
            .delete(format!("{}/api/bugs/{}", self.base_url, id))
            .send()
            .await?;
        read_json(response).await
    }

    /// Probe server liveness. Returns the raw payload untyped so the
    /// client does not have to track probe schema changes.
    pub async fn health(&self) -> Result<serde_json::Value, BugClientError> {
        let response = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await?;
        read_json(response).await
    }
}

// ============================================================================
// RESPONSE NORMALIZATION
// ============================================================================

/// Structured error body produced by route handlers.
#[derive(Debug, Deserialize)]
struct HandlerErrorBody {
    message: String,
}

/// Legacy error body produced by the catch-all fallback.
#[derive(Debug, Deserialize)]
struct FallbackErrorBody {
    error: String,
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BugClientError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(BugClientError::Api {
            status,
            message: normalize_error_body(status, &body),
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| BugClientError::InvalidResponse(format!("{} (body: {})", e, body)))
}

/// Extract a human-readable message from whichever error shape the server
/// used; fall back to the status line for anything unrecognized.
fn normalize_error_body(status: StatusCode, body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<HandlerErrorBody>(body) {
        return err.message;
    }
    if let Ok(err) = serde_json::from_str::<FallbackErrorBody>(body) {
        return err.error;
    }
    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}
