//! Contracts for the two upstream stores the view reads from.

use crate::models::{Case, Document};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure talking to a store.
///
/// The variants only matter for logs; the view shows the same message for all of them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Short label for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Transport(_) => "transport",
            StoreError::NotFound { .. } => "not_found",
            StoreError::Status { .. } => "status",
            StoreError::Decode(_) => "decode",
            StoreError::Unavailable(_) => "unavailable",
        }
    }
}

/// `request_id` is the id of the inbound request the call is made for, forwarded so
/// upstream logs can be correlated with ours.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn fetch_document(
        &self,
        id: &str,
        request_id: Option<&str>,
    ) -> Result<Document, StoreError>;
    async fn delete_document(&self, id: &str, request_id: Option<&str>) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CaseStore: Send + Sync {
    async fn fetch_case(&self, case_id: &str, request_id: Option<&str>) -> Result<Case, StoreError>;
}

/// Turn a non-2xx response into the matching `StoreError`.
pub(crate) async fn ensure_success(
    response: Response,
    resource: &str,
) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound {
            resource: resource.to_string(),
        });
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    resource: &str,
) -> Result<T, StoreError> {
    let response = ensure_success(response, resource).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
