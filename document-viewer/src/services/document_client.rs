//! HTTP client for the document store.

use crate::config::UpstreamSettings;
use crate::models::Document;
use crate::services::store::{ensure_success, read_json, DocumentStore, StoreError};
use async_trait::async_trait;
use reqwest::Client;
use service_core::observability::TraceHeadersExt;

#[derive(Clone)]
pub struct HttpDocumentStore {
    client: Client,
    base_url: String,
}

impl HttpDocumentStore {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        tracing::info!(url = %settings.url, "Configured document store client");

        Ok(Self::with_client(client, &settings.url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/documents/{}", self.base_url, id)
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn fetch_document(
        &self,
        id: &str,
        request_id: Option<&str>,
    ) -> Result<Document, StoreError> {
        let response = self
            .client
            .get(self.document_url(id))
            .with_trace_headers(request_id)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(document_id = %id, error = %e, "Fetch document request failed");
                StoreError::from(e)
            })?;

        let document: Document = read_json(response, &format!("document {}", id)).await?;

        tracing::debug!(
            document_id = %id,
            status = %document.status,
            "Fetched document"
        );

        Ok(document)
    }

    async fn delete_document(&self, id: &str, request_id: Option<&str>) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.document_url(id))
            .with_trace_headers(request_id)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(document_id = %id, error = %e, "Delete document request failed");
                StoreError::from(e)
            })?;

        ensure_success(response, &format!("document {}", id)).await?;

        tracing::info!(document_id = %id, "Deleted document");
        Ok(())
    }
}
