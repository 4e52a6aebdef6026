use crate::config::UpstreamSettings;
use crate::models::Case;
use crate::services::store::{read_json, CaseStore, StoreError};
use async_trait::async_trait;
use reqwest::Client;
use service_core::observability::TraceHeadersExt;

/// Read-only client for the case store.
#[derive(Clone)]
pub struct HttpCaseStore {
    client: Client,
    base_url: String,
}

impl HttpCaseStore {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        tracing::info!(url = %settings.url, "Configured case store client");

        Ok(Self::with_client(client, &settings.url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CaseStore for HttpCaseStore {
    async fn fetch_case(&self, case_id: &str, request_id: Option<&str>) -> Result<Case, StoreError> {
        let response = self
            .client
            .get(format!("{}/cases/{}", self.base_url, case_id))
            .with_trace_headers(request_id)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(case_id = %case_id, error = %e, "Fetch case request failed");
                StoreError::from(e)
            })?;

        read_json(response, &format!("case {}", case_id)).await
    }
}
