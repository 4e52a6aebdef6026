pub mod config;
pub mod format;
pub mod handlers;
pub mod models;
pub mod render;
pub mod services;
pub mod startup;
pub mod view;

use chrono::Locale;
use render::DocumentPage;
use services::{CaseStore, DocumentStore};
use std::sync::Arc;
use view::{DocumentView, Navigator, ViewSettings, ViewState};

/// Shared application state: upstream stores and how views are configured.
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    pub cases: Arc<dyn CaseStore>,
    pub view_settings: ViewSettings,
    pub locale: Locale,
}

impl AppState {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        cases: Arc<dyn CaseStore>,
        view_settings: ViewSettings,
        locale: Locale,
    ) -> Self {
        Self {
            documents,
            cases,
            view_settings,
            locale,
        }
    }

    /// A fresh, unmounted view for one request or stream.
    /// A fresh view for one inbound request; store calls carry `request_id` upstream.
    pub fn open_view(
        &self,
        navigator: Arc<dyn Navigator>,
        request_id: Option<String>,
    ) -> DocumentView {
        DocumentView::new(
            Arc::clone(&self.documents),
            Arc::clone(&self.cases),
            navigator,
            self.view_settings.clone(),
        )
        .with_request_id(request_id)
    }

    pub fn page(&self, document_id: &str, state: &ViewState) -> DocumentPage {
        DocumentPage::new(
            document_id,
            state,
            self.locale,
            &self.view_settings.messages.confirm_delete,
        )
    }
}
