//! Presentation of a `ViewState`: the HTML page and the JSON snapshot streamed to it.

use crate::format::{format_date, format_file_size, mimetype_label, status_class};
use crate::models::{Case, Document};
use crate::view::navigation::{case_path, document_path};
use crate::view::ViewState;
use askama::Template;
use chrono::Locale;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DocumentDetails {
    pub id: String,
    pub filename: String,
    pub type_label: String,
    pub size_label: String,
    pub status: String,
    pub status_class: String,
    pub error_message: Option<String>,
    pub created_label: String,
    pub updated_label: String,
    pub chunks: Vec<String>,
}

impl DocumentDetails {
    pub fn new(document: &Document, locale: Locale) -> Self {
        let status = document.status.as_str();
        Self {
            id: document.id.clone(),
            filename: document.filename.clone(),
            type_label: mimetype_label(&document.mimetype).to_string(),
            size_label: format_file_size(document.size),
            status: status.to_string(),
            status_class: status_class(status).to_string(),
            error_message: document.error_message.clone(),
            created_label: format_date(&document.created_at, locale),
            updated_label: format_date(&document.updated_at, locale),
            chunks: document
                .chunks()
                .iter()
                .map(|chunk| chunk.content.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CaseDetails {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub path: String,
}

impl From<&Case> for CaseDetails {
    fn from(case: &Case) -> Self {
        Self {
            id: case.id.clone(),
            title: case.title.clone(),
            description: case.description.clone(),
            path: case_path(&case.id),
        }
    }
}

/// Serializable projection of the view, one per state change on the event stream.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewSnapshot {
    pub document: Option<DocumentDetails>,
    pub case: Option<CaseDetails>,
    pub loading: bool,
    pub polling: bool,
    pub error: Option<String>,
    pub settled: bool,
}

impl ViewSnapshot {
    pub fn new(state: &ViewState, locale: Locale) -> Self {
        Self {
            document: state
                .document
                .as_ref()
                .map(|document| DocumentDetails::new(document, locale)),
            case: state.case.as_ref().map(CaseDetails::from),
            loading: state.loading,
            polling: state.polling,
            error: state.error.clone(),
            settled: state.is_settled(),
        }
    }
}

#[derive(Template)]
#[template(path = "document.html")]
pub struct DocumentPage {
    pub view: ViewSnapshot,
    pub document_id: String,
    pub events_url: String,
    pub delete_url: String,
    pub confirm_prompt: String,
}

impl DocumentPage {
    pub fn new(document_id: &str, state: &ViewState, locale: Locale, confirm_prompt: &str) -> Self {
        let base = document_path(document_id);
        Self {
            view: ViewSnapshot::new(state, locale),
            document_id: document_id.to_string(),
            events_url: format!("{}/events", base),
            delete_url: format!("{}/delete", base),
            confirm_prompt: confirm_prompt.to_string(),
        }
    }
}
