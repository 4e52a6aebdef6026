//! Seams through which the view routes and asks the user for confirmation.

use std::sync::{Mutex, PoisonError};

pub const CASE_LIST_PATH: &str = "/cases";

pub fn case_path(case_id: &str) -> String {
    format!("{}/{}", CASE_LIST_PATH, case_id)
}

pub fn document_path(document_id: &str) -> String {
    format!("/documents/{}", document_id)
}

pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

pub trait Confirm: Send + Sync {
    /// Ask the user to approve `prompt`. Returning `false` aborts the action.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Remembers every path pushed to it; the HTTP layer turns the last one into a redirect.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, path: &str) {
        tracing::debug!(path = %path, "Navigating");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}

/// A confirmation decided ahead of time, e.g. by a submitted form field.
#[derive(Debug, Clone, Copy)]
pub struct PresetConfirmation(pub bool);

impl Confirm for PresetConfirmation {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
