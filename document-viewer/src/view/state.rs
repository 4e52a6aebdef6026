use crate::models::{Case, Document};

/// Everything a presenter needs to draw the view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub document: Option<Document>,
    pub case: Option<Case>,
    pub loading: bool,
    /// Localized message for the last failed action, until dismissed.
    pub error: Option<String>,
    pub polling: bool,
}

impl ViewState {
    pub fn document_id(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.id.as_str())
    }

    /// No load or poll is in flight; the state only changes again on user action.
    pub fn is_settled(&self) -> bool {
        !self.loading && !self.polling
    }
}
