use serde::Deserialize;

/// User-facing strings, overridable per deployment to localize the view.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Messages {
    pub fetch_failed: String,
    pub case_fetch_failed: String,
    pub delete_failed: String,
    pub confirm_delete: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            fetch_failed: "Failed to load document.".to_string(),
            case_fetch_failed: "Failed to load case.".to_string(),
            delete_failed: "Failed to delete document.".to_string(),
            confirm_delete: "Are you sure you want to delete this document?".to_string(),
        }
    }
}
