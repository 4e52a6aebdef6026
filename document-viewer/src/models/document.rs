use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing state reported by the document store.
///
/// Anything the backend sends that is not one of the known states lands in `Unknown`
/// rather than failing the whole response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processing,
    Processed,
    Enhanced,
    Failed,
    #[serde(other)]
    Unknown,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Processing => "processing",
            DocumentStatus::Processed => "processed",
            DocumentStatus::Enhanced => "enhanced",
            DocumentStatus::Failed => "failed",
            DocumentStatus::Unknown => "unknown",
        }
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, DocumentStatus::Processing)
    }

    /// Every state except `processing`; the backend will not move it any further.
    pub fn is_terminal(&self) -> bool {
        !self.is_processing()
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub mimetype: String,
    pub size: u64,
    pub status: DocumentStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub chunks: Option<Vec<Chunk>>,
}

impl Document {
    /// Chunks in the order the store returned them; empty when none were produced.
    pub fn chunks(&self) -> &[Chunk] {
        self.chunks.as_deref().unwrap_or_default()
    }
}
