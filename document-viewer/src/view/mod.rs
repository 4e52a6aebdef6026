//! The document view: load a document and its case, follow processing, delete on request.

mod actions;
mod document_view;
pub mod messages;
pub mod navigation;
pub mod poller;
pub mod state;

pub use actions::DeleteOutcome;
pub use document_view::DocumentView;
pub use messages::Messages;
pub use navigation::{Confirm, Navigator, PresetConfirmation, RecordingNavigator};
pub use poller::{PollSchedule, PollStep, StatusPoller};
pub use state::ViewState;

use crate::services::StoreError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    pub poll_interval: Duration,
    pub max_poll_duration: Option<Duration>,
    pub messages: Messages,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            max_poll_duration: None,
            messages: Messages::default(),
        }
    }
}

impl ViewSettings {
    pub fn schedule(&self) -> PollSchedule {
        PollSchedule {
            interval: self.poll_interval,
            max_duration: self.max_poll_duration,
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("failed to load document {document_id}")]
    FetchFailed {
        document_id: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to load case {case_id}")]
    CaseFetchFailed {
        case_id: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to delete document {document_id}")]
    DeleteFailed {
        document_id: String,
        #[source]
        source: StoreError,
    },

    #[error("no document is loaded")]
    NothingLoaded,
}
