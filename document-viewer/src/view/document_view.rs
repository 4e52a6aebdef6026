use super::navigation::Navigator;
use super::poller::{PollStep, StatusPoller};
use super::state::ViewState;
use super::{ViewError, ViewSettings};
use crate::services::{CaseStore, DocumentStore};
use metrics::counter;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// One mounted document view.
///
/// The view owns its poll loop: `unmount` or dropping the view stops it, whatever the
/// document's status.
pub struct DocumentView {
    pub(super) documents: Arc<dyn DocumentStore>,
    pub(super) cases: Arc<dyn CaseStore>,
    pub(super) navigator: Arc<dyn Navigator>,
    pub(super) settings: ViewSettings,
    request_id: Option<String>,
    pub(super) state: Arc<watch::Sender<ViewState>>,
    poller: StatusPoller,
}

impl DocumentView {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        cases: Arc<dyn CaseStore>,
        navigator: Arc<dyn Navigator>,
        settings: ViewSettings,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        let state = Arc::new(state);

        // `polling` follows the handle itself, updated under the poller's lock.
        let observed = Arc::clone(&state);
        let poller = StatusPoller::with_observer(move |active| {
            observed.send_if_modified(|s| std::mem::replace(&mut s.polling, active) != active);
        });

        Self {
            documents,
            cases,
            navigator,
            settings,
            request_id: None,
            state,
            poller,
        }
    }

    /// Tag every store call made by this view with the caller's request id.
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub(super) fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change, starting from the current state.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_active()
    }

    pub async fn mount(&self, id: &str) -> Result<(), ViewError> {
        self.load_document(id).await
    }

    pub fn unmount(&self) {
        self.stop_polling();
    }

    /// Fetch `id`, follow it while it is processing, and make sure its case is loaded.
    ///
    /// Failures end up as the localized `error` in the state; the returned error is for
    /// callers that want to pick a response code.
    pub async fn load_document(&self, id: &str) -> Result<(), ViewError> {
        self.state.send_modify(|s| s.loading = true);
        let result = self.load(id).await;
        self.state.send_modify(|s| s.loading = false);
        result
    }

    async fn load(&self, id: &str) -> Result<(), ViewError> {
        let document = match self.documents.fetch_document(id, self.request_id()).await {
            Ok(document) => document,
            Err(source) => {
                tracing::error!(
                    document_id = %id,
                    kind = source.kind(),
                    error = %source,
                    "Failed to load document"
                );
                counter!("document_view_loads_total", "outcome" => "error").increment(1);

                let message = self.settings.messages.fetch_failed.clone();
                self.state.send_modify(|s| s.error = Some(message));
                return Err(ViewError::FetchFailed {
                    document_id: id.to_string(),
                    source,
                });
            }
        };

        counter!("document_view_loads_total", "outcome" => "ok").increment(1);

        let processing = document.status.is_processing();
        let case_id = document.case_id.clone();
        self.state.send_modify(|s| s.document = Some(document));

        if processing {
            self.start_polling(id);
        } else {
            self.stop_polling();
        }

        match case_id {
            Some(case_id) => self.ensure_case(&case_id).await,
            None => Ok(()),
        }
    }

    async fn ensure_case(&self, case_id: &str) -> Result<(), ViewError> {
        let loaded = self
            .state
            .borrow()
            .case
            .as_ref()
            .is_some_and(|case| case.id == case_id);
        if loaded {
            return Ok(());
        }

        match self.cases.fetch_case(case_id, self.request_id()).await {
            Ok(case) => {
                self.state.send_modify(|s| s.case = Some(case));
                Ok(())
            }
            Err(source) => {
                tracing::error!(
                    case_id = %case_id,
                    kind = source.kind(),
                    error = %source,
                    "Failed to load case"
                );

                let message = self.settings.messages.case_fetch_failed.clone();
                self.state.send_modify(|s| s.error = Some(message));
                Err(ViewError::CaseFetchFailed {
                    case_id: case_id.to_string(),
                    source,
                })
            }
        }
    }

    fn start_polling(&self, id: &str) {
        let documents = Arc::clone(&self.documents);
        let state = Arc::clone(&self.state);
        let document_id = id.to_string();
        let request_id = self.request_id.clone();

        self.poller.start(self.settings.schedule(), move |token| {
            refresh(
                Arc::clone(&documents),
                Arc::clone(&state),
                document_id.clone(),
                request_id.clone(),
                token,
            )
        });

        tracing::info!(
            document_id = %id,
            interval_ms = self.settings.poll_interval.as_millis() as u64,
            "Polling document status"
        );
    }

    pub fn stop_polling(&self) {
        if self.poller.stop() {
            tracing::debug!("Stopped document status polling");
        }
    }
}

impl Drop for DocumentView {
    fn drop(&mut self) {
        self.stop_polling();
    }
}

/// One poll tick: refetch and apply, unless the view moved on in the meantime.
async fn refresh(
    documents: Arc<dyn DocumentStore>,
    state: Arc<watch::Sender<ViewState>>,
    document_id: String,
    request_id: Option<String>,
    token: CancellationToken,
) -> PollStep {
    let document = match documents
        .fetch_document(&document_id, request_id.as_deref())
        .await
    {
        Ok(document) => document,
        Err(error) => {
            tracing::warn!(
                document_id = %document_id,
                kind = error.kind(),
                error = %error,
                "Status poll failed, polling stopped"
            );
            counter!("document_view_polls_total", "outcome" => "error").increment(1);
            return PollStep::Stop;
        }
    };

    if token.is_cancelled() {
        return PollStep::Stop;
    }

    let status = document.status;
    let mut displayed = false;
    state.send_if_modified(|s| {
        if s.document_id() != Some(document_id.as_str()) {
            return false;
        }
        displayed = true;
        if s.document.as_ref() == Some(&document) {
            return false;
        }
        s.document = Some(document);
        true
    });

    if !displayed {
        tracing::debug!(
            document_id = %document_id,
            "Discarding status for a document that is no longer displayed"
        );
        counter!("document_view_polls_total", "outcome" => "stale").increment(1);
        return PollStep::Stop;
    }

    if status.is_terminal() {
        tracing::info!(document_id = %document_id, status = %status, "Document processing finished");
        counter!("document_view_polls_total", "outcome" => "settled").increment(1);
        PollStep::Stop
    } else {
        counter!("document_view_polls_total", "outcome" => "processing").increment(1);
        PollStep::Continue
    }
}
