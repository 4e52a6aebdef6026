use super::document_view::DocumentView;
use super::navigation::{case_path, Confirm, CASE_LIST_PATH};
use super::ViewError;
use metrics::counter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
    Deleted { redirect: String },
}

impl DocumentView {
    /// Delete the displayed document after the user confirms, then leave for its case.
    ///
    /// On failure the document stays displayed and the localized delete error is shown.
    pub async fn delete_document(&self, confirm: &dyn Confirm) -> Result<DeleteOutcome, ViewError> {
        let target = {
            let state = self.state.borrow();
            state.document.as_ref().map(|document| {
                let case_id = document
                    .case_id
                    .clone()
                    .or_else(|| state.case.as_ref().map(|case| case.id.clone()));
                (document.id.clone(), case_id)
            })
        };
        let Some((document_id, case_id)) = target else {
            return Err(ViewError::NothingLoaded);
        };

        if !confirm.confirm(&self.settings.messages.confirm_delete) {
            tracing::debug!(document_id = %document_id, "Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(source) = self
            .documents
            .delete_document(&document_id, self.request_id())
            .await
        {
            tracing::error!(
                document_id = %document_id,
                kind = source.kind(),
                error = %source,
                "Failed to delete document"
            );
            counter!("document_view_deletes_total", "outcome" => "error").increment(1);

            let message = self.settings.messages.delete_failed.clone();
            self.state.send_modify(|s| s.error = Some(message));
            return Err(ViewError::DeleteFailed {
                document_id,
                source,
            });
        }

        counter!("document_view_deletes_total", "outcome" => "ok").increment(1);
        self.stop_polling();

        let redirect = case_id
            .as_deref()
            .map(case_path)
            .unwrap_or_else(|| CASE_LIST_PATH.to_string());
        self.navigator.push(&redirect);

        Ok(DeleteOutcome::Deleted { redirect })
    }

    /// Go to the loaded case. Returns `false` when no case is loaded.
    pub fn open_case(&self) -> bool {
        let path = self.state.borrow().case.as_ref().map(|case| case_path(&case.id));
        match path {
            Some(path) => {
                self.navigator.push(&path);
                true
            }
            None => false,
        }
    }

    pub fn back_to_cases(&self) {
        self.navigator.push(CASE_LIST_PATH);
    }

    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }
}
