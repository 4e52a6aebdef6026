use crate::render::ViewSnapshot;
use crate::services::StoreError;
use crate::view::navigation::{document_path, CASE_LIST_PATH};
use crate::view::{DeleteOutcome, PresetConfirmation, RecordingNavigator, ViewError};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use service_core::observability::extract_request_id;
use std::sync::Arc;

/// Status code for a page whose document could not be loaded.
fn load_failure_status(error: &ViewError) -> Option<StatusCode> {
    match error {
        ViewError::FetchFailed {
            source: StoreError::NotFound { .. },
            ..
        } => Some(StatusCode::NOT_FOUND),
        ViewError::FetchFailed { .. } => Some(StatusCode::BAD_GATEWAY),
        _ => None,
    }
}

pub async fn document_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let view = state.open_view(Arc::new(RecordingNavigator::new()), extract_request_id(&headers));
    let result = view.mount(&id).await;

    // Rendered before teardown so the page knows whether to follow the event stream.
    let page = state.page(&id, &view.state());
    view.unmount();

    match result.as_ref().err().and_then(load_failure_status) {
        Some(status) => (status, page).into_response(),
        None => page.into_response(),
    }
}

/// JSON projection of a freshly loaded view, for clients that do not follow the event stream.
pub async fn document_snapshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ViewSnapshot>, AppError> {
    let view = state.open_view(Arc::new(RecordingNavigator::new()), extract_request_id(&headers));
    let result = view.mount(&id).await;
    let snapshot = ViewSnapshot::new(&view.state(), state.locale);
    view.unmount();

    match result {
        Err(ViewError::FetchFailed {
            source: StoreError::NotFound { .. },
            ..
        }) => Err(AppError::NotFound(anyhow::anyhow!("document {} not found", id))),
        Err(ViewError::FetchFailed { source, .. }) => Err(AppError::BadGateway(format!(
            "document store {}",
            source.kind()
        ))),
        // A missing case still leaves a usable document; the snapshot carries the message.
        _ => Ok(Json(snapshot)),
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(form): Form<DeleteForm>,
) -> Response {
    let navigator = Arc::new(RecordingNavigator::new());
    let view = state.open_view(navigator.clone(), extract_request_id(&headers));

    if let Err(error) = view.mount(&id).await {
        if let Some(status) = load_failure_status(&error) {
            view.unmount();
            return (status, state.page(&id, &view.state())).into_response();
        }
    }
    view.stop_polling();

    let confirmation = PresetConfirmation(form.confirm.as_deref() == Some("yes"));
    match view.delete_document(&confirmation).await {
        Ok(DeleteOutcome::Deleted { .. }) => {
            let target = navigator
                .last()
                .unwrap_or_else(|| CASE_LIST_PATH.to_string());
            Redirect::to(&target).into_response()
        }
        Ok(DeleteOutcome::Cancelled) => Redirect::to(&document_path(&id)).into_response(),
        Err(_) => (StatusCode::BAD_GATEWAY, state.page(&id, &view.state())).into_response(),
    }
}
