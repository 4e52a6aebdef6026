//! Live view over Server-Sent Events.
//!
//! Each connection mounts its own view. The stream ends once the view settles; a client
//! that disconnects earlier drops the view, which stops its poll loop.

use crate::render::ViewSnapshot;
use crate::view::{DocumentView, RecordingNavigator, ViewState};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use service_core::observability::extract_request_id;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::watch;

struct Feed {
    view: DocumentView,
    receiver: watch::Receiver<ViewState>,
    first: bool,
}

pub async fn document_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let view = state.open_view(Arc::new(RecordingNavigator::new()), extract_request_id(&headers));
    // A failed load is reported through the state like any other change.
    let _ = view.mount(&id).await;

    tracing::debug!(document_id = %id, polling = view.is_polling(), "Opened document event stream");

    let receiver = view.subscribe();
    let locale = state.locale;
    let feed = Feed {
        view,
        receiver,
        first: true,
    };

    let stream = stream::unfold(Some(feed), move |feed| async move {
        let Some(mut feed) = feed else {
            return None;
        };
        if !feed.first && feed.receiver.changed().await.is_err() {
            return None;
        }
        feed.first = false;

        let snapshot = {
            let state = feed.receiver.borrow_and_update();
            ViewSnapshot::new(&state, locale)
        };
        let event = snapshot_event(&snapshot);

        // Dropping the feed unmounts the view.
        let next = if snapshot.settled { None } else { Some(feed) };
        Some((Ok::<Event, Infallible>(event), next))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn snapshot_event(snapshot: &ViewSnapshot) -> Event {
    match Event::default().event("snapshot").json_data(snapshot) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize view snapshot");
            Event::default().event("error").data("snapshot unavailable")
        }
    }
}
