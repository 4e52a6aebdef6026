#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use document_viewer::models::{Case, Chunk, Document, DocumentStatus};
use document_viewer::services::{DocumentStore, InMemoryCaseStore, InMemoryDocumentStore, StoreError};
use document_viewer::view::{DocumentView, RecordingNavigator, ViewSettings};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

pub const CASE_ID: &str = "case-9";

pub fn document(id: &str, status: DocumentStatus) -> Document {
    let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
    Document {
        id: id.to_string(),
        filename: format!("{}.pdf", id),
        mimetype: "application/pdf".to_string(),
        size: 4096,
        status,
        error_message: None,
        case_id: None,
        created_at: at,
        updated_at: at,
        chunks: None,
    }
}

pub fn document_in_case(id: &str, status: DocumentStatus) -> Document {
    Document {
        case_id: Some(CASE_ID.to_string()),
        chunks: Some(vec![Chunk {
            index: Some(0),
            content: "Comes now the plaintiff".to_string(),
        }]),
        ..document(id, status)
    }
}

pub fn case() -> Case {
    Case {
        id: CASE_ID.to_string(),
        title: "Doe v. Roe".to_string(),
        description: Some("Breach of contract".to_string()),
    }
}

/// A view wired to in-memory stores, with handles kept for assertions.
pub struct Harness {
    pub documents: Arc<InMemoryDocumentStore>,
    pub cases: Arc<InMemoryCaseStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub view: DocumentView,
}

impl Harness {
    pub fn new(documents: InMemoryDocumentStore, cases: InMemoryCaseStore) -> Self {
        Self::with_settings(documents, cases, ViewSettings::default())
    }

    pub fn with_settings(
        documents: InMemoryDocumentStore,
        cases: InMemoryCaseStore,
        settings: ViewSettings,
    ) -> Self {
        let documents = Arc::new(documents);
        let cases = Arc::new(cases);
        let navigator = Arc::new(RecordingNavigator::new());
        let view = DocumentView::new(documents.clone(), cases.clone(), navigator.clone(), settings);

        Self {
            documents,
            cases,
            navigator,
            view,
        }
    }

    pub fn with_document(document: Document) -> Self {
        Self::new(
            InMemoryDocumentStore::with_document(document),
            InMemoryCaseStore::with_case(case()),
        )
    }

    /// A harness whose view reads documents through a gate the test opens by hand.
    /// `documents` is still the store behind the gate.
    pub fn gated(documents: InMemoryDocumentStore) -> (Self, Arc<GatedDocumentStore>) {
        let documents = Arc::new(documents);
        let gate = Arc::new(GatedDocumentStore::new(documents.clone()));
        let cases = Arc::new(InMemoryCaseStore::with_case(case()));
        let navigator = Arc::new(RecordingNavigator::new());
        let view = DocumentView::new(
            gate.clone(),
            cases.clone(),
            navigator.clone(),
            ViewSettings::default(),
        );

        let harness = Self {
            documents,
            cases,
            navigator,
            view,
        };
        (harness, gate)
    }
}

/// Holds fetches of one document id until the test releases them, one per `release`.
pub struct GatedDocumentStore {
    inner: Arc<InMemoryDocumentStore>,
    gated_id: Mutex<Option<String>>,
    permits: Semaphore,
    waiting: AtomicUsize,
}

impl GatedDocumentStore {
    pub fn new(inner: Arc<InMemoryDocumentStore>) -> Self {
        Self {
            inner,
            gated_id: Mutex::new(None),
            permits: Semaphore::new(0),
            waiting: AtomicUsize::new(0),
        }
    }

    pub fn gate(&self, id: &str) {
        *self.gated_id.lock().unwrap() = Some(id.to_string());
    }

    pub fn release(&self) {
        self.permits.add_permits(1);
    }

    /// Fetches currently held at the gate.
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    pub async fn until_waiting(&self, count: usize) {
        while self.waiting() < count {
            tokio::task::yield_now().await;
        }
    }

    fn is_gated(&self, id: &str) -> bool {
        self.gated_id.lock().unwrap().as_deref() == Some(id)
    }
}

/// Counts a held fetch until it is let through or its future is dropped.
struct Held<'a>(&'a AtomicUsize);

impl<'a> Held<'a> {
    fn new(waiting: &'a AtomicUsize) -> Self {
        waiting.fetch_add(1, Ordering::SeqCst);
        Self(waiting)
    }
}

impl Drop for Held<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for GatedDocumentStore {
    async fn fetch_document(
        &self,
        id: &str,
        request_id: Option<&str>,
    ) -> Result<Document, StoreError> {
        if self.is_gated(id) {
            let held = Held::new(&self.waiting);
            self.permits.acquire().await.unwrap().forget();
            drop(held);
        }
        self.inner.fetch_document(id, request_id).await
    }

    async fn delete_document(&self, id: &str, request_id: Option<&str>) -> Result<(), StoreError> {
        self.inner.delete_document(id, request_id).await
    }
}

/// Wait until the view reports no poll loop, failing after a minute of (virtual) time.
pub async fn wait_until_idle(view: &DocumentView) {
    let mut receiver = view.subscribe();
    let idle = async {
        loop {
            if !receiver.borrow_and_update().polling {
                return;
            }
            receiver.changed().await.expect("view dropped while waiting");
        }
    };

    tokio::time::timeout(Duration::from_secs(60), idle)
        .await
        .expect("poll loop did not stop");
}
