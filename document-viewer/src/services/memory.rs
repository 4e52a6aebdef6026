//! In-memory stores for tests and local runs without upstream services.

use crate::models::{Case, Document};
use crate::services::store::{CaseStore, DocumentStore, StoreError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Document store backed by a map, with optional scripted responses per id.
///
/// Scripted responses are consumed first, one per fetch; once a script runs dry the
/// stored document (if any) is returned.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<HashMap<String, Document>>,
    scripts: Mutex<HashMap<String, VecDeque<Result<Document, String>>>>,
    fetch_counts: Mutex<HashMap<String, u64>>,
    request_ids: Mutex<Vec<Option<String>>>,
    delete_count: AtomicU64,
    fail_deletes: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        let store = Self::new();
        store.insert(document);
        store
    }

    pub fn insert(&self, document: Document) {
        lock(&self.documents).insert(document.id.clone(), document);
    }

    /// Queue the next response for `id`. `Err` makes that fetch fail.
    pub fn push_response(&self, id: &str, response: Result<Document, String>) {
        lock(&self.scripts)
            .entry(id.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_count(&self, id: &str) -> u64 {
        lock(&self.fetch_counts).get(id).copied().unwrap_or(0)
    }

    /// Request ids passed to every fetch and delete, in call order.
    pub fn request_ids(&self) -> Vec<Option<String>> {
        lock(&self.request_ids).clone()
    }

    fn record_request_id(&self, request_id: Option<&str>) {
        lock(&self.request_ids).push(request_id.map(str::to_string));
    }

    pub fn delete_count(&self) -> u64 {
        self.delete_count.load(Ordering::SeqCst)
    }

    pub fn contains(&self, id: &str) -> bool {
        lock(&self.documents).contains_key(id)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn fetch_document(
        &self,
        id: &str,
        request_id: Option<&str>,
    ) -> Result<Document, StoreError> {
        self.record_request_id(request_id);
        *lock(&self.fetch_counts).entry(id.to_string()).or_default() += 1;

        let scripted = lock(&self.scripts)
            .get_mut(id)
            .and_then(|queue| queue.pop_front());

        match scripted {
            Some(Ok(document)) => {
                self.insert(document.clone());
                Ok(document)
            }
            Some(Err(reason)) => Err(StoreError::Unavailable(reason)),
            None => lock(&self.documents)
                .get(id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound {
                    resource: format!("document {}", id),
                }),
        }
    }

    async fn delete_document(&self, id: &str, request_id: Option<&str>) -> Result<(), StoreError> {
        self.record_request_id(request_id);
        self.delete_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("delete rejected".to_string()));
        }

        lock(&self.documents)
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                resource: format!("document {}", id),
            })
    }
}

#[derive(Default)]
pub struct InMemoryCaseStore {
    cases: Mutex<HashMap<String, Case>>,
    fetch_count: AtomicU64,
}

impl InMemoryCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_case(case: Case) -> Self {
        let store = Self::new();
        store.insert(case);
        store
    }

    pub fn insert(&self, case: Case) {
        lock(&self.cases).insert(case.id.clone(), case);
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaseStore for InMemoryCaseStore {
    async fn fetch_case(&self, case_id: &str, _request_id: Option<&str>) -> Result<Case, StoreError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        lock(&self.cases)
            .get(case_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                resource: format!("case {}", case_id),
            })
    }
}
