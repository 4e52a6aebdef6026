pub mod case_client;
pub mod document_client;
pub mod memory;
pub mod metrics;
pub mod store;

pub use case_client::HttpCaseStore;
pub use document_client::HttpDocumentStore;
pub use memory::{InMemoryCaseStore, InMemoryDocumentStore};
pub use store::{CaseStore, DocumentStore, StoreError};
