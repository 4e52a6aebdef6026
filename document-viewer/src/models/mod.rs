pub mod case;
pub mod document;

pub use case::Case;
pub use document::{Chunk, Document, DocumentStatus};
