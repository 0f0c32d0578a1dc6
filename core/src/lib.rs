//! Boolean retrieval over an in-memory collection of plain-text documents.

pub mod error;
pub mod index;
pub mod query;
pub mod session;
pub mod source;
pub mod tokenizer;

pub use error::{Result, SearchError};
pub use index::{build_index, DocumentId, DocumentStore, InvertedIndex, PostingSet, Term};
pub use query::{evaluate, Operator};
pub use session::{LoadOutcome, SearchOutcome, SearchSession, SharedSession};
pub use source::{DirectorySource, DocumentSource, MemorySource};
