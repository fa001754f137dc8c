//! Turning a reference corpus into embedded chunks.
//!
//! The pieces in this module cover the offline half of the system:
//!
//! * [`loader`] — document discovery and UTF-8 loading under `docs_dir`.
//! * [`chunker`] — fixed-size overlapping character chunking.
//! * [`pipeline`] — orchestration with per-document failure isolation and
//!   a summary report.

pub mod chunker;
pub mod loader;
pub mod pipeline;

pub use chunker::CharacterChunker;
pub use loader::{DirectoryLoader, Document, DocumentSource, LoadError};
pub use pipeline::{DocumentError, DocumentFailure, IngestReport, IngestionPipeline};
