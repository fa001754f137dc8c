//! Vector store sink seam.
//!
//! The pipeline hands every embedded chunk to a [`VectorSink`]; indexing and
//! persistence belong to the backend behind the trait.
//!
//! ```text
//!                  ┌──────────────────┐
//!                  │ VectorSink trait │
//!                  │  (async append)  │
//!                  └────────┬─────────┘
//!                           │
//!              ┌────────────┴────────────┐
//!              ▼                         ▼
//!     ┌─────────────────┐      ┌─────────────────┐
//!     │ MemoryVectorSink │      │ external stores │
//!     │ (tests, demos)   │      │ (pgvector, ...) │
//!     └─────────────────┘      └─────────────────┘
//! ```

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryVectorSink;

/// A sink rejected a chunk.
#[derive(Debug, Error)]
#[error("vector store error: {0}")]
pub struct StoreError(pub String);

/// One embedded chunk, ready for storage.
///
/// `source` and `chunk_index` are the retrieval metadata: together they say
/// where in the corpus the content came from and where it sits in its
/// document's chunk sequence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Unique identifier for this chunk.
    pub id: String,
    /// Source document path.
    pub source: String,
    /// Zero-based index of this chunk within the source document.
    pub chunk_index: usize,
    /// The chunk text.
    pub content: String,
    /// The embedding vector, once computed.
    pub embedding: Option<Vec<f32>>,
}

impl ChunkRecord {
    /// Creates a record with a fresh id and no embedding.
    pub fn new(source: impl Into<String>, chunk_index: usize, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source: source.into(),
            chunk_index,
            content: content.into(),
            embedding: None,
        }
    }

    /// Sets the embedding vector.
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// Append-only destination for embedded chunks.
///
/// The pipeline never reads chunks back; retrieval is the backend's concern.
#[async_trait]
pub trait VectorSink: Send + Sync {
    /// Appends one embedded chunk.
    async fn store(&self, record: ChunkRecord) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_get_distinct_ids() {
        let a = ChunkRecord::new("docs/a.md", 0, "first");
        let b = ChunkRecord::new("docs/a.md", 1, "second");
        assert_ne!(a.id, b.id);
        assert!(a.embedding.is_none());
    }

    #[test]
    fn with_embedding_attaches_the_vector() {
        let record = ChunkRecord::new("docs/a.md", 0, "first").with_embedding(vec![0.5, 0.25]);
        assert_eq!(record.embedding.as_deref(), Some(&[0.5, 0.25][..]));
    }
}
