//! In-memory sink for tests and keyless demo runs.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ChunkRecord, StoreError, VectorSink};

/// Append-only in-memory sink.
///
/// Clones share one buffer, so a caller can keep a handle, run the pipeline
/// against another, and inspect what was stored.
#[derive(Clone, Debug, Default)]
pub struct MemoryVectorSink {
    records: Arc<Mutex<Vec<ChunkRecord>>>,
}

impl MemoryVectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything stored so far, in append order.
    pub fn snapshot(&self) -> Vec<ChunkRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl VectorSink for MemoryVectorSink {
    async fn store(&self, record: ChunkRecord) -> Result<(), StoreError> {
        self.records.lock().push(record);
        Ok(())
    }
}
