//! Orchestration of load → chunk → embed → store, one document at a time.
//!
//! One document's failure never aborts the run: the pipeline records the
//! cause in the report and moves on. A run only fails outright when the
//! configuration itself is unusable (bad settings, unreadable docs dir).

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::instrument;

use crate::config::{ConfigError, IngestConfig};
use crate::embeddings::{EmbeddingError, EmbeddingProvider};
use crate::ingestion::chunker::CharacterChunker;
use crate::ingestion::loader::{DirectoryLoader, DocumentSource, LoadError};
use crate::stores::{ChunkRecord, StoreError, VectorSink};

/// Why a single document was skipped.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("embedding failed for chunk {chunk_index}: {source}")]
    Embed {
        chunk_index: usize,
        #[source]
        source: EmbeddingError,
    },

    #[error("store rejected chunk {chunk_index}: {source}")]
    Store {
        chunk_index: usize,
        #[source]
        source: StoreError,
    },
}

/// One skipped document, with its cause and when it was recorded.
#[derive(Debug)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: DocumentError,
    pub when: DateTime<Utc>,
}

/// Summary of an ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Documents fully chunked, embedded, and stored.
    pub documents_processed: usize,
    /// Documents skipped because of a recorded failure.
    pub documents_failed: usize,
    /// Chunks embedded and handed to the sink.
    pub chunks_embedded: usize,
    /// Empty chunks dropped before embedding.
    pub chunks_skipped: usize,
    /// The skipped documents, in processing order.
    pub failures: Vec<DocumentFailure>,
    /// Wall-clock time of the run.
    pub duration: Duration,
}

impl IngestReport {
    pub fn total_documents(&self) -> usize {
        self.documents_processed + self.documents_failed
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Default)]
struct DocumentOutcome {
    stored: usize,
    skipped: usize,
}

/// Runs Loader → Chunker → Embedder → sink over a reference corpus.
pub struct IngestionPipeline {
    source: Arc<dyn DocumentSource>,
    chunker: CharacterChunker,
    provider: Arc<dyn EmbeddingProvider>,
    sink: Arc<dyn VectorSink>,
}

impl fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionPipeline").finish_non_exhaustive()
    }
}

impl IngestionPipeline {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        chunker: CharacterChunker,
        provider: Arc<dyn EmbeddingProvider>,
        sink: Arc<dyn VectorSink>,
    ) -> Self {
        Self {
            source,
            chunker,
            provider,
            sink,
        }
    }

    /// Wires a [`DirectoryLoader`] from `config`, validating every setting
    /// before any document is touched.
    pub fn from_config(
        config: &IngestConfig,
        provider: Arc<dyn EmbeddingProvider>,
        sink: Arc<dyn VectorSink>,
    ) -> Result<Self, ConfigError> {
        let chunker = CharacterChunker::from_config(config)?;
        let source = Arc::new(DirectoryLoader::new(config)?);
        Ok(Self::new(source, chunker, provider, sink))
    }

    /// Processes every candidate document and returns the run summary.
    ///
    /// Documents are handled in the order the source lists them, so a given
    /// corpus snapshot always produces the same report.
    #[instrument(skip(self), err)]
    pub async fn run(&self) -> Result<IngestReport, ConfigError> {
        let started = Instant::now();
        let paths = self.source.list().await?;
        tracing::info!(documents = paths.len(), "starting ingestion");

        let mut report = IngestReport::default();
        for path in paths {
            match self.ingest_document(&path).await {
                Ok(outcome) => {
                    tracing::info!(
                        path = %path.display(),
                        chunks = outcome.stored,
                        "document ingested"
                    );
                    report.documents_processed += 1;
                    report.chunks_embedded += outcome.stored;
                    report.chunks_skipped += outcome.skipped;
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "document skipped");
                    report.documents_failed += 1;
                    report.failures.push(DocumentFailure {
                        path,
                        error,
                        when: Utc::now(),
                    });
                }
            }
        }

        report.duration = started.elapsed();
        tracing::info!(
            processed = report.documents_processed,
            failed = report.documents_failed,
            chunks = report.chunks_embedded,
            elapsed_ms = report.duration.as_millis() as u64,
            "ingestion finished"
        );
        Ok(report)
    }

    /// Embeds every chunk of one document, then hands the records to the
    /// sink. Embedding happens before any store call, so an embedding
    /// failure leaves the sink untouched for this document.
    async fn ingest_document(&self, path: &Path) -> Result<DocumentOutcome, DocumentError> {
        let document = self.source.load(path).await?;
        let chunks = self.chunker.split(&document.text);
        let source_label = document.path.display().to_string();

        let mut outcome = DocumentOutcome::default();
        let mut records = Vec::new();
        for (chunk_index, content) in chunks.into_iter().enumerate() {
            if content.is_empty() {
                tracing::debug!(path = %document.path.display(), chunk_index, "empty chunk skipped");
                outcome.skipped += 1;
                continue;
            }
            let embedding = self
                .provider
                .embed(&content)
                .await
                .map_err(|source| DocumentError::Embed {
                    chunk_index,
                    source,
                })?;
            records
                .push(ChunkRecord::new(&source_label, chunk_index, content).with_embedding(embedding));
        }

        for record in records {
            let chunk_index = record.chunk_index;
            self.sink
                .store(record)
                .await
                .map_err(|source| DocumentError::Store {
                    chunk_index,
                    source,
                })?;
            outcome.stored += 1;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::embeddings::MockEmbeddingProvider;
    use crate::ingestion::loader::Document;
    use crate::stores::MemoryVectorSink;

    struct StaticSource {
        docs: Vec<Document>,
    }

    #[async_trait]
    impl DocumentSource for StaticSource {
        async fn list(&self) -> Result<Vec<PathBuf>, ConfigError> {
            Ok(self.docs.iter().map(|doc| doc.path.clone()).collect())
        }

        async fn load(&self, path: &Path) -> Result<Document, LoadError> {
            self.docs
                .iter()
                .find(|doc| doc.path.as_path() == path)
                .cloned()
                .ok_or_else(|| LoadError {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                })
        }
    }

    struct FlakyProvider;

    #[async_trait]
    impl EmbeddingProvider for FlakyProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            if text.contains("poison") {
                return Err(EmbeddingError::MalformedResponse("poisoned".to_string()));
            }
            Ok(vec![0.0; 4])
        }

        fn dimensions(&self) -> usize {
            4
        }
    }

    struct RejectingSink;

    #[async_trait]
    impl VectorSink for RejectingSink {
        async fn store(&self, _record: ChunkRecord) -> Result<(), StoreError> {
            Err(StoreError("sink offline".to_string()))
        }
    }

    fn doc(path: &str, text: &str) -> Document {
        Document {
            path: PathBuf::from(path),
            text: text.to_string(),
        }
    }

    fn make_pipeline(
        docs: Vec<Document>,
        provider: Arc<dyn EmbeddingProvider>,
        sink: Arc<dyn VectorSink>,
    ) -> IngestionPipeline {
        let chunker = CharacterChunker::new(8, 2).unwrap();
        IngestionPipeline::new(Arc::new(StaticSource { docs }), chunker, provider, sink)
    }

    #[tokio::test]
    async fn stores_every_chunk_of_every_document() {
        let sink = MemoryVectorSink::new();
        let pipeline = make_pipeline(
            vec![
                doc("docs/a.md", "abcdefghijklmnop"),
                doc("docs/b.md", "short"),
            ],
            Arc::new(MockEmbeddingProvider::new()),
            Arc::new(sink.clone()),
        );

        let report = pipeline.run().await.unwrap();
        assert_eq!(report.documents_processed, 2);
        assert_eq!(report.documents_failed, 0);
        assert_eq!(report.chunks_embedded, sink.len());
        assert!(report.is_clean());

        let records = sink.snapshot();
        assert!(records.iter().all(|record| record.embedding.is_some()));
        assert_eq!(records[0].source, "docs/a.md");
        assert_eq!(records[0].chunk_index, 0);
    }

    #[tokio::test]
    async fn embed_failure_skips_only_that_document() {
        let sink = MemoryVectorSink::new();
        let pipeline = make_pipeline(
            vec![
                doc("docs/good.md", "plain"),
                doc("docs/bad.md", "poison"),
                doc("docs/also_good.md", "fine too"),
            ],
            Arc::new(FlakyProvider),
            Arc::new(sink.clone()),
        );

        let report = pipeline.run().await.unwrap();
        assert_eq!(report.documents_processed, 2);
        assert_eq!(report.documents_failed, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("bad.md"));
        assert!(matches!(
            report.failures[0].error,
            DocumentError::Embed { .. }
        ));
        // Nothing from the failed document reached the sink.
        assert!(sink
            .snapshot()
            .iter()
            .all(|record| record.source != "docs/bad.md"));
    }

    #[tokio::test]
    async fn store_failure_is_recorded_per_document() {
        let pipeline = make_pipeline(
            vec![doc("docs/a.md", "abcdef")],
            Arc::new(MockEmbeddingProvider::new()),
            Arc::new(RejectingSink),
        );

        let report = pipeline.run().await.unwrap();
        assert_eq!(report.documents_processed, 0);
        assert_eq!(report.documents_failed, 1);
        assert!(matches!(
            report.failures[0].error,
            DocumentError::Store { .. }
        ));
    }

    #[tokio::test]
    async fn empty_documents_produce_no_records() {
        let sink = MemoryVectorSink::new();
        let pipeline = make_pipeline(
            vec![doc("docs/empty.md", "")],
            Arc::new(MockEmbeddingProvider::new()),
            Arc::new(sink.clone()),
        );

        let report = pipeline.run().await.unwrap();
        assert_eq!(report.documents_processed, 1);
        assert_eq!(report.chunks_embedded, 0);
        assert_eq!(report.chunks_skipped, 1);
        assert!(sink.is_empty());
    }
}
