//! Command-line corpus ingester.
//!
//! Walks the configured documentation directory, chunks every matching
//! Markdown file, embeds the chunks, and prints a run summary. With
//! `TABLETALK_API_KEY` unset the run uses the deterministic mock
//! provider, which makes a dry run over a corpus free.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tabletalk::config::{ConfigError, IngestConfig};
use tabletalk::embeddings::{EmbeddingProvider, HttpEmbeddingProvider, MockEmbeddingProvider};
use tabletalk::ingestion::IngestionPipeline;
use tabletalk::stores::MemoryVectorSink;

#[tokio::main]
async fn main() -> Result<(), ConfigError> {
    init_tracing();

    let config = IngestConfig::from_env()?;
    println!(
        "Ingesting {} (pattern {}, chunk size {}, overlap {})",
        config.docs_dir.display(),
        config.docs_glob,
        config.chunk_size,
        config.chunk_overlap
    );

    let provider = embedding_provider();
    let sink = MemoryVectorSink::new();
    let pipeline = IngestionPipeline::from_config(&config, provider, Arc::new(sink.clone()))?;

    let report = pipeline.run().await?;

    println!("\n✅ Ingestion complete!");
    println!("  documents processed : {}", report.documents_processed);
    println!("  documents failed    : {}", report.documents_failed);
    println!("  chunks embedded     : {}", report.chunks_embedded);
    println!("  chunks skipped      : {}", report.chunks_skipped);
    println!("  records held        : {}", sink.len());
    println!("  duration            : {}", format_duration(report.duration));

    for failure in &report.failures {
        println!(
            "  ⚠ {} at {}: {}",
            failure.path.display(),
            failure.when.format("%H:%M:%S"),
            failure.error
        );
    }

    Ok(())
}

/// Real HTTP embeddings when an API key is configured, the deterministic
/// mock otherwise.
fn embedding_provider() -> Arc<dyn EmbeddingProvider> {
    match env::var("TABLETALK_API_KEY") {
        Ok(key) if !key.is_empty() => {
            let mut provider = HttpEmbeddingProvider::new(key);
            if let Ok(endpoint) = env::var("TABLETALK_EMBEDDINGS_URL") {
                provider = provider.with_endpoint(endpoint);
            }
            Arc::new(provider)
        }
        _ => {
            println!("TABLETALK_API_KEY not set, embedding with the deterministic mock");
            Arc::new(MockEmbeddingProvider::new())
        }
    }
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tabletalk=info"));
        let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    format!("{}m {}.{:03}s", secs / 60, secs % 60, millis)
}
