//! Ingestion settings with eager validation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing or validating ingestion settings.
///
/// Every variant is fatal and surfaces before any document is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})")]
    OverlapNotSmallerThanChunkSize {
        chunk_size: usize,
        chunk_overlap: usize,
    },

    #[error("chunk_size must be greater than zero")]
    ZeroChunkSize,

    #[error("docs dir {path:?} is not readable: {source}")]
    DocsDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid docs glob {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("{name} must be an unsigned integer, got {value:?}")]
    InvalidEnvVar { name: &'static str, value: String },
}

/// Settings for the ingestion pipeline.
///
/// Build with [`IngestConfig::default`] plus `with_*` overrides, or from
/// `TABLETALK_*` environment variables via [`IngestConfig::from_env`]. The
/// pipeline validates settings before touching any document; an overlap that
/// is not smaller than the chunk size never reaches the chunker.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Maximum characters per chunk.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
    /// Directory scanned for reference documents.
    pub docs_dir: PathBuf,
    /// Pattern selecting documents under `docs_dir`, relative to it.
    pub docs_glob: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            chunk_overlap: Self::DEFAULT_CHUNK_OVERLAP,
            docs_dir: PathBuf::from(Self::DEFAULT_DOCS_DIR),
            docs_glob: Self::DEFAULT_DOCS_GLOB.to_string(),
        }
    }
}

impl IngestConfig {
    pub const DEFAULT_CHUNK_SIZE: usize = 1000;
    pub const DEFAULT_CHUNK_OVERLAP: usize = 0;
    pub const DEFAULT_DOCS_DIR: &str = "docs/";
    pub const DEFAULT_DOCS_GLOB: &str = "**/*.md";

    /// Builds settings from the defaults plus `TABLETALK_*` overrides.
    ///
    /// Loads `.env` if present first. Recognized variables:
    /// `TABLETALK_CHUNK_SIZE`, `TABLETALK_CHUNK_OVERLAP`,
    /// `TABLETALK_DOCS_DIR`, `TABLETALK_DOCS_GLOB`. Malformed numeric
    /// values are rejected rather than silently replaced.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        if let Some(value) = env_var("TABLETALK_CHUNK_SIZE") {
            config.chunk_size = parse_usize("TABLETALK_CHUNK_SIZE", &value)?;
        }
        if let Some(value) = env_var("TABLETALK_CHUNK_OVERLAP") {
            config.chunk_overlap = parse_usize("TABLETALK_CHUNK_OVERLAP", &value)?;
        }
        if let Some(value) = env_var("TABLETALK_DOCS_DIR") {
            config.docs_dir = PathBuf::from(value);
        }
        if let Some(value) = env_var("TABLETALK_DOCS_GLOB") {
            config.docs_glob = value;
        }
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn with_chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    #[must_use]
    pub fn with_docs_dir(mut self, docs_dir: impl Into<PathBuf>) -> Self {
        self.docs_dir = docs_dir.into();
        self
    }

    #[must_use]
    pub fn with_docs_glob(mut self, docs_glob: impl Into<String>) -> Self {
        self.docs_glob = docs_glob.into();
        self
    }

    /// Checks the numeric invariants: `chunk_size > 0` and
    /// `chunk_overlap < chunk_size`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::OverlapNotSmallerThanChunkSize {
                chunk_size: self.chunk_size,
                chunk_overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }
}

fn env_var(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_usize(name: &'static str, value: &str) -> Result<usize, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnvVar {
        name,
        value: value.to_string(),
    })
}
