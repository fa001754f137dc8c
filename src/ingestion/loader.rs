//! Document discovery and loading from the filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use glob::Pattern;
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::{ConfigError, IngestConfig};

/// Raw text of one reference document plus where it came from.
///
/// Produced by a [`DocumentSource`], consumed once by the chunker, not
/// retained afterwards.
#[derive(Clone, Debug)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

/// A single document failed to load.
///
/// Covers unreadable files and content that is not valid UTF-8. The
/// pipeline records the failure and moves on to the next document.
#[derive(Debug, Error)]
#[error("failed to read {path:?}: {source}")]
pub struct LoadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Enumerates and loads the documents of a reference corpus.
///
/// Enumeration failures are configuration problems and abort ingestion;
/// loading failures concern one document and are isolated by the caller.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Paths of all candidate documents, in a deterministic order.
    async fn list(&self) -> Result<Vec<PathBuf>, ConfigError>;

    /// Loads one candidate as UTF-8 text.
    async fn load(&self, path: &Path) -> Result<Document, LoadError>;
}

/// Filesystem source: walks `docs_dir` and keeps files whose path relative
/// to it matches `docs_glob`.
#[derive(Clone, Debug)]
pub struct DirectoryLoader {
    root: PathBuf,
    pattern: Pattern,
}

impl DirectoryLoader {
    /// Builds a loader, checking the glob and the directory eagerly so a bad
    /// configuration surfaces before any processing starts.
    pub fn new(config: &IngestConfig) -> Result<Self, ConfigError> {
        let pattern =
            Pattern::new(&config.docs_glob).map_err(|source| ConfigError::InvalidGlob {
                pattern: config.docs_glob.clone(),
                source,
            })?;
        let root = config.docs_dir.clone();
        std::fs::read_dir(&root).map_err(|source| ConfigError::DocsDirUnreadable {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root, pattern })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl DocumentSource for DirectoryLoader {
    async fn list(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| ConfigError::DocsDirUnreadable {
                path: self.root.clone(),
                source: source.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            // The glob is matched against the path relative to the root, so
            // "**/*.md" selects markdown files at any depth.
            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            if self.pattern.matches_path(relative) {
                paths.push(entry.path().to_path_buf());
            }
        }
        Ok(paths)
    }

    async fn load(&self, path: &Path) -> Result<Document, LoadError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Document {
            path: path.to_path_buf(),
            text,
        })
    }
}
