//! Fixed-size overlapping character chunking.

use crate::config::{ConfigError, IngestConfig};

/// Splits document text into fixed-size chunks with a fixed overlap.
///
/// Sizes are counted in characters (Unicode scalar values), never bytes, and
/// every slice lands on a `char` boundary. For a text of `n` characters with
/// chunk size `S` and overlap `O`:
///
/// * every chunk except possibly the last is exactly `S` characters long,
/// * consecutive chunks share an `O`-character boundary (suffix of one,
///   prefix of the next),
/// * dropping the first `O` characters of every chunk after the first and
///   concatenating reproduces the input exactly.
///
/// Splitting is a pure function of the input and the two settings, so a
/// given document always produces the same chunk sequence.
///
/// # Examples
///
/// ```
/// use tabletalk::ingestion::CharacterChunker;
///
/// let chunker = CharacterChunker::new(8, 2).unwrap();
/// let chunks = chunker.split("abcdefghijkl");
/// assert_eq!(chunks, vec!["abcdefgh", "ghijkl"]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct CharacterChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl CharacterChunker {
    /// Creates a chunker, rejecting invalid settings before any text is
    /// split.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroChunkSize`] when `chunk_size` is zero and
    /// [`ConfigError::OverlapNotSmallerThanChunkSize`] when the overlap does
    /// not leave room for new content in each step.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if chunk_overlap >= chunk_size {
            return Err(ConfigError::OverlapNotSmallerThanChunkSize {
                chunk_size,
                chunk_overlap,
            });
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Creates a chunker from ingestion settings.
    pub fn from_config(config: &IngestConfig) -> Result<Self, ConfigError> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Splits `text` into the ordered chunk sequence.
    ///
    /// Text no longer than the chunk size yields a single chunk equal to the
    /// whole text; the empty string yields one empty chunk, which the
    /// pipeline filters out before embedding.
    pub fn split(&self, text: &str) -> Vec<String> {
        // Byte offset of each character start, plus the end of the text, so
        // every slice below stays on a char boundary.
        let mut bounds: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
        bounds.push(text.len());
        let char_count = bounds.len() - 1;

        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(char_count);
            chunks.push(text[bounds[start]..bounds[end]].to_string());
            // A chunk that reaches the end closes the sequence, so no chunk
            // is ever wholly contained in its predecessor.
            if end == char_count {
                break;
            }
            start += step;
        }
        chunks
    }
}
