//! Token accumulation for one streamed bot turn.

use thiserror::Error;

/// Violations of the token stream protocol.
///
/// Both variants abort the current turn; the buffer is reset before the
/// next one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamProtocolError {
    #[error("token received after end of stream")]
    TokenAfterEnd,

    #[error("end of stream signalled twice")]
    DoubleEnd,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamState {
    #[default]
    Streaming,
    Ended,
}

/// Accumulates the tokens of one bot turn.
///
/// A buffer starts in [`StreamState::Streaming`]. Each pushed token is
/// appended in arrival order and the buffer's current concatenation comes
/// back for an incremental re-render. The end signal moves the buffer to
/// [`StreamState::Ended`] and yields the final content exactly once; any
/// token after that is rejected, never silently dropped.
///
/// # Examples
///
/// ```
/// use tabletalk::chat::TokenBuffer;
///
/// let mut buffer = TokenBuffer::new();
/// assert_eq!(buffer.push_token("SELECT").unwrap(), "SELECT");
/// assert_eq!(buffer.push_token(" 1").unwrap(), "SELECT 1");
/// assert_eq!(buffer.end().unwrap(), "SELECT 1");
/// assert!(buffer.is_ended());
/// assert!(buffer.push_token("more").is_err());
/// ```
#[derive(Debug, Default)]
pub struct TokenBuffer {
    tokens: Vec<String>,
    state: StreamState,
}

impl TokenBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one token and returns the current concatenation.
    pub fn push_token(&mut self, token: impl Into<String>) -> Result<String, StreamProtocolError> {
        if self.state == StreamState::Ended {
            return Err(StreamProtocolError::TokenAfterEnd);
        }
        self.tokens.push(token.into());
        Ok(self.contents())
    }

    /// Marks the stream finished and returns the final content.
    pub fn end(&mut self) -> Result<String, StreamProtocolError> {
        if self.state == StreamState::Ended {
            return Err(StreamProtocolError::DoubleEnd);
        }
        self.state = StreamState::Ended;
        Ok(self.contents())
    }

    /// Concatenation of everything received so far.
    pub fn contents(&self) -> String {
        self.tokens.concat()
    }

    pub fn is_ended(&self) -> bool {
        self.state == StreamState::Ended
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Discards all state for the next turn.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
