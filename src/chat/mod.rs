//! Chat-side building blocks: streaming turns, message formatting, and
//! query detection.
//!
//! The module is organised around a per-turn [`TokenBuffer`] fed by
//! [`stream_turn`], which re-renders the partial message into a
//! [`RenderSink`] after every token. Finalized text goes through
//! [`decide_disposition`]: the keyword [`is_query`] scan first, the
//! completion-backed [`QueryExtractor`] as fallback. [`ChatSession`]
//! keeps the per-user history with its fixed greeting pair.

pub mod classifier;
pub mod extractor;
pub mod formatter;
pub mod session;
pub mod sink;
pub mod stream;
pub mod turn;

pub use classifier::{QUERY_KEYWORDS, is_query};
pub use extractor::{
    CompletionClient, CompletionError, Extraction, HttpCompletionClient, QueryExtractor,
};
pub use formatter::{FormattedMessage, MessageSegment, SegmentKind, format_message};
pub use session::{ChatMessage, ChatSession, SessionError};
pub use sink::{ChannelRenderSink, MemoryRenderSink, RenderFrame, RenderSink};
pub use stream::{StreamProtocolError, StreamState, TokenBuffer};
pub use turn::{Disposition, TurnError, decide_disposition, stream_turn};
