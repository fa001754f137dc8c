//! # Tabletalk: Database Chat Assistant Core
//!
//! Tabletalk is the engine room of a chat-with-your-database assistant:
//! it ingests Markdown schema documentation into embedded chunks, and it
//! turns streamed model tokens into rendered chat messages with SQL
//! detection on the finalized text.
//!
//! ```text
//! docs/**/*.md ──► ingestion::DirectoryLoader ──► Document
//!                                   │
//!                                   ▼
//!                  ingestion::CharacterChunker ──► overlapping chunks
//!                                   │
//!                                   ▼
//!     embeddings::EmbeddingProvider ──► vectors ──► stores::VectorSink
//!
//! model tokens ──► chat::stream_turn ──► RenderFrame per token
//!                                   │
//!                                   ▼
//!            chat::decide_disposition ──► Execute(sql) | Display(text)
//! ```
//!
//! ## Quick Start
//!
//! ### Chunking a document
//!
//! ```
//! use tabletalk::ingestion::CharacterChunker;
//!
//! let chunker = CharacterChunker::new(8, 2)?;
//! let chunks = chunker.split("CREATE TABLE orders");
//!
//! // Every chunk starts with the last two characters of its predecessor.
//! assert_eq!(chunks[0], "CREATE T");
//! assert!(chunks[1].starts_with(" T"));
//! # Ok::<(), tabletalk::config::ConfigError>(())
//! ```
//!
//! ### Formatting a chat message
//!
//! ```
//! use tabletalk::chat::{SegmentKind, format_message};
//!
//! let message = format_message("Run this:\n```SELECT 1```");
//! assert_eq!(message.segments[1].kind, SegmentKind::Code);
//! assert!(message.to_markup().contains("<code>SELECT 1</code>"));
//! ```
//!
//! ### Holding a conversation
//!
//! ```
//! use tabletalk::chat::ChatSession;
//!
//! let mut session = ChatSession::new();
//! session.begin_turn("How many orders shipped today?")?;
//! session.complete_turn("SELECT COUNT(*) FROM orders WHERE shipped_at = CURRENT_DATE")?;
//! assert_eq!(session.messages().len(), 4);
//!
//! session.reset();
//! assert_eq!(session.messages().len(), 2);
//! # Ok::<(), tabletalk::chat::SessionError>(())
//! ```
//!
//! ## Module Guide
//!
//! - [`config`] - Ingestion settings with environment overrides
//! - [`ingestion`] - Document discovery, chunking, and the pipeline driver
//! - [`embeddings`] - Embedding providers, HTTP-backed and deterministic mock
//! - [`stores`] - Chunk records and vector sinks
//! - [`chat`] - Streaming turns, message formatting, and query detection

pub mod chat;
pub mod config;
pub mod embeddings;
pub mod ingestion;
pub mod stores;
