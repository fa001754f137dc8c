//! Driving one streamed turn from tokens to rendered frames.
//!
//! [`stream_turn`] is the glue between a token producer and a
//! [`RenderSink`]: every arriving token re-renders the partial message,
//! end of stream commits exactly one terminal frame. Rendering happens
//! between polls, so the producer is never more than one token ahead of
//! the display.
//!
//! Once the turn has committed, [`decide_disposition`] chooses how to
//! present the finalized text: the keyword heuristic first, the
//! completion-backed extractor only when the heuristic declines.

use futures_util::{Stream, StreamExt, pin_mut};
use thiserror::Error;

use super::classifier::is_query;
use super::extractor::{Extraction, QueryExtractor};
use super::formatter::format_message;
use super::sink::{RenderFrame, RenderSink};
use super::stream::{StreamProtocolError, TokenBuffer};

/// A streamed turn failed before its terminal render.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Protocol(#[from] StreamProtocolError),

    #[error("render sink failed: {0}")]
    Render(#[from] std::io::Error),
}

/// Consumes `tokens` in arrival order, rendering the partial message
/// after every token and once more at end of stream.
///
/// Returns the finalized text. The caller commits it to the session (or
/// aborts the turn on error); the sink has already seen the terminal
/// frame by then.
pub async fn stream_turn<S>(tokens: S, sink: &mut dyn RenderSink) -> Result<String, TurnError>
where
    S: Stream<Item = String>,
{
    let mut buffer = TokenBuffer::new();
    pin_mut!(tokens);
    while let Some(token) = tokens.next().await {
        let partial = buffer.push_token(token)?;
        sink.render(&RenderFrame::incremental(format_message(&partial)))?;
    }
    let final_text = buffer.end()?;
    sink.render(&RenderFrame::terminal(format_message(&final_text)))?;
    Ok(final_text)
}

/// How to present the bot's finalized text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// The text is a runnable query; offer it for execution.
    Execute(String),
    /// Ordinary prose; display as-is.
    Display(String),
}

impl Disposition {
    /// The text carried by either variant.
    pub fn text(&self) -> &str {
        match self {
            Disposition::Execute(text) | Disposition::Display(text) => text,
        }
    }
}

/// Decides whether `final_text` should be offered for execution.
///
/// The keyword scan settles clear cases without a network call. When it
/// declines, the extractor gets one chance to pull a bare query out of
/// the surrounding prose; an unavailable extraction falls back to
/// displaying the original text.
pub async fn decide_disposition(final_text: &str, extractor: &QueryExtractor) -> Disposition {
    if is_query(final_text) {
        return Disposition::Execute(final_text.to_string());
    }
    match extractor.extract(final_text).await {
        Extraction::Query(query) => Disposition::Execute(query),
        Extraction::Unavailable => Disposition::Display(final_text.to_string()),
    }
}
