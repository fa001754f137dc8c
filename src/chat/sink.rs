//! Render targets for the chat UI boundary.

use std::io::{self, Result as IoResult};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::formatter::FormattedMessage;

/// One render of the bot's message.
///
/// The UI overwrites its previous rendering with each incremental frame;
/// the terminal frame (`is_final`) commits the turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderFrame {
    pub message: FormattedMessage,
    pub is_final: bool,
}

impl RenderFrame {
    pub fn incremental(message: FormattedMessage) -> Self {
        Self {
            message,
            is_final: false,
        }
    }

    pub fn terminal(message: FormattedMessage) -> Self {
        Self {
            message,
            is_final: true,
        }
    }

    /// Display-ready markup for this frame.
    pub fn markup(&self) -> String {
        self.message.to_markup()
    }
}

/// Abstraction over an output target that consumes render frames.
pub trait RenderSink: Sync + Send {
    /// Handle one frame. The sink decides how to present it.
    fn render(&mut self, frame: &RenderFrame) -> IoResult<()>;
}

/// In-memory sink for testing and snapshots.
#[derive(Clone, Default)]
pub struct MemoryRenderSink {
    frames: Arc<Mutex<Vec<RenderFrame>>>,
}

impl MemoryRenderSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of all captured frames.
    pub fn snapshot(&self) -> Vec<RenderFrame> {
        self.frames.lock().clone()
    }

    /// Clear all captured frames.
    pub fn clear(&self) {
        self.frames.lock().clear()
    }

    /// Markup of the terminal frame, once the turn has committed.
    pub fn final_markup(&self) -> Option<String> {
        self.frames
            .lock()
            .iter()
            .find(|frame| frame.is_final)
            .map(RenderFrame::markup)
    }
}

impl RenderSink for MemoryRenderSink {
    fn render(&mut self, frame: &RenderFrame) -> IoResult<()> {
        self.frames.lock().push(frame.clone());
        Ok(())
    }
}

/// Channel-based sink for streaming frames to async consumers.
///
/// Frames are forwarded to a tokio mpsc channel without blocking. Useful
/// for web front ends that push the bot's message over SSE or websockets.
pub struct ChannelRenderSink {
    tx: mpsc::UnboundedSender<RenderFrame>,
}

impl ChannelRenderSink {
    /// Create a new channel sink.
    ///
    /// # Example
    /// ```no_run
    /// use tokio::sync::mpsc;
    /// use tabletalk::chat::ChannelRenderSink;
    ///
    /// let (tx, mut rx) = mpsc::unbounded_channel();
    /// let _sink = ChannelRenderSink::new(tx);
    ///
    /// // In another task, consume frames:
    /// tokio::spawn(async move {
    ///     while let Some(frame) = rx.recv().await {
    ///         println!("{}", frame.markup());
    ///     }
    /// });
    /// ```
    pub fn new(tx: mpsc::UnboundedSender<RenderFrame>) -> Self {
        Self { tx }
    }
}

impl RenderSink for ChannelRenderSink {
    fn render(&mut self, frame: &RenderFrame) -> IoResult<()> {
        self.tx
            .send(frame.clone())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "channel receiver dropped"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::formatter::format_message;

    #[test]
    fn memory_sink_records_frames_in_order() {
        let sink = MemoryRenderSink::new();
        let mut handle = sink.clone();
        handle
            .render(&RenderFrame::incremental(format_message("SEL")))
            .unwrap();
        handle
            .render(&RenderFrame::terminal(format_message("SELECT 1")))
            .unwrap();

        let frames = sink.snapshot();
        assert_eq!(frames.len(), 2);
        assert!(!frames[0].is_final);
        assert!(frames[1].is_final);
        assert_eq!(sink.final_markup().as_deref(), Some("SELECT 1"));
    }

    #[tokio::test]
    async fn channel_sink_forwards_frames() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = ChannelRenderSink::new(tx);
        sink.render(&RenderFrame::incremental(format_message("hi")))
            .unwrap();
        let frame = rx.recv().await.unwrap();
        assert!(!frame.is_final);
        assert_eq!(frame.markup(), "hi");
    }

    #[test]
    fn channel_sink_errors_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut sink = ChannelRenderSink::new(tx);
        let err = sink
            .render(&RenderFrame::terminal(format_message("x")))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
