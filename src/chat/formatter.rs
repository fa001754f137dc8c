//! Splitting a message into prose and code, escaped for display.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Complete fence pairs only. An unterminated trailing fence stays inside
/// the final text segment until its closing fence arrives.
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("fence pattern is valid"));

const CODE_OPEN: &str = "<pre style=\"white-space: pre-wrap; word-wrap: break-word;\"><code>";
const CODE_CLOSE: &str = "</code></pre>";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Text,
    Code,
}

/// One region of a message, already HTML-escaped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSegment {
    pub kind: SegmentKind,
    pub content: String,
}

impl MessageSegment {
    pub fn text(raw: &str) -> Self {
        Self {
            kind: SegmentKind::Text,
            content: escape_html(raw),
        }
    }

    pub fn code(raw: &str) -> Self {
        Self {
            kind: SegmentKind::Code,
            content: escape_html(raw),
        }
    }
}

/// A rendered message: its segments in document order.
///
/// Derived from a raw string by [`format_message`] and never mutated; a new
/// input produces a new value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedMessage {
    pub segments: Vec<MessageSegment>,
}

impl FormattedMessage {
    /// Concatenates the segments into one display-ready markup string.
    ///
    /// Text segments get their newlines replaced with `<br>`; code segments
    /// keep their newlines and are wrapped in a whitespace-preserving
    /// `<pre><code>` container.
    pub fn to_markup(&self) -> String {
        let mut markup = String::new();
        for segment in &self.segments {
            match segment.kind {
                SegmentKind::Text => markup.push_str(&segment.content.replace('\n', "<br>")),
                SegmentKind::Code => {
                    markup.push_str(CODE_OPEN);
                    markup.push_str(&segment.content);
                    markup.push_str(CODE_CLOSE);
                }
            }
        }
        markup
    }
}

/// Splits `text` on complete triple-backtick fences and escapes every
/// region.
///
/// Segments are emitted in document order. Text segments between adjacent
/// fences may be empty but are still emitted, and the trailing text segment
/// is always present, so the segment sequence alone reconstructs the
/// message layout. Pure: no side effects, same input always gives the same
/// value.
///
/// # Examples
///
/// ```
/// use tabletalk::chat::{format_message, SegmentKind};
///
/// let formatted = format_message("here:\n```SELECT 1```\ndone");
/// let kinds: Vec<_> = formatted.segments.iter().map(|s| s.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![SegmentKind::Text, SegmentKind::Code, SegmentKind::Text]
/// );
/// assert_eq!(
///     formatted.to_markup(),
///     "here:<br><pre style=\"white-space: pre-wrap; word-wrap: break-word;\">\
///      <code>SELECT 1</code></pre><br>done"
/// );
/// ```
pub fn format_message(text: &str) -> FormattedMessage {
    let mut segments = Vec::new();
    let mut last_end = 0;
    for found in FENCE.find_iter(text) {
        segments.push(MessageSegment::text(&text[last_end..found.start()]));
        let fenced = found.as_str();
        segments.push(MessageSegment::code(&fenced[3..fenced.len() - 3]));
        last_end = found.end();
    }
    segments.push(MessageSegment::text(&text[last_end..]));
    FormattedMessage { segments }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
