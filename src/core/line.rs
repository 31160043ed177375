//! Turning message records into output lines.
//!
//! Each retained message becomes exactly one line:
//!
//! ```text
//! <YYYYMMDD> <rendered text with CR and LF replaced by spaces>
//! ```
//!
//! A message is dropped when it is a service message, has no date, or renders
//! to blank text. A non-blank date that does not parse is kept and appears
//! verbatim in place of the date code.
//!
//! # Example
//!
//! ```
//! use chatflat::core::line::build_line;
//! use chatflat::message::Message;
//!
//! let msg = Message::new()
//!     .with_date("2025-06-24T10:00:00")
//!     .with_text("first\nsecond");
//!
//! assert_eq!(build_line(&msg).as_deref(), Some("20250624 first second"));
//! ```

use crate::core::date::to_date_code;
use crate::core::entity::render_text;
use crate::message::Message;

/// Builds the output line for one message, or `None` if it is dropped.
pub fn build_line(message: &Message) -> Option<String> {
    if message.is_service() {
        return None;
    }

    let date_code = to_date_code(message.date_str());
    if date_code.is_empty() {
        return None;
    }

    let text = render_text(message.text.as_ref());
    if text.trim().is_empty() {
        return None;
    }

    Some(format!("{date_code} {}", flatten_newlines(&text)))
}

/// Replaces every `\r` and every `\n` with a single space.
///
/// A `\r\n` pair becomes two spaces.
pub fn flatten_newlines(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Builds lines for all messages, skipping dropped ones and keeping order.
pub fn build_lines<'a, I>(messages: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Message>,
{
    messages.into_iter().filter_map(build_line).collect()
}
