//! The document-to-lines pipeline.
//!
//! One pass: parse the document, decode its message list, apply an optional
//! [`MessageFilter`], and render the survivors with [`build_lines`].
//!
//! # Example
//!
//! ```rust
//! # fn main() -> chatflat::Result<()> {
//! use chatflat::core::filter::FilterParams;
//! use chatflat::pipeline::Pipeline;
//!
//! let document = r#"{
//!     "name": "Team chat",
//!     "messages": [
//!         {"type": "message", "date": "2025-06-24T10:00:00", "text": "First"},
//!         {"type": "service", "date": "2025-06-24T11:00:00", "action": "pin_message"},
//!         {"type": "message", "date": "2025-06-24T13:00:00", "text": "Third"}
//!     ]
//! }"#;
//!
//! let pipeline = Pipeline::new();
//! assert_eq!(pipeline.run(document, None)?, ["20250624 First", "20250624 Third"]);
//!
//! let filter = FilterParams::new().with_start_date("2025-07-01").build()?;
//! assert!(pipeline.run(document, filter.as_ref())?.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! Every call is independent; a `Pipeline` can be shared across threads.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::PipelineConfig;
use crate::core::filter::MessageFilter;
use crate::core::line::build_lines;
use crate::core::output::write_lines;
use crate::core::processor::ProcessingStats;
use crate::error::{ChatflatError, Result};
use crate::message::Message;

/// Converts export documents into rendered lines.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decodes the message list of `document`.
    ///
    /// A document without a message list (or whose message field is not an
    /// array) yields an empty list. `null` elements are skipped; malformed
    /// elements are skipped or rejected according to
    /// [`PipelineConfig::skip_invalid`].
    ///
    /// # Errors
    ///
    /// [`ChatflatError::InvalidDocument`] if `document` is not JSON, or if an
    /// element is malformed and skipping is disabled.
    pub fn parse_messages(&self, document: &str) -> Result<Vec<Message>> {
        let root: Value = serde_json::from_str(document)?;

        let items = match root {
            Value::Object(mut map) => match map.remove(&self.config.messages_field) {
                Some(Value::Array(items)) => items,
                Some(_) => {
                    debug!(field = %self.config.messages_field, "message field is not an array");
                    return Ok(Vec::new());
                }
                None => {
                    debug!(field = %self.config.messages_field, "document has no message field");
                    return Ok(Vec::new());
                }
            },
            _ => {
                debug!("document root is not an object");
                return Ok(Vec::new());
            }
        };

        let mut messages = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match Message::from_value(item) {
                Ok(Some(message)) => messages.push(message),
                Ok(None) => trace!(index, "skipping null message"),
                Err(err) if self.config.skip_invalid => {
                    warn!(index, error = %err, "skipping invalid message");
                }
                Err(err) => return Err(ChatflatError::invalid_document(err)),
            }
        }

        Ok(messages)
    }

    /// Transforms `document` into output lines, optionally filtered.
    ///
    /// # Errors
    ///
    /// See [`parse_messages`](Self::parse_messages).
    pub fn run(&self, document: &str, filter: Option<&MessageFilter>) -> Result<Vec<String>> {
        self.run_with_stats(document, filter).map(|(lines, _)| lines)
    }

    /// Like [`run`](Self::run), also returning message counts.
    pub fn run_with_stats(
        &self,
        document: &str,
        filter: Option<&MessageFilter>,
    ) -> Result<(Vec<String>, ProcessingStats)> {
        let messages = self.parse_messages(document)?;
        let total = messages.len();

        let (lines, retained) = match filter {
            Some(filter) => {
                let kept = filter.filter_all(&messages);
                let retained = kept.len();
                (build_lines(kept), retained)
            }
            None => (build_lines(&messages), total),
        };

        let stats = ProcessingStats::new(total, retained, lines.len());
        debug!(
            total = stats.total,
            retained = stats.retained,
            rendered = stats.rendered,
            "pipeline finished"
        );

        Ok((lines, stats))
    }

    /// Transforms `document` and writes the lines to `destination`,
    /// replacing its content. Returns the number of lines written.
    ///
    /// # Errors
    ///
    /// Parse errors as for [`run`](Self::run); [`ChatflatError::Io`] if the
    /// destination cannot be written.
    pub fn run_to_destination(
        &self,
        document: &str,
        destination: impl AsRef<Path>,
        filter: Option<&MessageFilter>,
    ) -> Result<usize> {
        let lines = self.run(document, filter)?;
        write_lines(&lines, destination.as_ref())?;
        debug!(lines = lines.len(), destination = %destination.as_ref().display(), "lines written");
        Ok(lines.len())
    }

    /// Reads the document at `path` and transforms it.
    ///
    /// # Errors
    ///
    /// [`ChatflatError::NotFound`] if `path` does not exist.
    pub fn run_file(&self, path: impl AsRef<Path>, filter: Option<&MessageFilter>) -> Result<Vec<String>> {
        let document = read_document(path.as_ref())?;
        self.run(&document, filter)
    }

    /// Reads the document at `input` and writes its lines to `output`.
    pub fn run_file_to_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        filter: Option<&MessageFilter>,
    ) -> Result<usize> {
        let document = read_document(input.as_ref())?;
        self.run_to_destination(&document, output, filter)
    }
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| ChatflatError::from_io_at(err, path))
}

/// Transforms `document` with a default [`Pipeline`].
pub fn run(document: &str, filter: Option<&MessageFilter>) -> Result<Vec<String>> {
    Pipeline::new().run(document, filter)
}

/// Transforms `document` with a default [`Pipeline`] and writes the lines to
/// `destination`.
pub fn run_to_destination(
    document: &str,
    destination: impl AsRef<Path>,
    filter: Option<&MessageFilter>,
) -> Result<usize> {
    Pipeline::new().run_to_destination(document, destination, filter)
}
