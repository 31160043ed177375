//! # Chatflat
//!
//! A Rust library for flattening Telegram Desktop chat exports into one dated
//! line per message.
//!
//! ## Overview
//!
//! A Telegram export (`result.json`) holds a `messages` array whose `text`
//! fields mix plain strings with rich-text entities. Chatflat turns every
//! content message into a single line:
//!
//! ```text
//! 20250624 Release **v1.2** is out, see [notes](https://example.com)
//! ```
//!
//! - the date becomes a compact `YYYYMMDD` code
//! - entities become lightweight markdown-like markup
//! - line breaks inside a message become spaces
//! - service messages (joins, pins) are dropped
//!
//! An optional filter narrows the messages by date range, keywords, type, or
//! custom predicates before rendering.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatflat::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let document = r#"{"messages": [
//!         {"type": "message", "date": "2025-06-24T10:00:00",
//!          "text": ["Deploy ", {"type": "bold", "text": "done"}]}
//!     ]}"#;
//!
//!     let lines = Pipeline::new().run(document, None)?;
//!     assert_eq!(lines, ["20250624 Deploy **done**"]);
//!
//!     let filter = FilterParams::new().with_keywords("release").build()?;
//!     assert!(Pipeline::new().run(document, filter.as_ref())?.is_empty());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`message`] — Export records: [`Message`], [`TextField`](message::TextField), [`TextEntity`](message::TextEntity)
//! - [`core`] — The transformation steps
//!   - [`core::date`] — Date codes
//!   - [`core::entity`] — Entity rendering
//!   - [`core::filter`] — [`MessageFilter`](core::filter::MessageFilter), [`FilterParams`](core::filter::FilterParams)
//!   - [`core::line`] — Output lines
//!   - [`core::output`] — Line writers
//! - [`pipeline`] — [`Pipeline`](pipeline::Pipeline): document in, lines out
//! - [`config`] — [`PipelineConfig`](config::PipelineConfig), [`StorageConfig`](config::StorageConfig)
//! - `storage` — Upload/export staging with TTL cleanup (`storage` feature)
//! - `cli` — Command-line arguments (`cli` feature)
//! - [`error`] — [`ChatflatError`], [`Result`]
//! - [`prelude`] — Convenient re-exports
//!
//! ## Logging
//!
//! The library emits [`tracing`] events and never installs a subscriber;
//! the `chatflat` binary does.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod message;
pub mod pipeline;
#[cfg(feature = "storage")]
pub mod storage;

// Re-export the main types at the crate root for convenience
pub use error::{ChatflatError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatflat::prelude::*;
/// ```
pub mod prelude {
    // Message model
    pub use crate::message::{Message, TextEntity, TextField, TextPart};

    // Error types
    pub use crate::error::{ChatflatError, Result};

    // Configuration
    pub use crate::config::PipelineConfig;

    // Transformation steps
    pub use crate::core::filter::{FilterParams, MessageFilter};
    pub use crate::core::line::{build_line, build_lines};
    pub use crate::core::processor::ProcessingStats;

    // Orchestration
    pub use crate::pipeline::Pipeline;

    #[cfg(feature = "storage")]
    pub use crate::config::StorageConfig;
    #[cfg(feature = "storage")]
    pub use crate::storage::{FileStorage, ProcessingResult, ProcessingStatus};
}
