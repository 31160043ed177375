//! Core transformation logic for chatflat.
//!
//! This module contains, leaves first:
//! - [`date`] - Date codes for export timestamps
//! - [`entity`] - Rich-text entity rendering
//! - [`filter`] - Message filtering by date, keyword, type and predicate
//! - [`line`] - One output line per retained message
//! - [`processor`] - Processing statistics
//! - [`output`] - Line writers
//!
//! # Quick Start
//!
//! ```rust
//! use chatflat::core::{MessageFilter, build_lines};
//! use chatflat::message::Message;
//!
//! let messages = vec![
//!     Message::new().with_date("2025-06-24T10:00:00").with_text("Hello"),
//!     Message::new().with_date("2025-06-24T11:00:00").with_text("Bye"),
//! ];
//!
//! let filter = MessageFilter::new().with_keyword("hello");
//! let lines = build_lines(filter.filter_all(&messages));
//! assert_eq!(lines, ["20250624 Hello"]);
//! ```

pub mod date;
pub mod entity;
pub mod filter;
pub mod line;
pub mod output;
pub mod processor;

pub use date::{to_date_code, to_date_time_code};
pub use entity::{render_entity, render_text};
pub use filter::{FilterParams, MessageFilter, MessagePredicate};
pub use line::{build_line, build_lines};
pub use output::{to_text, write_lines};
pub use processor::ProcessingStats;

// Re-export Message from the crate root
pub use crate::Message;
