//! Writing rendered lines.
//!
//! The output format is one line per message, each terminated by `\n`:
//!
//! - [`to_text`] - join lines into a single string (useful for HTTP responses)
//! - [`write_lines`] - write lines to a file, replacing prior content
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatflat::Result<()> {
//! use chatflat::core::output::{to_text, write_lines};
//!
//! let lines = vec!["20250624 First".to_string(), "20250624 Third".to_string()];
//!
//! assert_eq!(to_text(&lines), "20250624 First\n20250624 Third\n");
//! write_lines(&lines, "chatflat_output.txt")?;
//! # Ok(())
//! # }
//! ```

mod text_writer;

pub use text_writer::{to_text, write_lines, write_lines_to};
