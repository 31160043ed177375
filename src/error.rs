//! Unified error types for chatflat.
//!
//! This module provides a single [`ChatflatError`] enum that covers every
//! failure the library can report. Transport layers (CLI, HTTP handlers) match
//! on the variant, or on the stable [`ChatflatError::code`], to decide between
//! "malformed upload" and "malformed filter parameter".
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Callers at the boundary** get messages that never contain filesystem paths
//! - **Developers** get source error chains for debugging

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A specialized [`Result`] type for chatflat operations.
///
/// # Example
///
/// ```rust
/// use chatflat::error::Result;
///
/// fn lines() -> Result<Vec<String>> {
///     Ok(vec![])
/// }
/// # assert!(lines().is_ok());
/// ```
pub type Result<T> = std::result::Result<T, ChatflatError>;

/// The error type for all chatflat operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatflatError {
    /// The input document does not exist at the expected location.
    ///
    /// The path is kept for logging but is deliberately absent from the
    /// `Display` output.
    #[error("Input document not found")]
    NotFound {
        /// Where the document was expected
        path: PathBuf,
    },

    /// The input is not a parseable export document.
    ///
    /// This occurs when:
    /// - The bytes are not valid JSON
    /// - A message element is malformed and skipping invalid messages is disabled
    #[error("Invalid export document: {source}")]
    InvalidDocument {
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A date-range filter bound is not a calendar date.
    ///
    /// Raised while building the filter, before any message is processed.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDateBound {
        /// The bound exactly as supplied
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// An I/O error occurred while reading or writing a document.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for ChatflatError {
    fn from(source: serde_json::Error) -> Self {
        ChatflatError::InvalidDocument { source }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatflatError {
    /// Creates a not-found error for the given location.
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        ChatflatError::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates an invalid document error.
    pub fn invalid_document(source: serde_json::Error) -> Self {
        ChatflatError::InvalidDocument { source }
    }

    /// Creates an invalid date bound error.
    pub fn invalid_date_bound(input: impl Into<String>) -> Self {
        ChatflatError::InvalidDateBound {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Maps an I/O error on `path` to [`ChatflatError::NotFound`] when the
    /// file is missing, and to [`ChatflatError::Io`] otherwise.
    pub fn from_io_at(err: io::Error, path: impl AsRef<Path>) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::not_found(path)
        } else {
            ChatflatError::Io(err)
        }
    }

    /// Stable machine-readable code for transport layers.
    pub fn code(&self) -> &'static str {
        match self {
            ChatflatError::NotFound { .. } => "NOT_FOUND",
            ChatflatError::InvalidDocument { .. } => "INVALID_DOCUMENT",
            ChatflatError::InvalidDateBound { .. } => "INVALID_DATE_BOUND",
            ChatflatError::Io(_) => "IO_ERROR",
        }
    }

    /// Returns `true` if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChatflatError::NotFound { .. })
    }

    /// Returns `true` if this is an invalid document error.
    pub fn is_invalid_document(&self) -> bool {
        matches!(self, ChatflatError::InvalidDocument { .. })
    }

    /// Returns `true` if this is a date bound error.
    pub fn is_invalid_date_bound(&self) -> bool {
        matches!(self, ChatflatError::InvalidDateBound { .. })
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatflatError::Io(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
