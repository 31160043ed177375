//! Filter message records by date range, keywords, type and custom predicates.
//!
//! This module provides [`MessageFilter`] for defining filter criteria,
//! [`filter_all`](MessageFilter::filter_all) for filtering message slices, and
//! [`FilterParams`] for building a filter from loosely-typed request or
//! command-line parameters.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Date from | [`with_date_from`](MessageFilter::with_date_from) | Messages on or after date |
//! | Date to | [`with_date_to`](MessageFilter::with_date_to) | Messages on or before date |
//! | Keyword | [`with_keyword`](MessageFilter::with_keyword) | Rendered text contains any keyword |
//! | Exclude keyword | [`with_exclude_keyword`](MessageFilter::with_exclude_keyword) | Rendered text contains none |
//! | Type | [`with_include_type`](MessageFilter::with_include_type) / [`with_exclude_type`](MessageFilter::with_exclude_type) | Message `type` tag |
//! | Predicate | [`with_predicate`](MessageFilter::with_predicate) | Any `Fn(&Message) -> bool` |
//!
//! # Examples
//!
//! ## Filter by Keyword
//!
//! ```
//! use chatflat::core::filter::MessageFilter;
//! use chatflat::message::Message;
//!
//! let messages = vec![
//!     Message::new().with_date("2025-06-24T10:00:00").with_text("Hello world"),
//!     Message::new().with_date("2025-06-24T11:00:00").with_text("Goodbye world"),
//! ];
//!
//! // Case-insensitive substring match on the rendered text
//! let filter = MessageFilter::new().with_keyword("HELLO");
//! let kept = filter.filter_all(&messages);
//!
//! assert_eq!(kept.len(), 1);
//! ```
//!
//! ## Filter by Date Range
//!
//! ```
//! use chatflat::core::filter::MessageFilter;
//! use chatflat::message::Message;
//!
//! # fn main() -> chatflat::Result<()> {
//! let messages = vec![
//!     Message::new().with_date("2025-06-20T10:00:00").with_text("June 20"),
//!     Message::new().with_date("2025-06-24T11:00:00").with_text("June 24"),
//!     Message::new().with_date("2025-06-28T12:00:00").with_text("June 28"),
//! ];
//!
//! let filter = MessageFilter::new()
//!     .with_date_from("2025-06-22")?
//!     .with_date_to("2025-06-26")?;
//!
//! let kept = filter.filter_all(&messages);
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0].date_str(), "2025-06-24T11:00:00");
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Predicates
//!
//! ```
//! use chatflat::core::filter::MessageFilter;
//! use chatflat::message::Message;
//!
//! let from_alice = MessageFilter::new()
//!     .with_predicate(|msg: &Message| msg.field("from").and_then(|v| v.as_str()) == Some("Alice"));
//!
//! assert!(from_alice.matches(&Message::new().with_field("from", "Alice")));
//! assert!(!from_alice.matches(&Message::new().with_field("from", "Bob")));
//! ```
//!
//! # Behavior Notes
//!
//! - Messages with an unparseable date are **excluded** when date filters are active
//! - Bounds are inclusive calendar dates; the time of day is ignored
//! - Keywords are matched against the rendered text (`**bold**` markers included)
//! - An excluded type wins over an included one
//! - All clauses are combined with AND logic

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::date;
use crate::core::entity::render_text;
use crate::error::ChatflatError;
use crate::message::Message;

/// Format accepted for date bounds.
const BOUND_FORMAT: &str = "%Y-%m-%d";

/// A caller-supplied filter clause over raw message records.
pub type MessagePredicate = Arc<dyn Fn(&Message) -> bool + Send + Sync>;

/// Configuration for filtering message records.
///
/// Every clause is optional and clauses are combined with AND logic: a message
/// must match all active clauses to be retained. An empty filter retains
/// everything.
///
/// # Examples
///
/// ```
/// use chatflat::core::filter::MessageFilter;
///
/// # fn main() -> chatflat::Result<()> {
/// let filter = MessageFilter::new()
///     .with_date_from("2025-01-01")?
///     .with_keyword("release")
///     .with_exclude_keyword("draft")
///     .with_exclude_type("service");
///
/// assert!(filter.is_active());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MessageFilter {
    /// Include only messages on or after this date.
    pub start_date: Option<NaiveDate>,

    /// Include only messages on or before this date.
    pub end_date: Option<NaiveDate>,

    keywords: Vec<String>,
    exclude_keywords: Vec<String>,
    include_types: Vec<String>,
    exclude_types: Vec<String>,
    predicates: Vec<MessagePredicate>,
}

impl MessageFilter {
    /// Creates a new empty filter.
    ///
    /// No clauses are active by default; all messages pass through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date bound (inclusive) from a `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns [`ChatflatError::InvalidDateBound`] if the format is invalid.
    pub fn with_date_from(self, date_str: &str) -> Result<Self, ChatflatError> {
        Ok(self.with_start_date(parse_bound(date_str)?))
    }

    /// Sets the end date bound (inclusive) from a `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns [`ChatflatError::InvalidDateBound`] if the format is invalid.
    pub fn with_date_to(self, date_str: &str) -> Result<Self, ChatflatError> {
        Ok(self.with_end_date(parse_bound(date_str)?))
    }

    /// Sets the start date bound directly.
    #[must_use]
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the end date bound directly.
    #[must_use]
    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Adds a keyword; a message must contain at least one of them.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.keywords.push(keyword.as_ref().to_lowercase());
        self
    }

    /// Adds an excluded keyword; a message must contain none of them.
    #[must_use]
    pub fn with_exclude_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.exclude_keywords.push(keyword.as_ref().to_lowercase());
        self
    }

    /// Adds a message type to the allow-list.
    #[must_use]
    pub fn with_include_type(mut self, kind: impl Into<String>) -> Self {
        self.include_types.push(kind.into());
        self
    }

    /// Adds a message type to the deny-list.
    #[must_use]
    pub fn with_exclude_type(mut self, kind: impl Into<String>) -> Self {
        self.exclude_types.push(kind.into());
        self
    }

    /// Adds a custom clause. Predicates run in insertion order and all of
    /// them must return `true`.
    #[must_use]
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Message) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Lower-cased allow-list keywords.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Lower-cased deny-list keywords.
    pub fn exclude_keywords(&self) -> &[String] {
        &self.exclude_keywords
    }

    /// Returns `true` if any clause is active.
    pub fn is_active(&self) -> bool {
        self.has_date_filter()
            || self.has_keyword_filter()
            || self.has_type_filter()
            || !self.predicates.is_empty()
    }

    /// Returns `true` if a date bound is set.
    pub fn has_date_filter(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Returns `true` if either keyword list is non-empty.
    pub fn has_keyword_filter(&self) -> bool {
        !self.keywords.is_empty() || !self.exclude_keywords.is_empty()
    }

    /// Returns `true` if either type list is non-empty.
    pub fn has_type_filter(&self) -> bool {
        !self.include_types.is_empty() || !self.exclude_types.is_empty()
    }

    /// Checks a single message against every active clause.
    pub fn matches(&self, message: &Message) -> bool {
        if self.has_type_filter() {
            let kind = message.kind();
            if !self.include_types.is_empty() && !self.include_types.iter().any(|t| t == kind) {
                return false;
            }
            if self.exclude_types.iter().any(|t| t == kind) {
                return false;
            }
        }

        if self.has_date_filter() {
            let Some(msg_date) = date::to_date(message.date_str()) else {
                return false;
            };
            if self.start_date.is_some_and(|start| msg_date < start) {
                return false;
            }
            if self.end_date.is_some_and(|end| msg_date > end) {
                return false;
            }
        }

        if self.has_keyword_filter() {
            let text = render_text(message.text.as_ref()).to_lowercase();
            if !self.keywords.is_empty() && !self.keywords.iter().any(|k| text.contains(k.as_str())) {
                return false;
            }
            if self.exclude_keywords.iter().any(|k| text.contains(k.as_str())) {
                return false;
            }
        }

        self.predicates.iter().all(|predicate| predicate(message))
    }

    /// Returns the messages that match, in their original order.
    pub fn filter_all<'a>(&self, messages: &'a [Message]) -> Vec<&'a Message> {
        messages.iter().filter(|msg| self.matches(msg)).collect()
    }
}

impl fmt::Debug for MessageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageFilter")
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .field("keywords", &self.keywords)
            .field("exclude_keywords", &self.exclude_keywords)
            .field("include_types", &self.include_types)
            .field("exclude_types", &self.exclude_types)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// Parse a `YYYY-MM-DD` bound.
fn parse_bound(date_str: &str) -> Result<NaiveDate, ChatflatError> {
    NaiveDate::parse_from_str(date_str.trim(), BOUND_FORMAT)
        .map_err(|_| ChatflatError::invalid_date_bound(date_str))
}

/// Loosely-typed filter parameters, as received from a form, a query string
/// or the command line.
///
/// Keyword fields are comma-separated lists; whitespace around each keyword is
/// trimmed and empty tokens are dropped.
///
/// ```
/// use chatflat::core::filter::FilterParams;
///
/// # fn main() -> chatflat::Result<()> {
/// let params = FilterParams::new()
///     .with_start_date("2025-06-01")
///     .with_keywords(" release , deploy ,,");
///
/// let filter = params.build()?.expect("filter has clauses");
/// assert_eq!(filter.keywords(), ["release", "deploy"]);
///
/// // Nothing set means no filter at all
/// assert!(FilterParams::new().build()?.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Start date, `YYYY-MM-DD`, inclusive.
    pub start_date: Option<String>,
    /// End date, `YYYY-MM-DD`, inclusive.
    pub end_date: Option<String>,
    /// Comma-separated keywords to include.
    pub keywords: Option<String>,
    /// Comma-separated keywords to exclude.
    pub exclude_keywords: Option<String>,
}

impl FilterParams {
    /// Creates empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date string.
    #[must_use]
    pub fn with_start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    /// Sets the end date string.
    #[must_use]
    pub fn with_end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    /// Sets the comma-separated include keywords.
    #[must_use]
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Sets the comma-separated exclude keywords.
    #[must_use]
    pub fn with_exclude_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.exclude_keywords = Some(keywords.into());
        self
    }

    /// Returns `true` if at least one parameter is present and non-blank.
    pub fn is_present(&self) -> bool {
        [
            &self.start_date,
            &self.end_date,
            &self.keywords,
            &self.exclude_keywords,
        ]
        .into_iter()
        .any(|value| present(value.as_deref()).is_some())
    }

    /// Builds the filter.
    ///
    /// Returns `Ok(None)` when every parameter is absent or blank, meaning
    /// "do not filter".
    ///
    /// # Errors
    ///
    /// Returns [`ChatflatError::InvalidDateBound`] for a malformed date, before
    /// any message is looked at.
    pub fn build(&self) -> Result<Option<MessageFilter>, ChatflatError> {
        if !self.is_present() {
            return Ok(None);
        }

        let mut filter = MessageFilter::new();

        if let Some(start) = present(self.start_date.as_deref()) {
            filter = filter.with_date_from(start)?;
        }
        if let Some(end) = present(self.end_date.as_deref()) {
            filter = filter.with_date_to(end)?;
        }
        for keyword in split_keywords(self.keywords.as_deref()) {
            filter = filter.with_keyword(keyword);
        }
        for keyword in split_keywords(self.exclude_keywords.as_deref()) {
            filter = filter.with_exclude_keyword(keyword);
        }

        Ok(Some(filter))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Splits a comma-separated keyword list, trimming and dropping empty tokens.
pub fn split_keywords(list: Option<&str>) -> impl Iterator<Item = &str> {
    list.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
}
