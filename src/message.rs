//! Message records as they appear in a Telegram Desktop JSON export.
//!
//! This module provides [`Message`], one element of the export's `messages`
//! array, together with the polymorphic [`TextField`] and the inline
//! [`TextEntity`] spans it may contain.
//!
//! # Overview
//!
//! A message consists of:
//! - **Interpreted**: `type`, `date`, `text`
//! - **Opaque**: `id` and every other field (sender, media markers, reply and
//!   forward metadata), kept verbatim in [`Message::extra`]
//!
//! The `text` field is either a plain string or an array mixing plain strings
//! with entity objects:
//!
//! ```
//! use chatflat::message::{Message, TextField, TextPart};
//!
//! let msg: Message = serde_json::from_str(r#"{
//!     "id": 7,
//!     "type": "message",
//!     "date": "2025-06-24T15:29:46",
//!     "from": "Alice",
//!     "text": ["Hello ", {"type": "bold", "text": "World"}]
//! }"#)?;
//!
//! assert_eq!(msg.kind(), "message");
//! assert_eq!(msg.field("from").and_then(|v| v.as_str()), Some("Alice"));
//! assert!(matches!(msg.text, Some(TextField::Rich(ref parts)) if parts.len() == 2));
//! # Ok::<(), serde_json::Error>(())
//! ```
//!
//! ## Lenient scalars
//!
//! Exports in the wild carry the occasional number where a string is expected
//! (`"document_id": 5368324170671202286`). String-valued fields accept numbers
//! and booleans and keep their textual form; any other JSON shape is treated as
//! absent.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

/// Message type assumed when the `type` field is missing.
pub const DEFAULT_KIND: &str = "message";

/// Message type of system notices (joins, pins, title changes).
pub const SERVICE_KIND: &str = "service";

/// One record of an export's `messages` array.
///
/// # Construction
///
/// ```
/// use chatflat::message::Message;
///
/// let msg = Message::new()
///     .with_date("2025-06-24T10:00:00")
///     .with_text("First")
///     .with_field("from", "Alice");
///
/// assert_eq!(msg.kind(), "message");
/// assert_eq!(msg.date_str(), "2025-06-24T10:00:00");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Opaque message identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Raw `type` tag; see [`Message::kind`] for the defaulted value.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,

    /// Local date-time, expected as `YYYY-MM-DDTHH:MM:SS`.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,

    /// Message body: plain string or rich-text array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextField>,

    /// Every other field of the record, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// Creates an empty message record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one element of the `messages` array.
    ///
    /// Returns `Ok(None)` for a JSON `null` element.
    pub fn from_value(value: Value) -> Result<Option<Self>, serde_json::Error> {
        if value.is_null() {
            return Ok(None);
        }
        serde_json::from_value(value).map(Some)
    }

    /// Builder-style method to set the `type` tag.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Builder-style method to set the date string.
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Builder-style method to set the text field.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<TextField>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder-style method to set the opaque identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder-style method to set an uninterpreted field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// The message type, `"message"` when the record has none.
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(DEFAULT_KIND)
    }

    /// Returns `true` for system notices.
    pub fn is_service(&self) -> bool {
        self.kind() == SERVICE_KIND
    }

    /// The raw date string, empty when absent.
    pub fn date_str(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }

    /// Looks up an uninterpreted field such as `from` or `media_type`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// The polymorphic `text` field of a message.
///
/// Decoding goes by JSON shape: string, array, anything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TextField {
    /// `"text": "Hello"`
    Plain(String),
    /// `"text": ["Hello ", {"type": "bold", "text": "World"}]`
    Rich(Vec<TextPart>),
    /// Any other JSON shape; renders as empty text.
    Other(Value),
}

impl<'de> Deserialize<'de> for TextField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(TextField::Plain(text)),
            Value::Array(items) => items
                .into_iter()
                .map(TextPart::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(TextField::Rich)
                .map_err(de::Error::custom),
            other => Ok(TextField::Other(other)),
        }
    }
}

impl From<&str> for TextField {
    fn from(text: &str) -> Self {
        TextField::Plain(text.to_string())
    }
}

impl From<String> for TextField {
    fn from(text: String) -> Self {
        TextField::Plain(text)
    }
}

impl From<Vec<TextPart>> for TextField {
    fn from(parts: Vec<TextPart>) -> Self {
        TextField::Rich(parts)
    }
}

/// One element of a rich-text array.
///
/// Decoding goes by JSON shape: string, object, anything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TextPart {
    /// A bare string, rendered as plain text.
    Plain(String),
    /// A formatting span.
    Entity(TextEntity),
    /// Numbers, nulls, nested arrays; render as empty text.
    Other(Value),
}

impl TextPart {
    fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::String(text) => Ok(TextPart::Plain(text)),
            Value::Object(_) => serde_json::from_value(value).map(TextPart::Entity),
            other => Ok(TextPart::Other(other)),
        }
    }
}

impl<'de> Deserialize<'de> for TextPart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        TextPart::from_json(Value::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}

impl From<&str> for TextPart {
    fn from(text: &str) -> Self {
        TextPart::Plain(text.to_string())
    }
}

impl From<TextEntity> for TextPart {
    fn from(entity: TextEntity) -> Self {
        TextPart::Entity(entity)
    }
}

/// One inline formatting span.
///
/// Entities never nest: rendering depends on this span's fields only.
///
/// ```
/// use chatflat::message::TextEntity;
///
/// let link = TextEntity::new("text_link", "docs").with_href("https://example.com");
/// assert_eq!(link.kind(), "text_link");
/// assert_eq!(link.text(), "docs");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextEntity {
    /// Raw `type` tag; `None` means plain.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,

    /// Literal span content.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,

    /// Code block language, meaningful for `pre` only.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub language: Option<String>,

    /// Link target, meaningful for `text_link` only.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub href: Option<String>,

    /// Custom emoji sticker id, meaningful for `custom_emoji` only.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub document_id: Option<String>,
}

impl TextEntity {
    /// Creates a span with the given tag and content.
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Sets the code block language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the link target.
    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Sets the custom emoji id.
    #[must_use]
    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    /// The tag, `"plain"` when the span has none.
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("plain")
    }

    /// The span content, empty when absent.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Accepts strings, numbers and booleans; everything else becomes `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }))
}
