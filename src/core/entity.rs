//! Render Telegram text entities into a markdown-like notation.
//!
//! Each [`TextEntity`] is rendered on its own; a rich-text array is the
//! concatenation of its rendered parts.
//!
//! # Notation
//!
//! | Entity | Output |
//! |--------|--------|
//! | `bold` | `**text**` |
//! | `italic` | `*text*` |
//! | `strikethrough` | `~~text~~` |
//! | `code` | `` `text` `` |
//! | `pre` | fenced block, with language if present |
//! | `text_link` | `[text](href)` |
//! | `mention` | `@name` (never doubled) |
//! | `hashtag` / `cashtag` | `#text` / `$text` |
//! | `spoiler` | `\|\|text\|\|` |
//! | `underline` | `<u>text</u>` |
//! | `blockquote` | `> text` |
//! | `custom_emoji` | `[emoji_<document_id>]` |
//! | `bank_card` | `[CARD]` |
//! | everything else | text unchanged |
//!
//! # Examples
//!
//! ```
//! use chatflat::core::entity::{render_entity, render_text};
//! use chatflat::message::{TextEntity, TextField, TextPart};
//!
//! assert_eq!(render_entity(&TextEntity::new("bold", "important")), "**important**");
//!
//! let text = TextField::Rich(vec![
//!     TextPart::from("Hello "),
//!     TextEntity::new("italic", "World").into(),
//! ]);
//! assert_eq!(render_text(Some(&text)), "Hello *World*");
//! ```

use std::fmt;

use crate::message::{TextEntity, TextField, TextPart};

/// Replacement for card numbers; the digits are never emitted.
pub const CARD_PLACEHOLDER: &str = "[CARD]";

/// The entity vocabulary of Telegram exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Plain,
    Bold,
    Italic,
    Strikethrough,
    Code,
    Pre,
    Link,
    TextLink,
    Mention,
    MentionName,
    Hashtag,
    Cashtag,
    Email,
    Phone,
    BotCommand,
    Spoiler,
    Underline,
    Blockquote,
    CustomEmoji,
    BankCard,
    /// A tag outside the known vocabulary.
    Unknown,
}

impl EntityKind {
    /// Maps an export tag to its kind. Unrecognized tags map to [`EntityKind::Unknown`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "plain" => EntityKind::Plain,
            "bold" => EntityKind::Bold,
            "italic" => EntityKind::Italic,
            "strikethrough" => EntityKind::Strikethrough,
            "code" => EntityKind::Code,
            "pre" => EntityKind::Pre,
            "link" => EntityKind::Link,
            "text_link" => EntityKind::TextLink,
            "mention" => EntityKind::Mention,
            "mention_name" => EntityKind::MentionName,
            "hashtag" => EntityKind::Hashtag,
            "cashtag" => EntityKind::Cashtag,
            "email" => EntityKind::Email,
            "phone" => EntityKind::Phone,
            "bot_command" => EntityKind::BotCommand,
            "spoiler" => EntityKind::Spoiler,
            "underline" => EntityKind::Underline,
            "blockquote" => EntityKind::Blockquote,
            "custom_emoji" => EntityKind::CustomEmoji,
            "bank_card" => EntityKind::BankCard,
            _ => EntityKind::Unknown,
        }
    }

    /// The export tag for this kind (`"unknown"` for [`EntityKind::Unknown`]).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Plain => "plain",
            EntityKind::Bold => "bold",
            EntityKind::Italic => "italic",
            EntityKind::Strikethrough => "strikethrough",
            EntityKind::Code => "code",
            EntityKind::Pre => "pre",
            EntityKind::Link => "link",
            EntityKind::TextLink => "text_link",
            EntityKind::Mention => "mention",
            EntityKind::MentionName => "mention_name",
            EntityKind::Hashtag => "hashtag",
            EntityKind::Cashtag => "cashtag",
            EntityKind::Email => "email",
            EntityKind::Phone => "phone",
            EntityKind::BotCommand => "bot_command",
            EntityKind::Spoiler => "spoiler",
            EntityKind::Underline => "underline",
            EntityKind::Blockquote => "blockquote",
            EntityKind::CustomEmoji => "custom_emoji",
            EntityKind::BankCard => "bank_card",
            EntityKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&TextEntity> for EntityKind {
    fn from(entity: &TextEntity) -> Self {
        EntityKind::from_tag(entity.kind())
    }
}

/// Renders a single entity.
pub fn render_entity(entity: &TextEntity) -> String {
    let text = entity.text();

    match EntityKind::from(entity) {
        EntityKind::Bold => format!("**{text}**"),
        EntityKind::Italic => format!("*{text}*"),
        EntityKind::Strikethrough => format!("~~{text}~~"),
        EntityKind::Code => format!("`{text}`"),
        EntityKind::Pre => render_pre(text, entity.language.as_deref()),
        EntityKind::TextLink => {
            let href = entity.href.as_deref().unwrap_or("#");
            format!("[{text}]({href})")
        }
        EntityKind::Mention if text.starts_with('@') => text.to_string(),
        EntityKind::Mention => format!("@{text}"),
        EntityKind::Hashtag => format!("#{text}"),
        EntityKind::Cashtag => format!("${text}"),
        EntityKind::Spoiler => format!("||{text}||"),
        EntityKind::Underline => format!("<u>{text}</u>"),
        EntityKind::Blockquote => format!("> {text}"),
        EntityKind::CustomEmoji => {
            let id = entity.document_id.as_deref().unwrap_or("");
            format!("[emoji_{id}]")
        }
        EntityKind::BankCard => CARD_PLACEHOLDER.to_string(),
        EntityKind::Plain
        | EntityKind::Link
        | EntityKind::MentionName
        | EntityKind::Email
        | EntityKind::Phone
        | EntityKind::BotCommand
        | EntityKind::Unknown => text.to_string(),
    }
}

fn render_pre(text: &str, language: Option<&str>) -> String {
    let language = language.unwrap_or("");
    format!("```{language}\n{text}\n```")
}

/// Renders one element of a rich-text array.
pub fn render_part(part: &TextPart) -> String {
    match part {
        TextPart::Plain(text) => text.clone(),
        TextPart::Entity(entity) => render_entity(entity),
        TextPart::Other(_) => String::new(),
    }
}

/// Renders a message's `text` field. An absent field renders as `""`.
pub fn render_text(field: Option<&TextField>) -> String {
    match field {
        Some(TextField::Plain(text)) => text.clone(),
        Some(TextField::Rich(parts)) => parts.iter().map(render_part).collect(),
        Some(TextField::Other(_)) | None => String::new(),
    }
}
