//! Conversation and message types shared by the client store and the
//! history endpoints.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ids::ConversationId;

/// Title given to conversations until one is derived from the first message.
pub const DEFAULT_TITLE: &str = "New chat";

/// Marker appended to a derived title that had to be truncated.
pub const TITLE_ELLIPSIS: &str = "...";

/// Default maximum number of characters kept from the first message.
pub const DEFAULT_TITLE_MAX_CHARS: usize = 30;

/// Author of a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Message typed by the user.
    User,
    /// Reply from the model.
    Assistant,
}

/// Payload kind of a message.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Plain text.
    #[default]
    Text,
    /// Image with an optional caption.
    Image,
}

/// Reference to displayable image data.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "value")]
pub enum MediaRef {
    /// Local preview handle (object URL, file path) before upload.
    Preview(String),
    /// Remote URL served by the backend.
    Url(String),
}

impl MediaRef {
    /// Borrow the underlying handle or URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Preview(value) | Self::Url(value) => value,
        }
    }
}

/// A single chat bubble.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message.
    pub role: Role,
    /// Text or image.
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    /// Text payload, or the caption of an image message.
    #[serde(alias = "content", default)]
    pub text: String,
    /// Image reference for image messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
    /// Reply tagged by the server for special presentation.
    #[serde(default)]
    pub easter_egg: bool,
    /// Timestamp in milliseconds since Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

impl Message {
    /// Build a user text message.
    #[must_use]
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            kind: MessageKind::Text,
            text: text.into(),
            media: None,
            easter_egg: false,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Build a user image message.
    #[must_use]
    pub fn user_image(media: MediaRef, caption: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            kind: MessageKind::Image,
            text: caption.into(),
            media: Some(media),
            easter_egg: false,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Build an assistant text message.
    #[must_use]
    pub fn assistant_text(text: impl Into<String>, easter_egg: bool) -> Self {
        Self {
            role: Role::Assistant,
            kind: MessageKind::Text,
            text: text.into(),
            media: None,
            easter_egg,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// True for a user image whose caption is still empty.
    #[must_use]
    pub fn is_uncaptioned_user_image(&self) -> bool {
        self.role == Role::User && self.kind == MessageKind::Image && self.text.is_empty()
    }
}

/// One chat thread.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier within the store.
    pub id: ConversationId,
    /// Display title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Messages in chronological order.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Creation timestamp in milliseconds since Unix epoch.
    #[serde(default)]
    pub created_at: i64,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Conversation {
    /// Create an empty conversation with a local id and the default title.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ConversationId::local(),
            title: default_title(),
            messages: Vec::new(),
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Whether the title is still the placeholder.
    #[must_use]
    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE
    }

    /// Most recent message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a title from message text, or `None` when the text is blank.
///
/// Counts characters, not bytes, so multi-byte text is never split.
#[must_use]
pub fn derive_title(text: &str, max_chars: usize) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().count() <= max_chars {
        return Some(trimmed.to_string());
    }
    let mut title: String = trimmed.chars().take(max_chars).collect();
    title.push_str(TITLE_ELLIPSIS);
    Some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title_short_text_is_verbatim() {
        assert_eq!(derive_title("Hi", 30).as_deref(), Some("Hi"));
        assert_eq!(derive_title("  Hi there  ", 30).as_deref(), Some("Hi there"));
    }

    #[test]
    fn test_derive_title_truncates_long_text() {
        let title = derive_title("Explain quicksort in detail please", 30);
        assert_eq!(title.as_deref(), Some("Explain quicksort in detail pl..."));
    }

    #[test]
    fn test_derive_title_exact_limit_not_truncated() {
        let text = "a".repeat(30);
        assert_eq!(derive_title(&text, 30), Some(text));
    }

    #[test]
    fn test_derive_title_counts_chars() {
        let title = derive_title("ééééé", 3);
        assert_eq!(title.as_deref(), Some("ééé..."));
    }

    #[test]
    fn test_derive_title_blank() {
        assert!(derive_title("   ", 30).is_none());
    }

    #[test]
    fn test_message_accepts_content_alias() {
        let json = r#"{"role":"assistant","type":"text","content":"Hello!"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.text, "Hello!");
        assert!(!msg.easter_egg);
        assert!(msg.media.is_none());
    }

    #[test]
    fn test_conversation_defaults_on_missing_fields() {
        let conv: Conversation = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(conv.title, DEFAULT_TITLE);
        assert!(conv.messages.is_empty());
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_value(Role::Assistant).unwrap(), "assistant");
        assert_eq!(serde_json::from_str::<Role>(r#""user""#).unwrap(), Role::User);
        assert!(serde_json::from_str::<Role>(r#""system""#).is_err());
    }
}
