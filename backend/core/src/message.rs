use serde::{Deserialize, Serialize};

/// An inbound chat message, reduced to what the dispatch pipeline needs.
///
/// `chat_id` doubles as the sender identity: the admin allow-list is keyed
/// by chat id, which equals the user id in private chats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub message_id: i32,
    /// `None` for non-text messages (photos, stickers, ...).
    pub text: Option<String>,
}

impl IncomingMessage {
    pub fn new(chat_id: i64, message_id: i32, text: impl Into<String>) -> Self {
        Self { chat_id, message_id, text: Some(text.into()) }
    }

    /// Message text, or `""` when the message carries none.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Formatting mode for an outbound text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextFormat {
    MarkdownV2,
    Html,
}

/// A reply keyboard: ordered rows of button labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
    pub resize: bool,
}

impl Keyboard {
    pub fn resized(rows: Vec<Vec<String>>) -> Self {
        Self { rows, resize: true }
    }
}

/// A text reply to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingReply {
    pub text: String,
    pub format: Option<TextFormat>,
    pub keyboard: Option<Keyboard>,
}

impl OutgoingReply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), format: None, keyboard: None }
    }

    pub fn markdown_v2(text: impl Into<String>) -> Self {
        Self { text: text.into(), format: Some(TextFormat::MarkdownV2), keyboard: None }
    }

    pub fn with_keyboard(mut self, keyboard: Option<Keyboard>) -> Self {
        self.keyboard = keyboard;
        self
    }
}

/// An in-memory file sent as photo or document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), bytes }
    }
}

/// Address of a message the bot has sent, used for later deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    pub chat_id: i64,
    pub message_id: i32,
}
