use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who produced a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// What a log entry shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
    Image { url: String },
    /// Shown in place of a reply when the bot could not answer
    Error { text: String },
}

/// A single entry of the chat log. Entries are never changed after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub sender: Sender,
    pub content: Content,
    /// Sequence number of the turn this entry belongs to
    pub seq: u64,
    pub at: DateTime<Utc>,
}

impl Message {
    fn new(sender: Sender, content: Content, seq: u64) -> Self {
        Self { sender, content, seq, at: Utc::now() }
    }

    pub fn user(text: impl Into<String>, seq: u64) -> Self {
        Self::new(Sender::User, Content::Text { text: text.into() }, seq)
    }

    pub fn bot(text: impl Into<String>, seq: u64) -> Self {
        Self::new(Sender::Bot, Content::Text { text: text.into() }, seq)
    }

    pub fn bot_image(url: impl Into<String>, seq: u64) -> Self {
        Self::new(Sender::Bot, Content::Image { url: url.into() }, seq)
    }

    pub fn bot_error(text: impl Into<String>, seq: u64) -> Self {
        Self::new(Sender::Bot, Content::Error { text: text.into() }, seq)
    }

    /// Text of the entry, if it is a text or error entry
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text { text } | Content::Error { text } => Some(text),
            Content::Image { .. } => None,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match &self.content {
            Content::Image { url } => Some(url),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.content, Content::Error { .. })
    }
}
