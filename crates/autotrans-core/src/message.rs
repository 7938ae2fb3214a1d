//! Chat message model as seen by the translation engine.

use serde::{Deserialize, Serialize};

/// Embed type whose description carries the text of a moderated message.
pub const AUTO_MODERATION_EMBED: &str = "auto_moderation_message";

/// A chat message record held by the client's message store.
///
/// Only the fields the engine needs to find translatable text are modeled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub content: String,
    /// Forwarded messages carry the original text in a snapshot.
    #[serde(default)]
    pub message_snapshots: Vec<MessageSnapshot>,
    #[serde(default)]
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embed {
    #[serde(rename = "type")]
    pub kind: String,
    pub raw_description: Option<String>,
}

impl ChatMessage {
    pub fn new(
        id: impl Into<String>,
        channel_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Returns the text that should be sent to the translation provider.
    ///
    /// Falls back from the message body to the first forwarded snapshot and
    /// then to an auto-moderation embed description. `None` means the message
    /// has nothing to translate (media only, removed, plain embeds).
    pub fn translatable_content(&self) -> Option<&str> {
        if !self.content.is_empty() {
            return Some(&self.content);
        }

        if let Some(snapshot) = self.message_snapshots.first()
            && !snapshot.content.is_empty()
        {
            return Some(&snapshot.content);
        }

        self.embeds
            .iter()
            .find(|embed| embed.kind == AUTO_MODERATION_EMBED)
            .and_then(|embed| embed.raw_description.as_deref())
            .filter(|text| !text.is_empty())
    }
}

/// A message created after the client connected, as delivered by the live
/// event stream.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageCreateEvent {
    pub message: ChatMessage,
    /// Optimistic events are local echoes of messages still being sent.
    pub optimistic: bool,
}

/// A message the user is about to send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutgoingMessage {
    pub channel_id: String,
    pub content: String,
}
