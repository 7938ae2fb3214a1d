//! User-initiated translations. Unlike the session triggers, failures here
//! reach the caller so the UI can show them.

use super::SessionEngine;
use autotrans_core::error::Result;
use autotrans_core::message::{ChatMessage, OutgoingMessage};
use autotrans_core::translation::{Direction, TranslationResult};

impl SessionEngine {
    /// Translates a single text.
    pub async fn translate_one(&self, direction: Direction, text: &str) -> Result<TranslationResult> {
        self.batch.translate_one(direction, text).await
    }

    /// The "Translate" message action: translates a received message and
    /// renders the result under it.
    ///
    /// Returns `Ok(None)` without calling the provider when the message has
    /// no text. Does not touch the running session.
    pub async fn translate_message(&self, message: &ChatMessage) -> Result<Option<TranslationResult>> {
        let Some(content) = message.translatable_content() else {
            return Ok(None);
        };

        let result = self.translate_one(Direction::Received, content).await?;
        self.deps.renderer.handle_translate(&message.id, &result);
        Ok(Some(result))
    }

    /// Translates a message about to be sent when outgoing auto-translation
    /// is enabled. Returns whether the content was replaced.
    pub async fn before_send(&self, message: &mut OutgoingMessage) -> Result<bool> {
        if !self.deps.settings.get().auto_translate || message.content.is_empty() {
            return Ok(false);
        }

        let result = self.translate_one(Direction::Sent, &message.content).await?;
        tracing::debug!(
            target: "auto_translate",
            "Translated outgoing message for channel {}",
            message.channel_id
        );
        message.content = result.text;
        Ok(true)
    }
}
