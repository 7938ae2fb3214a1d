//! Client-side collaborators the engine reads from and renders into.
//!
//! These are implemented by the chat client embedding the engine. All of
//! them are synchronous: querying the rendered message list, looking up a
//! cached message and rendering an accessory never suspend.

use crate::error::TranslateError;
use crate::message::ChatMessage;
use crate::translation::TranslationResult;
use tokio::sync::broadcast;

/// Element id prefix of rendered chat messages: `chat-messages-<channel>-<message>`.
pub const MESSAGE_ELEMENT_PREFIX: &str = "chat-messages";

/// Builds the element id prefix shared by every message of a channel.
pub fn message_element_prefix(channel_id: &str) -> String {
    format!("{}-{}-", MESSAGE_ELEMENT_PREFIX, channel_id)
}

/// Vertical extent of a rendered element in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// True when the whole element is on screen.
    pub fn is_within(&self, viewport_height: f64) -> bool {
        self.top >= 0.0 && self.bottom <= viewport_height
    }
}

/// A rendered message element.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageElement {
    pub element_id: String,
    pub rect: Rect,
}

/// The scrollable message list container of the active chat view.
///
/// `id` identifies the container instance; a re-rendered chat view yields a
/// new id. Every scroll produces one `()` on `events`.
#[derive(Debug)]
pub struct ScrollContainer {
    pub id: String,
    pub events: broadcast::Receiver<()>,
}

/// The rendered chat view.
pub trait ChatView: Send + Sync {
    /// Channel the user is currently looking at.
    fn selected_channel_id(&self) -> Option<String>;

    /// Rendered elements whose id starts with `prefix`, in document order.
    fn query_message_elements(&self, prefix: &str) -> Vec<MessageElement>;

    fn viewport_height(&self) -> f64;

    /// Identity of the mounted message list container, without subscribing
    /// to its scroll events.
    fn scroll_container_id(&self) -> Option<String>;

    /// The message list container, if a chat view is mounted.
    fn scroll_container(&self) -> Option<ScrollContainer>;
}

/// The client's in-memory message cache.
pub trait MessageStore: Send + Sync {
    /// Returns `None` for unknown channels and for messages evicted from
    /// memory.
    fn get_message(&self, channel_id: &str, message_id: &str) -> Option<ChatMessage>;
}

/// Renders a translation under its message.
///
/// Must tolerate being called again for the same message.
pub trait TranslationRenderer: Send + Sync {
    fn handle_translate(&self, message_id: &str, result: &TranslationResult);
}

/// Hook for failures the automatic paths swallow.
pub trait EngineObserver: Send + Sync {
    fn batch_failed(&self, channel_id: &str, batch_size: usize, error: &TranslateError);

    fn live_translation_failed(&self, message_id: &str, error: &TranslateError);
}
