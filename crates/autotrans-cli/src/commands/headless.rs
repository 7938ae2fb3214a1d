//! Collaborators for running the engine without a chat client attached.

use autotrans_core::message::ChatMessage;
use autotrans_core::translation::TranslationResult;
use autotrans_core::view::{
    ChatView, MessageElement, MessageStore, ScrollContainer, TranslationRenderer,
};

/// A chat view with nothing on screen.
pub struct HeadlessView;

impl ChatView for HeadlessView {
    fn selected_channel_id(&self) -> Option<String> {
        None
    }

    fn query_message_elements(&self, _prefix: &str) -> Vec<MessageElement> {
        Vec::new()
    }

    fn viewport_height(&self) -> f64 {
        0.0
    }

    fn scroll_container_id(&self) -> Option<String> {
        None
    }

    fn scroll_container(&self) -> Option<ScrollContainer> {
        None
    }
}

pub struct NoMessages;

impl MessageStore for NoMessages {
    fn get_message(&self, _channel_id: &str, _message_id: &str) -> Option<ChatMessage> {
        None
    }
}

/// Prints rendered translations to stdout.
pub struct PrintRenderer;

impl TranslationRenderer for PrintRenderer {
    fn handle_translate(&self, message_id: &str, result: &TranslationResult) {
        println!("{}: {}", message_id, result.text);
    }
}
