//! Visibility scan: which on-screen messages still need a translation.

use autotrans_core::view::{ChatView, MessageStore, message_element_prefix};

/// A message picked up by a scan, waiting to be translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTranslation {
    pub message_id: String,
    pub source_text: String,
}

impl PendingTranslation {
    pub fn new(message_id: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            source_text: source_text.into(),
        }
    }
}

/// Point-in-time scan of the rendered message list.
pub struct VisibilityScanner<'a> {
    view: &'a dyn ChatView,
    messages: &'a dyn MessageStore,
}

impl<'a> VisibilityScanner<'a> {
    pub fn new(view: &'a dyn ChatView, messages: &'a dyn MessageStore) -> Self {
        Self { view, messages }
    }

    /// Returns the fully visible messages of `channel_id` that are not yet
    /// translated and have text, in document order.
    ///
    /// Messages missing from the store or without translatable content are
    /// skipped silently.
    pub fn scan(
        &self,
        channel_id: &str,
        already_translated: &dyn Fn(&str) -> bool,
    ) -> Vec<PendingTranslation> {
        let prefix = message_element_prefix(channel_id);
        let viewport_height = self.view.viewport_height();

        self.view
            .query_message_elements(&prefix)
            .into_iter()
            .filter(|element| element.rect.is_within(viewport_height))
            .filter_map(|element| {
                element
                    .element_id
                    .strip_prefix(&prefix)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
            })
            .filter(|message_id| !already_translated(message_id))
            .filter_map(|message_id| {
                let message = self.messages.get_message(channel_id, &message_id)?;
                let text = message.translatable_content()?.to_string();
                Some(PendingTranslation::new(message_id, text))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotrans_core::message::ChatMessage;
    use autotrans_core::view::{MessageElement, Rect, ScrollContainer};
    use std::collections::HashMap;

    struct StaticView {
        elements: Vec<MessageElement>,
    }

    impl ChatView for StaticView {
        fn selected_channel_id(&self) -> Option<String> {
            Some("c1".to_string())
        }

        fn query_message_elements(&self, prefix: &str) -> Vec<MessageElement> {
            self.elements
                .iter()
                .filter(|e| e.element_id.starts_with(prefix))
                .cloned()
                .collect()
        }

        fn viewport_height(&self) -> f64 {
            600.0
        }

        fn scroll_container_id(&self) -> Option<String> {
            None
        }

        fn scroll_container(&self) -> Option<ScrollContainer> {
            None
        }
    }

    struct MapStore(HashMap<String, ChatMessage>);

    impl MessageStore for MapStore {
        fn get_message(&self, channel_id: &str, message_id: &str) -> Option<ChatMessage> {
            self.0
                .get(message_id)
                .filter(|m| m.channel_id == channel_id)
                .cloned()
        }
    }

    fn element(channel: &str, id: &str, top: f64, bottom: f64) -> MessageElement {
        MessageElement {
            element_id: format!("chat-messages-{}-{}", channel, id),
            rect: Rect::new(top, bottom),
        }
    }

    fn store(messages: &[(&str, &str)]) -> MapStore {
        MapStore(
            messages
                .iter()
                .map(|(id, text)| (id.to_string(), ChatMessage::new(*id, "c1", *text)))
                .collect(),
        )
    }

    #[test]
    fn test_scan_keeps_only_fully_visible() {
        let view = StaticView {
            elements: vec![
                element("c1", "m0", -20.0, 30.0),
                element("c1", "m1", 40.0, 80.0),
                element("c1", "m2", 90.0, 130.0),
                element("c1", "m3", 580.0, 620.0),
            ],
        };
        let messages = store(&[("m0", "a"), ("m1", "b"), ("m2", "c"), ("m3", "d")]);

        let pending = VisibilityScanner::new(&view, &messages).scan("c1", &|_: &str| false);

        assert_eq!(
            pending,
            vec![
                PendingTranslation::new("m1", "b"),
                PendingTranslation::new("m2", "c")
            ]
        );
    }

    #[test]
    fn test_scan_skips_translated_missing_and_empty() {
        let view = StaticView {
            elements: vec![
                element("c1", "done", 0.0, 10.0),
                element("c1", "evicted", 10.0, 20.0),
                element("c1", "media", 20.0, 30.0),
                element("c1", "fresh", 30.0, 40.0),
                element("c2", "other", 40.0, 50.0),
            ],
        };
        let messages = store(&[("done", "x"), ("media", ""), ("fresh", "hola")]);

        let pending =
            VisibilityScanner::new(&view, &messages).scan("c1", &|id: &str| id == "done");

        assert_eq!(pending, vec![PendingTranslation::new("fresh", "hola")]);
    }

    #[test]
    fn test_scan_empty_view() {
        let view = StaticView { elements: vec![] };
        let messages = store(&[]);
        assert!(VisibilityScanner::new(&view, &messages)
            .scan("c1", &|_: &str| false)
            .is_empty());
    }
}
