use std::collections::HashSet;

/// Message ids already translated in the current session.
///
/// Grows monotonically while a session runs and is only ever emptied as a
/// whole when the session ends or a new one starts.
#[derive(Debug, Default, Clone)]
pub struct DedupeTracker {
    translated: HashSet<String>,
}

impl DedupeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.translated.contains(message_id)
    }

    /// Marks a message as translated. Returns false if it already was.
    pub fn insert(&mut self, message_id: impl Into<String>) -> bool {
        self.translated.insert(message_id.into())
    }

    pub fn clear(&mut self) {
        self.translated.clear();
    }

    pub fn len(&self) -> usize {
        self.translated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translated.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_reports_duplicates() {
        let mut tracker = DedupeTracker::new();
        assert!(tracker.insert("m1"));
        assert!(!tracker.insert("m1"));
        assert!(tracker.contains("m1"));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut tracker = DedupeTracker::new();
        tracker.insert("m1");
        tracker.insert("m2");
        tracker.clear();
        assert!(tracker.is_empty());
        assert!(!tracker.contains("m1"));
    }
}
