//! Continuous translation session model.

use std::time::Duration;

/// How long a session keeps translating after it was started.
pub const SESSION_TTL: Duration = Duration::from_millis(600_000);

/// The single time-boxed auto-translation window.
///
/// The channel is fixed for the session's lifetime; a different channel
/// means a different session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    channel_id: String,
    started_at_ms: i64,
}

impl Session {
    pub fn new(channel_id: impl Into<String>, started_at_ms: i64) -> Self {
        Self {
            channel_id: channel_id.into(),
            started_at_ms,
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn started_at_ms(&self) -> i64 {
        self.started_at_ms
    }

    fn elapsed_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.started_at_ms)
    }

    /// True strictly while `now - started_at < SESSION_TTL`.
    pub fn is_live_at(&self, now_ms: i64) -> bool {
        self.elapsed_ms(now_ms) < SESSION_TTL.as_millis() as i64
    }

    /// Time left before the session expires, `None` once it has.
    pub fn remaining_at(&self, now_ms: i64) -> Option<Duration> {
        let left = SESSION_TTL.as_millis() as i64 - self.elapsed_ms(now_ms);
        (left > 0).then(|| Duration::from_millis(left as u64))
    }
}

/// Formats a countdown as `m:ss`.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_boundary() {
        let session = Session::new("c1", 10_000);
        assert!(session.is_live_at(10_000));
        assert!(session.is_live_at(609_999));
        assert!(!session.is_live_at(610_000));
        assert!(!session.is_live_at(610_001));
    }

    #[test]
    fn test_remaining() {
        let session = Session::new("c1", 0);
        assert_eq!(session.remaining_at(0), Some(SESSION_TTL));
        assert_eq!(
            session.remaining_at(599_000),
            Some(Duration::from_millis(1_000))
        );
        assert_eq!(session.remaining_at(600_000), None);
    }

    #[test]
    fn test_clock_skew_does_not_expire() {
        // A timestamp from the future (clock moved backwards) still counts as live.
        let session = Session::new("c1", 5_000);
        assert!(session.is_live_at(1_000));
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(SESSION_TTL), "10:00");
        assert_eq!(format_remaining(Duration::from_millis(545_900)), "9:05");
        assert_eq!(format_remaining(Duration::from_millis(999)), "0:00");
    }
}
