//! Wall-clock sources for session timestamps.

use std::time::Duration;
use tokio::time::Instant;

/// Source of epoch-millisecond timestamps.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Reads the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Epoch time anchored once and advanced by the tokio runtime clock.
///
/// Session expiry and the poll/debounce timers then agree on elapsed time,
/// including under a paused test runtime.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeClock {
    anchor_ms: i64,
    anchor: Instant,
}

impl RuntimeClock {
    /// Anchors at the current system time.
    pub fn new() -> Self {
        Self::anchored_at(chrono::Utc::now().timestamp_millis())
    }

    /// Anchors at an explicit epoch timestamp.
    pub fn anchored_at(anchor_ms: i64) -> Self {
        Self {
            anchor_ms,
            anchor: Instant::now(),
        }
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RuntimeClock {
    fn now_ms(&self) -> i64 {
        let elapsed: Duration = Instant::now().duration_since(self.anchor);
        self.anchor_ms + elapsed.as_millis() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_runtime_clock_follows_paused_time() {
        let clock = RuntimeClock::anchored_at(1_000);
        assert_eq!(clock.now_ms(), 1_000);

        tokio::time::advance(Duration::from_millis(2_500)).await;
        assert_eq!(clock.now_ms(), 3_500);
    }
}
