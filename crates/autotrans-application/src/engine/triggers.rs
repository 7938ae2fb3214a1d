//! Poll timer, scroll listener and scroll debounce of a running session.
//!
//! Every task holds a `Weak` reference to the engine and the generation of
//! the session that armed it; the engine owns the `JoinHandle`s and aborts
//! them when the session ends.

use super::SessionEngine;
use autotrans_core::view::ScrollContainer;
use std::sync::Weak;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Interval between visibility polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2_000);

/// Quiet period after the last scroll event before a scan runs.
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(1_000);

/// Timer settings of the trigger coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerConfig {
    pub poll_interval: Duration,
    pub scroll_debounce: Duration,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            scroll_debounce: SCROLL_DEBOUNCE,
        }
    }
}

pub(crate) struct ScrollListener {
    pub(crate) container_id: String,
    task: JoinHandle<()>,
}

pub(crate) struct PendingScroll {
    pub(crate) seq: u64,
    task: JoinHandle<()>,
}

/// Handles of everything a session armed.
#[derive(Default)]
pub(crate) struct TriggerHandles {
    poll: Option<JoinHandle<()>>,
    scroll_listener: Option<ScrollListener>,
    debounce: Option<PendingScroll>,
    scroll_seq: u64,
}

impl TriggerHandles {
    /// Aborts the poll loop, the scroll listener and any pending debounce.
    pub(crate) fn release(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.abort();
        }
        if let Some(listener) = self.scroll_listener.take() {
            listener.task.abort();
        }
        if let Some(pending) = self.debounce.take() {
            pending.task.abort();
        }
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.poll.is_some() || self.scroll_listener.is_some() || self.debounce.is_some()
    }

    pub(crate) fn set_poll(&mut self, task: JoinHandle<()>) {
        if let Some(previous) = self.poll.replace(task) {
            previous.abort();
        }
    }

    pub(crate) fn scroll_container_id(&self) -> Option<&str> {
        self.scroll_listener
            .as_ref()
            .map(|listener| listener.container_id.as_str())
    }

    pub(crate) fn set_scroll_listener(&mut self, listener: ScrollListener) {
        if let Some(previous) = self.scroll_listener.replace(listener) {
            previous.task.abort();
        }
    }

    /// Cancels the pending debounce and returns the sequence number for the
    /// next one.
    pub(crate) fn restart_debounce(&mut self) -> u64 {
        if let Some(pending) = self.debounce.take() {
            pending.task.abort();
        }
        self.scroll_seq += 1;
        self.scroll_seq
    }

    pub(crate) fn set_debounce(&mut self, pending: PendingScroll) {
        self.debounce = Some(pending);
    }

    /// Detaches the debounce task `seq` once its quiet period elapsed, so a
    /// later scroll no longer cancels the scan it is about to run.
    pub(crate) fn finish_debounce(&mut self, seq: u64) -> bool {
        match &self.debounce {
            Some(pending) if pending.seq == seq => {
                self.debounce = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for TriggerHandles {
    fn drop(&mut self) {
        self.release();
    }
}

/// Spawns the poll loop. The first tick fires one interval after arming.
///
/// Each tick awaits its own pass, so with a provider slower than `period`
/// the loop runs less often than every `period`. Ticks missed during a slow
/// pass collapse into one that fires as soon as the pass returns, and the
/// schedule restarts from there.
pub(crate) fn spawn_poll(
    engine: Weak<SessionEngine>,
    generation: u64,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(engine) = engine.upgrade() else {
                break;
            };
            if !engine.poll_tick(generation).await {
                break;
            }
        }
    })
}

/// Spawns a task forwarding the container's scroll events to the engine.
pub(crate) fn spawn_scroll_listener(
    engine: Weak<SessionEngine>,
    generation: u64,
    container: ScrollContainer,
) -> ScrollListener {
    let ScrollContainer { id, mut events } = container;

    let task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(()) | Err(RecvError::Lagged(_)) => {
                    let Some(engine) = engine.upgrade() else {
                        break;
                    };
                    engine.on_scroll(generation);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    ScrollListener {
        container_id: id,
        task,
    }
}

/// Spawns one debounce timer.
pub(crate) fn spawn_debounce(
    engine: Weak<SessionEngine>,
    generation: u64,
    seq: u64,
    quiet_period: Duration,
) -> PendingScroll {
    let task = tokio::spawn(async move {
        tokio::time::sleep(quiet_period).await;
        let Some(engine) = engine.upgrade() else {
            return;
        };
        engine.scroll_settled(generation, seq).await;
    });

    PendingScroll { seq, task }
}
