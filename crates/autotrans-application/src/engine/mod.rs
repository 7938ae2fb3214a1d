//! Continuous auto-translation session engine.
//!
//! `SessionEngine` owns the single auto-translation session of the process,
//! the set of messages already translated in it and every timer/listener the
//! session armed. Three triggers feed the scan → translate → dispatch
//! pipeline:
//!
//! - a poll every [`POLL_INTERVAL`],
//! - scroll events on the message list, debounced by [`SCROLL_DEBOUNCE`],
//! - live message-create events, translated one by one.
//!
//! Expiry is lazy: [`SessionEngine::is_active`] is the only place that
//! notices a session ran past its TTL, and every trigger calls it before
//! doing any work.
//!
//! Each session gets a new generation number. Triggers and provider calls
//! carry the generation they were started under, and anything that finishes
//! after its session ended is discarded.

mod batch;
mod manual;
mod scanner;
mod triggers;

pub use batch::BatchTranslator;
pub use scanner::{PendingTranslation, VisibilityScanner};
pub use triggers::{POLL_INTERVAL, SCROLL_DEBOUNCE, TriggerConfig};

use crate::observer::TracingObserver;
use autotrans_core::clock::{Clock, SystemClock};
use autotrans_core::message::MessageCreateEvent;
use autotrans_core::session::{DedupeTracker, Session};
use autotrans_core::settings::SettingsStore;
use autotrans_core::translation::{Direction, TranslationProvider, TranslationResult};
use autotrans_core::view::{ChatView, EngineObserver, MessageStore, TranslationRenderer};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use triggers::TriggerHandles;

/// Everything the engine talks to.
#[derive(Clone)]
pub struct EngineCollaborators {
    pub provider: Arc<dyn TranslationProvider>,
    pub view: Arc<dyn ChatView>,
    pub messages: Arc<dyn MessageStore>,
    pub renderer: Arc<dyn TranslationRenderer>,
    pub settings: Arc<dyn SettingsStore>,
    pub observer: Arc<dyn EngineObserver>,
    pub clock: Arc<dyn Clock>,
}

impl EngineCollaborators {
    /// Creates the collaborator set with the tracing observer and the system
    /// clock.
    pub fn new(
        provider: Arc<dyn TranslationProvider>,
        view: Arc<dyn ChatView>,
        messages: Arc<dyn MessageStore>,
        renderer: Arc<dyn TranslationRenderer>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            provider,
            view,
            messages,
            renderer,
            settings,
            observer: Arc::new(TracingObserver),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn EngineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[derive(Default)]
struct EngineState {
    session: Option<Session>,
    dedupe: DedupeTracker,
    generation: u64,
    triggers: TriggerHandles,
}

impl EngineState {
    /// Ends the current session in place. Returns the session that ended.
    fn teardown(&mut self) -> Option<Session> {
        self.triggers.release();
        self.dedupe.clear();
        self.generation += 1;
        self.session.take()
    }

    fn current_channel(&self, generation: u64) -> Option<&str> {
        if self.generation != generation {
            return None;
        }
        self.session.as_ref().map(Session::channel_id)
    }
}

/// The process-wide auto-translation session engine.
///
/// Must be used from within a tokio runtime: starting a session spawns the
/// poll loop and the scroll listener.
pub struct SessionEngine {
    deps: EngineCollaborators,
    batch: BatchTranslator,
    config: TriggerConfig,
    state: Mutex<EngineState>,
    weak_self: Weak<SessionEngine>,
}

impl SessionEngine {
    pub fn new(deps: EngineCollaborators) -> Arc<Self> {
        Self::with_config(deps, TriggerConfig::default())
    }

    pub fn with_config(deps: EngineCollaborators, config: TriggerConfig) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            batch: BatchTranslator::new(deps.provider.clone()),
            deps,
            config,
            state: Mutex::new(EngineState::default()),
            weak_self: weak_self.clone(),
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ============================================================================
    // Session controller
    // ============================================================================

    /// Starts a session on `channel_id`, replacing any running session.
    ///
    /// Runs one scan right away and arms the poll loop and scroll listener.
    pub fn start(&self, channel_id: &str) {
        let session = Session::new(channel_id, self.deps.clock.now_ms());
        self.persist_session(&session);
        tracing::info!(
            target: "auto_translate",
            "Starting auto-translation of channel {}",
            channel_id
        );
        self.arm(session);
    }

    /// Ends the running session and forgets the persisted record.
    ///
    /// No-op when nothing is running.
    pub fn stop(&self) {
        let ended = self.lock_state().teardown();
        if let Some(session) = ended {
            tracing::info!(
                target: "auto_translate",
                "Stopped auto-translation of channel {}",
                session.channel_id()
            );
        }
        self.clear_persisted_session();
    }

    /// Releases every trigger but keeps the persisted record, so the session
    /// can be picked up again by [`SessionEngine::recover`] after a restart.
    pub fn shutdown(&self) {
        if self.lock_state().teardown().is_some() {
            tracing::debug!(target: "auto_translate", "Engine shut down with a live session");
        }
    }

    /// Resumes a persisted session that has not expired yet.
    ///
    /// The window is not extended: the resumed session keeps its original
    /// start time. An expired record is cleared. Returns whether a session
    /// was resumed.
    pub fn recover(&self) -> bool {
        let Some((channel_id, started_at_ms)) = self.deps.settings.get().persisted_session()
        else {
            return false;
        };

        let session = Session::new(channel_id, started_at_ms);
        if !session.is_live_at(self.deps.clock.now_ms()) {
            tracing::info!(
                target: "auto_translate",
                "Persisted session for channel {} has expired, clearing it",
                session.channel_id()
            );
            self.clear_persisted_session();
            return false;
        }

        tracing::info!(
            target: "auto_translate",
            "Resuming auto-translation of channel {}",
            session.channel_id()
        );
        self.arm(session);
        true
    }

    /// Enables the session on `channel_id` if none is running, disables it
    /// otherwise. Returns whether a session is running afterwards.
    pub fn toggle(&self, channel_id: &str) -> bool {
        if self.is_active() {
            self.stop();
            false
        } else {
            self.start(channel_id);
            true
        }
    }

    /// True while a session exists and is younger than its TTL.
    ///
    /// An expired session is ended here, including its triggers and the
    /// persisted record.
    pub fn is_active(&self) -> bool {
        let now_ms = self.deps.clock.now_ms();
        let expired = {
            let mut state = self.lock_state();
            match &state.session {
                None => return false,
                Some(session) if session.is_live_at(now_ms) => return true,
                Some(_) => state.teardown(),
            }
        };

        if let Some(session) = expired {
            tracing::info!(
                target: "auto_translate",
                "Auto-translation of channel {} expired",
                session.channel_id()
            );
        }
        self.clear_persisted_session();
        false
    }

    /// Time left in the running session, for display.
    pub fn remaining(&self) -> Option<Duration> {
        if !self.is_active() {
            return None;
        }
        let now_ms = self.deps.clock.now_ms();
        self.lock_state()
            .session
            .as_ref()
            .and_then(|session| session.remaining_at(now_ms))
    }

    /// Channel of the running session. Does not check expiry.
    pub fn session_channel(&self) -> Option<String> {
        self.lock_state()
            .session
            .as_ref()
            .map(|session| session.channel_id().to_string())
    }

    /// Number of messages translated in the running session.
    pub fn translated_count(&self) -> usize {
        self.lock_state().dedupe.len()
    }

    /// True while the session has a poll loop, scroll listener or pending
    /// debounce.
    pub fn is_armed(&self) -> bool {
        self.lock_state().triggers.is_armed()
    }

    /// Replaces the running session with `session` and arms its triggers.
    ///
    /// The old triggers are released and the dedupe set is reset in the same
    /// critical section, so nothing from the old session can observe a
    /// half-reset state.
    fn arm(&self, session: Session) {
        let channel_id = session.channel_id().to_string();
        let container = self.deps.view.scroll_container();

        let generation = {
            let mut state = self.lock_state();
            state.teardown();
            state.session = Some(session);
            let generation = state.generation;

            state.triggers.set_poll(triggers::spawn_poll(
                self.weak_self.clone(),
                generation,
                self.config.poll_interval,
            ));
            if let Some(container) = container {
                state.triggers.set_scroll_listener(triggers::spawn_scroll_listener(
                    self.weak_self.clone(),
                    generation,
                    container,
                ));
            }
            generation
        };

        let engine = self.weak_self.clone();
        tokio::spawn(async move {
            if let Some(engine) = engine.upgrade() {
                engine.run_pass(generation, &channel_id).await;
            }
        });
    }

    // ============================================================================
    // Trigger handling
    // ============================================================================

    /// Returns the session channel if `generation` is still the running,
    /// unexpired session and the user is still looking at its channel.
    ///
    /// A channel mismatch ends the session.
    fn validated_channel(&self, generation: u64) -> Option<String> {
        if !self.is_active() {
            return None;
        }

        let channel_id = self
            .lock_state()
            .current_channel(generation)
            .map(str::to_string)?;

        if self.deps.view.selected_channel_id().as_deref() != Some(channel_id.as_str()) {
            tracing::info!(
                target: "auto_translate",
                "User left channel {}, stopping auto-translation",
                channel_id
            );
            let ended = {
                let mut state = self.lock_state();
                if state.generation == generation {
                    state.teardown()
                } else {
                    None
                }
            };
            if ended.is_some() {
                self.clear_persisted_session();
            }
            return None;
        }

        Some(channel_id)
    }

    /// One poll tick. Returns false when the poll loop should stop.
    pub(crate) async fn poll_tick(&self, generation: u64) -> bool {
        let Some(channel_id) = self.validated_channel(generation) else {
            return false;
        };
        tracing::trace!(target: "auto_translate", "Poll tick for channel {}", channel_id);

        self.refresh_scroll_listener(generation);
        self.run_pass(generation, &channel_id).await;
        true
    }

    /// Re-resolves the message list container and re-attaches the scroll
    /// listener when the chat view was re-rendered since it was attached.
    ///
    /// Only subscribes to the container when its id changed.
    fn refresh_scroll_listener(&self, generation: u64) {
        let Some(container_id) = self.deps.view.scroll_container_id() else {
            return;
        };
        if self.lock_state().triggers.scroll_container_id() == Some(container_id.as_str()) {
            return;
        }

        let Some(container) = self.deps.view.scroll_container() else {
            return;
        };

        let mut state = self.lock_state();
        if state.generation != generation {
            return;
        }
        if state.triggers.scroll_container_id() == Some(container.id.as_str()) {
            return;
        }

        tracing::debug!(
            target: "auto_translate",
            "Attaching scroll listener to container {}",
            container.id
        );
        state.triggers.set_scroll_listener(triggers::spawn_scroll_listener(
            self.weak_self.clone(),
            generation,
            container,
        ));
    }

    /// A scroll event from the listener: restarts the debounce timer.
    pub(crate) fn on_scroll(&self, generation: u64) {
        if self.validated_channel(generation).is_none() {
            return;
        }

        let mut state = self.lock_state();
        if state.generation != generation {
            return;
        }
        let seq = state.triggers.restart_debounce();
        state.triggers.set_debounce(triggers::spawn_debounce(
            self.weak_self.clone(),
            generation,
            seq,
            self.config.scroll_debounce,
        ));
    }

    /// The debounce quiet period elapsed without another scroll.
    pub(crate) async fn scroll_settled(&self, generation: u64, seq: u64) {
        if !self.lock_state().triggers.finish_debounce(seq) {
            return;
        }
        if let Some(channel_id) = self.validated_channel(generation) {
            self.run_pass(generation, &channel_id).await;
        }
    }

    /// Translates a live message of the session's channel right away.
    ///
    /// Optimistic echoes, messages of other channels, messages already
    /// translated in this session and messages without text are ignored.
    /// Provider failures are reported to the observer and swallowed.
    pub async fn on_message_create(&self, event: MessageCreateEvent) {
        if event.optimistic || !self.is_active() {
            return;
        }

        let (generation, channel_id) = {
            let state = self.lock_state();
            let Some(session) = state.session.as_ref() else {
                return;
            };
            if state.dedupe.contains(&event.message.id) {
                return;
            }
            (state.generation, session.channel_id().to_string())
        };

        if event.message.channel_id != channel_id
            || self.deps.view.selected_channel_id().as_deref() != Some(channel_id.as_str())
        {
            return;
        }

        let Some(content) = event.message.translatable_content() else {
            return;
        };

        match self.batch.translate_one(Direction::Received, content).await {
            Ok(result) => {
                self.commit(generation, vec![(event.message.id, result)]);
            }
            Err(err) => {
                tracing::error!(
                    target: "auto_translate",
                    "Auto-translate of message {} failed: {}",
                    event.message.id,
                    err
                );
                self.deps
                    .observer
                    .live_translation_failed(&event.message.id, &err);
            }
        }
    }

    // ============================================================================
    // Pipeline
    // ============================================================================

    /// Scans the visible messages of `channel_id` that still need translating.
    pub fn scan(&self, channel_id: &str) -> Vec<PendingTranslation> {
        let scanner = VisibilityScanner::new(self.deps.view.as_ref(), self.deps.messages.as_ref());
        scanner.scan(channel_id, &|message_id: &str| {
            self.lock_state().dedupe.contains(message_id)
        })
    }

    /// scan → translate → dispatch for one trigger firing.
    async fn run_pass(&self, generation: u64, channel_id: &str) {
        if self.lock_state().generation != generation {
            return;
        }
        let batch = self.scan(channel_id);
        self.translate_and_dispatch(generation, channel_id, batch)
            .await;
    }

    /// Translates `batch` with one provider call and renders the results.
    ///
    /// A failed batch is reported and dropped as a whole: nothing is
    /// rendered and nothing is marked as translated, so the next trigger
    /// picks the same messages up again.
    async fn translate_and_dispatch(
        &self,
        generation: u64,
        channel_id: &str,
        batch: Vec<PendingTranslation>,
    ) {
        if batch.is_empty() {
            return;
        }

        match self.batch.translate(&batch).await {
            Ok(results) => {
                let dispatched = self.commit(
                    generation,
                    batch
                        .into_iter()
                        .map(|item| item.message_id)
                        .zip(results)
                        .collect(),
                );
                tracing::debug!(
                    target: "auto_translate",
                    "Dispatched {} translations for channel {}",
                    dispatched,
                    channel_id
                );
            }
            Err(err) => {
                tracing::error!(
                    target: "auto_translate",
                    "Batch auto-translate of {} messages failed: {}",
                    batch.len(),
                    err
                );
                self.deps
                    .observer
                    .batch_failed(channel_id, batch.len(), &err);
            }
        }
    }

    /// Marks translations as done and renders them, in order.
    ///
    /// Results of an ended session are dropped, as are messages another
    /// trigger already dispatched in this session.
    fn commit(&self, generation: u64, translated: Vec<(String, TranslationResult)>) -> usize {
        let fresh: Vec<(String, TranslationResult)> = {
            let mut state = self.lock_state();
            if state.generation != generation {
                tracing::debug!(
                    target: "auto_translate",
                    "Dropping {} translations of an ended session",
                    translated.len()
                );
                return 0;
            }
            translated
                .into_iter()
                .filter(|(message_id, _)| state.dedupe.insert(message_id.clone()))
                .collect()
        };

        for (message_id, result) in &fresh {
            self.deps.renderer.handle_translate(message_id, result);
        }
        fresh.len()
    }

    // ============================================================================
    // Settings persistence
    // ============================================================================

    fn persist_session(&self, session: &Session) {
        let result = self.deps.settings.update(&mut |settings| {
            settings.record_session(session.channel_id(), session.started_at_ms())
        });
        if let Err(err) = result {
            tracing::warn!(target: "auto_translate", "Failed to persist session: {}", err);
        }
    }

    fn clear_persisted_session(&self) {
        let settings = self.deps.settings.get();
        if !settings.auto_translate_received
            && settings.auto_translate_channel_id.is_none()
            && settings.auto_translate_timestamp.is_none()
        {
            return;
        }
        if let Err(err) = self
            .deps
            .settings
            .update(&mut |settings| settings.clear_session())
        {
            tracing::warn!(target: "auto_translate", "Failed to clear persisted session: {}", err);
        }
    }
}
