use autotrans_core::error::TranslateError;
use autotrans_core::view::EngineObserver;

/// Observer that only logs. The engine already logs the failure itself, so
/// this one adds the structured fields at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn batch_failed(&self, channel_id: &str, batch_size: usize, error: &TranslateError) {
        tracing::debug!(
            target: "auto_translate",
            channel_id,
            batch_size,
            error = %error,
            "batch left untranslated until the next trigger"
        );
    }

    fn live_translation_failed(&self, message_id: &str, error: &TranslateError) {
        tracing::debug!(
            target: "auto_translate",
            message_id,
            error = %error,
            "live message left untranslated"
        );
    }
}
