use super::{DeeplProvider, GoogleTranslateProvider};
use async_trait::async_trait;
use autotrans_core::error::Result;
use autotrans_core::settings::{SettingsStore, TranslationService};
use autotrans_core::translation::{Direction, TranslationProvider, TranslationResult};
use reqwest::Client;
use std::sync::Arc;

/// Provider that follows the `service` setting.
///
/// The setting is read on every call, so switching services takes effect
/// without rebuilding the engine.
pub struct ConfiguredProvider {
    settings: Arc<dyn SettingsStore>,
    google: GoogleTranslateProvider,
    deepl: DeeplProvider,
    deepl_pro: DeeplProvider,
}

impl ConfiguredProvider {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            google: GoogleTranslateProvider::new(client.clone(), settings.clone()),
            deepl: DeeplProvider::free(client.clone(), settings.clone()),
            deepl_pro: DeeplProvider::pro(client, settings.clone()),
            settings,
        }
    }

    fn active(&self) -> &dyn TranslationProvider {
        match self.settings.get().service {
            TranslationService::Google => &self.google,
            TranslationService::Deepl => &self.deepl,
            TranslationService::DeeplPro => &self.deepl_pro,
        }
    }
}

#[async_trait]
impl TranslationProvider for ConfiguredProvider {
    async fn translate(&self, direction: Direction, text: &str) -> Result<TranslationResult> {
        self.active().translate(direction, text).await
    }

    async fn translate_batch(
        &self,
        direction: Direction,
        texts: &[String],
    ) -> Result<Vec<TranslationResult>> {
        self.active().translate_batch(direction, texts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotrans_core::settings::TranslateSettings;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemorySettings(Mutex<TranslateSettings>);

    impl SettingsStore for MemorySettings {
        fn get(&self) -> TranslateSettings {
            self.0.lock().unwrap().clone()
        }

        fn set(&self, settings: TranslateSettings) -> Result<()> {
            *self.0.lock().unwrap() = settings;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_deepl_without_key_is_config_error() {
        let settings = Arc::new(MemorySettings::default());
        settings
            .update(&mut |s| s.service = TranslationService::DeeplPro)
            .unwrap();
        let provider = ConfiguredProvider::new(settings);

        let err = provider
            .translate(Direction::Received, "hola")
            .await
            .unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_request() {
        let provider = ConfiguredProvider::new(Arc::new(MemorySettings::default()));
        let results = provider
            .translate_batch(Direction::Received, &[])
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
