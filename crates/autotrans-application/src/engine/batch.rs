//! Provider calls for scanned batches and single messages.

use super::scanner::PendingTranslation;
use autotrans_core::error::{Result, TranslateError};
use autotrans_core::translation::{Direction, TranslationProvider, TranslationResult};
use std::sync::Arc;

/// Wraps the translation provider with the batch contract the engine relies
/// on: one call per batch, results matched to inputs by position.
#[derive(Clone)]
pub struct BatchTranslator {
    provider: Arc<dyn TranslationProvider>,
}

impl BatchTranslator {
    pub fn new(provider: Arc<dyn TranslationProvider>) -> Self {
        Self { provider }
    }

    /// Translates a scanned batch in the received direction.
    ///
    /// An empty batch makes no provider call. A response whose length differs
    /// from the batch is rejected as a whole.
    pub async fn translate(&self, batch: &[PendingTranslation]) -> Result<Vec<TranslationResult>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = batch.iter().map(|item| item.source_text.clone()).collect();
        let results = self
            .provider
            .translate_batch(Direction::Received, &texts)
            .await?;

        if results.len() != batch.len() {
            return Err(TranslateError::length_mismatch(batch.len(), results.len()));
        }

        Ok(results)
    }

    pub async fn translate_one(&self, direction: Direction, text: &str) -> Result<TranslationResult> {
        self.provider.translate(direction, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedProvider {
        calls: Mutex<Vec<Vec<String>>>,
        drop_last: bool,
    }

    #[async_trait]
    impl TranslationProvider for ScriptedProvider {
        async fn translate(&self, _direction: Direction, text: &str) -> Result<TranslationResult> {
            Ok(TranslationResult::new(text.to_uppercase(), None))
        }

        async fn translate_batch(
            &self,
            _direction: Direction,
            texts: &[String],
        ) -> Result<Vec<TranslationResult>> {
            self.calls.lock().unwrap().push(texts.to_vec());
            let mut results: Vec<_> = texts
                .iter()
                .map(|t| TranslationResult::new(t.to_uppercase(), Some("es".to_string())))
                .collect();
            if self.drop_last {
                results.pop();
            }
            Ok(results)
        }
    }

    fn provider(drop_last: bool) -> Arc<ScriptedProvider> {
        Arc::new(ScriptedProvider {
            calls: Mutex::new(Vec::new()),
            drop_last,
        })
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_call() {
        let provider = provider(false);
        let translator = BatchTranslator::new(provider.clone());

        let results = translator.translate(&[]).await.unwrap();

        assert!(results.is_empty());
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_call_in_batch_order() {
        let provider = provider(false);
        let translator = BatchTranslator::new(provider.clone());
        let batch = vec![
            PendingTranslation::new("m1", "uno"),
            PendingTranslation::new("m2", "dos"),
        ];

        let results = translator.translate(&batch).await.unwrap();

        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec![vec!["uno".to_string(), "dos".to_string()]]
        );
        assert_eq!(results[0].text, "UNO");
        assert_eq!(results[1].text, "DOS");
    }

    #[tokio::test]
    async fn test_short_response_is_rejected() {
        let translator = BatchTranslator::new(provider(true));
        let batch = vec![
            PendingTranslation::new("m1", "uno"),
            PendingTranslation::new("m2", "dos"),
        ];

        let err = translator.translate(&batch).await.unwrap_err();

        assert!(err.is_provider_failure());
    }
}
