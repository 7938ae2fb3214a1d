//! DeepL API v2.

use super::{request_failed, status_error};
use async_trait::async_trait;
use autotrans_core::error::{Result, TranslateError};
use autotrans_core::settings::{LanguagePair, SettingsStore};
use autotrans_core::translation::{Direction, TranslationProvider, TranslationResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const PROVIDER: &str = "deepl";
const FREE_ENDPOINT: &str = "https://api-free.deepl.com/v2/translate";
const PRO_ENDPOINT: &str = "https://api.deepl.com/v2/translate";

/// Translates with DeepL. A batch is a single request.
///
/// The API key is read from the settings on every call.
#[derive(Clone)]
pub struct DeeplProvider {
    client: Client,
    settings: Arc<dyn SettingsStore>,
    pro: bool,
}

impl DeeplProvider {
    /// Provider for the free API host.
    pub fn free(client: Client, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            client,
            settings,
            pro: false,
        }
    }

    /// Provider for the paid API host.
    pub fn pro(client: Client, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            client,
            settings,
            pro: true,
        }
    }

    fn endpoint(&self) -> &'static str {
        if self.pro { PRO_ENDPOINT } else { FREE_ENDPOINT }
    }
}

#[async_trait]
impl TranslationProvider for DeeplProvider {
    async fn translate(&self, direction: Direction, text: &str) -> Result<TranslationResult> {
        self.translate_batch(direction, &[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| TranslateError::length_mismatch(1, 0))
    }

    async fn translate_batch(
        &self,
        direction: Direction,
        texts: &[String],
    ) -> Result<Vec<TranslationResult>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let settings = self.settings.get();
        let api_key = settings
            .deepl_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| TranslateError::config("DeepL API key is not set"))?;

        let request = build_request(&settings.language_pair(direction), texts);
        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("DeepL-Auth-Key {}", api_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| request_failed(PROVIDER, err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| request_failed(PROVIDER, err))?;

        if !status.is_success() {
            return Err(status_error(PROVIDER, status, &body));
        }

        parse_response(&body, texts.len())
    }
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: Vec<&'a str>,
    target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<String>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    detected_source_language: Option<String>,
    text: String,
}

fn build_request<'a>(pair: &LanguagePair, texts: &'a [String]) -> TranslateRequest<'a> {
    TranslateRequest {
        text: texts.iter().map(String::as_str).collect(),
        target_lang: pair.target.to_uppercase(),
        source_lang: (!pair.is_auto_source()).then(|| pair.source.to_uppercase()),
    }
}

fn parse_response(body: &str, expected: usize) -> Result<Vec<TranslationResult>> {
    let parsed: TranslateResponse = serde_json::from_str(body)
        .map_err(|err| TranslateError::malformed(format!("DeepL response: {}", err)))?;

    if parsed.translations.len() != expected {
        return Err(TranslateError::length_mismatch(
            expected,
            parsed.translations.len(),
        ));
    }

    Ok(parsed
        .translations
        .into_iter()
        .map(|t| {
            TranslationResult::new(
                t.text,
                t.detected_source_language.map(|lang| lang.to_lowercase()),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(source: &str, target: &str) -> LanguagePair {
        LanguagePair {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn test_request_omits_auto_source() {
        let texts = vec!["hola".to_string(), "adiós".to_string()];

        let auto = serde_json::to_value(build_request(&pair("auto", "en-us"), &texts)).unwrap();
        assert_eq!(
            auto,
            serde_json::json!({"text": ["hola", "adiós"], "target_lang": "EN-US"})
        );

        let fixed = serde_json::to_value(build_request(&pair("es", "de"), &texts)).unwrap();
        assert_eq!(fixed["source_lang"], "ES");
    }

    #[test]
    fn test_parse_keeps_order() {
        let body = r#"{"translations": [
            {"detected_source_language": "ES", "text": "hello"},
            {"detected_source_language": "ES", "text": "goodbye"}
        ]}"#;

        let results = parse_response(body, 2).unwrap();
        assert_eq!(
            results,
            vec![
                TranslationResult::new("hello", Some("es".to_string())),
                TranslationResult::new("goodbye", Some("es".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_length_mismatch() {
        let body = r#"{"translations": [{"detected_source_language": "ES", "text": "hello"}]}"#;
        let err = parse_response(body, 2).unwrap_err();
        assert!(matches!(err, TranslateError::MalformedResponse(_)));
    }
}
