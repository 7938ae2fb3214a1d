//! Google Translate through the keyless `translate_a/single` endpoint.

use super::{request_failed, status_error};
use async_trait::async_trait;
use autotrans_core::error::{Result, TranslateError};
use autotrans_core::settings::{LanguagePair, SettingsStore};
use autotrans_core::translation::{Direction, TranslationProvider, TranslationResult};
use futures::future::try_join_all;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

const PROVIDER: &str = "google";
const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Translates with Google. The endpoint takes one text per request, so a
/// batch is sent as concurrent requests that fail together.
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    client: Client,
    settings: Arc<dyn SettingsStore>,
}

impl GoogleTranslateProvider {
    pub fn new(client: Client, settings: Arc<dyn SettingsStore>) -> Self {
        Self { client, settings }
    }

    async fn translate_pair(&self, pair: &LanguagePair, text: &str) -> Result<TranslationResult> {
        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("dt", "t"),
                ("dj", "1"),
                ("sl", pair.source.as_str()),
                ("tl", pair.target.as_str()),
                ("q", text),
            ])
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

        parse_response(&body)
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    async fn translate(&self, direction: Direction, text: &str) -> Result<TranslationResult> {
        let pair = self.settings.get().language_pair(direction);
        self.translate_pair(&pair, text).await
    }

    async fn translate_batch(
        &self,
        direction: Direction,
        texts: &[String],
    ) -> Result<Vec<TranslationResult>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let pair = self.settings.get().language_pair(direction);
        try_join_all(texts.iter().map(|text| self.translate_pair(&pair, text))).await
    }
}

#[derive(Deserialize)]
struct SingleResponse {
    #[serde(default)]
    sentences: Vec<Sentence>,
    src: Option<String>,
}

#[derive(Deserialize)]
struct Sentence {
    trans: Option<String>,
}

/// Parses a `dj=1` response: the translation is split into sentences and
/// `src` carries the detected source language.
fn parse_response(body: &str) -> Result<TranslationResult> {
    let parsed: SingleResponse = serde_json::from_str(body)
        .map_err(|err| TranslateError::malformed(format!("Google response: {}", err)))?;

    let mut sentences = parsed.sentences.into_iter().filter_map(|s| s.trans).peekable();
    if sentences.peek().is_none() {
        return Err(TranslateError::malformed(
            "Google response contained no translated sentences",
        ));
    }

    Ok(TranslationResult::new(sentences.collect::<String>(), parsed.src))
}
