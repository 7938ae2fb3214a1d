//! User preferences shared by the engine, the providers and the CLI.

use crate::error::Result;
use crate::translation::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language code meaning "let the provider detect it".
pub const AUTO_LANGUAGE: &str = "auto";

/// Translation backend selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationService {
    #[default]
    Google,
    Deepl,
    DeeplPro,
}

impl TranslationService {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationService::Google => "google",
            TranslationService::Deepl => "deepl",
            TranslationService::DeeplPro => "deepl-pro",
        }
    }
}

impl fmt::Display for TranslationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationService {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            "deepl" => Ok(Self::Deepl),
            "deepl-pro" => Ok(Self::DeeplPro),
            other => Err(format!("unknown translation service '{}'", other)),
        }
    }
}

/// Source and target language for one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn is_auto_source(&self) -> bool {
        self.source == AUTO_LANGUAGE
    }
}

/// Persisted translation preferences.
///
/// Field names follow the client's settings keys so a store written by the
/// client can be read back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslateSettings {
    pub service: TranslationService,
    pub deepl_api_key: Option<String>,
    pub received_input: String,
    pub received_output: String,
    pub sent_input: String,
    pub sent_output: String,
    /// Translate the user's own messages before they are sent.
    pub auto_translate: bool,
    /// A continuous translation session is (or was) running.
    pub auto_translate_received: bool,
    pub auto_translate_channel_id: Option<String>,
    /// Session start, epoch milliseconds.
    pub auto_translate_timestamp: Option<i64>,
}

impl Default for TranslateSettings {
    fn default() -> Self {
        Self {
            service: TranslationService::default(),
            deepl_api_key: None,
            received_input: AUTO_LANGUAGE.to_string(),
            received_output: "en".to_string(),
            sent_input: AUTO_LANGUAGE.to_string(),
            sent_output: "en".to_string(),
            auto_translate: false,
            auto_translate_received: false,
            auto_translate_channel_id: None,
            auto_translate_timestamp: None,
        }
    }
}

impl TranslateSettings {
    pub fn language_pair(&self, direction: Direction) -> LanguagePair {
        match direction {
            Direction::Received => LanguagePair {
                source: self.received_input.clone(),
                target: self.received_output.clone(),
            },
            Direction::Sent => LanguagePair {
                source: self.sent_input.clone(),
                target: self.sent_output.clone(),
            },
        }
    }

    /// Records a running session so it can be resumed after a restart.
    pub fn record_session(&mut self, channel_id: &str, started_at_ms: i64) {
        self.auto_translate_received = true;
        self.auto_translate_channel_id = Some(channel_id.to_string());
        self.auto_translate_timestamp = Some(started_at_ms);
    }

    pub fn clear_session(&mut self) {
        self.auto_translate_received = false;
        self.auto_translate_channel_id = None;
        self.auto_translate_timestamp = None;
    }

    /// Returns the persisted session as `(channel_id, started_at_ms)` when
    /// all three fields are set.
    pub fn persisted_session(&self) -> Option<(String, i64)> {
        if !self.auto_translate_received {
            return None;
        }
        match (&self.auto_translate_channel_id, self.auto_translate_timestamp) {
            (Some(channel_id), Some(ts)) => Some((channel_id.clone(), ts)),
            _ => None,
        }
    }

    /// Sets a field by its settings key. Only user-editable keys are accepted;
    /// session bookkeeping is owned by the engine.
    pub fn set_by_key(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "service" => self.service = value.parse()?,
            "deeplApiKey" => {
                self.deepl_api_key = (!value.is_empty()).then(|| value.to_string());
            }
            "receivedInput" => self.received_input = value.to_string(),
            "receivedOutput" => self.received_output = non_auto(key, value)?,
            "sentInput" => self.sent_input = value.to_string(),
            "sentOutput" => self.sent_output = non_auto(key, value)?,
            "autoTranslate" => {
                self.auto_translate = value
                    .parse()
                    .map_err(|_| format!("{} expects true or false, got '{}'", key, value))?;
            }
            other => return Err(format!("unknown or read-only settings key '{}'", other)),
        }
        Ok(())
    }
}

fn non_auto(key: &str, value: &str) -> std::result::Result<String, String> {
    if value == AUTO_LANGUAGE {
        return Err(format!("{} cannot be '{}'", key, AUTO_LANGUAGE));
    }
    Ok(value.to_string())
}

/// Key-value store holding [`TranslateSettings`].
///
/// Reads never fail; a store that cannot be read reports defaults.
pub trait SettingsStore: Send + Sync {
    fn get(&self) -> TranslateSettings;

    fn set(&self, settings: TranslateSettings) -> Result<()>;

    /// Read-modify-write helper.
    fn update(&self, f: &mut dyn FnMut(&mut TranslateSettings)) -> Result<()> {
        let mut settings = self.get();
        f(&mut settings);
        self.set(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TranslateSettings::default();
        assert_eq!(settings.service, TranslationService::Google);
        assert_eq!(
            settings.language_pair(Direction::Received),
            LanguagePair {
                source: "auto".to_string(),
                target: "en".to_string()
            }
        );
        assert!(settings.persisted_session().is_none());
    }

    #[test]
    fn test_record_and_clear_session() {
        let mut settings = TranslateSettings::default();
        settings.record_session("c1", 1_000);
        assert_eq!(settings.persisted_session(), Some(("c1".to_string(), 1_000)));

        settings.clear_session();
        assert!(!settings.auto_translate_received);
        assert!(settings.auto_translate_channel_id.is_none());
        assert!(settings.auto_translate_timestamp.is_none());
    }

    #[test]
    fn test_set_by_key() {
        let mut settings = TranslateSettings::default();
        settings.set_by_key("service", "deepl-pro").unwrap();
        settings.set_by_key("receivedOutput", "ja").unwrap();
        settings.set_by_key("autoTranslate", "true").unwrap();

        assert_eq!(settings.service, TranslationService::DeeplPro);
        assert_eq!(settings.received_output, "ja");
        assert!(settings.auto_translate);

        assert!(settings.set_by_key("sentOutput", "auto").is_err());
        assert!(settings.set_by_key("autoTranslateChannelId", "c1").is_err());
    }

    #[test]
    fn test_camel_case_keys() {
        let mut settings = TranslateSettings::default();
        settings.record_session("c9", 5);
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["autoTranslateReceived"], true);
        assert_eq!(json["autoTranslateChannelId"], "c9");
        assert_eq!(json["autoTranslateTimestamp"], 5);
        assert_eq!(json["service"], "google");
    }
}
