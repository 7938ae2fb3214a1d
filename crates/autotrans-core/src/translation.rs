//! Translation provider contract.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which language pair a translation uses.
///
/// `Received` turns other people's messages into the user's language,
/// `Sent` turns the user's own messages into the channel's language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Direction::Sent),
            "received" => Ok(Direction::Received),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// One translated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub text: String,
    /// Source language reported by the provider when it auto-detected it.
    pub detected_language: Option<String>,
}

impl TranslationResult {
    pub fn new(text: impl Into<String>, detected_language: Option<String>) -> Self {
        Self {
            text: text.into(),
            detected_language,
        }
    }
}

/// An external service that turns text from one language into another.
///
/// # Contract
///
/// `translate_batch` returns exactly one result per input, in input order,
/// and fails as a unit: a single bad item fails the whole call.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, direction: Direction, text: &str) -> Result<TranslationResult>;

    async fn translate_batch(
        &self,
        direction: Direction,
        texts: &[String],
    ) -> Result<Vec<TranslationResult>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!("sent".parse::<Direction>().unwrap(), Direction::Sent);
        assert_eq!(
            "received".parse::<Direction>().unwrap(),
            Direction::Received
        );
        assert!("both".parse::<Direction>().is_err());
    }
}
