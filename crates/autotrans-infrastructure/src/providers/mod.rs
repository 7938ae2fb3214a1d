//! HTTP translation providers.

mod configured;
mod deepl;
mod google;

pub use configured::ConfiguredProvider;
pub use deepl::DeeplProvider;
pub use google::GoogleTranslateProvider;

use autotrans_core::TranslateError;
use reqwest::StatusCode;

/// Maps a transport-level reqwest failure.
fn request_failed(provider: &str, err: reqwest::Error) -> TranslateError {
    TranslateError::network(format!("{} request failed: {}", provider, err))
}

/// Maps a non-success HTTP status. `body` is shown as-is unless it carries a
/// `message` field.
fn status_error(provider: &str, status: StatusCode, body: &str) -> TranslateError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request rejected").to_string()
            } else {
                body.trim().to_string()
            }
        });

    TranslateError::provider(provider, Some(status.as_u16()), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_prefers_message_field() {
        let err = status_error(
            "deepl",
            StatusCode::FORBIDDEN,
            r#"{"message":"Wrong endpoint. Use https://api.deepl.com"}"#,
        );
        match err {
            TranslateError::Provider {
                provider,
                status_code,
                message,
            } => {
                assert_eq!(provider, "deepl");
                assert_eq!(status_code, Some(403));
                assert_eq!(message, "Wrong endpoint. Use https://api.deepl.com");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_status_error_falls_back_to_reason() {
        let err = status_error("google", StatusCode::TOO_MANY_REQUESTS, "");
        assert_eq!(
            err.to_string(),
            "Provider error (google): Too Many Requests"
        );
    }
}
