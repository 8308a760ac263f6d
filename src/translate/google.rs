//! Google translate web endpoint client

use super::Translator;
use crate::config::TranslationConfig;
use crate::error::{DocSearchError, DocSearchResult};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

/// Blocking client for the public `translate_a/single` endpoint.
///
/// Must be built and dropped outside an async runtime; the server creates
/// it inside `spawn_blocking`.
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(config: &TranslationConfig) -> DocSearchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("str-docsearch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, source: &str, target: &str) -> DocSearchResult<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(DocSearchError::Translation(format!(
                "service returned {}",
                response.status()
            )));
        }

        let body: Value = response.json()?;
        parse_translation(&body)
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body is a nested array whose first element lists sentence segments,
/// each segment starting with its translated text.
pub fn parse_translation(body: &Value) -> DocSearchResult<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| DocSearchError::Translation("unexpected response shape".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(DocSearchError::Translation(
            "response contained no translated text".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_joins_segments() {
        let body = json!([
            [
                ["Flat no. 4, ", "सदनिका क्र. 4, ", null, null, 10],
                ["Kothrud", "कोथरूड", null, null, 10]
            ],
            null,
            "mr"
        ]);
        assert_eq!(parse_translation(&body).unwrap(), "Flat no. 4, Kothrud");
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        assert!(parse_translation(&json!({"error": "quota"})).is_err());
        assert!(parse_translation(&json!([[]])).is_err());
    }
}
