//! Translation to English via the gtranslate proxy.

use serde::Deserialize;

const TRANSLATE_API_URL: &str = "https://api.pawan.krd/gtranslate";

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translated: Option<String>,
}

/// Translates arbitrary text to English, returning the input unchanged on any
/// failure.
#[derive(Debug, Clone)]
pub struct TranslateClient {
    http: reqwest::Client,
}

impl TranslateClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub async fn to_english(&self, text: &str) -> String {
        let response = self
            .http
            .get(TRANSLATE_API_URL)
            .query(&[("text", text), ("from", "auto"), ("to", "en")])
            .send()
            .await;

        let decoded: TranslateResponse = match response {
            Ok(response) => match response.json().await {
                Ok(decoded) => decoded,
                Err(error) => {
                    tracing::warn!(%error, "failed to decode translation response");
                    return text.to_string();
                }
            },
            Err(error) => {
                tracing::warn!(%error, "translation request failed");
                return text.to_string();
            }
        };

        match decoded.translated {
            Some(translated) if !translated.is_empty() => translated,
            _ => text.to_string(),
        }
    }
}
