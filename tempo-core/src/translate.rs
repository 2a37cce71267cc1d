//! Optional translation of free-text descriptions.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::fmt::Debug;
use tracing::{debug, instrument};

use crate::error::WeatherError;

pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

#[async_trait]
pub trait Translator: Send + Sync + Debug {
    async fn translate(&self, text: &str, dest: &str) -> Result<String, WeatherError>;
}

/// Client for the public Google Translate endpoint used by browser widgets.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    http: Client,
    url: String,
}

impl GoogleTranslator {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    #[instrument(skip(self), level = "debug")]
    async fn translate(&self, text: &str, dest: &str) -> Result<String, WeatherError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", dest),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Translation(format!("request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(WeatherError::Translation(format!(
                "translation service returned {status}"
            )));
        }

        let body: Value = res
            .json()
            .await
            .map_err(|e| WeatherError::Translation(format!("invalid response body: {e}")))?;

        let translated = join_segments(&body).ok_or_else(|| {
            WeatherError::Translation("unexpected response shape".to_string())
        })?;
        debug!(%translated, "translated text");
        Ok(translated)
    }
}

// Response shape: [[["translated", "original", ...], ...], ...]
fn join_segments(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let mut out = String::new();
    for segment in segments {
        out.push_str(segment.get(0)?.as_str()?);
    }
    (!out.is_empty()).then_some(out)
}
