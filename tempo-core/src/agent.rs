//! Composition root: fetches, validates and renders weather for a city.

use std::{path::PathBuf, time::Duration};

use serde_json::Value;
use tracing::instrument;

use crate::{
    cache::{DEFAULT_EXPIRE_AFTER, ResponseCache},
    client::{DEFAULT_BASE_URL, DEFAULT_COUNTRY, DEFAULT_LANG, WeatherClient},
    error::WeatherError,
    format::{OutputFormat, format_output},
    model::{FieldDefaults, ParsedWeather},
    rate_limit::RateLimiter,
    translate::{DEFAULT_TRANSLATE_URL, GoogleTranslator, Translator},
    validate::validate_response,
};

pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_secs(1);

/// Everything the agent needs, passed in explicitly at construction.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub api_key: String,
    pub base_url: String,
    pub country: String,
    pub lang: String,
    pub rate_limit: Duration,
    pub cache_expire: Duration,
    /// `None` keeps the response cache in memory only.
    pub cache_path: Option<PathBuf>,
    pub translate_url: String,
    pub defaults: FieldDefaults,
}

impl AgentSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            lang: DEFAULT_LANG.to_string(),
            rate_limit: DEFAULT_RATE_LIMIT,
            cache_expire: DEFAULT_EXPIRE_AFTER,
            cache_path: None,
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            defaults: FieldDefaults::default(),
        }
    }
}

#[derive(Debug)]
pub struct WeatherAgent {
    client: WeatherClient,
    translator: Box<dyn Translator>,
    defaults: FieldDefaults,
}

impl WeatherAgent {
    pub fn new(settings: AgentSettings) -> Self {
        let cache = match &settings.cache_path {
            Some(path) => ResponseCache::open(path, settings.cache_expire),
            None => ResponseCache::in_memory(settings.cache_expire),
        };

        let client = WeatherClient::new(settings.api_key, RateLimiter::new(settings.rate_limit), cache)
            .with_base_url(settings.base_url)
            .with_country(settings.country)
            .with_lang(settings.lang);

        let translator = GoogleTranslator::new(reqwest::Client::new(), settings.translate_url);

        Self {
            client,
            translator: Box::new(translator),
            defaults: settings.defaults,
        }
    }

    /// Replace the translation backend.
    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Raw provider response for `city`.
    pub async fn get_weather(&mut self, city: &str) -> Result<Value, WeatherError> {
        self.client.fetch(city).await
    }

    /// Validate `raw` and build the normalized record.
    pub fn parse_weather(&self, raw: &Value) -> Result<ParsedWeather, WeatherError> {
        validate_response(raw)?;
        Ok(ParsedWeather::from_validated(raw, &self.defaults))
    }

    /// Validate `raw` and render it in the requested format.
    #[instrument(skip(self, raw), level = "debug")]
    pub fn analyze_weather(&self, raw: &Value, format: OutputFormat) -> Result<String, WeatherError> {
        let parsed = self.parse_weather(raw)?;
        format_output(&parsed, format)
    }

    /// Translate free text, typically a condition description.
    ///
    /// Not used by the fetch/analyze pipeline.
    pub async fn translate_description(&self, text: &str, dest: &str) -> Result<String, WeatherError> {
        self.translator.translate(text, dest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use async_trait::async_trait;
    use serde_json::json;

    fn agent() -> WeatherAgent {
        WeatherAgent::new(AgentSettings::new("test_key"))
    }

    fn recife() -> Value {
        json!({
            "cod": 200,
            "name": "Recife",
            "main": { "temp": 300.15, "feels_like": 301.0, "humidity": 70 },
            "wind": { "speed": 3.5, "deg": 90 },
            "weather": [{ "id": 800, "description": "céu limpo" }]
        })
    }

    #[test]
    fn analyze_text_output() {
        let out = agent().analyze_weather(&recife(), OutputFormat::Text).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0].trim_end(), "[Recife]");
        assert!(lines[1].contains("27.0°C (Sensação: 27.9°C)"));
        assert!(lines[2].contains("Vento: 3.5 m/s E"));
        assert_eq!(lines[3], "☀️ Céu limpo");
    }

    #[test]
    fn json_and_text_agree() {
        let agent = agent();
        let text = agent.analyze_weather(&recife(), OutputFormat::Text).unwrap();
        let json = agent.analyze_weather(&recife(), OutputFormat::Json).unwrap();
        let parsed: ParsedWeather = serde_json::from_str(&json).unwrap();

        assert!(text.contains(&format!("{:.1}°C", parsed.temperature_c)));
        assert!(text.contains(&format!("Sensação: {:.1}°C", parsed.feels_like_c)));
        assert!(text.contains(&format!("Umidade: {}%", parsed.humidity_pct)));
        assert!(text.contains(&format!("{} m/s {}", parsed.wind_speed_mps, parsed.wind_cardinal)));
        assert!(text.contains(&parsed.condition));
    }

    #[test]
    fn not_found_raised_before_field_access() {
        let raw = json!({ "cod": "404", "message": "city not found" });
        let err = agent().analyze_weather(&raw, OutputFormat::Text).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn provider_error_propagates_unchanged() {
        let raw = json!({ "cod": 401, "message": "Invalid API key" });
        let err = agent().analyze_weather(&raw, OutputFormat::Json).unwrap_err();

        assert!(matches!(err, WeatherError::Provider { ref message } if message == "Invalid API key"));
    }

    #[derive(Debug)]
    struct Unavailable;

    #[async_trait]
    impl Translator for Unavailable {
        async fn translate(&self, _text: &str, _dest: &str) -> Result<String, WeatherError> {
            Err(WeatherError::Translation("offline".into()))
        }
    }

    #[tokio::test]
    async fn translation_failure_is_isolated() {
        let agent = agent().with_translator(Box::new(Unavailable));

        let err = agent.translate_description("clear sky", "pt").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Translation);

        assert!(agent.analyze_weather(&recife(), OutputFormat::Text).is_ok());
    }
}
