//! Rate-limited, cached HTTP client for the OpenWeather current-weather API.

use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{cache::ResponseCache, error::WeatherError, rate_limit::RateLimiter};

pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_COUNTRY: &str = "BR";
pub const DEFAULT_LANG: &str = "pt";

#[derive(Debug)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
    country: String,
    lang: String,
    limiter: RateLimiter,
    cache: ResponseCache,
}

impl WeatherClient {
    pub fn new(api_key: String, limiter: RateLimiter, cache: ResponseCache) -> Self {
        Self {
            http: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            country: DEFAULT_COUNTRY.to_string(),
            lang: DEFAULT_LANG.to_string(),
            limiter,
            cache,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Current weather body for `city`, unmodified.
    ///
    /// Provider-level errors carried inside a 200 body are left for the
    /// caller to validate.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&mut self, city: &str) -> Result<Value, WeatherError> {
        self.limiter.wait().await;

        let url = self.request_url(city)?;
        let key = cache_key(&url);

        if let Some(body) = self.cache.get(&key) {
            debug!("serving response from cache");
            return Ok(body.clone());
        }

        info!("requesting current weather");
        let res = self.http.get(url.clone()).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::transport(
                Some(status.as_u16()),
                provider_message(&body),
            ));
        }

        let parsed: Value = serde_json::from_str(&body).map_err(|e| {
            WeatherError::transport(
                Some(status.as_u16()),
                format!("invalid JSON in response body: {e}"),
            )
        })?;

        if let Err(err) = self.cache.insert(key, parsed.clone()) {
            warn!("could not persist response cache: {err}");
        }

        Ok(parsed)
    }

    fn request_url(&self, city: &str) -> Result<Url, WeatherError> {
        let q = format!("{city},{}", self.country);
        Url::parse_with_params(
            &self.base_url,
            &[
                ("q", q.as_str()),
                ("appid", self.api_key.as_str()),
                ("lang", self.lang.as_str()),
            ],
        )
        .map_err(|e| WeatherError::transport(None, format!("invalid base URL '{}': {e}", self.base_url)))
    }
}

/// Request URL with the `appid` parameter removed, so the API key is never
/// written to the cache file.
fn cache_key(url: &Url) -> String {
    let mut key = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != "appid")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    key.query_pairs_mut().clear().extend_pairs(pairs);
    key.into()
}

/// The provider's `message` field when the body is JSON, otherwise a
/// truncated copy of the raw body.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
