use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    agent::{AgentSettings, DEFAULT_RATE_LIMIT},
    cache::DEFAULT_EXPIRE_AFTER,
    client::{DEFAULT_BASE_URL, DEFAULT_COUNTRY, DEFAULT_LANG},
    translate::DEFAULT_TRANSLATE_URL,
};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

const CACHE_FILE_NAME: &str = "weather_cache.json";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// rate_limit_secs = 1.0
/// cache_expire_secs = 600
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub country: Option<String>,
    pub lang: Option<String>,
    /// Minimum seconds between outbound requests.
    pub rate_limit_secs: Option<f64>,
    /// Seconds a cached response stays fresh.
    pub cache_expire_secs: Option<u64>,
    pub cache_path: Option<PathBuf>,
    pub translate_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "tempo", "tempo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Cache file location: the configured path, else the platform cache directory.
    pub fn resolved_cache_path(&self) -> Result<PathBuf> {
        match &self.cache_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.cache_dir().join(CACHE_FILE_NAME)),
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// The environment value when set and non-empty, else the stored key.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    /// Build explicit agent settings; `env_api_key` is the value of
    /// [`API_KEY_ENV`], read by the caller.
    pub fn agent_settings(&self, env_api_key: Option<String>) -> Result<AgentSettings> {
        let api_key = self.resolve_api_key(env_api_key).ok_or_else(|| {
            anyhow!(
                "❌ Variável {API_KEY_ENV} não definida.\n\
                 Hint: export {API_KEY_ENV} or run `tempo configure` and enter your API key."
            )
        })?;

        let rate_limit = match self.rate_limit_secs {
            Some(secs) => Duration::try_from_secs_f64(secs)
                .with_context(|| format!("Invalid rate_limit_secs: {secs}"))?,
            None => DEFAULT_RATE_LIMIT,
        };

        let cache_expire = self
            .cache_expire_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_EXPIRE_AFTER);

        let mut settings = AgentSettings::new(api_key);
        settings.base_url = self.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        settings.country = self.country.clone().unwrap_or_else(|| DEFAULT_COUNTRY.to_string());
        settings.lang = self.lang.clone().unwrap_or_else(|| DEFAULT_LANG.to_string());
        settings.rate_limit = rate_limit;
        settings.cache_expire = cache_expire;
        settings.cache_path = Some(self.resolved_cache_path()?);
        settings.translate_url = self
            .translate_url
            .clone()
            .unwrap_or_else(|| DEFAULT_TRANSLATE_URL.to_string());

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_settings_errors_without_api_key() {
        let cfg = Config::default();
        let err = cfg.agent_settings(None).unwrap_err();

        assert!(err.to_string().contains(API_KEY_ENV));
        assert!(err.to_string().contains("tempo configure"));
    }

    #[test]
    fn env_key_overrides_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("STORED".into());

        assert_eq!(cfg.resolve_api_key(Some("ENV".into())).as_deref(), Some("ENV"));
        assert_eq!(cfg.resolve_api_key(Some("  ".into())).as_deref(), Some("STORED"));
        assert_eq!(cfg.resolve_api_key(None).as_deref(), Some("STORED"));
    }

    #[test]
    fn defaults_fill_unset_fields() {
        let cfg = Config {
            cache_path: Some(PathBuf::from("/tmp/tempo-test/cache.json")),
            ..Config::default()
        };
        let settings = cfg.agent_settings(Some("KEY".into())).expect("settings");

        assert_eq!(settings.api_key, "KEY");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.country, "BR");
        assert_eq!(settings.lang, "pt");
        assert_eq!(settings.rate_limit, Duration::from_secs(1));
        assert_eq!(settings.cache_expire, Duration::from_secs(600));
        assert_eq!(
            settings.cache_path.as_deref(),
            Some(std::path::Path::new("/tmp/tempo-test/cache.json"))
        );
    }

    #[test]
    fn negative_rate_limit_is_rejected() {
        let cfg = Config {
            rate_limit_secs: Some(-1.0),
            cache_path: Some(PathBuf::from("cache.json")),
            ..Config::default()
        };
        let err = cfg.agent_settings(Some("KEY".into())).unwrap_err();
        assert!(err.to_string().contains("rate_limit_secs"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        cfg.cache_expire_secs = Some(120);
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn partial_file_parses() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "lang = \"en\"\n").unwrap();

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.lang.as_deref(), Some("en"));
        assert!(loaded.api_key.is_none());
    }
}
