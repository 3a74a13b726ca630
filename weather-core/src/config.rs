use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::{
    geocode::OPEN_METEO_GEOCODING_URL,
    provider::{
        ProviderId, open_meteo::OPEN_METEO_FORECAST_URL, openweather::OPENWEATHER_URL,
    },
};

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Where the HTTP surface listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Upstream endpoints and the per-call timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub geocoding_url: String,
    pub open_meteo_url: String,
    pub openweather_url: String,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            geocoding_url: OPEN_METEO_GEOCODING_URL.to_string(),
            open_meteo_url: OPEN_METEO_FORECAST_URL.to_string(),
            openweather_url: OPENWEATHER_URL.to_string(),
            timeout_secs: 5,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Optional default provider id: "open-meteo", "openweather" or "mock".
    pub default_provider: Option<String>,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    pub providers: HashMap<String, ProviderConfig>,

    pub server: ServerConfig,

    pub upstream: UpstreamConfig,
}

impl Config {
    /// Pick the weather provider to serve with.
    ///
    /// An explicit default wins. Without one, a configured OpenWeather key
    /// selects OpenWeather and anything else falls back to the offline table.
    pub fn effective_provider_id(&self) -> Result<ProviderId> {
        if let Some(s) = self.default_provider.as_deref() {
            return ProviderId::try_from(s);
        }

        if self.is_provider_configured(ProviderId::OpenWeather) {
            Ok(ProviderId::OpenWeather)
        } else {
            Ok(ProviderId::Mock)
        }
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-proxy", "weather-proxy")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `PORT`, `WEATHER_API_KEY` and `WEATHER_PROVIDER` from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    pub fn apply_env_with(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = var("PORT").filter(|v| !v.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value '{port}'"))?;
        }

        if let Some(key) = var("WEATHER_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.providers.insert(
                ProviderId::OpenWeather.as_str().to_string(),
                ProviderConfig { api_key: key.trim().to_string() },
            );
        }

        if let Some(provider) = var("WEATHER_PROVIDER").filter(|v| !v.trim().is_empty()) {
            let id = ProviderId::try_from(provider.as_str())?;
            self.set_default_provider(id);
        }

        Ok(())
    }

    /// Set/replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_match_the_reference_server() {
        let cfg = Config::default();

        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.upstream.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.upstream.geocoding_url, "https://geocoding-api.open-meteo.com");
    }

    #[test]
    fn no_key_and_no_default_selects_mock() {
        let cfg = Config::default();
        assert_eq!(cfg.effective_provider_id().unwrap(), ProviderId::Mock);
    }

    #[test]
    fn openweather_key_selects_openweather() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        assert_eq!(cfg.effective_provider_id().unwrap(), ProviderId::OpenWeather);
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("OPEN_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn explicit_default_overrides_key_presence() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());
        cfg.set_default_provider(ProviderId::OpenMeteo);

        assert_eq!(cfg.effective_provider_id().unwrap(), ProviderId::OpenMeteo);
    }

    #[test]
    fn invalid_default_provider_is_an_error() {
        let cfg = Config {
            default_provider: Some("darksky".into()),
            ..Config::default()
        };
        assert!(cfg.effective_provider_id().is_err());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg = Config::from_toml(
            r#"
            default_provider = "open-meteo"

            [server]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(cfg.effective_provider_id().unwrap(), ProviderId::OpenMeteo);
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.upstream.timeout_secs, 5);
    }

    #[test]
    fn env_overrides_port_key_and_provider() {
        let mut cfg = Config::default();
        cfg.apply_env_with(env(&[
            ("PORT", "7000"),
            ("WEATHER_API_KEY", "ENV_KEY"),
            ("WEATHER_PROVIDER", "openweather"),
        ]))
        .unwrap();

        assert_eq!(cfg.server.port, 7000);
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("ENV_KEY"));
        assert_eq!(cfg.effective_provider_id().unwrap(), ProviderId::OpenWeather);
    }

    #[test]
    fn bad_port_is_reported() {
        let mut cfg = Config::default();
        let err = cfg.apply_env_with(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT value"));
    }
}
