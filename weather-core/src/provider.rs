use crate::{
    Config, GeoCoordinate, RawWeatherRecord,
    provider::{mock::MockProvider, open_meteo::OpenMeteoProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};

pub mod mock;
pub mod open_meteo;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenMeteo,
    OpenWeather,
    Mock,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenMeteo => "open-meteo",
            ProviderId::OpenWeather => "openweather",
            ProviderId::Mock => "mock",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenMeteo, ProviderId::OpenWeather, ProviderId::Mock]
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "open-meteo" | "openmeteo" => Ok(ProviderId::OpenMeteo),
            "openweather" => Ok(ProviderId::OpenWeather),
            "mock" => Ok(ProviderId::Mock),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: open-meteo, openweather, mock."
            )),
        }
    }
}

/// Source of current conditions for a resolved coordinate.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn current(&self, location: &GeoCoordinate) -> anyhow::Result<RawWeatherRecord>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
    http: Client,
) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider: Arc<dyn WeatherProvider> = match id {
        ProviderId::OpenMeteo => Arc::new(OpenMeteoProvider::new(
            http,
            config.upstream.open_meteo_url.clone(),
        )),
        ProviderId::OpenWeather => {
            let api_key = config.provider_api_key(id).ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key configured for provider '{id}'.\n\
                     Hint: run `weather-proxy configure {id}` or set WEATHER_API_KEY."
                )
            })?;
            Arc::new(OpenWeatherProvider::new(
                http,
                config.upstream.openweather_url.clone(),
                api_key.to_owned(),
            ))
        }
        ProviderId::Mock => Arc::new(MockProvider),
    };

    Ok(provider)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::condition::RawConditionCode;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider stub returning a fixed record (or failing) and counting calls.
    #[derive(Debug)]
    pub(crate) struct StubProvider {
        pub record: Option<RawWeatherRecord>,
        pub calls: AtomicUsize,
    }

    impl StubProvider {
        pub(crate) fn returning(record: RawWeatherRecord) -> Self {
            Self { record: Some(record), calls: AtomicUsize::new(0) }
        }

        pub(crate) fn failing() -> Self {
            Self { record: None, calls: AtomicUsize::new(0) }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        fn id(&self) -> ProviderId {
            ProviderId::OpenMeteo
        }

        async fn current(&self, _location: &GeoCoordinate) -> anyhow::Result<RawWeatherRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.record.clone().ok_or_else(|| anyhow!("upstream timed out"))
        }
    }

    pub(crate) fn paris_record() -> RawWeatherRecord {
        RawWeatherRecord {
            temperature_c: 15.8,
            humidity_pct: 55.0,
            wind_speed_kph: 7.9,
            condition: RawConditionCode::Wmo(3),
            air_quality_index: None,
            observed_at: None,
        }
    }

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn only_openweather_needs_a_key() {
        assert!(ProviderId::OpenWeather.requires_api_key());
        assert!(!ProviderId::OpenMeteo.requires_api_key());
        assert!(!ProviderId::Mock.requires_api_key());
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(ProviderId::OpenWeather, &cfg, Client::new()).unwrap_err();
        assert!(err.to_string().contains("No API key configured for provider"));
    }

    #[test]
    fn keyless_providers_build_from_default_config() {
        let cfg = Config::default();

        let provider = provider_from_config(ProviderId::OpenMeteo, &cfg, Client::new()).unwrap();
        assert_eq!(provider.id(), ProviderId::OpenMeteo);

        let provider = provider_from_config(ProviderId::Mock, &cfg, Client::new()).unwrap();
        assert_eq!(provider.id(), ProviderId::Mock);
    }

    #[test]
    fn openweather_builds_when_key_is_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".to_string());

        let provider = provider_from_config(ProviderId::OpenWeather, &cfg, Client::new()).unwrap();
        assert_eq!(provider.id(), ProviderId::OpenWeather);
    }
}
