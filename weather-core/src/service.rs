//! The lookup pipeline: resolve the city, fetch current conditions, normalize.

use std::sync::Arc;

use crate::{
    Config,
    cities,
    condition::normalize,
    error::LookupError,
    geocode::{Geocoder, OpenMeteoGeocoder, StaticGeocoder},
    http::build_client,
    model::{NormalizedWeather, round_half_up},
    provider::{ProviderId, WeatherProvider, provider_from_config},
    resolver::GeocodeResolver,
};

#[derive(Debug)]
pub struct WeatherService {
    resolver: GeocodeResolver,
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(geocoder: Arc<dyn Geocoder>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            resolver: GeocodeResolver::new(geocoder),
            provider,
        }
    }

    /// Wire up the geocoder and provider for `id`. The offline provider is
    /// paired with the built-in table geocoder; live providers use Open-Meteo
    /// geocoding.
    pub fn from_config(config: &Config, id: ProviderId) -> anyhow::Result<Self> {
        let http = build_client(config.upstream.timeout())?;

        let geocoder: Arc<dyn Geocoder> = match id {
            ProviderId::Mock => Arc::new(StaticGeocoder),
            ProviderId::OpenMeteo | ProviderId::OpenWeather => Arc::new(OpenMeteoGeocoder::new(
                http.clone(),
                config.upstream.geocoding_url.clone(),
            )),
        };
        let provider = provider_from_config(id, config, http)?;

        Ok(Self::new(geocoder, provider))
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider.id()
    }

    #[cfg(test)]
    pub(crate) fn resolver(&self) -> &GeocodeResolver {
        &self.resolver
    }

    pub fn suggestions(&self) -> Vec<String> {
        cities::suggestions()
    }

    /// Run the full pipeline for one city. Either every field is filled in or
    /// the reason for failure is returned.
    pub async fn lookup(&self, city: &str) -> Result<NormalizedWeather, LookupError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(LookupError::MissingInput);
        }

        let coord = self
            .resolver
            .resolve(city)
            .await
            .ok_or_else(|| LookupError::CityNotFound(city.to_string()))?;

        let raw = self.provider.current(&coord).await.map_err(|e| {
            tracing::warn!(
                provider = %self.provider.id(),
                city = %coord.canonical_name,
                error = %format!("{e:#}"),
                "Weather API error"
            );
            LookupError::UpstreamUnavailable
        })?;

        tracing::debug!(
            city = %coord.canonical_name,
            observed_at = ?raw.observed_at,
            "Fetched current conditions"
        );

        let (condition, icon) = normalize(&raw.condition);

        Ok(NormalizedWeather {
            city: coord.canonical_name,
            temperature_celsius: round_half_up(raw.temperature_c),
            condition,
            wind_speed: format!("{} km/h", round_half_up(raw.wind_speed_kph)),
            humidity: format!("{}%", round_half_up(raw.humidity_pct)),
            air_quality_index: raw
                .air_quality_index
                .map_or_else(|| "N/A".to_string(), |aqi| aqi.to_string()),
            icon: icon.to_string(),
            latitude: coord.latitude,
            longitude: coord.longitude,
        })
    }
}
