use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    condition::RawConditionCode,
    http::get_json,
    model::{GeoCoordinate, RawWeatherRecord},
};

use super::{ProviderId, WeatherProvider};

pub const OPEN_METEO_FORECAST_URL: &str = "https://api.open-meteo.com";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";

/// Open-Meteo forecast API, current conditions only. Free, no key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    base_url: String,
}

impl OpenMeteoProvider {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: Option<String>,
    temperature_2m: f64,
    relative_humidity_2m: f64,
    weather_code: i32,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: OmCurrent,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenMeteo
    }

    async fn current(&self, location: &GeoCoordinate) -> Result<RawWeatherRecord> {
        let url = format!("{}/v1/forecast", self.base_url);
        let request = self.http.get(url).query(&[
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("temperature_unit", "celsius".to_string()),
            ("wind_speed_unit", "kmh".to_string()),
            ("timezone", "GMT".to_string()),
        ]);

        let parsed: OmForecastResponse = get_json(request, "Open-Meteo forecast").await?;
        let current = parsed.current;

        Ok(RawWeatherRecord {
            temperature_c: current.temperature_2m,
            humidity_pct: current.relative_humidity_2m,
            wind_speed_kph: current.wind_speed_10m,
            condition: RawConditionCode::Wmo(current.weather_code),
            air_quality_index: None,
            observed_at: current.time.as_deref().and_then(parse_gmt_time),
        })
    }
}

/// Open-Meteo reports `current.time` as `YYYY-MM-DDTHH:MM` in the requested timezone.
fn parse_gmt_time(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|ndt| ndt.and_utc())
}
