use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    condition::RawConditionCode,
    http::get_json,
    model::{GeoCoordinate, RawWeatherRecord},
};

use super::{ProviderId, WeatherProvider};

pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org";

/// OpenWeather current-weather API (keyed).
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenWeatherProvider {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: String) -> Self {
        Self {
            api_key,
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    /// metres per second with `units=metric`
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    async fn current(&self, location: &GeoCoordinate) -> Result<RawWeatherRecord> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let request = self.http.get(url).query(&[
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ]);

        let parsed: OwCurrentResponse = get_json(request, "OpenWeather current").await?;

        let condition = parsed
            .weather
            .first()
            .map(|w| w.main.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(RawWeatherRecord {
            temperature_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            wind_speed_kph: parsed.wind.speed * 3.6,
            condition: RawConditionCode::Text(condition),
            air_quality_index: None,
            observed_at: parsed.dt.and_then(unix_to_utc),
        })
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
