use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::condition::{Condition, RawConditionCode};

/// A resolved city. Immutable once produced by a geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoCoordinate {
    pub canonical_name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions as reported by a provider, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWeatherRecord {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_kph: f64,
    pub condition: RawConditionCode,
    pub air_quality_index: Option<u16>,
    pub observed_at: Option<DateTime<Utc>>,
}

/// The record returned to API consumers. Field names on the wire are the
/// short ones the frontend reads (`temp`, `wind`, `aqi`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedWeather {
    pub city: String,
    #[serde(rename = "temp")]
    pub temperature_celsius: i32,
    pub condition: Condition,
    /// e.g. `"8 km/h"`
    #[serde(rename = "wind")]
    pub wind_speed: String,
    /// e.g. `"55%"`
    pub humidity: String,
    /// `"N/A"` or a number.
    #[serde(rename = "aqi")]
    pub air_quality_index: String,
    pub icon: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

/// Nearest integer with halves rounded up, the way browsers round display values.
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
