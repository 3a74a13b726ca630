use anyhow::Result;
use async_trait::async_trait;
use rand::{Rng, seq::SliceRandom};

use crate::{
    cities,
    condition::RawConditionCode,
    model::{GeoCoordinate, RawWeatherRecord},
};

use super::{ProviderId, WeatherProvider};

const RANDOM_CONDITIONS: &[&str] = &["Sunny", "Rainy", "Cloudy", "Snow"];

/// Offline provider: fixed conditions for the built-in cities, random ones
/// for everything else. Never fails.
#[derive(Debug, Clone, Default)]
pub struct MockProvider;

#[async_trait]
impl WeatherProvider for MockProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Mock
    }

    async fn current(&self, location: &GeoCoordinate) -> Result<RawWeatherRecord> {
        Ok(match cities::find(&location.canonical_name) {
            Some(entry) => RawWeatherRecord {
                temperature_c: entry.temperature_c,
                humidity_pct: entry.humidity_pct,
                wind_speed_kph: entry.wind_speed_kph,
                condition: RawConditionCode::Text(entry.condition.label().to_string()),
                air_quality_index: Some(entry.air_quality_index),
                observed_at: None,
            },
            None => random_record(),
        })
    }
}

fn random_record() -> RawWeatherRecord {
    let mut rng = rand::thread_rng();
    let condition = RANDOM_CONDITIONS.choose(&mut rng).copied().unwrap_or("Sunny");

    RawWeatherRecord {
        temperature_c: f64::from(rng.gen_range(5_i32..35)),
        humidity_pct: f64::from(rng.gen_range(20_i32..100)),
        wind_speed_kph: f64::from(rng.gen_range(5_i32..35)),
        condition: RawConditionCode::Text(condition.to_string()),
        air_quality_index: Some(rng.gen_range(0..200)),
        observed_at: None,
    }
}
