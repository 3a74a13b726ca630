//! Built-in city table used by the offline fallback and for search suggestions.

use crate::{condition::Condition, model::GeoCoordinate};

#[derive(Debug, Clone, Copy)]
pub struct CityEntry {
    pub name: &'static str,
    pub country: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_c: f64,
    pub condition: Condition,
    pub wind_speed_kph: f64,
    pub humidity_pct: f64,
    pub air_quality_index: u16,
}

impl CityEntry {
    pub fn coordinate(&self) -> GeoCoordinate {
        GeoCoordinate {
            canonical_name: self.name.to_string(),
            country: Some(self.country.to_string()),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

pub const CITIES: &[CityEntry] = &[
    CityEntry {
        name: "New York",
        country: "United States",
        latitude: 40.7128,
        longitude: -74.006,
        temperature_c: 22.0,
        condition: Condition::PartlyCloudy,
        wind_speed_kph: 12.0,
        humidity_pct: 65.0,
        air_quality_index: 42,
    },
    CityEntry {
        name: "London",
        country: "United Kingdom",
        latitude: 51.5074,
        longitude: -0.1278,
        temperature_c: 15.0,
        condition: Condition::SlightRain,
        wind_speed_kph: 18.0,
        humidity_pct: 78.0,
        air_quality_index: 35,
    },
    CityEntry {
        name: "Tokyo",
        country: "Japan",
        latitude: 35.6762,
        longitude: 139.6503,
        temperature_c: 26.0,
        condition: Condition::Clear,
        wind_speed_kph: 9.0,
        humidity_pct: 60.0,
        air_quality_index: 55,
    },
    CityEntry {
        name: "Sydney",
        country: "Australia",
        latitude: -33.8688,
        longitude: 151.2093,
        temperature_c: 24.0,
        condition: Condition::MostlyClear,
        wind_speed_kph: 20.0,
        humidity_pct: 55.0,
        air_quality_index: 28,
    },
    CityEntry {
        name: "Paris",
        country: "France",
        latitude: 48.8566,
        longitude: 2.3522,
        temperature_c: 18.0,
        condition: Condition::Cloudy,
        wind_speed_kph: 11.0,
        humidity_pct: 70.0,
        air_quality_index: 48,
    },
    CityEntry {
        name: "Dubai",
        country: "United Arab Emirates",
        latitude: 25.2048,
        longitude: 55.2708,
        temperature_c: 38.0,
        condition: Condition::Clear,
        wind_speed_kph: 14.0,
        humidity_pct: 40.0,
        air_quality_index: 95,
    },
    CityEntry {
        name: "Mumbai",
        country: "India",
        latitude: 19.076,
        longitude: 72.8777,
        temperature_c: 31.0,
        condition: Condition::ModerateRain,
        wind_speed_kph: 16.0,
        humidity_pct: 85.0,
        air_quality_index: 120,
    },
];

/// Case-insensitive lookup by city name.
pub fn find(name: &str) -> Option<&'static CityEntry> {
    let key = name.trim().to_lowercase();
    CITIES.iter().find(|c| c.name.to_lowercase() == key)
}

/// Example city names for the search box.
pub fn suggestions() -> Vec<String> {
    CITIES.iter().map(|c| c.name.to_string()).collect()
}
