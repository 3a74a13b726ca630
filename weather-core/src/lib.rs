//! Core library for the weather lookup proxy.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Geocoding with an in-process cache
//! - Abstraction over weather providers, including an offline fallback
//! - Normalization of provider conditions into a fixed label set
//! - The lookup pipeline tying these together
//!
//! It is used by `weather-server`, but carries no HTTP-server concerns of its own.

pub mod cities;
pub mod condition;
pub mod config;
pub mod error;
pub mod geocode;
pub mod http;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod service;

pub use condition::{Condition, RawConditionCode};
pub use config::{Config, ProviderConfig, ServerConfig, UpstreamConfig};
pub use error::LookupError;
pub use geocode::Geocoder;
pub use model::{GeoCoordinate, NormalizedWeather, RawWeatherRecord};
pub use provider::{ProviderId, WeatherProvider};
pub use resolver::GeocodeResolver;
pub use service::WeatherService;
