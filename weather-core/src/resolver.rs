use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;

use crate::{geocode::Geocoder, model::GeoCoordinate};

/// Caching front for a [`Geocoder`].
///
/// Successful resolutions are kept for the lifetime of the resolver, keyed by
/// the trimmed, lowercased query. Failures are never cached. Two concurrent
/// misses for the same city may both reach the upstream; the second insert
/// overwrites an equivalent value.
// TODO: bound the cache (entry cap or TTL) once the proxy runs long-lived in production.
#[derive(Debug)]
pub struct GeocodeResolver {
    geocoder: Arc<dyn Geocoder>,
    cache: RwLock<HashMap<String, GeoCoordinate>>,
}

impl GeocodeResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            geocoder,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a city name. Any upstream error is logged and reported as `None`,
    /// the same as an empty result.
    pub async fn resolve(&self, city: &str) -> Option<GeoCoordinate> {
        let city = city.trim();
        let key = city.to_lowercase();

        let cached = self.cache.read().get(&key).cloned();
        if let Some(hit) = cached {
            tracing::debug!(city = %city, "Geocode cache hit");
            return Some(hit);
        }

        match self.geocoder.search(city).await {
            Ok(Some(coord)) => {
                tracing::debug!(
                    city = %city,
                    name = %coord.canonical_name,
                    lat = coord.latitude,
                    lon = coord.longitude,
                    "Geocoded city"
                );
                self.cache.write().insert(key, coord.clone());
                Some(coord)
            }
            Ok(None) => {
                tracing::info!(city = %city, "No geocoding result");
                None
            }
            Err(e) => {
                tracing::warn!(city = %city, error = %format!("{e:#}"), "Geocoding error");
                None
            }
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }
}
