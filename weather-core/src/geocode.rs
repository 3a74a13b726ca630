//! Forward geocoding: free-text city name to coordinates.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{cities, http::get_json, model::GeoCoordinate};

pub const OPEN_METEO_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com";

#[async_trait]
pub trait Geocoder: Send + Sync + std::fmt::Debug {
    /// Best match for `name`, or `None` when the upstream knows no such place.
    async fn search(&self, name: &str) -> Result<Option<GeoCoordinate>>;
}

/// Open-Meteo geocoding API. Free, no key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    #[serde(default)]
    results: Vec<OmPlace>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    name: String,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn search(&self, name: &str) -> Result<Option<GeoCoordinate>> {
        let url = format!("{}/v1/search", self.base_url);
        let request = self.http.get(url).query(&[
            ("name", name),
            ("count", "1"),
            ("language", "en"),
            ("format", "json"),
        ]);

        let parsed: OmSearchResponse = get_json(request, "Open-Meteo geocoding").await?;

        Ok(parsed.results.into_iter().next().map(|place| GeoCoordinate {
            canonical_name: place.name,
            country: place.country,
            latitude: place.latitude,
            longitude: place.longitude,
        }))
    }
}

/// Offline geocoder backed by the built-in city table. Names outside the
/// table resolve to themselves at (0, 0) so the offline provider can still
/// invent conditions for them.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder;

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn search(&self, name: &str) -> Result<Option<GeoCoordinate>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        Ok(Some(match cities::find(name) {
            Some(entry) => entry.coordinate(),
            None => GeoCoordinate {
                canonical_name: name.to_string(),
                country: None,
                latitude: 0.0,
                longitude: 0.0,
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder(server: &MockServer) -> OpenMeteoGeocoder {
        let http = crate::http::build_client(Duration::from_secs(5)).unwrap();
        OpenMeteoGeocoder::new(http, server.uri())
    }

    #[tokio::test]
    async fn search_returns_first_result() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Paris"))
            .and(query_param("count", "1"))
            .and(query_param("language", "en"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{
                    "id": 2988507,
                    "name": "Paris",
                    "country": "France",
                    "latitude": 48.85341,
                    "longitude": 2.3488
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let coord = geocoder(&server).search("Paris").await.unwrap().unwrap();

        assert_eq!(coord.canonical_name, "Paris");
        assert_eq!(coord.country.as_deref(), Some("France"));
        assert_eq!(coord.latitude, 48.85341);
        assert_eq!(coord.longitude, 2.3488);
    }

    #[tokio::test]
    async fn search_without_results_field_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "generationtime_ms": 0.5 })),
            )
            .mount(&server)
            .await;

        let coord = geocoder(&server).search("Atlantis").await.unwrap();
        assert!(coord.is_none());
    }

    #[tokio::test]
    async fn search_surfaces_http_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = geocoder(&server).search("Paris").await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn slow_upstream_times_out_and_resolves_to_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "results": [{ "name": "Paris", "latitude": 48.85, "longitude": 2.35 }]
                    }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let http = crate::http::build_client(Duration::from_millis(200)).unwrap();
        let geocoder = OpenMeteoGeocoder::new(http, server.uri());

        let err = geocoder.search("Paris").await.unwrap_err();
        assert!(err.to_string().contains("Failed to send request to Open-Meteo geocoding"));

        let resolver = crate::resolver::GeocodeResolver::new(std::sync::Arc::new(geocoder));
        assert!(resolver.resolve("Paris").await.is_none());
        assert_eq!(resolver.cached_len(), 0);
    }

    #[tokio::test]
    async fn static_geocoder_knows_table_cities() {
        let coord = StaticGeocoder.search("tokyo").await.unwrap().unwrap();
        assert_eq!(coord.canonical_name, "Tokyo");
        assert_eq!(coord.country.as_deref(), Some("Japan"));
    }

    #[tokio::test]
    async fn static_geocoder_accepts_any_name() {
        let coord = StaticGeocoder.search(" Reykjavik ").await.unwrap().unwrap();
        assert_eq!(coord.canonical_name, "Reykjavik");
        assert_eq!(coord.country, None);
        assert!(StaticGeocoder.search("  ").await.unwrap().is_none());
    }
}
