use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tracing::{error, info};
use weather_core::{LookupError, NormalizedWeather};

use crate::server::AppState;

type AppStateArc = Arc<AppState>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// HTTP rendering of a failed lookup.
#[derive(Debug)]
pub struct ApiError(pub LookupError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LookupError::MissingInput => StatusCode::BAD_REQUEST,
            LookupError::CityNotFound(_) => StatusCode::NOT_FOUND,
            LookupError::UpstreamUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self.0, status = %status, "Weather lookup failed");
        } else {
            info!(error = %self.0, status = %status, "Weather lookup rejected");
        }

        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    message: &'static str,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "OK",
        message: "Weather API is running",
    })
}

// ============================================================================
// Weather
// ============================================================================

/// Raw query pairs, so repeated keys never reject the request.
type QueryPairs = Vec<(String, String)>;

#[derive(Debug, Serialize)]
struct SuggestionsBody {
    suggestions: Vec<String>,
}

pub fn weather_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/weather", get(weather))
        .route("/api/suggestions", get(suggestions))
}

async fn weather(
    State(state): State<AppStateArc>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<NormalizedWeather>, ApiError> {
    // First `city` wins; an unreadable query counts as no city at all.
    let city = match query {
        Ok(Query(pairs)) => pairs
            .into_iter()
            .find(|(key, _)| key == "city")
            .map(|(_, value)| value)
            .unwrap_or_default(),
        Err(rejection) => {
            info!(%rejection, "Unreadable weather query");
            String::new()
        }
    };
    state.service.lookup(&city).await.map(Json).map_err(ApiError)
}

async fn suggestions(State(state): State<AppStateArc>) -> Json<SuggestionsBody> {
    Json(SuggestionsBody {
        suggestions: state.service.suggestions(),
    })
}
