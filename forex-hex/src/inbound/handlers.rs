//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use forex_types::{Currency, LookupError, Pair, RateResponse};

use crate::RateService;

/// Application state shared across handlers.
pub struct AppState {
    pub service: RateService,
}

/// HTTP-layer error with its JSON error body.
pub enum ApiError {
    /// Missing/invalid query input - deliberately the same status as an
    /// unknown resource, so parse failures are not distinguishable.
    NotFound(String),
    /// Snapshot not yet populated (readiness only).
    Unavailable(String),
    /// Lookup failure surfaced by the service facade.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Operational endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Readiness: 503 until the first successful snapshot sync.
pub async fn ready(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    if state.service.is_ready() {
        Ok(Json(serde_json::json!({ "status": "ready" })))
    } else {
        Err(ApiError::Unavailable(
            "Rate snapshot not loaded yet".to_string(),
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rates
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters of `GET /rates`.
///
/// Both fields are optional at the extractor level so that missing and
/// invalid input funnel through the same 404 path.
#[derive(Debug, Deserialize)]
pub struct RateQuery {
    from: Option<String>,
    to: Option<String>,
}

/// `GET /rates?from=<CCY>&to=<CCY>`
#[tracing::instrument(skip(state))]
pub async fn get_rate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pair = parse_pair(&query)?;

    let rate = state.service.get(&pair).map_err(|e| match e {
        LookupError::LookupFailed(detail) => ApiError::Internal(detail),
    })?;

    Ok(Json(RateResponse::from(rate)))
}

fn parse_pair(query: &RateQuery) -> Result<Pair, ApiError> {
    let from = query
        .from
        .as_deref()
        .ok_or_else(|| ApiError::NotFound("Missing query parameter: from".to_string()))?;
    let to = query
        .to
        .as_deref()
        .ok_or_else(|| ApiError::NotFound("Missing query parameter: to".to_string()))?;

    let from = Currency::parse(from).map_err(|e| ApiError::NotFound(e.to_string()))?;
    let to = Currency::parse(to).map_err(|e| ApiError::NotFound(e.to_string()))?;

    Ok(Pair::new(from, to))
}
