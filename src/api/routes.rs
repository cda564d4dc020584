//! Query handlers

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::error;

use super::AppState;
use crate::types::{GlobalDeal, PriceRecord, RegionId, SpotScoutError};

/// Plain-text error reply. Messages stay generic; details go to the log.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    /// Status follows the error kind; `fallback` is the message for upstream
    /// failures, which are all reported as 500.
    fn from_error(err: &SpotScoutError, fallback: &'static str) -> Self {
        let (status, message) = match err {
            SpotScoutError::MissingParameter(_) => {
                (StatusCode::BAD_REQUEST, "Region parameter is required")
            }
            SpotScoutError::NoResultsFound => (StatusCode::NOT_FOUND, "No deals found"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, fallback),
        };
        if status.is_server_error() {
            error!(error = %err, "{}", fallback);
        }
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SpotDealsQuery {
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BestDealsQuery {
    pub limit: Option<usize>,
}

/// GET /api/regions
pub async fn regions(State(state): State<AppState>) -> Result<Json<Vec<RegionId>>, ApiError> {
    let regions = state
        .aggregator
        .regions()
        .await
        .map_err(|e| ApiError::from_error(&e, "Failed to fetch regions"))?;
    Ok(Json(regions))
}

/// GET /api/spot-deals?region=<code>
pub async fn spot_deals(
    State(state): State<AppState>,
    Query(params): Query<SpotDealsQuery>,
) -> Result<Json<Vec<PriceRecord>>, ApiError> {
    const FAILED: &str = "Failed to get spot deals";

    let region = match params.region.filter(|r| !r.is_empty()) {
        Some(code) => RegionId::new(code),
        None => {
            return Err(ApiError::from_error(
                &SpotScoutError::MissingParameter("region"),
                FAILED,
            ))
        }
    };

    let deals = state
        .aggregator
        .region_deals(&region)
        .await
        .map_err(|e| ApiError::from_error(&e, FAILED))?;

    Ok(Json(deals.into_iter().map(|d| d.record).collect()))
}

/// GET /api/best-global-deal[?limit=<n>]
pub async fn best_global_deal(
    State(state): State<AppState>,
    Query(params): Query<BestDealsQuery>,
) -> Result<Json<Vec<GlobalDeal>>, ApiError> {
    let top_n = params.limit.filter(|n| *n > 0).unwrap_or(state.top_n);

    let deals = state
        .aggregator
        .best_global_deals(top_n)
        .await
        .map_err(|e| ApiError::from_error(&e, "Failed to fetch regions"))?;
    Ok(Json(deals))
}
