//! Route handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use crate::http::request::RegionRequest;
use crate::http::response::{ApiError, RegionResponse};
use crate::http::server::AppState;
use crate::latency::{EligibilityQuery, QueryError};
use crate::observability::metrics;

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// `POST /regions/eligible`
pub async fn eligible_regions(
    State(state): State<AppState>,
    payload: Result<Json<RegionRequest>, JsonRejection>,
) -> Result<Json<RegionResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        metrics::record_query("invalid_input", 0);
        ApiError::bad_request("Invalid request body")
    })?;

    let query = EligibilityQuery::new(
        &request.origin_region,
        request.max_latency,
        &request.cloud_provider,
    )
    .and_then(|query| {
        if query.provider == state.provider {
            Ok(query)
        } else {
            Err(QueryError::InvalidInput("unsupported cloud provider".to_string()))
        }
    })
    .inspect_err(|_| metrics::record_query("invalid_input", 0))?;

    match state
        .engine
        .find_eligible_regions(&query.origin_region, query.max_latency_ms)
    {
        Ok(eligible_regions) => {
            metrics::record_query("ok", eligible_regions.len());
            Ok(Json(RegionResponse { eligible_regions }))
        }
        Err(err) => {
            tracing::warn!(origin = %query.origin_region, error = %err, "Eligibility query failed");
            metrics::record_query("not_found", 0);
            Err(err.into())
        }
    }
}
