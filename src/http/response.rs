//! Response payloads and error mapping.
//!
//! # Responsibilities
//! - Shape eligibility results into the JSON response body
//! - Map query errors to client-facing statuses
//!
//! # Design Decisions
//! - Every error body is `{"error": "<message>"}`
//! - Unknown origins and invalid input are client errors (400)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::latency::{QueryError, RegionInfo};

/// Body of a successful eligibility response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionResponse {
    pub eligible_regions: Vec<RegionInfo>,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error returned from a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NotFound(_) | QueryError::InvalidInput(_) => {
                Self::bad_request(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
