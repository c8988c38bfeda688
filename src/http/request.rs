//! Request payloads and request identification.
//!
//! # Responsibilities
//! - Decode the eligibility request body
//! - Generate a unique request ID (UUID v4) for every request
//!
//! # Design Decisions
//! - Missing body fields decode to empty/zero values and are rejected by
//!   validation with a field-specific message
//! - Request ID added as early as possible for tracing

use axum::http::{HeaderValue, Request};
use serde::{Deserialize, Serialize};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Body of `POST /regions/eligible`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionRequest {
    pub origin_region: String,
    pub max_latency: f64,
    pub cloud_provider: String,
}

/// Generates a fresh UUID v4 request ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let request: RegionRequest = serde_json::from_str(r#"{"origin_region":"West US"}"#).unwrap();
        assert_eq!(request.origin_region, "West US");
        assert_eq!(request.max_latency, 0.0);
        assert!(request.cloud_provider.is_empty());
    }

    #[test]
    fn test_integer_threshold() {
        let request: RegionRequest = serde_json::from_str(
            r#"{"origin_region":"West US","max_latency":20,"cloud_provider":"azure"}"#,
        )
        .unwrap();
        assert_eq!(request.max_latency, 20.0);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let mut maker = MakeRequestUuid;
        let request = Request::new(());
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
