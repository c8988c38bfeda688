//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check addresses parse and dataset settings are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than 0")]
    Zero { field: &'static str },

    #[error("{field}: must not be empty")]
    Empty { field: &'static str },

    #[error("data.metadata_columns: region, iso_country_code and physical_location must be distinct")]
    OverlappingColumns,
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::Zero { field: "listener.max_connections" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }

    let data = &config.data;
    if data.latency_matrix_path.as_os_str().is_empty() {
        errors.push(ValidationError::Empty { field: "data.latency_matrix_path" });
    }
    if data.region_map_path.as_os_str().is_empty() {
        errors.push(ValidationError::Empty { field: "data.region_map_path" });
    }
    if data.unknown_token.is_empty() {
        errors.push(ValidationError::Empty { field: "data.unknown_token" });
    }
    let columns = &data.metadata_columns;
    if columns.region == columns.iso_country_code
        || columns.region == columns.physical_location
        || columns.iso_country_code == columns.physical_location
    {
        errors.push(ValidationError::OverlappingColumns);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero { field: "security.max_body_size" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
