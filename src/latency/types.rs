//! Region and query types shared by the loaders, the engine and the HTTP layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::latency::error::QueryError;

/// Descriptive, non-latency attributes of a region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionMetadata {
    /// ISO 3166-1 alpha-2 country code (may be empty).
    pub iso_country_code_a2: String,
    /// Free-text physical location label (may be empty).
    pub physical_location: String,
}

/// One entry of an eligibility result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    pub name: String,
    pub iso_country_code_a2: String,
    pub physical_location: String,
}

impl RegionInfo {
    /// Build an entry for `name`, with empty fields when no metadata is known.
    pub fn new(name: impl Into<String>, metadata: Option<&RegionMetadata>) -> Self {
        let (iso, location) = match metadata {
            Some(m) => (m.iso_country_code_a2.clone(), m.physical_location.clone()),
            None => (String::new(), String::new()),
        };
        Self {
            name: name.into(),
            iso_country_code_a2: iso,
            physical_location: location,
        }
    }
}

/// Cloud providers with a loaded latency dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Azure,
}

impl CloudProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Azure => "azure",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudProvider {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "azure" => Ok(CloudProvider::Azure),
            _ => Err(QueryError::InvalidInput(
                "unsupported cloud provider".to_string(),
            )),
        }
    }
}

/// A validated eligibility query.
///
/// Construction enforces the serving-layer rules: non-empty origin, a
/// strictly positive finite threshold, and a known provider. Checks run in
/// that order and the first failure is reported.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibilityQuery {
    pub origin_region: String,
    pub max_latency_ms: f64,
    pub provider: CloudProvider,
}

impl EligibilityQuery {
    pub fn new(
        origin_region: &str,
        max_latency_ms: f64,
        cloud_provider: &str,
    ) -> Result<Self, QueryError> {
        if origin_region.is_empty() {
            return Err(QueryError::InvalidInput(
                "origin_region is required".to_string(),
            ));
        }
        if !max_latency_ms.is_finite() || max_latency_ms <= 0.0 {
            return Err(QueryError::InvalidInput(
                "max_latency must be greater than 0".to_string(),
            ));
        }
        if cloud_provider.is_empty() {
            return Err(QueryError::InvalidInput(
                "cloud_provider is required".to_string(),
            ));
        }
        let provider = cloud_provider.parse()?;

        Ok(Self {
            origin_region: origin_region.to_string(),
            max_latency_ms,
            provider,
        })
    }
}
