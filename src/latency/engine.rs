//! Eligibility queries over the loaded latency data.

use std::path::Path;

use crate::latency::error::{LoadResult, QueryError};
use crate::latency::matrix::LatencyMatrix;
use crate::latency::metadata::MetadataTable;
use crate::latency::types::{RegionInfo, RegionMetadata};

/// Read-only snapshot of the latency matrix and region metadata.
///
/// Built once at startup and shared behind an `Arc`; no method mutates it,
/// so concurrent handlers need no locking.
#[derive(Debug, Clone, Default)]
pub struct LatencyEngine {
    matrix: LatencyMatrix,
    metadata: MetadataTable,
}

impl LatencyEngine {
    pub fn new(matrix: LatencyMatrix, metadata: MetadataTable) -> Self {
        Self { matrix, metadata }
    }

    /// Load the latency matrix from disk and pair it with `metadata`.
    pub fn load(path: &Path, metadata: MetadataTable, unknown_token: &str) -> LoadResult<Self> {
        let matrix = LatencyMatrix::load(path, unknown_token)?;
        Ok(Self::new(matrix, metadata))
    }

    /// Regions whose measured latency from `origin` is at most `max_latency_ms`.
    ///
    /// Results follow the matrix header order. When the origin's row has no
    /// self-latency cell the origin is appended last, without a threshold
    /// check. A recorded self-latency is filtered like any other target, so
    /// an origin whose own measurement exceeds the threshold is left out.
    pub fn find_eligible_regions(
        &self,
        origin: &str,
        max_latency_ms: f64,
    ) -> Result<Vec<RegionInfo>, QueryError> {
        let outbound = self
            .matrix
            .outbound(origin)
            .ok_or_else(|| QueryError::NotFound(origin.to_string()))?;

        let mut eligible: Vec<RegionInfo> = outbound
            .filter(|(_, latency)| *latency <= max_latency_ms)
            .map(|(region, _)| RegionInfo::new(region, self.metadata.get(region)))
            .collect();

        if self.matrix.get(origin, origin).is_none() {
            eligible.push(RegionInfo::new(origin, self.metadata.get(origin)));
        }

        tracing::debug!(
            origin = %origin,
            max_latency_ms,
            eligible = eligible.len(),
            "Eligibility query answered"
        );

        Ok(eligible)
    }

    /// Every region named in the matrix header, in file order.
    pub fn regions(&self) -> &[String] {
        self.matrix.regions()
    }

    pub fn source_count(&self) -> usize {
        self.matrix.source_count()
    }

    pub fn latency(&self, source: &str, target: &str) -> Option<f64> {
        self.matrix.get(source, target)
    }

    pub fn metadata(&self, region: &str) -> Option<&RegionMetadata> {
        self.metadata.get(region)
    }

    pub fn metadata_count(&self) -> usize {
        self.metadata.len()
    }
}
