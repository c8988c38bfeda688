//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the region map, then the latency matrix that consumes it
//! - Report dataset size
//!
//! # Design Decisions
//! - Fail fast: any load error is fatal, there is no degraded mode
//! - Datasets load before the listener binds

use std::sync::Arc;

use crate::config::DataConfig;
use crate::latency::{LatencyEngine, LoadError, MetadataTable};
use crate::observability::metrics;

/// Build the immutable engine from the configured data files.
pub fn load_engine(config: &DataConfig) -> Result<Arc<LatencyEngine>, LoadError> {
    let metadata = MetadataTable::load(&config.region_map_path, &config.metadata_columns)?;
    tracing::info!(path = %config.region_map_path.display(), "Region map loaded");

    let engine = LatencyEngine::load(&config.latency_matrix_path, metadata, &config.unknown_token)?;
    tracing::info!(
        path = %config.latency_matrix_path.display(),
        provider = %config.provider,
        catalog_regions = engine.regions().len(),
        source_regions = engine.source_count(),
        metadata_regions = engine.metadata_count(),
        "Latency matrix loaded"
    );
    metrics::record_dataset(engine.regions().len(), engine.source_count());

    Ok(Arc::new(engine))
}
