//! Directed latency matrix.
//!
//! # Responsibilities
//! - Parse the regions × regions latency CSV
//! - Keep the header's region order as the catalog of known regions
//! - Answer (source, target) lookups and iterate a source's outbound edges
//!
//! # Design Decisions
//! - Rows are dense vectors aligned with the catalog; `None` means unmeasured
//! - The matrix is directed: `A → B` and `B → A` are independent cells
//! - Bad cells are logged and treated as unmeasured, never fatal

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::latency::error::{LoadError, LoadResult};

const TABLE: &str = "latency matrix";

/// Token used by the source data for "no measurement".
pub const DEFAULT_UNKNOWN_TOKEN: &str = "N/A";

/// Immutable latency matrix in milliseconds.
#[derive(Debug, Clone, Default)]
pub struct LatencyMatrix {
    /// Known target regions, in header order, without duplicates.
    regions: Vec<String>,
    /// Region id → position in `regions`.
    index: HashMap<String, usize>,
    /// Source region id → latencies aligned with `regions`.
    rows: HashMap<String, Vec<Option<f64>>>,
}

impl LatencyMatrix {
    /// Load the matrix from a CSV file on disk.
    pub fn load(path: &Path, unknown_token: &str) -> LoadResult<Self> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            table: TABLE,
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, unknown_token)
    }

    /// Parse the matrix from any CSV byte source.
    pub fn from_reader<R: Read>(reader: R, unknown_token: &str) -> LoadResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = reader.byte_records();

        let header = records
            .next()
            .ok_or(LoadError::MissingHeader { table: TABLE })?
            .map_err(|source| LoadError::Read { table: TABLE, source })?;

        // The first header cell labels the source column.
        let mut matrix = LatencyMatrix::default();
        let mut positions = Vec::with_capacity(header.len().saturating_sub(1));
        for raw in header.iter().skip(1) {
            let region = match std::str::from_utf8(raw) {
                Ok(region) => region.to_string(),
                Err(_) => {
                    let region = String::from_utf8_lossy(raw).into_owned();
                    tracing::warn!(region = %region, "Latency header region is not valid UTF-8");
                    region
                }
            };
            let position = match matrix.index.get(&region) {
                Some(&existing) => {
                    tracing::warn!(region = %region, "Duplicate region column in latency header");
                    existing
                }
                None => {
                    let next = matrix.regions.len();
                    matrix.index.insert(region.clone(), next);
                    matrix.regions.push(region);
                    next
                }
            };
            positions.push(position);
        }
        if matrix.regions.is_empty() {
            tracing::warn!("Latency header lists no target regions");
        }

        for result in records {
            let row = result.map_err(|source| LoadError::Read { table: TABLE, source })?;
            let line = row.position().map(|p| p.line());
            let Ok(source_region) = std::str::from_utf8(row.get(0).unwrap_or_default()) else {
                tracing::warn!(line = ?line, "Skipping latency row with a non-UTF-8 source region");
                continue;
            };
            if source_region.is_empty() {
                tracing::warn!(line = ?line, "Skipping latency row without a source region");
                continue;
            }

            let cells = row.len().saturating_sub(1);
            if cells > positions.len() {
                tracing::warn!(
                    source = %source_region,
                    extra = cells - positions.len(),
                    "Ignoring latency cells beyond the header"
                );
            }

            let mut latencies = vec![None; matrix.regions.len()];
            for (raw, &position) in row.iter().skip(1).zip(positions.iter()) {
                let cell = std::str::from_utf8(raw).ok();
                if cell == Some(unknown_token) {
                    continue;
                }
                match cell.and_then(parse_latency) {
                    Some(latency) => latencies[position] = Some(latency),
                    None => {
                        tracing::warn!(
                            source = %source_region,
                            target = %matrix.regions[position],
                            value = %String::from_utf8_lossy(raw),
                            "Could not parse latency value, treating as unknown"
                        );
                    }
                }
            }

            if matrix
                .rows
                .insert(source_region.to_string(), latencies)
                .is_some()
            {
                tracing::warn!(source = %source_region, "Duplicate latency row, keeping the last one");
            }
        }

        Ok(matrix)
    }

    /// All regions named in the header, in file order.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Number of source rows.
    pub fn source_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether `source` has a row of its own.
    pub fn contains_source(&self, source: &str) -> bool {
        self.rows.contains_key(source)
    }

    /// Measured latency from `source` to `target`, if any.
    pub fn get(&self, source: &str, target: &str) -> Option<f64> {
        let position = *self.index.get(target)?;
        self.rows.get(source)?[position]
    }

    /// Measured outbound edges of `source` in catalog order.
    ///
    /// Returns `None` when `source` has no row at all.
    pub fn outbound(&self, source: &str) -> Option<impl Iterator<Item = (&str, f64)> + '_> {
        let row = self.rows.get(source)?;
        Some(
            self.regions
                .iter()
                .zip(row.iter())
                .filter_map(|(region, cell)| cell.map(|latency| (region.as_str(), latency))),
        )
    }
}

/// Parse a cell as a finite, non-negative latency.
fn parse_latency(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|latency| latency.is_finite() && *latency >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> LatencyMatrix {
        LatencyMatrix::from_reader(body.as_bytes(), DEFAULT_UNKNOWN_TOKEN).unwrap()
    }

    #[test]
    fn test_parses_header_and_cells() {
        let matrix = parse(
            "Source,France South,Italy North,Switzerland North\n\
             Italy North,12,N/A,9\n\
             France South,N/A,13,14.5\n",
        );

        assert_eq!(
            matrix.regions(),
            ["France South", "Italy North", "Switzerland North"]
        );
        assert_eq!(matrix.source_count(), 2);
        assert_eq!(matrix.get("Italy North", "France South"), Some(12.0));
        assert_eq!(matrix.get("Italy North", "Italy North"), None);
        assert_eq!(matrix.get("France South", "Switzerland North"), Some(14.5));
    }

    #[test]
    fn test_matrix_is_directed() {
        let matrix = parse("Source,A,B\nA,N/A,10\nB,25,N/A\n");
        assert_eq!(matrix.get("A", "B"), Some(10.0));
        assert_eq!(matrix.get("B", "A"), Some(25.0));
    }

    #[test]
    fn test_bad_cells_are_skipped() {
        let matrix = parse("Source,A,B,C,D\nA,fast,-3,inf,7\nB,1,2,3,4\n");

        assert_eq!(matrix.get("A", "A"), None);
        assert_eq!(matrix.get("A", "B"), None);
        assert_eq!(matrix.get("A", "C"), None);
        assert_eq!(matrix.get("A", "D"), Some(7.0));
        assert_eq!(matrix.get("B", "D"), Some(4.0));
    }

    #[test]
    fn test_short_and_long_rows() {
        let matrix = parse("Source,A,B\nA,5\nB,1,2,3\n");

        assert_eq!(matrix.get("A", "A"), Some(5.0));
        assert_eq!(matrix.get("A", "B"), None);
        assert_eq!(matrix.get("B", "B"), Some(2.0));
        assert_eq!(matrix.regions().len(), 2);
    }

    #[test]
    fn test_duplicate_source_row_last_wins() {
        let matrix = parse("Source,A,B\nA,1,2\nA,N/A,8\n");
        assert_eq!(matrix.source_count(), 1);
        assert_eq!(matrix.get("A", "A"), None);
        assert_eq!(matrix.get("A", "B"), Some(8.0));
    }

    #[test]
    fn test_duplicate_header_column() {
        let matrix = parse("Source,A,B,A\nX,1,2,N/A\nY,1,2,3\n");

        assert_eq!(matrix.regions(), ["A", "B"]);
        // Later numeric cells overwrite, "N/A" does not erase.
        assert_eq!(matrix.get("X", "A"), Some(1.0));
        assert_eq!(matrix.get("Y", "A"), Some(3.0));
    }

    #[test]
    fn test_row_without_source_is_skipped() {
        let matrix = parse("Source,A\n,4\nA,1\n");
        assert_eq!(matrix.source_count(), 1);
        assert!(!matrix.contains_source(""));
    }

    #[test]
    fn test_outbound_in_catalog_order() {
        let matrix = parse("Source,C,A,B\nA,3,N/A,1\n");
        let edges: Vec<_> = matrix.outbound("A").unwrap().collect();
        assert_eq!(edges, vec![("C", 3.0), ("B", 1.0)]);
        assert!(matrix.outbound("Z").is_none());
    }

    #[test]
    fn test_custom_unknown_token() {
        let matrix = LatencyMatrix::from_reader("Source,A,B\nA,-,4\n".as_bytes(), "-").unwrap();
        assert_eq!(matrix.get("A", "A"), None);
        assert_eq!(matrix.get("A", "B"), Some(4.0));
    }

    #[test]
    fn test_non_utf8_cell_is_unknown() {
        let matrix =
            LatencyMatrix::from_reader(&b"Source,A,B\nA,\xff\xfe,4\nB,1,2\n"[..], DEFAULT_UNKNOWN_TOKEN)
                .unwrap();

        assert_eq!(matrix.get("A", "A"), None);
        assert_eq!(matrix.get("A", "B"), Some(4.0));
        assert_eq!(matrix.get("B", "A"), Some(1.0));
    }

    #[test]
    fn test_non_utf8_source_row_is_skipped() {
        let matrix =
            LatencyMatrix::from_reader(&b"Source,A\n\xff,4\nA,1\n"[..], DEFAULT_UNKNOWN_TOKEN)
                .unwrap();

        assert_eq!(matrix.source_count(), 1);
        assert_eq!(matrix.get("A", "A"), Some(1.0));
    }

    #[test]
    fn test_missing_header() {
        let err = LatencyMatrix::from_reader("".as_bytes(), DEFAULT_UNKNOWN_TOKEN).unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader { .. }));
    }
}
