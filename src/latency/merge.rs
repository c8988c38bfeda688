//! Offline merge of per-source latency tables into a single matrix.
//!
//! Measurements are published as several partial tables, each with a
//! `Source` column and one column per target region. This module outer-joins
//! them on `Source` and writes the combined matrix the server loads.
//!
//! # Output Layout
//! - `Source` first, then every target region sorted alphabetically
//! - Rows sorted by source region
//! - Cells nobody measured are written as the unknown token

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::latency::error::{LoadError, LoadResult};

const TABLE: &str = "partial latency table";

/// Name of the join column in every partial table.
pub const SOURCE_COLUMN: &str = "Source";

/// Outer join of any number of partial latency tables.
#[derive(Debug, Clone, Default)]
pub struct MergedMatrix {
    targets: BTreeSet<String>,
    rows: BTreeMap<String, BTreeMap<String, String>>,
}

impl MergedMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one partial table into the matrix.
    ///
    /// Returns `Ok(false)` when the table has no `Source` column and was
    /// skipped. Empty cells and `unknown_token` never overwrite a value.
    pub fn add_table<R: Read>(&mut self, reader: R, unknown_token: &str) -> LoadResult<bool> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|source| LoadError::Read { table: TABLE, source })?
            .clone();

        let Some(source_idx) = headers.iter().position(|h| h == SOURCE_COLUMN) else {
            return Ok(false);
        };

        for (idx, target) in headers.iter().enumerate() {
            if idx != source_idx {
                self.targets.insert(target.to_string());
            }
        }

        for result in reader.records() {
            let row = result.map_err(|source| LoadError::Read { table: TABLE, source })?;
            let Some(source_region) = row.get(source_idx).filter(|s| !s.is_empty()) else {
                continue;
            };
            let cells = self.rows.entry(source_region.to_string()).or_default();
            for (idx, value) in row.iter().enumerate() {
                if idx == source_idx || value.is_empty() || value == unknown_token {
                    continue;
                }
                if let Some(target) = headers.get(idx) {
                    cells.insert(target.to_string(), value.to_string());
                }
            }
        }

        Ok(true)
    }

    /// Merge every `*.csv` file in `dir`, in file-name order.
    pub fn from_directory(dir: &Path, unknown_token: &str) -> LoadResult<Self> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|source| open_error(dir, source))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        paths.sort();

        let mut merged = Self::new();
        for path in paths {
            let file = File::open(&path).map_err(|source| open_error(&path, source))?;
            if merged.add_table(file, unknown_token)? {
                tracing::info!(path = %path.display(), "Merged latency table");
            } else {
                tracing::warn!(
                    path = %path.display(),
                    column = SOURCE_COLUMN,
                    "Join column not found, skipping file"
                );
            }
        }

        Ok(merged)
    }

    /// Target regions in output column order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(String::as_str)
    }

    /// Source regions in output row order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn get(&self, source: &str, target: &str) -> Option<&str> {
        self.rows.get(source)?.get(target).map(String::as_str)
    }

    /// Write the merged matrix as CSV.
    pub fn write_csv<W: Write>(&self, writer: W, unknown_token: &str) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);

        let mut header = vec![SOURCE_COLUMN];
        header.extend(self.targets());
        writer.write_record(&header)?;

        for (source, cells) in &self.rows {
            let mut record = Vec::with_capacity(self.targets.len() + 1);
            record.push(source.as_str());
            for target in &self.targets {
                record.push(cells.get(target).map_or(unknown_token, String::as_str));
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn open_error(path: &Path, source: std::io::Error) -> LoadError {
    LoadError::Open {
        table: TABLE,
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::matrix::{LatencyMatrix, DEFAULT_UNKNOWN_TOKEN};

    fn merged(tables: &[&str]) -> MergedMatrix {
        let mut merged = MergedMatrix::new();
        for table in tables {
            merged.add_table(table.as_bytes(), DEFAULT_UNKNOWN_TOKEN).unwrap();
        }
        merged
    }

    #[test]
    fn test_outer_join_on_source() {
        let merged = merged(&[
            "Source,West US,East US\nWest US,2,60\nEast US,61,2\n",
            "Source,North Europe\nWest US,140\nNorth Europe,N/A\n",
        ]);

        assert_eq!(
            merged.targets().collect::<Vec<_>>(),
            vec!["East US", "North Europe", "West US"]
        );
        assert_eq!(
            merged.sources().collect::<Vec<_>>(),
            vec!["East US", "North Europe", "West US"]
        );
        assert_eq!(merged.get("West US", "North Europe"), Some("140"));
        assert_eq!(merged.get("East US", "North Europe"), None);
        assert_eq!(merged.get("North Europe", "North Europe"), None);
    }

    #[test]
    fn test_table_without_source_column_is_skipped() {
        let mut merged = MergedMatrix::new();
        let added = merged
            .add_table("Region,West US\nWest US,2\n".as_bytes(), DEFAULT_UNKNOWN_TOKEN)
            .unwrap();
        assert!(!added);
        assert_eq!(merged.targets().count(), 0);
    }

    #[test]
    fn test_later_values_overwrite() {
        let merged = merged(&["Source,A\nA,5\n", "Source,A\nA,7\n", "Source,A\nA,N/A\n"]);
        assert_eq!(merged.get("A", "A"), Some("7"));
    }

    #[test]
    fn test_written_matrix_loads() {
        let merged = merged(&[
            "Source,B,A\nA,10,1\n",
            "Source,C\nB,4\n",
        ]);

        let mut out = Vec::new();
        merged.write_csv(&mut out, DEFAULT_UNKNOWN_TOKEN).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert_eq!(text, "Source,A,B,C\nA,1,10,N/A\nB,N/A,N/A,4\n");

        let matrix = LatencyMatrix::from_reader(out.as_slice(), DEFAULT_UNKNOWN_TOKEN).unwrap();
        assert_eq!(matrix.get("A", "B"), Some(10.0));
        assert_eq!(matrix.get("B", "C"), Some(4.0));
        assert_eq!(matrix.get("B", "A"), None);
    }

    #[test]
    fn test_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "Source,X\nX,9\n").unwrap();
        fs::write(dir.path().join("a.csv"), "Source,X\nX,3\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "Source,X\nX,100\n").unwrap();

        let merged = MergedMatrix::from_directory(dir.path(), DEFAULT_UNKNOWN_TOKEN).unwrap();
        assert_eq!(merged.get("X", "X"), Some("9"));
    }

    #[test]
    fn test_missing_directory() {
        let err = MergedMatrix::from_directory(Path::new("/nonexistent/latencies"), "N/A")
            .unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }
}
