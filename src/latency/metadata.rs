//! Region metadata table.
//!
//! # Responsibilities
//! - Parse the region map (region → country code, physical location)
//! - Resolve fields by fixed column position, not by header name
//! - Answer lookups by exact region id
//!
//! # Design Decisions
//! - Header row is read for width only and then discarded
//! - Rows narrower than the layout are skipped with a warning
//! - Later rows for the same region overwrite earlier ones

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::latency::error::{LoadError, LoadResult};
use crate::latency::types::RegionMetadata;

const TABLE: &str = "region metadata";

/// Column positions of the region map file (layout version 1).
///
/// Version 1 is `Region, ISO alpha-2, City, Physical Location`; the city
/// column is not used. Bump the layout in config when the file changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataLayout {
    pub region: usize,
    pub iso_country_code: usize,
    pub physical_location: usize,
}

impl Default for MetadataLayout {
    fn default() -> Self {
        Self {
            region: 0,
            iso_country_code: 1,
            physical_location: 3,
        }
    }
}

impl MetadataLayout {
    /// Minimum number of columns a row needs to be usable.
    pub fn required_columns(&self) -> usize {
        self.region
            .max(self.iso_country_code)
            .max(self.physical_location)
            + 1
    }
}

/// Immutable lookup from region id to metadata.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    entries: HashMap<String, RegionMetadata>,
}

impl MetadataTable {
    /// Load the table from a CSV file on disk.
    pub fn load(path: &Path, layout: &MetadataLayout) -> LoadResult<Self> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            table: TABLE,
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, layout)
    }

    /// Parse the table from any CSV byte source.
    pub fn from_reader<R: Read>(reader: R, layout: &MetadataLayout) -> LoadResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = reader.byte_records();
        let required = layout.required_columns();

        let header = records
            .next()
            .ok_or(LoadError::MissingHeader { table: TABLE })?
            .map_err(|source| LoadError::Read { table: TABLE, source })?;
        if header.len() < required {
            return Err(LoadError::MalformedHeader {
                table: TABLE,
                required,
                found: header.len(),
            });
        }

        let mut entries = HashMap::new();
        for result in records {
            let row = result.map_err(|source| LoadError::Read { table: TABLE, source })?;
            if row.len() < required {
                tracing::warn!(
                    line = ?row.position().map(|p| p.line()),
                    columns = row.len(),
                    required,
                    "Skipping short region metadata row"
                );
                continue;
            }

            let fields = (
                std::str::from_utf8(&row[layout.region]),
                std::str::from_utf8(&row[layout.iso_country_code]),
                std::str::from_utf8(&row[layout.physical_location]),
            );
            let (Ok(region), Ok(iso_country_code), Ok(physical_location)) = fields else {
                tracing::warn!(
                    line = ?row.position().map(|p| p.line()),
                    "Skipping region metadata row that is not valid UTF-8"
                );
                continue;
            };
            let metadata = RegionMetadata {
                iso_country_code_a2: iso_country_code.to_string(),
                physical_location: physical_location.to_string(),
            };
            if entries.insert(region.to_string(), metadata).is_some() {
                tracing::debug!(region = %region, "Duplicate region metadata row, keeping the last one");
            }
        }

        Ok(Self { entries })
    }

    /// Look up a region's metadata. Absence is normal.
    pub fn get(&self, region: &str) -> Option<&RegionMetadata> {
        self.entries.get(region)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Region,ISO alpha-2,City,Physical Location\n";

    fn parse(body: &str) -> LoadResult<MetadataTable> {
        MetadataTable::from_reader(body.as_bytes(), &MetadataLayout::default())
    }

    #[test]
    fn test_parses_rows_by_position() {
        let table = parse(&format!(
            "{HEADER}West Europe,NL,Amsterdam,Netherlands\nItaly North,IT,Milan,Italy\n"
        ))
        .unwrap();

        assert_eq!(table.len(), 2);
        let west = table.get("West Europe").unwrap();
        assert_eq!(west.iso_country_code_a2, "NL");
        assert_eq!(west.physical_location, "Netherlands");
        assert!(table.get("west europe").is_none());
    }

    #[test]
    fn test_last_row_wins() {
        let table = parse(&format!(
            "{HEADER}West US,US,San Jose,California\nWest US,US,,Washington\n"
        ))
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("West US").unwrap().physical_location, "Washington");
    }

    #[test]
    fn test_empty_fields_are_kept() {
        let table = parse(&format!("{HEADER}Qatar Central,,,\n")).unwrap();
        let metadata = table.get("Qatar Central").unwrap();
        assert_eq!(metadata, &RegionMetadata::default());
    }

    #[test]
    fn test_short_row_is_skipped() {
        let table = parse(&format!(
            "{HEADER}Broken Region,XX\nNorway East,NO,Oslo,Norway\n"
        ))
        .unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.get("Broken Region").is_none());
        assert!(table.get("Norway East").is_some());
    }

    #[test]
    fn test_non_utf8_row_is_skipped() {
        let body: Vec<u8> = [
            HEADER.as_bytes(),
            &b"Bad Region,\xff\xfe,City,Place\n"[..],
            &b"Norway East,NO,Oslo,Norway\n"[..],
        ]
        .concat();
        let table = MetadataTable::from_reader(body.as_slice(), &MetadataLayout::default()).unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.get("Bad Region").is_none());
        assert_eq!(table.get("Norway East").unwrap().physical_location, "Norway");
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(parse(""), Err(LoadError::MissingHeader { .. })));
    }

    #[test]
    fn test_narrow_header() {
        let err = parse("Region,ISO alpha-2\nWest US,US\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedHeader { required: 4, found: 2, .. }
        ));
    }

    #[test]
    fn test_custom_layout() {
        let layout = MetadataLayout {
            region: 2,
            iso_country_code: 0,
            physical_location: 1,
        };
        assert_eq!(layout.required_columns(), 3);

        let table =
            MetadataTable::from_reader("iso,location,name\nJP,Tokyo,Japan East\n".as_bytes(), &layout)
                .unwrap();
        assert_eq!(table.get("Japan East").unwrap().iso_country_code_a2, "JP");
    }

    #[test]
    fn test_missing_file() {
        let err = MetadataTable::load(Path::new("/nonexistent/map.csv"), &MetadataLayout::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }
}
