//! Business list CSV reader
//!
//! Expected columns: `business_name` (mandatory), optionally `city`, `state`,
//! `zip`. Extra columns are ignored. A missing `business_name` header is the
//! one hard error of a run and is reported before any lookup starts.

use crate::error::{SearchError, SearchResult};
use crate::models::BusinessIdentity;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub const NAME_COLUMN: &str = "business_name";
const CITY_COLUMN: &str = "city";
const STATE_COLUMN: &str = "state";
const ZIP_COLUMN: &str = "zip";

/// Load the business list from a CSV file
pub fn load_business_list(path: &Path) -> SearchResult<Vec<BusinessIdentity>> {
    let file = File::open(path)?;
    let businesses = read_business_list(file)?;
    info!("Loaded {} businesses from {}", businesses.len(), path.display());
    Ok(businesses)
}

/// Read a business list from any CSV source
///
/// Rows with a blank business name are skipped with a warning.
pub fn read_business_list<R: Read>(reader: R) -> SearchResult<Vec<BusinessIdentity>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let name_idx = column(NAME_COLUMN).ok_or_else(|| SearchError::MissingColumn(NAME_COLUMN.to_string()))?;
    let city_idx = column(CITY_COLUMN);
    let state_idx = column(STATE_COLUMN);
    let zip_idx = column(ZIP_COLUMN);

    let mut businesses = Vec::new();

    for (row_num, result) in reader.records().enumerate() {
        let record = result?;
        // +2: 1-indexed plus header row
        let line = row_num + 2;

        let name = field(&record, Some(name_idx));
        let identity = match BusinessIdentity::new(name) {
            Ok(identity) => identity,
            Err(_) => {
                warn!("Skipping row {}: blank {}", line, NAME_COLUMN);
                continue;
            }
        };

        businesses.push(
            identity
                .with_city(field(&record, city_idx))
                .with_state(field(&record, state_idx))
                .with_zip(field(&record, zip_idx)),
        );
    }

    Ok(businesses)
}

fn field(record: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).unwrap_or("")
}

/// Write a three-row demonstration business list
pub fn write_sample_business_list(path: &Path) -> SearchResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([NAME_COLUMN, CITY_COLUMN, STATE_COLUMN])?;
    writer.write_record(["Microsoft Corporation", "Redmond", "WA"])?;
    writer.write_record(["Apple Inc", "Cupertino", "CA"])?;
    writer.write_record(["Small Business Example LLC", "Chicago", "IL"])?;
    writer.flush()?;

    info!("Created sample CSV file: {}", path.display());
    Ok(())
}
