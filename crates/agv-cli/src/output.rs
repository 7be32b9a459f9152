//! CSV writers for spec rows and scraped device records.

use std::fs;
use std::path::Path;

use agv_core::{CanonicalSpec, RunOutcome};
use indexmap::IndexMap;

/// Columns placed first in a scraped records table.
const RECORD_FRONT: [&str; 3] = ["vendor", "device_name", "source_url"];

fn create_writer(path: &Path) -> anyhow::Result<csv::Writer<fs::File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(csv::Writer::from_path(path)?)
}

/// Record for an output row, attributed to its document when no candidate
/// carried an identifier.
pub fn row_spec(outcome: RunOutcome) -> CanonicalSpec {
    let mut spec = outcome.spec;
    spec.document_id.get_or_insert(outcome.document_id);
    spec
}

/// Write one row per spec. Missing cells are empty.
pub fn write_spec_table(path: &Path, specs: &[CanonicalSpec]) -> anyhow::Result<usize> {
    let columns = CanonicalSpec::table_columns(specs);
    let mut wtr = create_writer(path)?;

    wtr.write_record(&columns)?;
    for spec in specs {
        let row = spec.to_row();
        wtr.write_record(
            columns
                .iter()
                .map(|c| row.get(c).map(String::as_str).unwrap_or("")),
        )?;
    }

    wtr.flush()?;
    Ok(columns.len())
}

/// Column order for scraped records: fixed front columns, then every other
/// key in first-seen order.
pub fn record_columns(records: &[IndexMap<String, String>]) -> Vec<String> {
    let mut columns: Vec<String> = RECORD_FRONT.iter().map(|c| c.to_string()).collect();
    for record in records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Write scraped device records.
pub fn write_record_table(
    path: &Path,
    records: &[IndexMap<String, String>],
) -> anyhow::Result<usize> {
    let columns = record_columns(records);
    let mut wtr = create_writer(path)?;

    wtr.write_record(&columns)?;
    for record in records {
        wtr.write_record(
            columns
                .iter()
                .map(|c| record.get(c).map(String::as_str).unwrap_or("")),
        )?;
    }

    wtr.flush()?;
    Ok(columns.len())
}
