use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::ImportError;
use crate::models::{RawRow, RecordKind};
use crate::normalize::{self, NormalizedDataset};

/// Reads CSV text with a header row into header-keyed rows.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, ImportError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    debug!(rows = rows.len(), columns = headers.len(), "read CSV rows");
    Ok(rows)
}

pub fn import_csv<R: Read>(reader: R, kind: RecordKind) -> Result<NormalizedDataset, ImportError> {
    let rows = read_rows(reader)?;
    Ok(normalize::normalize(kind, &rows)?)
}

pub fn import_path(path: &Path, kind: RecordKind) -> Result<NormalizedDataset, ImportError> {
    let file = std::fs::File::open(path)?;
    import_csv(file, kind)
}
