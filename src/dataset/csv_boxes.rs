//! Per-image CSV annotation reader.
//!
//! Each image may have a `csv/<stem>.csv` file with the header
//! `#item,x,y,width,height,label`, one row per detected region.
//! Coordinates are top-left pixel values as decimal text; `label` is
//! either a numeric label ID or a class name (the dataset carried both
//! conventions over its lifetime).
//!
//! A syntactically bad row is rejected and counted, never fatal - the
//! rest of the file is still processed. Only an unreadable file aborts.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::bbox::BBoxXYWH;
use crate::error::PlantCocoError;

/// One raw annotation row, before label resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct RawBox {
    pub item: u64,
    pub bbox: BBoxXYWH,
    pub label: String,
}

/// A row that failed to parse, with enough context to report it.
#[derive(Clone, Debug)]
pub struct RowRejection {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub reason: String,
}

/// The outcome of reading one per-image CSV file.
#[derive(Debug, Default)]
pub struct ParsedCsv {
    pub rows: Vec<RawBox>,
    pub rejected: Vec<RowRejection>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "#item")]
    item: u64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    label: String,
}

/// Reads a per-image CSV annotation file.
///
/// # Errors
/// Returns an error only if the file cannot be opened or its header is
/// unreadable; malformed data rows land in [`ParsedCsv::rejected`].
pub fn read_csv_boxes(path: &Path) -> Result<ParsedCsv, PlantCocoError> {
    let file = File::open(path).map_err(PlantCocoError::Io)?;
    let reader = csv::Reader::from_reader(BufReader::new(file));
    parse_rows(reader, path)
}

/// Reads annotation rows from a CSV string.
///
/// Useful for testing without file I/O.
pub fn from_csv_str(csv_str: &str) -> Result<ParsedCsv, PlantCocoError> {
    let reader = csv::Reader::from_reader(csv_str.as_bytes());
    parse_rows(reader, Path::new("<string>"))
}

fn parse_rows<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    path: &Path,
) -> Result<ParsedCsv, PlantCocoError> {
    // Surface header-level problems (e.g. an unreadable file) as a fatal
    // error before treating anything as a row rejection.
    reader
        .headers()
        .map_err(|source| PlantCocoError::CsvRead {
            path: path.to_path_buf(),
            source,
        })?;

    let mut parsed = ParsedCsv::default();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row_number = index + 1;
        match result {
            Ok(row) => parsed.rows.push(RawBox {
                item: row.item,
                bbox: BBoxXYWH::new(row.x, row.y, row.width, row.height),
                label: row.label.trim().to_string(),
            }),
            Err(source) => parsed.rejected.push(RowRejection {
                row: row_number,
                reason: source.to_string(),
            }),
        }
    }

    Ok(parsed)
}
