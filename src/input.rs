use crate::constants::{NAME_COLUMN, URL_COLUMN};
use crate::error::{ImportError, Result};
use crate::types::{InputRow, RowError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// A decoded row, or the reason it could not be decoded
pub type RowRead = std::result::Result<InputRow, RowError>;

/// Column positions of the required fields
#[derive(Debug, Clone, Copy)]
struct Columns {
    name: usize,
    url: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == wanted)
        };
        match (find(NAME_COLUMN), find(URL_COLUMN)) {
            (Some(name), Some(url)) => Ok(Self { name, url }),
            (name, url) => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push(NAME_COLUMN);
                }
                if url.is_none() {
                    missing.push(URL_COLUMN);
                }
                Err(ImportError::Input(format!(
                    "input is missing required column(s): {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

/// Read every row of a monitor list file.
///
/// Missing files and missing `name`/`url` headers are fatal; a single
/// undecodable record is returned as a `RowError` in file order.
#[instrument]
pub fn read_rows(path: &Path) -> Result<Vec<RowRead>> {
    let file = File::open(path).map_err(|e| {
        ImportError::Input(format!("Failed to open input file '{}': {}", path.display(), e))
    })?;
    let rows = read_rows_from(file)?;
    info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn read_rows_from<R: Read>(reader: R) -> Result<Vec<RowRead>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::locate(rdr.headers()?)?;
    debug!(?columns, "Located input columns");

    let mut rows = Vec::new();
    for record in rdr.records() {
        match record {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
                rows.push(Ok(InputRow {
                    line,
                    name: field(columns.name),
                    url: field(columns.url),
                }));
            }
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                let line = e.position().map(|p| p.line());
                warn!(?line, "Unreadable input record: {}", e);
                rows.push(Err(RowError { line, message: e.to_string() }));
            }
        }
    }
    Ok(rows)
}
