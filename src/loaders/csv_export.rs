use crate::error::LoadError;
use crate::results::LinkRecord;
use std::path::Path;

/// Columns every crawl export must carry
pub const REQUIRED_COLUMNS: [&str; 4] = ["Fuente", "Destino", "Ancla", "Código de estado"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read a crawl export from disk
pub fn load_file(path: &Path) -> Result<Vec<LinkRecord>, LoadError> {
    ::log::info!("Reading crawl export: {}", path.display());

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&bytes)
}

/// Parses a semicolon-separated crawl export.
///
/// The first row must be the header. A leading UTF-8 byte-order mark is
/// ignored and columns beyond the required ones are skipped. Any bad row
/// fails the whole load.
pub fn parse(bytes: &[u8]) -> Result<Vec<LinkRecord>, LoadError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<LinkRecord>() {
        records.push(row?);
    }

    ::log::debug!("Parsed {} rows from {} columns", records.len(), headers.len());
    Ok(records)
}
