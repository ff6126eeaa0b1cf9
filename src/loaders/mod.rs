pub mod csv_export;
pub mod demo;

#[cfg(test)]
mod tests;

use crate::error::LoadError;
use crate::results::LinkRecord;
use std::path::PathBuf;

/// Where the link table comes from
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Built-in demonstration table
    Demo,
    /// Crawl export on disk
    File(PathBuf),
    /// Crawl export already in memory
    Bytes(Vec<u8>),
}

impl InputSource {
    /// Pick the demo table when no path was given
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => InputSource::File(path),
            None => InputSource::Demo,
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, InputSource::Demo)
    }
}

/// Load the link table for an input source
pub fn load(source: &InputSource) -> Result<Vec<LinkRecord>, LoadError> {
    let records = match source {
        InputSource::Demo => {
            ::log::debug!("No input file given, using demo dataset");
            demo::records()
        }
        InputSource::File(path) => csv_export::load_file(path)?,
        InputSource::Bytes(bytes) => csv_export::parse(bytes)?,
    };

    ::log::info!("Loaded {} links", records.len());
    Ok(records)
}
