//! JSON helpers shared by the network and training configuration files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Reads and deserializes a JSON config file.
///
/// Malformed JSON, unknown activation/loss/initializer names and missing
/// required fields are all reported as [`Error::InvalidConfiguration`].
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("loading config {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader)
        .map_err(|e| Error::InvalidConfiguration(format!("{}: {e}", path.display())))
}

/// Parses a JSON config document held in memory.
pub(crate) fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| Error::InvalidConfiguration(e.to_string()))
}

/// Writes `value` as pretty-printed JSON.
pub(crate) fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}
