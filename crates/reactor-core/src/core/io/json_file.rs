use super::traits::ConfigurationFile;
use crate::core::models::config::ReactorConfiguration;
use std::io::{self, Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pretty-printed JSON configuration files (`.json`).
pub struct JsonFile;

impl ConfigurationFile for JsonFile {
    type Error = JsonFileError;

    fn read_from(reader: &mut impl Read) -> Result<ReactorConfiguration, Self::Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    fn write_to(config: &ReactorConfiguration, writer: &mut impl Write) -> Result<(), Self::Error> {
        serde_json::to_writer_pretty(&mut *writer, config)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
