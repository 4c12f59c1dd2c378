//! Persistence of reactor configurations.
//!
//! A configuration is stored as a flat key-value record in either JSON or TOML. The format
//! is chosen from the file extension by [`load_configuration`] and [`save_configuration`];
//! the format types implementing [`traits::ConfigurationFile`] can also be used directly.

pub mod json_file;
pub mod toml_file;
pub mod traits;

use crate::core::models::config::ReactorConfiguration;
use json_file::{JsonFile, JsonFileError};
use std::path::Path;
use thiserror::Error;
use toml_file::{TomlFile, TomlFileError};
use traits::ConfigurationFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, PersistenceError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(PersistenceError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Unsupported configuration format for '{path}' (expected .json or .toml)")]
    UnsupportedFormat { path: String },
    #[error("Failed to read or write JSON configuration '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: JsonFileError,
    },
    #[error("Failed to read or write TOML configuration '{path}': {source}")]
    Toml {
        path: String,
        #[source]
        source: TomlFileError,
    },
}

pub fn load_configuration(path: &Path) -> Result<ReactorConfiguration, PersistenceError> {
    let path_str = || path.display().to_string();
    match ConfigFormat::from_path(path)? {
        ConfigFormat::Json => JsonFile::read_from_path(path).map_err(|source| PersistenceError::Json {
            path: path_str(),
            source,
        }),
        ConfigFormat::Toml => TomlFile::read_from_path(path).map_err(|source| PersistenceError::Toml {
            path: path_str(),
            source,
        }),
    }
}

pub fn save_configuration(config: &ReactorConfiguration, path: &Path) -> Result<(), PersistenceError> {
    let path_str = || path.display().to_string();
    match ConfigFormat::from_path(path)? {
        ConfigFormat::Json => JsonFile::write_to_path(config, path).map_err(|source| PersistenceError::Json {
            path: path_str(),
            source,
        }),
        ConfigFormat::Toml => TomlFile::write_to_path(config, path).map_err(|source| PersistenceError::Toml {
            path: path_str(),
            source,
        }),
    }
}
