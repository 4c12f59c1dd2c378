use super::traits::ConfigurationFile;
use crate::core::models::config::ReactorConfiguration;
use std::io::{self, Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TomlFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// TOML configuration files (`.toml`).
pub struct TomlFile;

impl ConfigurationFile for TomlFile {
    type Error = TomlFileError;

    fn read_from(reader: &mut impl Read) -> Result<ReactorConfiguration, Self::Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Ok(toml::from_str(&content)?)
    }

    fn write_to(config: &ReactorConfiguration, writer: &mut impl Write) -> Result<(), Self::Error> {
        let content = toml::to_string(config)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_flat_key_value_record() {
        let mut input = r#"
major_radius = 5.79
minor_radius = 2.58
elongation = 1.58
first_wall_material = "tungsten_copper"
"#
        .as_bytes();
        let config = TomlFile::read_from(&mut input).unwrap();
        assert_eq!(config.minor_radius, 2.58);
        assert_eq!(config.first_wall_material, "tungsten_copper");
        assert_eq!(config.blanket_material, "lithium_lead");
    }

    #[test]
    fn write_then_read_is_exact() {
        let config = ReactorConfiguration {
            initial_temperature: 163_934_426.229_508_2,
            toroidal_field: 18.670_000_000_000_002,
            ..Default::default()
        };
        let mut buffer = Vec::new();
        TomlFile::write_to(&config, &mut buffer).unwrap();
        let reloaded = TomlFile::read_from(&mut buffer.as_slice()).unwrap();
        assert_eq!(
            reloaded.initial_temperature.to_bits(),
            config.initial_temperature.to_bits()
        );
        assert_eq!(reloaded, config);
    }

    #[test]
    fn type_mismatch_is_a_parse_error() {
        let mut input = "major_radius = \"big\"\n".as_bytes();
        assert!(matches!(
            TomlFile::read_from(&mut input),
            Err(TomlFileError::Parse(_))
        ));
    }
}
