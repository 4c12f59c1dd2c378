use crate::core::models::config::ReactorConfiguration;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Defines the interface for reading and writing persisted reactor configurations.
///
/// Every implementor stores the flat key-value record of a [`ReactorConfiguration`] in a
/// structured text format. Numeric fields must round-trip bit-for-bit through
/// `write_to` followed by `read_from`.
pub trait ConfigurationFile {
    /// The error type for I/O and (de)serialization failures.
    type Error: Error + From<io::Error>;

    /// Reads a configuration from a reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The reader to consume.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the content does not describe a configuration.
    fn read_from(reader: &mut impl Read) -> Result<ReactorConfiguration, Self::Error>;

    /// Writes a configuration to a writer.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration to serialize.
    /// * `writer` - The writer to output to.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    fn write_to(config: &ReactorConfiguration, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<ReactorConfiguration, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a configuration to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        config: &ReactorConfiguration,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(config, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
