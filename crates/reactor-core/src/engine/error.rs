use thiserror::Error;

use super::config::ConfigError;
use crate::core::materials::MaterialError;
use crate::core::models::config::InvalidConfiguration;
use crate::core::physics::PhysicsError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid reactor configuration: {source}")]
    Configuration {
        #[from]
        source: InvalidConfiguration,
    },

    #[error("Material resolution failed: {source}")]
    Material {
        #[from]
        source: MaterialError,
    },

    #[error("Physics model rejected its inputs: {source}")]
    Physics {
        #[from]
        source: PhysicsError,
    },

    #[error("Invalid engine settings: {source}")]
    Settings {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid run parameters: max_time={max_time}, dt={dt} ({reason})")]
    InvalidRunParameters {
        max_time: f64,
        dt: f64,
        reason: &'static str,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
