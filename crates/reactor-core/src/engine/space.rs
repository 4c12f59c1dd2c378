use super::config::ConfigError;
use super::utils::sampling;
use crate::core::models::config::ReactorConfiguration;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cap on `minor_radius / major_radius` enforced by clamping.
const MAX_INVERSE_ASPECT_RATIO: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    MajorRadius,
    MinorRadius,
    Elongation,
    Triangularity,
    ToroidalField,
    PlasmaCurrent,
    InitialTemperature,
    InitialDensity,
    InputPower,
    AuxiliaryHeating,
    CurrentDrivePower,
    InitialTritiumInventory,
    InitialDeuteriumInventory,
}

impl Parameter {
    pub const ALL: [Parameter; 13] = [
        Parameter::MajorRadius,
        Parameter::MinorRadius,
        Parameter::Elongation,
        Parameter::Triangularity,
        Parameter::ToroidalField,
        Parameter::PlasmaCurrent,
        Parameter::InitialTemperature,
        Parameter::InitialDensity,
        Parameter::InputPower,
        Parameter::AuxiliaryHeating,
        Parameter::CurrentDrivePower,
        Parameter::InitialTritiumInventory,
        Parameter::InitialDeuteriumInventory,
    ];

    pub const DEFAULT_TUNABLE: [Parameter; 10] = [
        Parameter::MajorRadius,
        Parameter::MinorRadius,
        Parameter::Elongation,
        Parameter::ToroidalField,
        Parameter::PlasmaCurrent,
        Parameter::InitialTemperature,
        Parameter::InitialDensity,
        Parameter::InputPower,
        Parameter::AuxiliaryHeating,
        Parameter::CurrentDrivePower,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::MajorRadius => "major_radius",
            Self::MinorRadius => "minor_radius",
            Self::Elongation => "elongation",
            Self::Triangularity => "triangularity",
            Self::ToroidalField => "toroidal_field",
            Self::PlasmaCurrent => "plasma_current",
            Self::InitialTemperature => "initial_temperature",
            Self::InitialDensity => "initial_density",
            Self::InputPower => "input_power",
            Self::AuxiliaryHeating => "auxiliary_heating",
            Self::CurrentDrivePower => "current_drive_power",
            Self::InitialTritiumInventory => "initial_tritium_inventory",
            Self::InitialDeuteriumInventory => "initial_deuterium_inventory",
        }
    }

    pub fn default_bounds(&self) -> Bounds {
        let (min, max) = match self {
            Self::MajorRadius => (3.0, 10.0),
            Self::MinorRadius => (0.5, 3.0),
            Self::Elongation => (1.0, 2.5),
            Self::Triangularity => (0.0, 0.6),
            Self::ToroidalField => (2.0, 20.0),
            Self::PlasmaCurrent => (5e6, 20e6),
            Self::InitialTemperature => (50e6, 300e6),
            Self::InitialDensity => (0.5e20, 3.0e20),
            Self::InputPower => (10e6, 100e6),
            Self::AuxiliaryHeating => (0.0, 50e6),
            Self::CurrentDrivePower => (0.0, 20e6),
            Self::InitialTritiumInventory => (1e23, 1e26),
            Self::InitialDeuteriumInventory => (1e24, 1e27),
        };
        Bounds { min, max }
    }

    pub fn get(&self, config: &ReactorConfiguration) -> f64 {
        match self {
            Self::MajorRadius => config.major_radius,
            Self::MinorRadius => config.minor_radius,
            Self::Elongation => config.elongation,
            Self::Triangularity => config.triangularity,
            Self::ToroidalField => config.toroidal_field,
            Self::PlasmaCurrent => config.plasma_current,
            Self::InitialTemperature => config.initial_temperature,
            Self::InitialDensity => config.initial_density,
            Self::InputPower => config.input_power,
            Self::AuxiliaryHeating => config.auxiliary_heating,
            Self::CurrentDrivePower => config.current_drive_power,
            Self::InitialTritiumInventory => config.initial_tritium_inventory,
            Self::InitialDeuteriumInventory => config.initial_deuterium_inventory,
        }
    }

    pub fn set(&self, config: &mut ReactorConfiguration, value: f64) {
        let field = match self {
            Self::MajorRadius => &mut config.major_radius,
            Self::MinorRadius => &mut config.minor_radius,
            Self::Elongation => &mut config.elongation,
            Self::Triangularity => &mut config.triangularity,
            Self::ToroidalField => &mut config.toroidal_field,
            Self::PlasmaCurrent => &mut config.plasma_current,
            Self::InitialTemperature => &mut config.initial_temperature,
            Self::InitialDensity => &mut config.initial_density,
            Self::InputPower => &mut config.input_power,
            Self::AuxiliaryHeating => &mut config.auxiliary_heating,
            Self::CurrentDrivePower => &mut config.current_drive_power,
            Self::InitialTritiumInventory => &mut config.initial_tritium_inventory,
            Self::InitialDeuteriumInventory => &mut config.initial_deuterium_inventory,
        };
        *field = value;
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive `[min, max]` range of one configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn to_unit(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn from_unit(&self, unit: f64) -> f64 {
        self.min + unit.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

/// The bounded region of configuration space a search explores.
///
/// Clamping covers every bounded field, tunable or not, so any clamped configuration is
/// constructible. The tunable dimensions are the ones sampled by grid search and perturbed
/// by SPSA; all other fields keep the (clamped) values of the base configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSpace {
    bounds: [Bounds; 13],
    dimensions: Vec<Parameter>,
}

impl Default for ConfigurationSpace {
    fn default() -> Self {
        Self {
            bounds: Parameter::ALL.map(|p| p.default_bounds()),
            dimensions: Parameter::DEFAULT_TUNABLE.to_vec(),
        }
    }
}

impl ConfigurationSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrows the tunable dimensions to `dimensions`, keeping their order.
    pub fn with_dimensions(mut self, dimensions: &[Parameter]) -> Result<Self, ConfigError> {
        if dimensions.is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "dimensions",
                reason: "at least one tunable dimension is required".to_string(),
            });
        }
        for (i, p) in dimensions.iter().enumerate() {
            if dimensions[..i].contains(p) {
                return Err(ConfigError::InvalidParameter {
                    parameter: "dimensions",
                    reason: format!("'{p}' listed more than once"),
                });
            }
        }
        self.dimensions = dimensions.to_vec();
        Ok(self)
    }

    pub fn with_bounds(mut self, parameter: Parameter, min: f64, max: f64) -> Result<Self, ConfigError> {
        if !(min.is_finite() && max.is_finite() && min <= max) {
            return Err(ConfigError::InvalidParameter {
                parameter: "bounds",
                reason: format!("invalid range [{min}, {max}] for '{parameter}'"),
            });
        }
        self.bounds[parameter.index()] = Bounds { min, max };
        Ok(self)
    }

    pub fn dimensions(&self) -> &[Parameter] {
        &self.dimensions
    }

    pub fn bounds(&self, parameter: Parameter) -> Bounds {
        self.bounds[parameter.index()]
    }

    /// Moves every bounded field into range and caps the minor radius at 0.95 of the major
    /// radius. Silent, deterministic and idempotent.
    pub fn clamp(&self, config: &ReactorConfiguration) -> ReactorConfiguration {
        let mut clamped = config.clone();
        for parameter in Parameter::ALL {
            let value = self.bounds(parameter).clamp(parameter.get(config));
            parameter.set(&mut clamped, value);
        }
        clamped.minor_radius = clamped
            .minor_radius
            .min(MAX_INVERSE_ASPECT_RATIO * clamped.major_radius);
        clamped
    }

    /// Normalized coordinates of the tunable dimensions, each in `[0, 1]`.
    pub fn to_unit(&self, config: &ReactorConfiguration) -> Vec<f64> {
        self.dimensions
            .iter()
            .map(|p| self.bounds(*p).to_unit(p.get(config)))
            .collect()
    }

    /// Writes normalized coordinates into a copy of `base` and clamps the result.
    pub fn from_unit(&self, base: &ReactorConfiguration, unit: &[f64]) -> ReactorConfiguration {
        let mut config = base.clone();
        for (parameter, &u) in self.dimensions.iter().zip(unit) {
            parameter.set(&mut config, self.bounds(*parameter).from_unit(u));
        }
        self.clamp(&config)
    }

    /// Draws every tunable dimension uniformly within its bounds.
    pub fn sample(&self, base: &ReactorConfiguration, rng: &mut impl Rng) -> ReactorConfiguration {
        let unit = sampling::unit_point(self.dimensions.len(), rng);
        self.from_unit(base, &unit)
    }
}
