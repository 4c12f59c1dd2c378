use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidConfiguration {
    #[error("Field '{field}' must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("Field '{field}' must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("Field '{field}' must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("Minor radius ({minor} m) must be smaller than major radius ({major} m)")]
    MinorRadiusTooLarge { minor: f64, major: f64 },
    #[error("Material identifier for '{field}' must not be empty")]
    EmptyMaterial { field: &'static str },
}

/// Immutable description of a tokamak design and its initial operating point.
///
/// All quantities are SI: metres, tesla, amperes, kelvin, m⁻³, watts and atoms. Missing
/// fields in a persisted file fall back to the ITER-like defaults of [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReactorConfiguration {
    pub major_radius: f64,
    pub minor_radius: f64,
    pub elongation: f64,
    pub triangularity: f64,

    pub toroidal_field: f64,
    pub plasma_current: f64,

    pub initial_temperature: f64,
    pub initial_density: f64,

    pub first_wall_material: String,
    pub blanket_material: String,
    pub blanket_thickness: f64,

    pub input_power: f64,
    pub auxiliary_heating: f64,
    pub current_drive_power: f64,

    pub initial_tritium_inventory: f64,
    pub initial_deuterium_inventory: f64,
    pub min_tritium_inventory: f64,
}

impl Default for ReactorConfiguration {
    fn default() -> Self {
        Self {
            major_radius: 6.2,
            minor_radius: 2.0,
            elongation: 1.7,
            triangularity: 0.33,
            toroidal_field: 5.3,
            plasma_current: 15e6,
            initial_temperature: 150e6,
            initial_density: 1e20,
            first_wall_material: "tungsten".to_string(),
            blanket_material: "lithium_lead".to_string(),
            blanket_thickness: 1.0,
            input_power: 50e6,
            auxiliary_heating: 33e6,
            current_drive_power: 0.0,
            initial_tritium_inventory: 1e25,
            initial_deuterium_inventory: 1e26,
            min_tritium_inventory: 1e23,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Positive,
    NonNegative,
    Any,
}

impl ReactorConfiguration {
    /// Compact high-field design (R = 5.79 m, B = 18.67 T, 14 keV) that holds q ≈ 18 and
    /// meets the Lawson criterion from the first step. Fields not listed keep the defaults.
    pub fn reference_design() -> Self {
        Self {
            major_radius: 5.79,
            minor_radius: 2.58,
            elongation: 1.58,
            toroidal_field: 18.67,
            plasma_current: 5.91e6,
            initial_temperature: 163.93e6,
            initial_density: 2.35e20,
            ..Self::default()
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.major_radius / self.minor_radius
    }

    /// Auxiliary heating plus current drive, in watts.
    pub fn external_heating(&self) -> f64 {
        self.auxiliary_heating + self.current_drive_power
    }

    /// External power counted against fusion output for Q: the configured input power
    /// budget, or the heating and current-drive sum when no budget is given.
    pub fn effective_input_power(&self) -> f64 {
        if self.input_power > 0.0 {
            self.input_power
        } else {
            self.external_heating()
        }
    }

    fn numeric_fields(&self) -> [(&'static str, f64, Sign); 15] {
        [
            ("major_radius", self.major_radius, Sign::Positive),
            ("minor_radius", self.minor_radius, Sign::Positive),
            ("elongation", self.elongation, Sign::Positive),
            ("triangularity", self.triangularity, Sign::Any),
            ("toroidal_field", self.toroidal_field, Sign::Positive),
            ("plasma_current", self.plasma_current, Sign::Positive),
            ("initial_temperature", self.initial_temperature, Sign::Positive),
            ("initial_density", self.initial_density, Sign::Positive),
            ("blanket_thickness", self.blanket_thickness, Sign::NonNegative),
            ("input_power", self.input_power, Sign::NonNegative),
            ("auxiliary_heating", self.auxiliary_heating, Sign::NonNegative),
            ("current_drive_power", self.current_drive_power, Sign::NonNegative),
            ("initial_tritium_inventory", self.initial_tritium_inventory, Sign::NonNegative),
            ("initial_deuterium_inventory", self.initial_deuterium_inventory, Sign::NonNegative),
            ("min_tritium_inventory", self.min_tritium_inventory, Sign::NonNegative),
        ]
    }

    /// Checks the structural invariants every simulated configuration must satisfy.
    ///
    /// Material identifiers are only checked for presence here; resolving them against a
    /// catalog happens when a simulation engine is constructed.
    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        for (field, value, sign) in self.numeric_fields() {
            if !value.is_finite() {
                return Err(InvalidConfiguration::NonFinite { field, value });
            }
            match sign {
                Sign::Positive if value <= 0.0 => {
                    return Err(InvalidConfiguration::NonPositive { field, value });
                }
                Sign::NonNegative if value < 0.0 => {
                    return Err(InvalidConfiguration::Negative { field, value });
                }
                _ => {}
            }
        }
        if self.minor_radius >= self.major_radius {
            return Err(InvalidConfiguration::MinorRadiusTooLarge {
                minor: self.minor_radius,
                major: self.major_radius,
            });
        }
        if self.first_wall_material.trim().is_empty() {
            return Err(InvalidConfiguration::EmptyMaterial {
                field: "first_wall_material",
            });
        }
        if self.blanket_material.trim().is_empty() {
            return Err(InvalidConfiguration::EmptyMaterial {
                field: "blanket_material",
            });
        }
        Ok(())
    }
}
