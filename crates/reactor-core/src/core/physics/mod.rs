//! # Physics Model
//!
//! Stateless, referentially transparent functions that map a reactor configuration and the
//! current volume-averaged plasma state onto derived physical quantities. Nothing in this
//! module holds state; the simulation engine calls into it once per time step.
//!
//! - **Plasma** ([`plasma`]) - D-T reactivity, fusion power density, radiation losses, Lawson
//! - **Magnetic** ([`magnetic`]) - Geometry, safety factor, beta and ITER-98(y,2) confinement
//! - **Power** ([`power`]) - Spitzer resistance, ohmic heating and the plant power balance
//! - **Neutronics** ([`neutronics`]) - Neutron flux, wall loading, tritium breeding and DPA
//!
//! Temperatures are passed in keV wherever an empirical fit is defined in keV; callers
//! convert with [`constants::kelvin_to_kev`] before calling.

use serde::Serialize;
use thiserror::Error;

pub mod constants;
pub mod magnetic;
pub mod neutronics;
pub mod plasma;
pub mod power;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("Domain error: '{quantity}' must be positive and finite (got {value})")]
    Domain { quantity: &'static str, value: f64 },
}

pub(crate) fn require_positive(quantity: &'static str, value: f64) -> Result<f64, PhysicsError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PhysicsError::Domain { quantity, value })
    }
}

/// A quantity evaluated outside the validity range of the empirical fit used to compute it.
///
/// This is advisory only: the value is still computed by extrapolating the fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutOfRangeWarning {
    pub quantity: &'static str,
    pub value: f64,
    pub valid_min: f64,
    pub valid_max: f64,
}

impl OutOfRangeWarning {
    pub fn check(quantity: &'static str, value: f64, (valid_min, valid_max): (f64, f64)) -> Option<Self> {
        if (valid_min..=valid_max).contains(&value) {
            None
        } else {
            Some(Self {
                quantity,
                value,
                valid_min,
                valid_max,
            })
        }
    }
}

impl std::fmt::Display for OutOfRangeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} = {:.3} outside valid range [{}, {}]",
            self.quantity, self.value, self.valid_min, self.valid_max
        )
    }
}

/// A computed value together with an optional range advisory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advised<T> {
    pub value: T,
    pub warning: Option<OutOfRangeWarning>,
}
