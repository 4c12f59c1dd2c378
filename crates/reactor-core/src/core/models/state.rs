use crate::core::physics::OutOfRangeWarning;
use crate::core::physics::magnetic::{MagneticState, TokamakGeometry};
use crate::core::physics::neutronics::NeutronicsState;
use crate::core::physics::plasma::RadiationLoss;
use crate::core::physics::power::PowerBalance;
use serde::Serialize;
use std::fmt;

/// Terminal reasons a run can stop before reaching its time horizon, listed in the order
/// they are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureCause {
    MaterialTemperatureExceeded,
    MaterialDamageExceeded,
    TritiumDepletion,
    DeuteriumDepletion,
    LawsonCriterionViolation,
    SafetyFactorViolation,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::MaterialTemperatureExceeded => "Material temperature limit exceeded",
            Self::MaterialDamageExceeded => "Material damage limit exceeded",
            Self::TritiumDepletion => "Tritium inventory depleted",
            Self::DeuteriumDepletion => "Deuterium inventory depleted",
            Self::LawsonCriterionViolation => "Lawson criterion not met after startup period",
            Self::SafetyFactorViolation => "Safety factor too low (plasma instability)",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationalStatus {
    Operating,
    Failed { cause: FailureCause, time: f64 },
}

impl OperationalStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Non-fatal conditions recorded alongside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    OutOfRange(OutOfRangeWarning),
    FirstWallNearLimit { temperature: f64, limit: f64 },
    DamageNearLimit { damage: f64, limit: f64 },
    LowSafetyFactor { safety_factor: f64 },
    StartupSafetyFactor { safety_factor: f64 },
    StartupLawson { n_tau: f64 },
    HighBeta { beta: f64 },
    BreedingBelowUnity { tritium_breeding_ratio: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(warning) => write!(f, "{}", warning),
            Self::FirstWallNearLimit { temperature, limit } => write!(
                f,
                "First wall temperature ({:.0} K) approaching limit ({:.0} K)",
                temperature, limit
            ),
            Self::DamageNearLimit { damage, limit } => write!(
                f,
                "High material damage: {:.2} DPA (limit: {:.1} DPA)",
                damage, limit
            ),
            Self::LowSafetyFactor { safety_factor } => {
                write!(f, "Safety factor (q={:.2}) is low", safety_factor)
            }
            Self::StartupSafetyFactor { safety_factor } => write!(
                f,
                "Safety factor (q={:.2}) below threshold during startup",
                safety_factor
            ),
            Self::StartupLawson { n_tau } => write!(
                f,
                "Lawson criterion not yet met during startup (nτ = {:.2e} m⁻³·s)",
                n_tau
            ),
            Self::HighBeta { beta } => {
                write!(f, "Beta ({:.3}) is high, may affect stability", beta)
            }
            Self::BreedingBelowUnity {
                tritium_breeding_ratio,
            } => write!(
                f,
                "Tritium breeding ratio ({:.2}) below 1.0",
                tritium_breeding_ratio
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlasmaState {
    /// K
    pub temperature: f64,
    pub temperature_kev: f64,
    /// m⁻³
    pub density: f64,
    /// s
    pub confinement_time: f64,
    pub n_tau: f64,
    pub triple_product: f64,
    pub meets_lawson: bool,
    /// W/m³
    pub fusion_power_density: f64,
    /// W/m³
    pub radiation: RadiationLoss,
    /// W
    pub ohmic_heating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuelState {
    pub tritium_inventory: f64,
    pub deuterium_inventory: f64,
}

/// One immutable snapshot of the reactor at a point in simulated time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactorState {
    pub time: f64,
    pub plasma: PlasmaState,
    pub geometry: TokamakGeometry,
    pub magnetic: MagneticState,
    pub power: PowerBalance,
    pub neutronics: NeutronicsState,
    /// Accumulated DPA.
    pub material_damage: f64,
    pub first_wall_temperature: f64,
    pub fuel: FuelState,
    pub status: OperationalStatus,
    pub advisories: Vec<Advisory>,
}

impl ReactorState {
    pub fn is_failed(&self) -> bool {
        self.status.is_failed()
    }

    pub fn failure_cause(&self) -> Option<FailureCause> {
        match self.status {
            OperationalStatus::Failed { cause, .. } => Some(cause),
            OperationalStatus::Operating => None,
        }
    }

    pub fn failure_time(&self) -> Option<f64> {
        match self.status {
            OperationalStatus::Failed { time, .. } => Some(time),
            OperationalStatus::Operating => None,
        }
    }
}
