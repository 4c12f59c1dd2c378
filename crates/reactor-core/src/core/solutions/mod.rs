//! Research-backed configuration overlays.
//!
//! Every [`Solution`] is a pure transform `ReactorConfiguration -> ReactorConfiguration` that
//! substitutes a handful of fields. Overlays are resolved by name or by the operational issue
//! they address, and are applied once to a base configuration before any search begins.

use crate::core::models::config::ReactorConfiguration;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const HTS_MIN_FIELD: f64 = 12.0;
const HTS_INPUT_POWER_FACTOR: f64 = 0.7;
const SPHERICAL_ASPECT_RATIO: f64 = 1.8;
const ECCD_POWER_FACTOR: f64 = 0.8;
const NBI_POWER_FACTOR: f64 = 0.9;
const MIN_BREEDING_BLANKET_THICKNESS: f64 = 1.0;
const HIGH_ELONGATION_TARGET: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Geometry,
    Field,
    Power,
    Material,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solution {
    HtsMagnets,
    SphericalTokamak,
    EccdCurrentDrive,
    NbiHeating,
    TungstenCopperWall,
    LithiumLeadBlanket,
    HighElongation,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolutionError {
    #[error("Unknown solution: '{0}'")]
    UnknownSolution(String),
    #[error("Unknown issue: '{0}'")]
    UnknownIssue(String),
}

impl Solution {
    pub const ALL: [Solution; 7] = [
        Solution::HtsMagnets,
        Solution::SphericalTokamak,
        Solution::EccdCurrentDrive,
        Solution::NbiHeating,
        Solution::TungstenCopperWall,
        Solution::LithiumLeadBlanket,
        Solution::HighElongation,
    ];

    /// Issue keywords understood by [`Solution::for_issue`].
    pub const ISSUES: [&'static str; 7] = [
        "safety_factor",
        "lawson",
        "material_damage",
        "material_temperature",
        "tritium",
        "power",
        "confinement",
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::HtsMagnets => "hts-magnets",
            Self::SphericalTokamak => "spherical-tokamak",
            Self::EccdCurrentDrive => "eccd-current-drive",
            Self::NbiHeating => "nbi-heating",
            Self::TungstenCopperWall => "tungsten-copper-wall",
            Self::LithiumLeadBlanket => "lithium-lead-blanket",
            Self::HighElongation => "high-elongation",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HtsMagnets => "HTS High-Field Magnets",
            Self::SphericalTokamak => "Spherical Tokamak Geometry",
            Self::EccdCurrentDrive => "Advanced Current Drive (ECCD)",
            Self::NbiHeating => "Optimized Neutral Beam Injection",
            Self::TungstenCopperWall => "Tungsten-Copper Composite",
            Self::LithiumLeadBlanket => "Lithium-Lead Breeding Blanket",
            Self::HighElongation => "High Elongation Optimization",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::HtsMagnets => {
                "High-temperature superconductor magnets reach 12-20 T with lower magnet power"
            }
            Self::SphericalTokamak => "Low aspect ratio (R/a ~ 1.8) raises the safety factor",
            Self::EccdCurrentDrive => "Electron cyclotron current drive with improved efficiency",
            Self::NbiHeating => "Improved neutral beam efficiency and power deposition",
            Self::TungstenCopperWall => "Tungsten-copper composite first wall for heat removal",
            Self::LithiumLeadBlanket => "Liquid lithium-lead blanket for tritium self-sufficiency",
            Self::HighElongation => "Elongation above 1.5 improves confinement and stability",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            Self::HtsMagnets => "SPARC, Commonwealth Fusion Systems, 2024",
            Self::SphericalTokamak => "MAST, ST40, 2020-2024",
            Self::EccdCurrentDrive => "ITER, 2023",
            Self::NbiHeating => "ITER, 2023",
            Self::TungstenCopperWall => "ITER, 2023",
            Self::LithiumLeadBlanket => "ITER TBM programme, 2023",
            Self::HighElongation => "Various tokamaks, 2023-2024",
        }
    }

    pub fn kind(&self) -> OverlayKind {
        match self {
            Self::HtsMagnets => OverlayKind::Field,
            Self::SphericalTokamak | Self::HighElongation => OverlayKind::Geometry,
            Self::EccdCurrentDrive | Self::NbiHeating => OverlayKind::Power,
            Self::TungstenCopperWall | Self::LithiumLeadBlanket => OverlayKind::Material,
        }
    }

    pub fn apply(&self, config: &ReactorConfiguration) -> ReactorConfiguration {
        let mut next = config.clone();
        match self {
            Self::HtsMagnets => {
                next.toroidal_field = next.toroidal_field.max(HTS_MIN_FIELD);
                next.input_power *= HTS_INPUT_POWER_FACTOR;
            }
            Self::SphericalTokamak => {
                next.major_radius = SPHERICAL_ASPECT_RATIO * next.minor_radius;
            }
            Self::EccdCurrentDrive => next.current_drive_power *= ECCD_POWER_FACTOR,
            Self::NbiHeating => next.auxiliary_heating *= NBI_POWER_FACTOR,
            Self::TungstenCopperWall => next.first_wall_material = "tungsten_copper".to_string(),
            Self::LithiumLeadBlanket => {
                next.blanket_material = "lithium_lead".to_string();
                next.blanket_thickness = next.blanket_thickness.max(MIN_BREEDING_BLANKET_THICKNESS);
            }
            Self::HighElongation => next.elongation = next.elongation.max(HIGH_ELONGATION_TARGET),
        }
        next
    }

    /// Overlays addressing an issue keyword, most effective first.
    pub fn for_issue(issue: &str) -> Result<&'static [Solution], SolutionError> {
        let solutions: &'static [Solution] = match normalize(issue).as_str() {
            "safety_factor" => &[Self::HtsMagnets, Self::SphericalTokamak],
            "lawson" => &[Self::NbiHeating, Self::HighElongation],
            "material_damage" | "material_temperature" => &[Self::TungstenCopperWall],
            "tritium" => &[Self::LithiumLeadBlanket],
            "power" => &[Self::HtsMagnets, Self::EccdCurrentDrive, Self::NbiHeating],
            "confinement" => &[Self::HighElongation, Self::NbiHeating],
            _ => return Err(SolutionError::UnknownIssue(issue.to_string())),
        };
        Ok(solutions)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('-', "_")
}

impl FromStr for Solution {
    type Err = SolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Self::ALL
            .into_iter()
            .find(|solution| solution.id().replace('-', "_") == key)
            .ok_or_else(|| SolutionError::UnknownSolution(s.to_string()))
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Applies overlays in order, each exactly once.
pub fn apply_all(config: &ReactorConfiguration, solutions: &[Solution]) -> ReactorConfiguration {
    solutions
        .iter()
        .fold(config.clone(), |current, solution| solution.apply(&current))
}
