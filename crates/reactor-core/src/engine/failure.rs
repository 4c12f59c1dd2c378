use super::config::FailureThresholds;
use crate::core::models::state::{Advisory, FailureCause};

const NEAR_LIMIT_FRACTION: f64 = 0.8;
const COMFORTABLE_SAFETY_FACTOR: f64 = 3.0;
const BETA_LIMIT: f64 = 0.1;

/// The quantities the failure predicate reads at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub time: f64,
    pub first_wall_temperature: f64,
    pub max_wall_temperature: f64,
    pub material_damage: f64,
    pub max_dpa: f64,
    pub tritium_inventory: f64,
    pub min_tritium_inventory: f64,
    pub deuterium_inventory: f64,
    pub meets_lawson: bool,
    pub n_tau: f64,
    pub safety_factor: f64,
    pub beta: f64,
    pub tritium_breeding_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub failure: Option<FailureCause>,
    pub advisories: Vec<Advisory>,
}

/// Returns the first failure cause that holds, in the fixed order temperature, damage,
/// tritium, deuterium, Lawson, safety factor.
pub fn detect(observation: &Observation, thresholds: &FailureThresholds) -> Option<FailureCause> {
    let o = observation;
    if o.first_wall_temperature > o.max_wall_temperature {
        return Some(FailureCause::MaterialTemperatureExceeded);
    }
    if o.material_damage > o.max_dpa {
        return Some(FailureCause::MaterialDamageExceeded);
    }
    if o.tritium_inventory < o.min_tritium_inventory {
        return Some(FailureCause::TritiumDepletion);
    }
    if o.deuterium_inventory < thresholds.min_deuterium_inventory {
        return Some(FailureCause::DeuteriumDepletion);
    }
    if !o.meets_lawson && o.time > thresholds.lawson_grace {
        return Some(FailureCause::LawsonCriterionViolation);
    }
    let critical = o.safety_factor < thresholds.critical_safety_factor;
    let low_after_startup =
        o.safety_factor < thresholds.min_safety_factor && o.time > thresholds.safety_grace;
    if critical || low_after_startup {
        return Some(FailureCause::SafetyFactorViolation);
    }
    None
}

/// Non-fatal conditions worth surfacing alongside a snapshot.
pub fn advisories(observation: &Observation, thresholds: &FailureThresholds) -> Vec<Advisory> {
    let o = observation;
    let mut advisories = Vec::new();

    if o.first_wall_temperature <= o.max_wall_temperature
        && o.first_wall_temperature > NEAR_LIMIT_FRACTION * o.max_wall_temperature
    {
        advisories.push(Advisory::FirstWallNearLimit {
            temperature: o.first_wall_temperature,
            limit: o.max_wall_temperature,
        });
    }
    if o.material_damage <= o.max_dpa && o.material_damage > NEAR_LIMIT_FRACTION * o.max_dpa {
        advisories.push(Advisory::DamageNearLimit {
            damage: o.material_damage,
            limit: o.max_dpa,
        });
    }

    let q = o.safety_factor;
    if q >= thresholds.critical_safety_factor && q < thresholds.min_safety_factor {
        if o.time <= thresholds.safety_grace {
            advisories.push(Advisory::StartupSafetyFactor { safety_factor: q });
        }
    } else if q >= thresholds.min_safety_factor && q < COMFORTABLE_SAFETY_FACTOR {
        advisories.push(Advisory::LowSafetyFactor { safety_factor: q });
    }

    if o.beta > BETA_LIMIT {
        advisories.push(Advisory::HighBeta { beta: o.beta });
    }
    if !o.meets_lawson && o.time <= thresholds.lawson_grace {
        advisories.push(Advisory::StartupLawson { n_tau: o.n_tau });
    }
    if o.tritium_breeding_ratio < 1.0 {
        advisories.push(Advisory::BreedingBelowUnity {
            tritium_breeding_ratio: o.tritium_breeding_ratio,
        });
    }
    advisories
}

pub fn assess(observation: &Observation, thresholds: &FailureThresholds) -> Assessment {
    Assessment {
        failure: detect(observation, thresholds),
        advisories: advisories(observation, thresholds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy(time: f64) -> Observation {
        Observation {
            time,
            first_wall_temperature: 340.0,
            max_wall_temperature: 1500.0,
            material_damage: 0.0,
            max_dpa: 100.0,
            tritium_inventory: 1e25,
            min_tritium_inventory: 1e23,
            deuterium_inventory: 1e26,
            meets_lawson: true,
            n_tau: 2e20,
            safety_factor: 18.0,
            beta: 0.02,
            tritium_breeding_ratio: 1.3,
        }
    }

    #[test]
    fn healthy_reactor_neither_fails_nor_warns() {
        let assessment = assess(&healthy(100.0), &FailureThresholds::default());
        assert_eq!(assessment.failure, None);
        assert!(assessment.advisories.is_empty());
    }

    #[test]
    fn lawson_wins_over_safety_when_both_trigger() {
        let observation = Observation {
            meets_lawson: false,
            safety_factor: 1.8,
            ..healthy(100.0)
        };
        assert_eq!(
            detect(&observation, &FailureThresholds::default()),
            Some(FailureCause::LawsonCriterionViolation)
        );
    }

    #[test]
    fn temperature_wins_over_everything() {
        let observation = Observation {
            first_wall_temperature: 2000.0,
            material_damage: 150.0,
            tritium_inventory: 0.0,
            deuterium_inventory: 0.0,
            meets_lawson: false,
            safety_factor: 0.5,
            ..healthy(100.0)
        };
        assert_eq!(
            detect(&observation, &FailureThresholds::default()),
            Some(FailureCause::MaterialTemperatureExceeded)
        );
        let observation = Observation {
            first_wall_temperature: 340.0,
            ..observation
        };
        assert_eq!(
            detect(&observation, &FailureThresholds::default()),
            Some(FailureCause::MaterialDamageExceeded)
        );
    }

    #[test]
    fn fuel_checks_precede_lawson() {
        let thresholds = FailureThresholds::default();
        let observation = Observation {
            tritium_inventory: 1e22,
            meets_lawson: false,
            ..healthy(100.0)
        };
        assert_eq!(detect(&observation, &thresholds), Some(FailureCause::TritiumDepletion));
        let observation = Observation {
            deuterium_inventory: 1e21,
            meets_lawson: false,
            ..healthy(100.0)
        };
        assert_eq!(detect(&observation, &thresholds), Some(FailureCause::DeuteriumDepletion));
    }

    #[test]
    fn grace_windows_suppress_lawson_and_low_safety_factor() {
        let thresholds = FailureThresholds::default();
        let observation = Observation {
            meets_lawson: false,
            safety_factor: 1.8,
            ..healthy(30.0)
        };
        let assessment = assess(&observation, &thresholds);
        assert_eq!(assessment.failure, None);
        assert!(assessment.advisories.contains(&Advisory::StartupSafetyFactor { safety_factor: 1.8 }));
        assert!(assessment.advisories.contains(&Advisory::StartupLawson { n_tau: 2e20 }));

        let after_safety_grace = Observation {
            time: 31.0,
            ..observation
        };
        assert_eq!(
            detect(&after_safety_grace, &thresholds),
            Some(FailureCause::SafetyFactorViolation)
        );
    }

    #[test]
    fn critically_low_safety_factor_fails_during_startup() {
        let observation = Observation {
            safety_factor: 1.2,
            ..healthy(0.0)
        };
        assert_eq!(
            detect(&observation, &FailureThresholds::default()),
            Some(FailureCause::SafetyFactorViolation)
        );
    }

    #[test]
    fn near_limit_conditions_are_advisories() {
        let observation = Observation {
            first_wall_temperature: 1300.0,
            material_damage: 85.0,
            safety_factor: 2.5,
            beta: 0.2,
            tritium_breeding_ratio: 0.7,
            ..healthy(100.0)
        };
        let assessment = assess(&observation, &FailureThresholds::default());
        assert_eq!(assessment.failure, None);
        assert_eq!(assessment.advisories.len(), 5);
        assert!(matches!(
            assessment.advisories[0],
            Advisory::FirstWallNearLimit { .. }
        ));
    }
}
