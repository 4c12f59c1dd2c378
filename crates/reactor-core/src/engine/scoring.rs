use super::statistics::OperationStatistics;
use crate::core::models::state::ReactorState;
use serde::Serialize;

/// Reduces a completed run to a scalar. Higher is strictly better.
pub trait ScoringFunction: Sync {
    fn score(&self, final_state: &ReactorState, statistics: &OperationStatistics) -> f64;
}

impl<F> ScoringFunction for F
where
    F: Fn(&ReactorState, &OperationStatistics) -> f64 + Sync,
{
    fn score(&self, final_state: &ReactorState, statistics: &OperationStatistics) -> f64 {
        self(final_state, statistics)
    }
}

const TARGET_BONUS: f64 = 100.0;
const Q_BONUS_PER_UNIT: f64 = 10.0;
const Q_BONUS_CAP: f64 = 50.0;
const IGNITION_BONUS: f64 = 50.0;
const IGNITION_Q: f64 = 10.0;
const STABLE_SAFETY_FACTOR: f64 = 2.0;
const MARGINAL_SAFETY_FACTOR: f64 = 1.5;
const STABLE_BONUS: f64 = 25.0;
const MARGINAL_BONUS: f64 = 10.0;
const LAWSON_BONUS: f64 = 30.0;
const NET_POWER_BONUS: f64 = 40.0;
const FAILURE_PENALTY: f64 = -50.0;
const SHORT_RUN_PENALTY: f64 = -100.0;
const SCORE_FLOOR: f64 = -200.0;

/// The individual terms of the reference score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub duration: f64,
    pub target: f64,
    pub q_factor: f64,
    pub stability: f64,
    pub lawson: f64,
    pub net_power: f64,
    pub failure: f64,
    pub short_run: f64,
    pub total: f64,
}

/// Reference policy rewarding long, ignited, stable, net-positive operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceScore {
    /// Operation time in seconds that earns the target bonus (21 minutes by default).
    pub target_time: f64,
    /// Runs shorter than this many seconds are penalized.
    pub short_run_threshold: f64,
}

impl Default for ReferenceScore {
    fn default() -> Self {
        Self {
            target_time: 1260.0,
            short_run_threshold: 60.0,
        }
    }
}

impl ReferenceScore {
    pub fn new(target_time: f64) -> Self {
        Self {
            target_time,
            ..Self::default()
        }
    }

    pub fn breakdown(&self, final_state: &ReactorState, statistics: &OperationStatistics) -> ScoreBreakdown {
        let operation_time = statistics.operation_time;
        let q = final_state.power.q_factor;
        let safety_factor = final_state.magnetic.safety_factor;

        let duration = operation_time / 60.0;
        let target = if operation_time >= self.target_time {
            TARGET_BONUS
        } else {
            0.0
        };
        let mut q_factor = if q.is_finite() && q > 0.0 {
            (Q_BONUS_PER_UNIT * q).min(Q_BONUS_CAP)
        } else if q.is_infinite() {
            Q_BONUS_CAP
        } else {
            0.0
        };
        if q > IGNITION_Q {
            q_factor += IGNITION_BONUS;
        }
        let stability = if safety_factor >= STABLE_SAFETY_FACTOR {
            STABLE_BONUS
        } else if safety_factor >= MARGINAL_SAFETY_FACTOR {
            MARGINAL_BONUS
        } else {
            0.0
        };
        let lawson = if statistics.lawson_met { LAWSON_BONUS } else { 0.0 };
        let net_power = if final_state.power.net_power > 0.0 {
            NET_POWER_BONUS
        } else {
            0.0
        };
        let failure = if statistics.failed { FAILURE_PENALTY } else { 0.0 };
        let short_run = if operation_time < self.short_run_threshold {
            SHORT_RUN_PENALTY
        } else {
            0.0
        };

        let total = (duration + target + q_factor + stability + lawson + net_power + failure + short_run)
            .max(SCORE_FLOOR);
        ScoreBreakdown {
            duration,
            target,
            q_factor,
            stability,
            lawson,
            net_power,
            failure,
            short_run,
            total,
        }
    }
}

impl ScoringFunction for ReferenceScore {
    fn score(&self, final_state: &ReactorState, statistics: &OperationStatistics) -> f64 {
        self.breakdown(final_state, statistics).total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::materials::MaterialCatalog;
    use crate::core::models::config::ReactorConfiguration;
    use crate::engine::config::SimulationSettings;
    use crate::engine::simulation::SimulationEngine;

    fn completed_run(config: ReactorConfiguration, max_time: f64) -> (ReactorState, OperationStatistics) {
        let mut engine =
            SimulationEngine::new(config, &MaterialCatalog::new(), SimulationSettings::default())
                .unwrap();
        let final_state = engine.run(max_time, 1.0).unwrap();
        (final_state, engine.statistics().unwrap())
    }

    #[test]
    fn sustained_ignited_run_collects_every_bonus() {
        let (state, stats) = completed_run(ReactorConfiguration::reference_design(), 1260.0);
        let breakdown = ReferenceScore::default().breakdown(&state, &stats);
        assert_eq!(breakdown.duration, 21.0);
        assert_eq!(breakdown.target, 100.0);
        assert_eq!(breakdown.q_factor, 100.0);
        assert_eq!(breakdown.stability, 25.0);
        assert_eq!(breakdown.lawson, 30.0);
        assert_eq!(breakdown.net_power, 40.0);
        assert_eq!(breakdown.failure, 0.0);
        assert_eq!(breakdown.short_run, 0.0);
        assert_eq!(breakdown.total, 316.0);
    }

    #[test]
    fn immediate_failure_is_penalized() {
        let (state, stats) = completed_run(ReactorConfiguration::default(), 100.0);
        let breakdown = ReferenceScore::default().breakdown(&state, &stats);
        assert_eq!(breakdown.failure, -50.0);
        assert_eq!(breakdown.short_run, -100.0);
        assert_eq!(breakdown.stability, 0.0);
        assert!(breakdown.total >= -200.0);
        assert!(breakdown.total < 0.0);
    }

    #[test]
    fn score_is_monotonic_in_net_power() {
        let (mut state, stats) = completed_run(ReactorConfiguration::reference_design(), 60.0);
        let policy = ReferenceScore::default();
        let mut previous = f64::NEG_INFINITY;
        for net_power in [-1e9, -1.0, 0.0, 1.0, 1e6, 1e9] {
            state.power.net_power = net_power;
            let score = policy.score(&state, &stats);
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn score_never_drops_below_floor() {
        let (mut state, mut stats) = completed_run(ReactorConfiguration::default(), 10.0);
        stats.operation_time = -1e6;
        state.power.q_factor = 0.0;
        assert_eq!(ReferenceScore::default().score(&state, &stats), -200.0);
    }

    #[test]
    fn closures_are_scoring_functions() {
        let (state, stats) = completed_run(ReactorConfiguration::reference_design(), 5.0);
        let by_field = |s: &ReactorState, _: &OperationStatistics| s.magnetic.toroidal_field;
        assert_eq!(by_field.score(&state, &stats), 18.67);
    }
}
