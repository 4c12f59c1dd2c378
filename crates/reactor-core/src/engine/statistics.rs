use crate::core::models::state::{FailureCause, ReactorState};
use serde::Serialize;

/// Horizon beyond which a run is treated as unbounded (about 31 700 years).
pub const INDEFINITE_HORIZON_S: f64 = 1e12;
const JOULES_PER_MWH: f64 = 3.6e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LimitingFactor {
    Damage,
    Tritium,
    None,
}

/// Extrapolation of how long the final state could be sustained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuntimePrediction {
    /// Seconds until first-wall damage reaches its limit at the final DPA rate.
    pub damage_horizon: Option<f64>,
    /// Seconds until the tritium inventory runs dry at the final net depletion rate.
    pub tritium_horizon: Option<f64>,
    /// The smaller of the two horizons, infinite when neither applies.
    pub max_runtime: f64,
    pub limiting_factor: LimitingFactor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationStatistics {
    pub operation_time: f64,
    pub failed: bool,
    pub failure_cause: Option<FailureCause>,
    pub failure_time: Option<f64>,
    pub average_q: f64,
    pub max_q: f64,
    /// J
    pub total_energy: f64,
    pub lawson_met: bool,
    pub snapshots: usize,
    pub prediction: RuntimePrediction,
    pub can_run_indefinitely: bool,
}

impl OperationStatistics {
    /// Derives run statistics from a saved history. Returns `None` for an empty history.
    ///
    /// `max_dpa` is the damage limit of the first-wall material.
    pub fn from_history(history: &[ReactorState], max_dpa: f64) -> Option<Self> {
        let last = history.last()?;

        let operating: Vec<&ReactorState> = history.iter().filter(|s| !s.is_failed()).collect();
        let finite_q: Vec<f64> = operating
            .iter()
            .map(|s| s.power.q_factor)
            .filter(|q| q.is_finite())
            .collect();
        let average_q = if finite_q.is_empty() {
            0.0
        } else {
            finite_q.iter().sum::<f64>() / finite_q.len() as f64
        };
        let max_q = operating
            .iter()
            .map(|s| s.power.q_factor)
            .fold(0.0, f64::max);

        let total_energy = history
            .windows(2)
            .filter(|pair| !pair[0].is_failed())
            .map(|pair| pair[0].power.fusion_power * (pair[1].time - pair[0].time))
            .sum();

        let prediction = predict_runtime(last, max_dpa);
        let failed = last.is_failed();
        let can_run_indefinitely = !failed
            && last.neutronics.tritium_breeding_ratio >= 1.0
            && prediction.max_runtime >= INDEFINITE_HORIZON_S;

        Some(Self {
            operation_time: last.time,
            failed,
            failure_cause: last.failure_cause(),
            failure_time: last.failure_time(),
            average_q,
            max_q,
            total_energy,
            lawson_met: history.iter().any(|s| s.plasma.meets_lawson),
            snapshots: history.len(),
            prediction,
            can_run_indefinitely,
        })
    }

    pub fn total_energy_mwh(&self) -> f64 {
        self.total_energy / JOULES_PER_MWH
    }
}

fn predict_runtime(state: &ReactorState, max_dpa: f64) -> RuntimePrediction {
    let dpa_rate = state.neutronics.dpa_rate;
    let damage_horizon =
        (dpa_rate > 0.0).then(|| (max_dpa - state.material_damage).max(0.0) / dpa_rate);

    let net_depletion =
        state.neutronics.tritium_consumption_rate - state.neutronics.tritium_production_rate;
    let tritium_horizon =
        (net_depletion > 0.0).then(|| state.fuel.tritium_inventory / net_depletion);

    let (max_runtime, limiting_factor) = match (damage_horizon, tritium_horizon) {
        (Some(d), Some(t)) if t < d => (t, LimitingFactor::Tritium),
        (Some(d), _) => (d, LimitingFactor::Damage),
        (None, Some(t)) => (t, LimitingFactor::Tritium),
        (None, None) => (f64::INFINITY, LimitingFactor::None),
    };

    RuntimePrediction {
        damage_horizon,
        tritium_horizon,
        max_runtime,
        limiting_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::materials::MaterialCatalog;
    use crate::core::models::config::ReactorConfiguration;
    use crate::core::models::state::OperationalStatus;
    use crate::engine::config::SimulationSettings;
    use crate::engine::simulation::SimulationEngine;

    fn short_history() -> Vec<ReactorState> {
        let catalog = MaterialCatalog::new();
        let mut engine = SimulationEngine::new(
            ReactorConfiguration::reference_design(),
            &catalog,
            SimulationSettings::default(),
        )
        .unwrap();
        engine.run(20.0, 1.0).unwrap();
        engine.history().to_vec()
    }

    #[test]
    fn empty_history_has_no_statistics() {
        assert!(OperationStatistics::from_history(&[], 100.0).is_none());
    }

    #[test]
    fn energy_integrates_fusion_power_between_snapshots() {
        let history = short_history();
        let stats = OperationStatistics::from_history(&history, 100.0).unwrap();
        let expected: f64 = history
            .windows(2)
            .map(|w| w[0].power.fusion_power * (w[1].time - w[0].time))
            .sum();
        assert!((stats.total_energy - expected).abs() <= 1e-9 * expected.abs());
        assert!((stats.total_energy_mwh() - expected / 3.6e9).abs() <= 1e-9 * expected.abs());
        assert_eq!(stats.snapshots, history.len());
        assert_eq!(stats.operation_time, 20.0);
    }

    #[test]
    fn tritium_horizon_limits_a_non_breeding_reactor() {
        let mut history = short_history();
        let last = history.last_mut().unwrap();
        last.neutronics.tritium_production_rate = 0.0;
        last.neutronics.tritium_consumption_rate = 1e18;
        last.neutronics.dpa_rate = 1e-9;
        last.fuel.tritium_inventory = 1e25;
        last.material_damage = 0.0;

        let stats = OperationStatistics::from_history(&history, 100.0).unwrap();
        assert_eq!(stats.prediction.limiting_factor, LimitingFactor::Tritium);
        assert!((stats.prediction.max_runtime - 1e7).abs() < 1e-3);
        assert!(!stats.can_run_indefinitely);
    }

    #[test]
    fn damage_horizon_and_failure_block_indefinite_operation() {
        let mut history = short_history();
        let last = history.last_mut().unwrap();
        last.neutronics.tritium_production_rate = 2e18;
        last.neutronics.tritium_consumption_rate = 1e18;
        last.neutronics.tritium_breeding_ratio = 2.0;
        last.neutronics.dpa_rate = 1e-6;
        last.material_damage = 50.0;
        let stats = OperationStatistics::from_history(&history, 100.0).unwrap();
        assert_eq!(stats.prediction.limiting_factor, LimitingFactor::Damage);
        assert!((stats.prediction.max_runtime - 5e7).abs() < 1e-3);
        assert_eq!(stats.prediction.tritium_horizon, None);

        let last = history.last_mut().unwrap();
        last.neutronics.dpa_rate = 0.0;
        let stats = OperationStatistics::from_history(&history, 100.0).unwrap();
        assert_eq!(stats.prediction.limiting_factor, LimitingFactor::None);
        assert!(stats.can_run_indefinitely);

        let last = history.last_mut().unwrap();
        last.status = OperationalStatus::Failed {
            cause: FailureCause::TritiumDepletion,
            time: last.time,
        };
        let stats = OperationStatistics::from_history(&history, 100.0).unwrap();
        assert!(stats.failed);
        assert_eq!(stats.failure_cause, Some(FailureCause::TritiumDepletion));
        assert!(!stats.can_run_indefinitely);
    }

    #[test]
    fn average_q_skips_infinite_values() {
        let mut history = short_history();
        for state in history.iter_mut() {
            state.power.q_factor = 2.0;
        }
        history[0].power.q_factor = f64::INFINITY;
        let stats = OperationStatistics::from_history(&history, 100.0).unwrap();
        assert_eq!(stats.average_q, 2.0);
        assert!(stats.max_q.is_infinite());
    }
}
