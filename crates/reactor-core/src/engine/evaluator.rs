use super::config::{RunParameters, SimulationSettings};
use super::error::EngineError;
use super::scoring::ScoringFunction;
use super::simulation::SimulationEngine;
use super::statistics::OperationStatistics;
use crate::core::materials::MaterialCatalog;
use crate::core::models::config::ReactorConfiguration;
use crate::core::models::state::ReactorState;

/// The outcome of scoring one candidate configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub score: f64,
    pub final_state: ReactorState,
    pub statistics: OperationStatistics,
}

/// Objective function seen by the search algorithms.
///
/// Implementations must be pure with respect to the candidate: the same configuration always
/// yields the same evaluation, and concurrent calls share no mutable state.
pub trait Evaluator: Sync {
    fn evaluate(&self, config: &ReactorConfiguration) -> Result<Evaluation, EngineError>;
}

/// Builds a fresh [`SimulationEngine`] per candidate, runs it, and scores the result.
pub struct SimulationEvaluator<'a, S: ScoringFunction + ?Sized> {
    catalog: &'a MaterialCatalog,
    settings: SimulationSettings,
    run: RunParameters,
    scorer: &'a S,
}

impl<'a, S: ScoringFunction + ?Sized> SimulationEvaluator<'a, S> {
    pub fn new(
        catalog: &'a MaterialCatalog,
        settings: SimulationSettings,
        run: RunParameters,
        scorer: &'a S,
    ) -> Self {
        Self {
            catalog,
            settings,
            run,
            scorer,
        }
    }
}

impl<S: ScoringFunction + ?Sized> Evaluator for SimulationEvaluator<'_, S> {
    fn evaluate(&self, config: &ReactorConfiguration) -> Result<Evaluation, EngineError> {
        let mut engine = SimulationEngine::new(config.clone(), self.catalog, self.settings)?;
        let final_state = engine.run(self.run.max_time, self.run.dt)?;
        let statistics = engine.statistics().ok_or_else(|| {
            EngineError::Internal("simulation produced an empty history".to_string())
        })?;
        Ok(Evaluation {
            score: self.scorer.score(&final_state, &statistics),
            final_state,
            statistics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scoring::ReferenceScore;

    #[test]
    fn evaluation_is_deterministic() {
        let catalog = MaterialCatalog::new();
        let scorer = ReferenceScore::default();
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(120.0, 1.0),
            &scorer,
        );
        let config = ReactorConfiguration::reference_design();
        let first = evaluator.evaluate(&config).unwrap();
        let second = evaluator.evaluate(&config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.statistics.operation_time, 120.0);
    }

    #[test]
    fn construction_errors_propagate_instead_of_scoring() {
        let catalog = MaterialCatalog::new();
        let scorer = ReferenceScore::default();
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(10.0, 1.0),
            &scorer,
        );
        let config = ReactorConfiguration {
            blanket_material: "adamantium".to_string(),
            ..ReactorConfiguration::reference_design()
        };
        assert!(matches!(
            evaluator.evaluate(&config),
            Err(EngineError::Material { .. })
        ));
    }

    #[test]
    fn trait_objects_can_score() {
        let catalog = MaterialCatalog::new();
        let scorer: &dyn ScoringFunction = &|s: &ReactorState, _: &OperationStatistics| s.time;
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(7.0, 1.0),
            scorer,
        );
        let evaluation = evaluator
            .evaluate(&ReactorConfiguration::reference_design())
            .unwrap();
        assert_eq!(evaluation.score, 7.0);
    }
}
