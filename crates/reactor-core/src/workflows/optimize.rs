use crate::core::models::config::ReactorConfiguration;
use crate::core::solutions;
use crate::engine::config::{OptimizerConfig, SearchMethod};
use crate::engine::context::SearchContext;
use crate::engine::error::EngineError;
use crate::engine::evaluator::Evaluator;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{OptimizationResult, OptimizationSession};
use crate::engine::tasks;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument};

/// Searches the configuration space around `base` and returns the best configuration found.
///
/// The configured solution overlays are applied to `base` once, the result is clamped into
/// the search space and validated, and then the selected method runs with a single RNG
/// seeded from the configuration. The outcome is recorded in `session`.
#[instrument(skip_all, name = "optimization_workflow", fields(method = %config.method))]
pub fn run<E>(
    base: &ReactorConfiguration,
    config: &OptimizerConfig,
    evaluator: &E,
    session: &mut OptimizationSession,
    reporter: &ProgressReporter,
) -> Result<OptimizationResult, EngineError>
where
    E: Evaluator + ?Sized,
{
    // === Phase 0: Preparation ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let prepared = prepare_base(base, config)?;
    reporter.report(Progress::PhaseFinish);

    let context = SearchContext::new(evaluator, &prepared, config, reporter);
    let mut rng = StdRng::seed_from_u64(config.seed);

    // === Phase 1: Search ===
    let (best, phases) = match config.method {
        SearchMethod::Grid => {
            reporter.report(Progress::PhaseStart {
                name: "Grid Search",
            });
            let outcome = tasks::grid_search::run(&context, config.iterations, 0, &mut rng)?;
            reporter.report(Progress::PhaseFinish);
            (outcome.best.clone(), vec![outcome])
        }
        SearchMethod::Spsa => {
            reporter.report(Progress::PhaseStart { name: "SPSA" });
            let outcome =
                tasks::spsa::run(&context, config.iterations, &prepared, 0, &mut rng)?;
            reporter.report(Progress::PhaseFinish);
            (outcome.best.clone(), vec![outcome])
        }
        SearchMethod::Hybrid => {
            tasks::hybrid::run(&context, config.iterations, &mut rng)?.into_phases()
        }
    };

    // === Phase 2: Finalize ===
    let result = OptimizationResult::from_phases(config.method, best, phases, context.elapsed());
    let improved = session.record(&result);
    info!(
        score = result.best_score,
        evaluations = result.evaluations,
        elapsed = ?result.elapsed,
        improved_session = improved,
        "Optimization complete."
    );
    Ok(result)
}

fn prepare_base(
    base: &ReactorConfiguration,
    config: &OptimizerConfig,
) -> Result<ReactorConfiguration, EngineError> {
    let overlaid = solutions::apply_all(base, &config.solutions);
    if !config.solutions.is_empty() {
        let names: Vec<&str> = config.solutions.iter().map(|s| s.id()).collect();
        info!(solutions = ?names, "Applied solution overlays to the base configuration.");
    }
    let clamped = config.space.clamp(&overlaid);
    clamped.validate()?;
    Ok(clamped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::materials::MaterialCatalog;
    use crate::core::models::state::ReactorState;
    use crate::core::solutions::Solution;
    use crate::engine::config::{OptimizerConfigBuilder, RunParameters, SimulationSettings};
    use crate::engine::evaluator::SimulationEvaluator;
    use crate::engine::scoring::ReferenceScore;
    use crate::engine::space::{ConfigurationSpace, Parameter};
    use crate::engine::state::SearchPhase;
    use crate::engine::statistics::OperationStatistics;

    fn peaked(state: &ReactorState, _: &OperationStatistics) -> f64 {
        let u_r = (state.geometry.major_radius - 3.0) / 7.0;
        let u_b = (state.magnetic.toroidal_field - 2.0) / 18.0;
        100.0 - 100.0 * ((u_r - 0.5).powi(2) + (u_b - 0.3).powi(2))
    }

    fn optimizer(method: SearchMethod, iterations: usize) -> OptimizerConfig {
        OptimizerConfigBuilder::new()
            .method(method)
            .iterations(iterations)
            .max_time(1.0)
            .dt(1.0)
            .seed(17)
            .space(
                ConfigurationSpace::new()
                    .with_dimensions(&[Parameter::MajorRadius, Parameter::ToroidalField])
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn every_method_returns_a_consistent_result() {
        let catalog = MaterialCatalog::new();
        let scorer = peaked;
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(1.0, 1.0),
            &scorer,
        );
        for (method, expected) in [
            (SearchMethod::Grid, 30),
            (SearchMethod::Spsa, 61),
            (SearchMethod::Hybrid, 15 + 31),
        ] {
            let mut session = OptimizationSession::new();
            let result = run(
                &ReactorConfiguration::default(),
                &optimizer(method, 30),
                &evaluator,
                &mut session,
                &ProgressReporter::new(),
            )
            .unwrap();
            assert_eq!(result.method, method);
            assert_eq!(result.evaluations, expected);
            assert_eq!(result.trials.len(), expected);
            let best_trial = result
                .trials
                .iter()
                .map(|t| t.score)
                .fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(result.best_score, best_trial);
            assert_eq!(session.best_score(), Some(result.best_score));
        }
    }

    #[test]
    fn fixed_seed_reproduces_the_search() {
        let catalog = MaterialCatalog::new();
        let scorer = peaked;
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(1.0, 1.0),
            &scorer,
        );
        let config = optimizer(SearchMethod::Hybrid, 24);
        let mut session = OptimizationSession::new();
        let first = run(
            &ReactorConfiguration::default(),
            &config,
            &evaluator,
            &mut session,
            &ProgressReporter::new(),
        )
        .unwrap();
        let second = run(
            &ReactorConfiguration::default(),
            &config,
            &evaluator,
            &mut session,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(first.trials, second.trials);
        assert_eq!(first.best_configuration, second.best_configuration);
        assert_eq!(session.runs(), 2);
        assert_eq!(session.evaluations(), first.evaluations * 2);
    }

    #[test]
    fn session_keeps_the_best_across_calls() {
        let catalog = MaterialCatalog::new();
        let scorer = peaked;
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(1.0, 1.0),
            &scorer,
        );
        let mut session = OptimizationSession::new();
        let thorough = run(
            &ReactorConfiguration::default(),
            &optimizer(SearchMethod::Grid, 200),
            &evaluator,
            &mut session,
            &ProgressReporter::new(),
        )
        .unwrap();
        let hasty = run(
            &ReactorConfiguration::default(),
            &OptimizerConfig {
                seed: 99,
                ..optimizer(SearchMethod::Grid, 1)
            },
            &evaluator,
            &mut session,
            &ProgressReporter::new(),
        )
        .unwrap();
        let leader = if hasty.best_score > thorough.best_score {
            &hasty
        } else {
            &thorough
        };
        assert_eq!(session.runs(), 2);
        assert_eq!(session.best_score(), Some(leader.best_score));
        assert_eq!(session.best_method(), Some(SearchMethod::Grid));
        assert_eq!(
            session.best_configuration(),
            Some(&leader.best_configuration)
        );
    }

    #[test]
    fn solution_overlays_shape_the_base_before_search() {
        let catalog = MaterialCatalog::new();
        let scorer = peaked;
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(1.0, 1.0),
            &scorer,
        );
        let config = OptimizerConfig {
            solutions: vec![Solution::HighElongation, Solution::TungstenCopperWall],
            ..optimizer(SearchMethod::Grid, 8)
        };
        let result = run(
            &ReactorConfiguration::default(),
            &config,
            &evaluator,
            &mut OptimizationSession::new(),
            &ProgressReporter::new(),
        )
        .unwrap();
        for trial in &result.trials {
            assert!(trial.configuration.elongation >= 2.0);
            assert_eq!(trial.configuration.first_wall_material, "tungsten_copper");
            assert_eq!(trial.phase, SearchPhase::Grid);
        }
    }

    #[test]
    fn invalid_base_is_rejected_before_search() {
        let catalog = MaterialCatalog::new();
        let scorer = ReferenceScore::default();
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(1.0, 1.0),
            &scorer,
        );
        let base = ReactorConfiguration {
            major_radius: f64::NAN,
            ..ReactorConfiguration::default()
        };
        let mut session = OptimizationSession::new();
        let result = run(
            &base,
            &optimizer(SearchMethod::Grid, 4),
            &evaluator,
            &mut session,
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
        assert_eq!(session.runs(), 0);
    }

    #[test]
    fn unknown_material_is_never_scored() {
        let catalog = MaterialCatalog::new();
        let scorer = ReferenceScore::default();
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(1.0, 1.0),
            &scorer,
        );
        let base = ReactorConfiguration {
            blanket_material: "mithril".to_string(),
            ..ReactorConfiguration::default()
        };
        let result = run(
            &base,
            &optimizer(SearchMethod::Spsa, 3),
            &evaluator,
            &mut OptimizationSession::new(),
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::Material { .. })));
    }
}
