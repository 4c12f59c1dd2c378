use crate::engine::context::{SearchContext, absorb};
use crate::engine::error::EngineError;
use crate::engine::evaluator::Evaluator;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{Candidate, PhaseOutcome, SearchPhase, Trial};
use rand::Rng;
use tracing::{debug, info, instrument};

/// Samples `samples` configurations uniformly from the search space and keeps the best.
///
/// Samples are drawn serially from `rng` in batches of `batch_size`; each batch is
/// evaluated (in parallel when enabled) before the time budget is checked again. The first
/// batch always runs, so a result exists even under a zero budget.
#[instrument(skip_all, name = "grid_search_task", fields(samples = samples))]
pub fn run<E>(
    context: &SearchContext<E>,
    samples: usize,
    index_offset: usize,
    rng: &mut impl Rng,
) -> Result<PhaseOutcome, EngineError>
where
    E: Evaluator + ?Sized,
{
    let samples = samples.max(1);
    let batch_size = context.config.batch_size.max(1);
    let space = &context.config.space;

    context.reporter.report(Progress::TaskStart {
        total_steps: samples as u64,
    });

    let mut best = None;
    let mut trials = Vec::with_capacity(samples);
    let mut drawn = 0;
    while drawn < samples {
        if drawn > 0 && context.budget_exhausted() {
            info!(evaluated = drawn, planned = samples, "Grid search stopped by time budget.");
            break;
        }
        let count = batch_size.min(samples - drawn);
        let configurations: Vec<_> = (0..count)
            .map(|_| space.sample(context.base, rng))
            .collect();
        let candidates = context.evaluate_batch(index_offset + drawn, configurations)?;
        absorb(&mut best, &mut trials, SearchPhase::Grid, candidates, context.reporter);
        drawn += count;
        debug!(evaluated = drawn, "Grid batch finished.");
    }

    context.reporter.report(Progress::TaskFinish);
    finish(best, trials, context.reporter)
}

fn finish(
    best: Option<Candidate>,
    trials: Vec<Trial>,
    reporter: &ProgressReporter,
) -> Result<PhaseOutcome, EngineError> {
    let best = best.ok_or_else(|| {
        EngineError::Internal("grid search evaluated no candidates".to_string())
    })?;
    info!(
        score = best.evaluation.score,
        evaluations = trials.len(),
        "Grid search finished."
    );
    reporter.message(format!("Grid search best score: {:.2}", best.evaluation.score));
    Ok(PhaseOutcome { best, trials })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::materials::MaterialCatalog;
    use crate::core::models::config::ReactorConfiguration;
    use crate::core::models::state::ReactorState;
    use crate::engine::config::{
        OptimizerConfig, OptimizerConfigBuilder, RunParameters, SearchMethod, SimulationSettings,
    };
    use crate::engine::evaluator::SimulationEvaluator;
    use crate::engine::space::{ConfigurationSpace, Parameter};
    use crate::engine::statistics::OperationStatistics;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn f64_approx_equal(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    fn peaked(state: &ReactorState, _: &OperationStatistics) -> f64 {
        let u_r = (state.geometry.major_radius - 3.0) / 7.0;
        let u_b = (state.magnetic.toroidal_field - 2.0) / 18.0;
        100.0 - 100.0 * ((u_r - 0.5).powi(2) + (u_b - 0.3).powi(2))
    }

    fn two_dimensional(samples: usize) -> OptimizerConfig {
        OptimizerConfigBuilder::new()
            .method(SearchMethod::Grid)
            .iterations(samples)
            .max_time(1.0)
            .dt(1.0)
            .space(
                ConfigurationSpace::new()
                    .with_dimensions(&[Parameter::MajorRadius, Parameter::ToroidalField])
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn dense_grid_finds_the_known_optimum() {
        let catalog = MaterialCatalog::new();
        let scorer = peaked;
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(1.0, 1.0),
            &scorer,
        );
        let config = two_dimensional(400);
        let base = config.space.clamp(&ReactorConfiguration::default());
        let reporter = ProgressReporter::new();
        let context = SearchContext::new(&evaluator, &base, &config, &reporter);

        let outcome = run(&context, 400, 0, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(outcome.evaluations(), 400);
        assert!(f64_approx_equal(outcome.best.evaluation.score, 100.0, 1.0));
        assert!(outcome.trials.iter().all(|t| t.score <= outcome.best.evaluation.score));
    }

    #[test]
    fn same_seed_gives_same_trials() {
        let catalog = MaterialCatalog::new();
        let scorer = peaked;
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(1.0, 1.0),
            &scorer,
        );
        let config = two_dimensional(20);
        let base = config.space.clamp(&ReactorConfiguration::default());
        let reporter = ProgressReporter::new();
        let context = SearchContext::new(&evaluator, &base, &config, &reporter);

        let first = run(&context, 20, 0, &mut StdRng::seed_from_u64(3)).unwrap();
        let second = run(&context, 20, 0, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(first.trials, second.trials);
        assert_eq!(first.best.index, second.best.index);
    }

    #[test]
    fn zero_budget_still_runs_the_first_batch() {
        let catalog = MaterialCatalog::new();
        let scorer = peaked;
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(1.0, 1.0),
            &scorer,
        );
        let config = OptimizerConfig {
            batch_size: 4,
            time_budget: Some(Duration::ZERO),
            ..two_dimensional(50)
        };
        let base = config.space.clamp(&ReactorConfiguration::default());
        let reporter = ProgressReporter::new();
        let context = SearchContext::new(&evaluator, &base, &config, &reporter);

        let outcome = run(&context, 50, 0, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(outcome.evaluations(), 4);
    }

    #[test]
    fn trial_indices_start_at_the_offset() {
        let catalog = MaterialCatalog::new();
        let scorer = peaked;
        let evaluator = SimulationEvaluator::new(
            &catalog,
            SimulationSettings::default(),
            RunParameters::new(1.0, 1.0),
            &scorer,
        );
        let config = two_dimensional(5);
        let base = config.space.clamp(&ReactorConfiguration::default());
        let reporter = ProgressReporter::new();
        let context = SearchContext::new(&evaluator, &base, &config, &reporter);

        let outcome = run(&context, 5, 100, &mut StdRng::seed_from_u64(9)).unwrap();
        let indices: Vec<_> = outcome.trials.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![100, 101, 102, 103, 104]);
    }
}
