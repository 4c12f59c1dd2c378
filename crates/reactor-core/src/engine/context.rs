use super::config::OptimizerConfig;
use super::error::EngineError;
use super::evaluator::Evaluator;
use super::progress::{Progress, ProgressReporter};
use super::state::{Candidate, SearchPhase, Trial};
use crate::core::models::config::ReactorConfiguration;
use std::time::{Duration, Instant};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Everything a search task needs: the objective, the clamped base configuration, the
/// optimizer settings, and the clock the time budget is measured against.
pub struct SearchContext<'a, E>
where
    E: Evaluator + ?Sized,
{
    pub evaluator: &'a E,
    pub base: &'a ReactorConfiguration,
    pub config: &'a OptimizerConfig,
    pub reporter: &'a ProgressReporter<'a>,
    pub started: Instant,
}

impl<'a, E> SearchContext<'a, E>
where
    E: Evaluator + ?Sized,
{
    pub fn new(
        evaluator: &'a E,
        base: &'a ReactorConfiguration,
        config: &'a OptimizerConfig,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            evaluator,
            base,
            config,
            reporter,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn budget_exhausted(&self) -> bool {
        match self.config.time_budget {
            Some(budget) => {
                let exhausted = self.elapsed() >= budget;
                if exhausted {
                    debug!(elapsed = ?self.elapsed(), ?budget, "Time budget exhausted.");
                }
                exhausted
            }
            None => false,
        }
    }

    /// Evaluates one configuration and reports it as a finished step.
    pub fn evaluate(
        &self,
        index: usize,
        configuration: ReactorConfiguration,
    ) -> Result<Candidate, EngineError> {
        let evaluation = self.evaluator.evaluate(&configuration)?;
        self.reporter.report(Progress::TaskIncrement);
        Ok(Candidate {
            index,
            configuration,
            evaluation,
        })
    }

    /// Evaluates a batch of configurations, in parallel when enabled. Results keep the input
    /// order; the first construction error aborts the batch.
    pub fn evaluate_batch(
        &self,
        first_index: usize,
        configurations: Vec<ReactorConfiguration>,
    ) -> Result<Vec<Candidate>, EngineError> {
        #[cfg(not(feature = "parallel"))]
        let iterator = configurations.into_iter().enumerate();

        #[cfg(feature = "parallel")]
        let iterator = configurations.into_par_iter().enumerate();

        iterator
            .map(|(offset, configuration)| self.evaluate(first_index + offset, configuration))
            .collect()
    }
}

/// Folds candidates into the incumbent in index order so that the earliest of equally
/// scored candidates wins, and records every one as a trial.
pub(crate) fn absorb(
    best: &mut Option<Candidate>,
    trials: &mut Vec<Trial>,
    phase: SearchPhase,
    candidates: impl IntoIterator<Item = Candidate>,
    reporter: &ProgressReporter,
) {
    for candidate in candidates {
        trials.push(Trial {
            index: candidate.index,
            phase,
            score: candidate.evaluation.score,
            configuration: candidate.configuration.clone(),
        });
        if candidate.improves_on(best.as_ref()) {
            reporter.report(Progress::BestScore(candidate.evaluation.score));
            *best = Some(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{OptimizerConfigBuilder, SearchMethod};
    use crate::engine::evaluator::Evaluation;
    use crate::engine::progress::ProgressReporter;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FieldScore;

    impl Evaluator for FieldScore {
        fn evaluate(&self, config: &ReactorConfiguration) -> Result<Evaluation, EngineError> {
            fixture_evaluation(config.toroidal_field)
        }
    }

    fn fixture_evaluation(score: f64) -> Result<Evaluation, EngineError> {
        use crate::core::materials::MaterialCatalog;
        use crate::engine::config::SimulationSettings;
        use crate::engine::simulation::SimulationEngine;

        let mut engine = SimulationEngine::new(
            ReactorConfiguration::reference_design(),
            &MaterialCatalog::new(),
            SimulationSettings::default(),
        )?;
        let final_state = engine.run(1.0, 1.0)?;
        let statistics = engine
            .statistics()
            .ok_or_else(|| EngineError::Internal("empty history".to_string()))?;
        Ok(Evaluation {
            score,
            final_state,
            statistics,
        })
    }

    fn optimizer_config() -> OptimizerConfig {
        OptimizerConfigBuilder::new()
            .method(SearchMethod::Grid)
            .iterations(4)
            .max_time(1.0)
            .dt(1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn batch_keeps_input_order_and_reports_each_candidate() {
        let config = optimizer_config();
        let base = ReactorConfiguration::reference_design();
        let increments = AtomicUsize::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if matches!(event, Progress::TaskIncrement) {
                increments.fetch_add(1, Ordering::SeqCst);
            }
        }));
        let context = SearchContext::new(&FieldScore, &base, &config, &reporter);

        let configurations: Vec<_> = [5.0, 9.0, 7.0]
            .iter()
            .map(|&b| ReactorConfiguration {
                toroidal_field: b,
                ..base.clone()
            })
            .collect();
        let candidates = context.evaluate_batch(10, configurations).unwrap();
        let indices: Vec<_> = candidates.iter().map(|c| c.index).collect();
        let scores: Vec<_> = candidates.iter().map(|c| c.evaluation.score).collect();
        assert_eq!(indices, vec![10, 11, 12]);
        assert_eq!(scores, vec![5.0, 9.0, 7.0]);
        drop(context);
        drop(reporter);
        assert_eq!(increments.into_inner(), 3);
    }

    #[test]
    fn absorb_prefers_the_earliest_of_equal_scores() {
        let config = optimizer_config();
        let base = ReactorConfiguration::reference_design();
        let reporter = ProgressReporter::new();
        let context = SearchContext::new(&FieldScore, &base, &config, &reporter);
        let configurations: Vec<_> = [3.0, 8.0, 8.0, 2.0]
            .iter()
            .map(|&b| ReactorConfiguration {
                toroidal_field: b,
                ..base.clone()
            })
            .collect();
        let candidates = context.evaluate_batch(0, configurations).unwrap();

        let mut best = None;
        let mut trials = Vec::new();
        absorb(&mut best, &mut trials, SearchPhase::Grid, candidates, &reporter);
        assert_eq!(best.unwrap().index, 1);
        assert_eq!(trials.len(), 4);
    }

    #[test]
    fn without_budget_never_exhausts() {
        let config = optimizer_config();
        let base = ReactorConfiguration::reference_design();
        let reporter = ProgressReporter::new();
        let context = SearchContext::new(&FieldScore, &base, &config, &reporter);
        assert!(!context.budget_exhausted());

        let zero_budget = OptimizerConfig {
            time_budget: Some(Duration::ZERO),
            ..config.clone()
        };
        let context = SearchContext::new(&FieldScore, &base, &zero_budget, &reporter);
        assert!(context.budget_exhausted());
    }
}
