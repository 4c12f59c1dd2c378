use super::config::SearchMethod;
use super::evaluator::Evaluation;
use super::statistics::OperationStatistics;
use crate::core::models::config::ReactorConfiguration;
use crate::core::models::state::ReactorState;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    Grid,
    Spsa,
}

/// One evaluated candidate, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trial {
    pub index: usize,
    pub phase: SearchPhase,
    pub score: f64,
    pub configuration: ReactorConfiguration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub configuration: ReactorConfiguration,
    pub evaluation: Evaluation,
}

impl Candidate {
    /// Keeps the higher-scoring candidate; on equal scores the incumbent (found earlier) stays.
    pub fn improves_on(&self, incumbent: Option<&Candidate>) -> bool {
        incumbent.is_none_or(|best| self.evaluation.score > best.evaluation.score)
    }
}

/// Result of one search phase (a grid pass or an SPSA descent).
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOutcome {
    pub best: Candidate,
    pub trials: Vec<Trial>,
}

impl PhaseOutcome {
    pub fn evaluations(&self) -> usize {
        self.trials.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub method: SearchMethod,
    pub best_configuration: ReactorConfiguration,
    pub best_score: f64,
    pub best_state: ReactorState,
    pub best_statistics: OperationStatistics,
    pub trials: Vec<Trial>,
    pub evaluations: usize,
    pub elapsed: Duration,
}

impl OptimizationResult {
    pub(crate) fn from_phases(
        method: SearchMethod,
        best: Candidate,
        phases: Vec<PhaseOutcome>,
        elapsed: Duration,
    ) -> Self {
        let trials: Vec<Trial> = phases.into_iter().flat_map(|p| p.trials).collect();
        Self {
            method,
            best_configuration: best.configuration,
            best_score: best.evaluation.score,
            best_state: best.evaluation.final_state,
            best_statistics: best.evaluation.statistics,
            evaluations: trials.len(),
            trials,
            elapsed,
        }
    }
}

/// Caller-owned search state carried across optimizer invocations.
///
/// Each call to the optimize workflow records its result here; the session keeps the best
/// configuration seen so far without any process-wide state.
#[derive(Debug, Clone, Default)]
pub struct OptimizationSession {
    best_configuration: Option<ReactorConfiguration>,
    best_score: Option<f64>,
    best_method: Option<SearchMethod>,
    runs: usize,
    evaluations: usize,
}

impl OptimizationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished run and returns whether it improved the session's best score.
    pub fn record(&mut self, result: &OptimizationResult) -> bool {
        self.runs += 1;
        self.evaluations += result.evaluations;
        let improved = self.best_score.is_none_or(|best| result.best_score > best);
        if improved {
            self.best_configuration = Some(result.best_configuration.clone());
            self.best_score = Some(result.best_score);
            self.best_method = Some(result.method);
        }
        improved
    }

    pub fn best_configuration(&self) -> Option<&ReactorConfiguration> {
        self.best_configuration.as_ref()
    }

    pub fn best_score(&self) -> Option<f64> {
        self.best_score
    }

    pub fn best_method(&self) -> Option<SearchMethod> {
        self.best_method
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }
}
