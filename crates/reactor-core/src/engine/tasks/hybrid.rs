use super::{grid_search, spsa};
use crate::engine::context::SearchContext;
use crate::engine::error::EngineError;
use crate::engine::evaluator::Evaluator;
use crate::engine::progress::Progress;
use crate::engine::state::{Candidate, PhaseOutcome};
use rand::Rng;
use tracing::{info, instrument};

/// Splits `budget` into a grid-search exploration share and an SPSA refinement share.
///
/// Grid search always gets at least one sample; SPSA gets whatever remains.
pub fn split_budget(budget: usize) -> (usize, usize) {
    let grid = (budget / 2).max(1);
    (grid, budget.saturating_sub(grid))
}

#[derive(Debug, Clone, PartialEq)]
pub struct HybridOutcome {
    pub best: Candidate,
    pub grid: PhaseOutcome,
    pub refinement: Option<PhaseOutcome>,
}

impl HybridOutcome {
    pub fn into_phases(self) -> (Candidate, Vec<PhaseOutcome>) {
        let mut phases = vec![self.grid];
        phases.extend(self.refinement);
        (self.best, phases)
    }
}

/// Explores with grid search, then refines its best candidate with SPSA.
///
/// The refined candidate is returned unless it scores below the grid-search best.
#[instrument(skip_all, name = "hybrid_task", fields(budget = budget))]
pub fn run<E>(
    context: &SearchContext<E>,
    budget: usize,
    rng: &mut impl Rng,
) -> Result<HybridOutcome, EngineError>
where
    E: Evaluator + ?Sized,
{
    let (grid_budget, spsa_budget) = split_budget(budget);
    info!(grid = grid_budget, spsa = spsa_budget, "Hybrid budget split.");

    context.reporter.report(Progress::PhaseStart {
        name: "Exploration (Grid Search)",
    });
    let grid = grid_search::run(context, grid_budget, 0, rng)?;
    context.reporter.report(Progress::PhaseFinish);

    if spsa_budget == 0 || context.budget_exhausted() {
        return Ok(HybridOutcome {
            best: grid.best.clone(),
            grid,
            refinement: None,
        });
    }

    context.reporter.report(Progress::PhaseStart {
        name: "Refinement (SPSA)",
    });
    let seed = grid.best.configuration.clone();
    let refinement = spsa::run(context, spsa_budget, &seed, grid.evaluations(), rng)?;
    context.reporter.report(Progress::PhaseFinish);

    let best = if refinement.best.evaluation.score >= grid.best.evaluation.score {
        refinement.best.clone()
    } else {
        info!(
            grid = grid.best.evaluation.score,
            refined = refinement.best.evaluation.score,
            "Refinement regressed; keeping the grid-search best."
        );
        grid.best.clone()
    };

    Ok(HybridOutcome {
        best,
        grid,
        refinement: Some(refinement),
    })
}
