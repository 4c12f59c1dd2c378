use crate::core::models::config::ReactorConfiguration;
use crate::engine::context::{SearchContext, absorb};
use crate::engine::error::EngineError;
use crate::engine::evaluator::Evaluator;
use crate::engine::progress::Progress;
use crate::engine::state::{Candidate, PhaseOutcome, SearchPhase};
use crate::engine::utils::sampling;
use rand::Rng;
use tracing::{debug, info, instrument, trace, warn};

/// Simultaneous-perturbation stochastic approximation in the normalized search space.
///
/// Each iteration perturbs every tunable coordinate by `±c_k` at once, evaluates the two
/// mirrored candidates, and steps along the resulting gradient estimate. Steps are clipped
/// per coordinate and iterates stay inside `[0, 1]`. The returned best is the highest
/// scoring point visited, which includes `start` itself.
#[instrument(skip_all, name = "spsa_task", fields(iterations = iterations))]
pub fn run<E>(
    context: &SearchContext<E>,
    iterations: usize,
    start: &ReactorConfiguration,
    index_offset: usize,
    rng: &mut impl Rng,
) -> Result<PhaseOutcome, EngineError>
where
    E: Evaluator + ?Sized,
{
    let space = &context.config.space;
    let gains = context.config.spsa;
    let dimensions = space.dimensions().len();

    context.reporter.report(Progress::TaskStart {
        total_steps: 1 + 2 * iterations as u64,
    });

    let mut theta = space.to_unit(&space.clamp(start));
    let mut best = None;
    let mut trials = Vec::with_capacity(1 + 2 * iterations);
    let mut next_index = index_offset;

    let initial = context.evaluate(next_index, space.from_unit(context.base, &theta))?;
    next_index += 1;
    absorb(&mut best, &mut trials, SearchPhase::Spsa, [initial], context.reporter);

    for k in 1..=iterations {
        if context.budget_exhausted() {
            info!(completed = k - 1, planned = iterations, "SPSA stopped by time budget.");
            break;
        }
        let (a_k, c_k) = gains.gains(k, iterations);
        let delta = sampling::rademacher(dimensions, rng);
        let plus_point = sampling::shifted(&theta, &delta, c_k);
        let minus_point = sampling::shifted(&theta, &delta, -c_k);

        let (plus, minus) = evaluate_pair(
            context,
            next_index,
            space.from_unit(context.base, &plus_point),
            space.from_unit(context.base, &minus_point),
        )?;
        next_index += 2;

        let difference = plus.evaluation.score - minus.evaluation.score;
        if difference.is_finite() {
            for (coordinate, d) in theta.iter_mut().zip(&delta) {
                let gradient = difference / (2.0 * c_k * d);
                let step = (a_k * gradient).clamp(-gains.max_step, gains.max_step);
                *coordinate = (*coordinate + step).clamp(0.0, 1.0);
            }
        } else {
            warn!(iteration = k, "Non-finite score difference; skipping update.");
        }
        trace!(iteration = k, a_k, c_k, difference, "SPSA iteration.");

        absorb(&mut best, &mut trials, SearchPhase::Spsa, [plus, minus], context.reporter);
    }

    context.reporter.report(Progress::TaskFinish);

    let best = best.ok_or_else(|| EngineError::Internal("SPSA evaluated no candidates".to_string()))?;
    debug!(final_point = ?theta, "SPSA trajectory finished.");
    info!(
        score = best.evaluation.score,
        evaluations = trials.len(),
        "SPSA finished."
    );
    context
        .reporter
        .message(format!("SPSA best score: {:.2}", best.evaluation.score));
    Ok(PhaseOutcome { best, trials })
}

fn evaluate_pair<E>(
    context: &SearchContext<E>,
    index: usize,
    plus: ReactorConfiguration,
    minus: ReactorConfiguration,
) -> Result<(Candidate, Candidate), EngineError>
where
    E: Evaluator + ?Sized,
{
    #[cfg(feature = "parallel")]
    let (plus, minus) = rayon::join(
        || context.evaluate(index, plus),
        || context.evaluate(index + 1, minus),
    );

    #[cfg(not(feature = "parallel"))]
    let (plus, minus) = (context.evaluate(index, plus), context.evaluate(index + 1, minus));

    Ok((plus?, minus?))
}
