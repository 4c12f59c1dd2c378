use crate::cli::OptimizeArgs;
use crate::config::builder::build_optimize_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use reactorsim::core::io;
use reactorsim::engine::evaluator::SimulationEvaluator;
use reactorsim::engine::progress::ProgressReporter;
use reactorsim::engine::state::OptimizationSession;
use reactorsim::workflows;
use tracing::info;

pub async fn run(args: OptimizeArgs) -> Result<()> {
    info!("Merging run settings from file and CLI arguments...");
    let config = build_optimize_config(&args)?;

    let evaluator = SimulationEvaluator::new(
        &config.catalog,
        config.settings,
        config.optimizer.run,
        &config.scorer,
    );
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut session = OptimizationSession::new();

    println!(
        "Optimizing with {} ({} iterations, seed {})...",
        config.optimizer.method, config.optimizer.iterations, config.optimizer.seed
    );
    if !config.optimizer.solutions.is_empty() {
        let names: Vec<&str> = config.optimizer.solutions.iter().map(|s| s.name()).collect();
        println!("Applying solutions: {}", names.join(", "));
    }
    info!("Invoking the core optimization workflow...");

    let result = tokio::task::block_in_place(|| {
        workflows::optimize::run(
            &config.base,
            &config.optimizer,
            &evaluator,
            &mut session,
            &reporter,
        )
    })?;

    let best = &result.best_configuration;
    let stats = &result.best_statistics;
    println!();
    println!(
        "Evaluated {} configurations in {:.1} s.",
        result.evaluations,
        result.elapsed.as_secs_f64()
    );
    println!("Best score:        {:.2}", result.best_score);
    println!("Major radius:      {:.2} m", best.major_radius);
    println!("Minor radius:      {:.2} m", best.minor_radius);
    println!("Toroidal field:    {:.2} T", best.toroidal_field);
    println!("Plasma current:    {:.2} MA", best.plasma_current / 1e6);
    println!("Temperature:       {:.1} keV", result.best_state.plasma.temperature_kev);
    println!("Operation time:    {:.1} s", stats.operation_time);
    println!("Average Q:         {:.2}", stats.average_q);
    if let Some(cause) = stats.failure_cause {
        println!("Failure:           {}", cause);
    }

    io::save_configuration(best, &config.save_path)?;
    info!("Best configuration saved to {:?}", config.save_path);
    println!(
        "✓ Best configuration written to: {}",
        config.save_path.display()
    );

    Ok(())
}
