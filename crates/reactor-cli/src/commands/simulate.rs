use crate::cli::SimulateArgs;
use crate::config::builder::build_simulate_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use reactorsim::core::models::state::ReactorState;
use reactorsim::engine::progress::ProgressReporter;
use reactorsim::engine::scoring::ScoreBreakdown;
use reactorsim::engine::statistics::OperationStatistics;
use reactorsim::workflows;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Serialize)]
struct SimulationSummary<'a> {
    final_state: &'a ReactorState,
    statistics: &'a OperationStatistics,
    score: ScoreBreakdown,
}

pub async fn run(args: SimulateArgs) -> Result<()> {
    info!("Merging run settings from file and CLI arguments...");
    let config = build_simulate_config(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Simulating {:.0} s at dt = {} s...",
        config.run.max_time, config.run.dt
    );
    info!("Invoking the core simulation workflow...");

    let report = tokio::task::block_in_place(|| {
        workflows::simulate::run(
            config.reactor.clone(),
            &config.catalog,
            config.settings,
            config.run,
            &reporter,
        )
    })?;

    for advisory in report.advisories() {
        warn!("{}", advisory);
    }

    let breakdown = config
        .scorer
        .breakdown(&report.final_state, &report.statistics);
    print_summary(&report.final_state, &report.statistics, &breakdown);

    if let Some(output) = &config.output {
        write_summary(
            output,
            &SimulationSummary {
                final_state: &report.final_state,
                statistics: &report.statistics,
                score: breakdown,
            },
        )?;
        println!("✓ Statistics written to: {}", output.display());
    }

    Ok(())
}

fn print_summary(state: &ReactorState, stats: &OperationStatistics, score: &ScoreBreakdown) {
    println!();
    match (stats.failure_cause, stats.failure_time) {
        (Some(cause), Some(time)) => println!("Status:            FAILED at t = {time:.1} s ({cause})"),
        _ => println!("Status:            operating at t = {:.1} s", state.time),
    }
    println!("Operation time:    {:.1} s", stats.operation_time);
    println!(
        "Q factor:          {:.2} (average {:.2}, peak {:.2})",
        state.power.q_factor, stats.average_q, stats.max_q
    );
    println!("Net power:         {:.1} MW", state.power.net_power / 1e6);
    println!("Energy produced:   {:.2} MWh", stats.total_energy_mwh());
    println!("Safety factor:     {:.2}", state.magnetic.safety_factor);
    println!(
        "Lawson criterion:  {}",
        if stats.lawson_met { "met" } else { "not met" }
    );
    println!(
        "Tritium breeding:  {:.2}",
        state.neutronics.tritium_breeding_ratio
    );
    println!("Wall damage:       {:.3} DPA", state.material_damage);
    if stats.can_run_indefinitely {
        println!("Sustainable:       indefinitely");
    } else {
        println!(
            "Sustainable:       {:.3e} s (limited by {:?})",
            stats.prediction.max_runtime, stats.prediction.limiting_factor
        );
    }
    println!("Score:             {:.2}", score.total);
}

fn write_summary(path: &Path, summary: &SimulationSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).map_err(|e| CliError::parsing(path, e))?;
    std::fs::write(path, json)?;
    Ok(())
}
