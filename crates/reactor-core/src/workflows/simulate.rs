use crate::core::materials::MaterialCatalog;
use crate::core::models::config::ReactorConfiguration;
use crate::core::models::state::{Advisory, ReactorState};
use crate::engine::config::{RunParameters, SimulationSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::simulation::SimulationEngine;
use crate::engine::statistics::OperationStatistics;
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub final_state: ReactorState,
    pub statistics: OperationStatistics,
    pub history: Vec<ReactorState>,
}

impl SimulationReport {
    /// Every distinct kind of advisory raised in the saved history, first occurrence kept.
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut seen: Vec<Advisory> = Vec::new();
        for advisory in self.history.iter().flat_map(|s| s.advisories.iter()) {
            let kind = std::mem::discriminant(advisory);
            if !seen.iter().any(|a| std::mem::discriminant(a) == kind) {
                seen.push(*advisory);
            }
        }
        seen
    }
}

#[instrument(skip_all, name = "simulation_workflow")]
pub fn run(
    config: ReactorConfiguration,
    catalog: &MaterialCatalog,
    settings: SimulationSettings,
    run: RunParameters,
    reporter: &ProgressReporter,
) -> Result<SimulationReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let mut engine = SimulationEngine::new(config, catalog, settings)?;
    info!(
        first_wall = %engine.config().first_wall_material,
        blanket = %engine.config().blanket_material,
        "Reactor configuration accepted."
    );
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Time Integration",
    });
    let final_state = engine.run_with_progress(run.max_time, run.dt, reporter)?;
    reporter.report(Progress::PhaseFinish);

    let statistics = engine
        .statistics()
        .ok_or_else(|| EngineError::Internal("simulation produced an empty history".to_string()))?;
    info!(
        operation_time = statistics.operation_time,
        failed = statistics.failed,
        energy_mwh = statistics.total_energy_mwh(),
        "Simulation workflow complete."
    );

    Ok(SimulationReport {
        final_state,
        statistics,
        history: engine.history().to_vec(),
    })
}
