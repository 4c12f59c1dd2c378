use reactorsim::core::materials::MaterialCatalog;
use reactorsim::core::models::config::ReactorConfiguration;
use reactorsim::engine::config::{OptimizerConfig, RunParameters, SimulationSettings};
use reactorsim::engine::scoring::ReferenceScore;
use std::path::PathBuf;

pub struct SimulateConfig {
    pub reactor: ReactorConfiguration,
    pub catalog: MaterialCatalog,
    pub settings: SimulationSettings,
    pub run: RunParameters,
    pub scorer: ReferenceScore,
    pub output: Option<PathBuf>,
}

pub struct OptimizeConfig {
    pub base: ReactorConfiguration,
    pub catalog: MaterialCatalog,
    pub settings: SimulationSettings,
    pub optimizer: OptimizerConfig,
    pub scorer: ReferenceScore,
    pub save_path: PathBuf,
}
