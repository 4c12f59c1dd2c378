use crate::error::{CliError, Result};
use reactorsim::engine::config::SearchMethod;
use reactorsim::engine::space::Parameter;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSimulationConfig {
    pub max_time: Option<f64>,
    pub dt: Option<f64>,
    pub save_interval: Option<f64>,
    pub target_time: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileThresholdsConfig {
    pub safety_grace: Option<f64>,
    pub lawson_grace: Option<f64>,
    pub min_safety_factor: Option<f64>,
    pub critical_safety_factor: Option<f64>,
    pub min_deuterium_inventory: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSpsaConfig {
    pub a: Option<f64>,
    pub c: Option<f64>,
    pub stability_fraction: Option<f64>,
    pub alpha: Option<f64>,
    pub gamma: Option<f64>,
    pub max_step: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct FileBounds {
    pub min: f64,
    pub max: f64,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOptimizerConfig {
    pub method: Option<SearchMethod>,
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    /// Seconds of wall-clock time.
    pub time_budget: Option<f64>,
    pub batch_size: Option<usize>,
    pub apply_solutions: Option<bool>,
    #[serde(default)]
    pub solutions: Vec<String>,
    pub dimensions: Option<Vec<Parameter>>,
    #[serde(default)]
    pub bounds: HashMap<Parameter, FileBounds>,
    pub spsa: Option<FileSpsaConfig>,
    pub save: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub simulation: Option<FileSimulationConfig>,
    pub thresholds: Option<FileThresholdsConfig>,
    pub optimizer: Option<FileOptimizerConfig>,
    /// Custom material catalog extending the built-in one.
    pub materials: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading run settings from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::parsing(path, e))
    }

    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map(Self::from_file)
            .transpose()
            .map(Option::unwrap_or_default)
    }
}
