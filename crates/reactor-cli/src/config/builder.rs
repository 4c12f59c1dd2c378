use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileOptimizerConfig, FileSpsaConfig, FileThresholdsConfig};
use super::models::{OptimizeConfig, SimulateConfig};
use crate::cli::{OptimizeArgs, SimulateArgs};
use crate::error::{CliError, Result};
use reactorsim::core::io;
use reactorsim::core::materials::MaterialCatalog;
use reactorsim::core::models::config::ReactorConfiguration;
use reactorsim::core::solutions::Solution;
use reactorsim::engine::config::{
    OptimizerConfigBuilder, RunParameters, SimulationSettings, SimulationSettingsBuilder,
    SpsaParameters,
};
use reactorsim::engine::error::EngineError;
use reactorsim::engine::scoring::ReferenceScore;
use reactorsim::engine::space::ConfigurationSpace;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Number of `safety_factor` overlays applied by `--apply-solutions`.
const SAFETY_OVERLAYS: usize = 2;

pub fn build_simulate_config(args: &SimulateArgs) -> Result<SimulateConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = FileConfig::load_optional(args.settings.as_deref())?;

    let sim_file = file_config.simulation.take().unwrap_or_default();
    let max_time = args
        .max_time
        .or(sim_file.max_time)
        .unwrap_or(defaults.max_time);
    let dt = args.dt.or(sim_file.dt).unwrap_or(defaults.dt);
    let save_interval = args
        .save_interval
        .or(sim_file.save_interval)
        .unwrap_or(defaults.save_interval);
    let target_time = args
        .target_time
        .or(sim_file.target_time)
        .unwrap_or(defaults.target_time);

    let settings = merge_settings(save_interval, file_config.thresholds.take())?;
    let catalog = load_catalog(args.materials.as_deref().or(file_config.materials.as_deref()))?;

    let reactor = match &args.config {
        Some(path) => {
            debug!("Loading reactor configuration from {:?}", path);
            io::load_configuration(path)?
        }
        None => ReactorConfiguration::reference_design(),
    };

    Ok(SimulateConfig {
        reactor,
        catalog,
        settings,
        run: RunParameters::new(max_time, dt),
        scorer: ReferenceScore::new(target_time),
        output: args.output.clone(),
    })
}

pub fn build_optimize_config(args: &OptimizeArgs) -> Result<OptimizeConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = FileConfig::load_optional(args.settings.as_deref())?;

    let sim_file = file_config.simulation.take().unwrap_or_default();
    let opt_file = file_config.optimizer.take().unwrap_or_default();

    let max_time = args
        .max_time
        .or(sim_file.max_time)
        .unwrap_or(defaults.max_time);
    let dt = args.dt.or(sim_file.dt).unwrap_or(defaults.dt);
    let save_interval = sim_file.save_interval.unwrap_or(defaults.save_interval);
    let target_time = sim_file.target_time.unwrap_or(defaults.target_time);

    let method = args.method.or(opt_file.method).unwrap_or(defaults.method);
    let iterations = args
        .iterations
        .or(opt_file.iterations)
        .unwrap_or(defaults.iterations);
    let seed = args.seed.or(opt_file.seed).unwrap_or(defaults.seed);
    let batch_size = opt_file.batch_size.unwrap_or(defaults.batch_size);

    let mut builder = OptimizerConfigBuilder::new()
        .method(method)
        .iterations(iterations)
        .max_time(max_time)
        .dt(dt)
        .seed(seed)
        .batch_size(batch_size)
        .spsa(merge_spsa(opt_file.spsa.clone()))
        .space(merge_space(&opt_file)?)
        .solutions(resolve_solutions(args, &opt_file)?);

    if let Some(seconds) = args.time_budget.or(opt_file.time_budget) {
        builder = builder.time_budget(parse_budget(seconds)?);
    }

    let optimizer = builder.build().map_err(|e| CliError::Config(e.to_string()))?;
    let settings = merge_settings(save_interval, file_config.thresholds.take())?;
    let catalog = load_catalog(args.materials.as_deref().or(file_config.materials.as_deref()))?;

    let base = match &args.load {
        Some(path) => {
            debug!("Loading base configuration from {:?}", path);
            io::load_configuration(path)?
        }
        None => ReactorConfiguration::default(),
    };
    let save_path = args
        .save
        .clone()
        .or(opt_file.save)
        .unwrap_or_else(|| PathBuf::from(&defaults.save_path));

    Ok(OptimizeConfig {
        base,
        catalog,
        settings,
        optimizer,
        scorer: ReferenceScore::new(target_time),
        save_path,
    })
}

fn merge_settings(
    save_interval: f64,
    file_val: Option<FileThresholdsConfig>,
) -> Result<SimulationSettings> {
    let file_val = file_val.unwrap_or_default();
    let mut builder = SimulationSettingsBuilder::new().save_interval(save_interval);
    if let Some(v) = file_val.safety_grace {
        builder = builder.safety_grace(v);
    }
    if let Some(v) = file_val.lawson_grace {
        builder = builder.lawson_grace(v);
    }
    if let Some(v) = file_val.min_safety_factor {
        builder = builder.min_safety_factor(v);
    }
    if let Some(v) = file_val.critical_safety_factor {
        builder = builder.critical_safety_factor(v);
    }
    if let Some(v) = file_val.min_deuterium_inventory {
        builder = builder.min_deuterium_inventory(v);
    }
    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

fn merge_spsa(file_val: Option<FileSpsaConfig>) -> SpsaParameters {
    let defaults = SpsaParameters::default();
    let Some(p) = file_val else {
        return defaults;
    };
    SpsaParameters {
        a: p.a.unwrap_or(defaults.a),
        c: p.c.unwrap_or(defaults.c),
        stability_fraction: p.stability_fraction.unwrap_or(defaults.stability_fraction),
        alpha: p.alpha.unwrap_or(defaults.alpha),
        gamma: p.gamma.unwrap_or(defaults.gamma),
        max_step: p.max_step.unwrap_or(defaults.max_step),
    }
}

fn merge_space(file_val: &FileOptimizerConfig) -> Result<ConfigurationSpace> {
    let mut space = ConfigurationSpace::new();
    if let Some(dimensions) = &file_val.dimensions {
        space = space.with_dimensions(dimensions).map_err(EngineError::from)?;
    }
    for (parameter, bounds) in &file_val.bounds {
        space = space
            .with_bounds(*parameter, bounds.min, bounds.max)
            .map_err(EngineError::from)?;
    }
    Ok(space)
}

fn resolve_solutions(args: &OptimizeArgs, file_val: &FileOptimizerConfig) -> Result<Vec<Solution>> {
    let mut resolved = Vec::new();
    if args.apply_solutions || file_val.apply_solutions.unwrap_or(false) {
        let overlays = Solution::for_issue("safety_factor")
            .map_err(|e| CliError::Config(e.to_string()))?;
        resolved.extend(overlays.iter().take(SAFETY_OVERLAYS).copied());
    }
    for name in &file_val.solutions {
        resolved.push(
            name.parse::<Solution>()
                .map_err(|e| CliError::Config(e.to_string()))?,
        );
    }
    resolved.extend(args.solutions.iter().copied());

    let mut unique: Vec<Solution> = Vec::with_capacity(resolved.len());
    for solution in resolved {
        if !unique.contains(&solution) {
            unique.push(solution);
        }
    }
    Ok(unique)
}

fn parse_budget(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds).map_err(|_| {
        CliError::Argument(format!(
            "time budget must be a non-negative number of seconds (got {seconds})"
        ))
    })
}

fn load_catalog(path: Option<&Path>) -> Result<MaterialCatalog> {
    match path {
        Some(path) => {
            debug!("Loading material catalog from {:?}", path);
            Ok(MaterialCatalog::load(path).map_err(EngineError::from)?)
        }
        None => Ok(MaterialCatalog::new()),
    }
}
