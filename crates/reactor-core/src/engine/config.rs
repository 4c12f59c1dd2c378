use super::space::ConfigurationSpace;
use crate::core::solutions::Solution;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

fn require_positive(parameter: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            parameter,
            reason: format!("must be positive and finite (got {value})"),
        })
    }
}

fn require_non_negative(parameter: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            parameter,
            reason: format!("must be non-negative and finite (got {value})"),
        })
    }
}

/// Limits that turn a running reactor into a failed one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FailureThresholds {
    /// Seconds during which a safety factor between critical and minimum is tolerated.
    pub safety_grace: f64,
    /// Seconds during which the Lawson criterion may remain unmet.
    pub lawson_grace: f64,
    pub min_safety_factor: f64,
    /// Below this value the safety violation is immediate, grace or not.
    pub critical_safety_factor: f64,
    /// atoms
    pub min_deuterium_inventory: f64,
}

impl Default for FailureThresholds {
    fn default() -> Self {
        Self {
            safety_grace: 30.0,
            lawson_grace: 60.0,
            min_safety_factor: 2.0,
            critical_safety_factor: 1.5,
            min_deuterium_inventory: 1e22,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    /// Minimum simulated time in seconds between two saved snapshots.
    pub save_interval: f64,
    pub thresholds: FailureThresholds,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            save_interval: 10.0,
            thresholds: FailureThresholds::default(),
        }
    }
}

#[derive(Default)]
pub struct SimulationSettingsBuilder {
    save_interval: Option<f64>,
    safety_grace: Option<f64>,
    lawson_grace: Option<f64>,
    min_safety_factor: Option<f64>,
    critical_safety_factor: Option<f64>,
    min_deuterium_inventory: Option<f64>,
}

impl SimulationSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_interval(mut self, seconds: f64) -> Self {
        self.save_interval = Some(seconds);
        self
    }
    pub fn safety_grace(mut self, seconds: f64) -> Self {
        self.safety_grace = Some(seconds);
        self
    }
    pub fn lawson_grace(mut self, seconds: f64) -> Self {
        self.lawson_grace = Some(seconds);
        self
    }
    pub fn min_safety_factor(mut self, q: f64) -> Self {
        self.min_safety_factor = Some(q);
        self
    }
    pub fn critical_safety_factor(mut self, q: f64) -> Self {
        self.critical_safety_factor = Some(q);
        self
    }
    pub fn min_deuterium_inventory(mut self, atoms: f64) -> Self {
        self.min_deuterium_inventory = Some(atoms);
        self
    }

    /// Builds the settings. Only the save interval is required; every failure threshold
    /// falls back to [`FailureThresholds::default`].
    pub fn build(self) -> Result<SimulationSettings, ConfigError> {
        let defaults = FailureThresholds::default();
        let save_interval = self
            .save_interval
            .ok_or(ConfigError::MissingParameter("save_interval"))?;
        let thresholds = FailureThresholds {
            safety_grace: require_non_negative(
                "safety_grace",
                self.safety_grace.unwrap_or(defaults.safety_grace),
            )?,
            lawson_grace: require_non_negative(
                "lawson_grace",
                self.lawson_grace.unwrap_or(defaults.lawson_grace),
            )?,
            min_safety_factor: require_positive(
                "min_safety_factor",
                self.min_safety_factor.unwrap_or(defaults.min_safety_factor),
            )?,
            critical_safety_factor: require_non_negative(
                "critical_safety_factor",
                self.critical_safety_factor
                    .unwrap_or(defaults.critical_safety_factor),
            )?,
            min_deuterium_inventory: require_non_negative(
                "min_deuterium_inventory",
                self.min_deuterium_inventory
                    .unwrap_or(defaults.min_deuterium_inventory),
            )?,
        };
        if thresholds.critical_safety_factor > thresholds.min_safety_factor {
            return Err(ConfigError::InvalidParameter {
                parameter: "critical_safety_factor",
                reason: format!(
                    "must not exceed min_safety_factor ({})",
                    thresholds.min_safety_factor
                ),
            });
        }
        Ok(SimulationSettings {
            save_interval: require_positive("save_interval", save_interval)?,
            thresholds,
        })
    }
}

/// Time horizon and step of a single simulation run, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunParameters {
    pub max_time: f64,
    pub dt: f64,
}

impl RunParameters {
    pub fn new(max_time: f64, dt: f64) -> Self {
        Self { max_time, dt }
    }

    /// Number of integration steps needed to reach `max_time`, counting a final partial step.
    pub fn step_count(&self) -> u64 {
        (self.max_time / self.dt).ceil().max(0.0) as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethod {
    Grid,
    Spsa,
    Hybrid,
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Grid => "grid",
            Self::Spsa => "spsa",
            Self::Hybrid => "hybrid",
        })
    }
}

impl FromStr for SearchMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "spsa" => Ok(Self::Spsa),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(ConfigError::InvalidParameter {
                parameter: "method",
                reason: format!("unknown search method '{other}' (expected grid, spsa or hybrid)"),
            }),
        }
    }
}

/// SPSA gain schedule, expressed in the normalized `[0, 1]` coordinates of the search space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpsaParameters {
    pub a: f64,
    pub c: f64,
    /// Stability constant `A` as a fraction of the iteration budget.
    pub stability_fraction: f64,
    pub alpha: f64,
    pub gamma: f64,
    /// Largest change of a single normalized coordinate per update.
    pub max_step: f64,
}

impl Default for SpsaParameters {
    fn default() -> Self {
        Self {
            a: 0.01,
            c: 0.05,
            stability_fraction: 0.1,
            alpha: 0.602,
            gamma: 0.101,
            max_step: 0.1,
        }
    }
}

impl SpsaParameters {
    /// Step gain `a_k = a / (k + A)^α` and perturbation size `c_k = c / k^γ` for the
    /// 1-based iteration `k`.
    pub fn gains(&self, k: usize, iterations: usize) -> (f64, f64) {
        let k = k.max(1) as f64;
        let stability = self.stability_fraction * iterations as f64;
        (
            self.a / (k + stability).powf(self.alpha),
            self.c / k.powf(self.gamma),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    pub method: SearchMethod,
    /// Grid samples, SPSA iterations, or the combined budget of a hybrid run.
    pub iterations: usize,
    pub run: RunParameters,
    pub seed: u64,
    pub time_budget: Option<Duration>,
    pub batch_size: usize,
    pub spsa: SpsaParameters,
    pub space: ConfigurationSpace,
    /// Overlays applied once to the base configuration before searching.
    pub solutions: Vec<Solution>,
}

#[derive(Default)]
pub struct OptimizerConfigBuilder {
    method: Option<SearchMethod>,
    iterations: Option<usize>,
    max_time: Option<f64>,
    dt: Option<f64>,
    seed: Option<u64>,
    time_budget: Option<Duration>,
    batch_size: Option<usize>,
    spsa: Option<SpsaParameters>,
    space: Option<ConfigurationSpace>,
    solutions: Vec<Solution>,
}

impl OptimizerConfigBuilder {
    pub const DEFAULT_SEED: u64 = 42;
    pub const DEFAULT_BATCH_SIZE: usize = 32;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: SearchMethod) -> Self {
        self.method = Some(method);
        self
    }
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }
    pub fn max_time(mut self, seconds: f64) -> Self {
        self.max_time = Some(seconds);
        self
    }
    pub fn dt(mut self, seconds: f64) -> Self {
        self.dt = Some(seconds);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }
    pub fn spsa(mut self, parameters: SpsaParameters) -> Self {
        self.spsa = Some(parameters);
        self
    }
    pub fn space(mut self, space: ConfigurationSpace) -> Self {
        self.space = Some(space);
        self
    }
    pub fn solution(mut self, solution: Solution) -> Self {
        self.solutions.push(solution);
        self
    }
    pub fn solutions(mut self, solutions: impl IntoIterator<Item = Solution>) -> Self {
        self.solutions.extend(solutions);
        self
    }

    pub fn build(self) -> Result<OptimizerConfig, ConfigError> {
        let iterations = self
            .iterations
            .ok_or(ConfigError::MissingParameter("iterations"))?;
        if iterations == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        let max_time = require_positive(
            "max_time",
            self.max_time
                .ok_or(ConfigError::MissingParameter("max_time"))?,
        )?;
        let dt = require_positive("dt", self.dt.ok_or(ConfigError::MissingParameter("dt"))?)?;
        if dt > max_time {
            return Err(ConfigError::InvalidParameter {
                parameter: "dt",
                reason: format!("must not exceed max_time ({max_time} s)"),
            });
        }
        let batch_size = self.batch_size.unwrap_or(Self::DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(OptimizerConfig {
            method: self.method.ok_or(ConfigError::MissingParameter("method"))?,
            iterations,
            run: RunParameters::new(max_time, dt),
            seed: self.seed.unwrap_or(Self::DEFAULT_SEED),
            time_budget: self.time_budget,
            batch_size,
            spsa: self.spsa.unwrap_or_default(),
            space: self.space.unwrap_or_default(),
            solutions: self.solutions,
        })
    }
}
