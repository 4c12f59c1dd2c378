use clap::{Args, Parser, Subcommand};
use reactorsim::core::solutions::Solution;
use reactorsim::engine::config::SearchMethod;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "reactorsim CLI - Simulate zero-dimensional tokamak reactors and search for designs that run long, ignite, and stay within their material limits.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to evaluate candidates in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single time-dependent simulation of one reactor configuration.
    Simulate(SimulateArgs),
    /// Search the design space for the highest-scoring configuration.
    Optimize(OptimizeArgs),
    /// Browse the research-backed configuration overlays.
    Solutions(SolutionsArgs),
}

/// Arguments for the `simulate` subcommand.
#[derive(Args, Debug, Default)]
pub struct SimulateArgs {
    /// Reactor configuration to simulate (.json or .toml). Defaults to the built-in high-field reference design.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run-settings file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Custom material catalog (TOML) extending the built-in materials.
    #[arg(long, value_name = "PATH")]
    pub materials: Option<PathBuf>,

    /// Simulated time horizon in seconds.
    #[arg(short = 't', long, value_name = "SECONDS")]
    pub max_time: Option<f64>,

    /// Integration step in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub dt: Option<f64>,

    /// Minimum simulated time between saved snapshots, in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub save_interval: Option<f64>,

    /// Operation time that earns the reference score's target bonus, in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub target_time: Option<f64>,

    /// Write the final state, statistics and score breakdown as JSON.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `optimize` subcommand.
#[derive(Args, Debug, Default)]
pub struct OptimizeArgs {
    /// Search method: grid, spsa or hybrid.
    #[arg(short, long, value_name = "METHOD")]
    pub method: Option<SearchMethod>,

    /// Grid samples, SPSA iterations, or the combined hybrid budget.
    #[arg(short = 'n', long, value_name = "INT")]
    pub iterations: Option<usize>,

    /// Simulated time horizon of every evaluation, in seconds.
    #[arg(short = 't', long, value_name = "SECONDS")]
    pub max_time: Option<f64>,

    /// Integration step of every evaluation, in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub dt: Option<f64>,

    /// Seed of the random number generator driving the search.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Stop searching after this many wall-clock seconds.
    #[arg(long, value_name = "SECONDS")]
    pub time_budget: Option<f64>,

    /// Apply the overlays that address a low safety factor before searching.
    #[arg(long)]
    pub apply_solutions: bool,

    /// Apply a named overlay before searching. Can be used multiple times.
    #[arg(long = "solution", value_name = "NAME")]
    pub solutions: Vec<Solution>,

    /// Base configuration to search around (.json or .toml). Defaults to the built-in
    /// ITER-like design.
    #[arg(short, long, value_name = "PATH")]
    pub load: Option<PathBuf>,

    /// Where to write the best configuration found (.json or .toml).
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Run-settings file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Custom material catalog (TOML) extending the built-in materials.
    #[arg(long, value_name = "PATH")]
    pub materials: Option<PathBuf>,
}

/// Arguments for the `solutions` subcommand.
#[derive(Args, Debug)]
pub struct SolutionsArgs {
    #[command(subcommand)]
    pub command: SolutionsCommands,
}

#[derive(Subcommand, Debug)]
pub enum SolutionsCommands {
    /// List every available overlay.
    List,
    /// Show the overlays that address an operational issue (e.g. safety_factor, tritium).
    Show {
        #[arg(required = true)]
        issue: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimize_arguments_parse() {
        let cli = Cli::parse_from([
            "reactorsim",
            "-vv",
            "optimize",
            "--method",
            "spsa",
            "-n",
            "50",
            "--apply-solutions",
            "--solution",
            "hts-magnets",
            "--solution",
            "high_elongation",
            "--save",
            "best.toml",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Optimize(args) = cli.command else {
            panic!("Expected 'optimize' subcommand");
        };
        assert_eq!(args.method, Some(SearchMethod::Spsa));
        assert_eq!(args.iterations, Some(50));
        assert!(args.apply_solutions);
        assert_eq!(
            args.solutions,
            vec![Solution::HtsMagnets, Solution::HighElongation]
        );
        assert_eq!(args.save, Some(PathBuf::from("best.toml")));
        assert_eq!(args.max_time, None);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let result = Cli::try_parse_from(["reactorsim", "optimize", "--method", "annealing"]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_solution_is_rejected() {
        let result = Cli::try_parse_from(["reactorsim", "optimize", "--solution", "warp-drive"]);
        assert!(result.is_err());
    }

    #[test]
    fn simulate_arguments_parse() {
        let cli = Cli::parse_from([
            "reactorsim",
            "simulate",
            "-c",
            "iter.json",
            "-t",
            "600",
            "--dt",
            "0.5",
            "-o",
            "stats.json",
        ]);
        let Commands::Simulate(args) = cli.command else {
            panic!("Expected 'simulate' subcommand");
        };
        assert_eq!(args.config, Some(PathBuf::from("iter.json")));
        assert_eq!(args.max_time, Some(600.0));
        assert_eq!(args.dt, Some(0.5));
        assert_eq!(args.output, Some(PathBuf::from("stats.json")));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["reactorsim", "-q", "-v", "solutions", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn solutions_show_requires_an_issue() {
        assert!(Cli::try_parse_from(["reactorsim", "solutions", "show"]).is_err());
        let cli = Cli::parse_from(["reactorsim", "solutions", "show", "tritium"]);
        assert!(matches!(
            cli.command,
            Commands::Solutions(SolutionsArgs {
                command: SolutionsCommands::Show { ref issue }
            }) if issue == "tritium"
        ));
    }
}
