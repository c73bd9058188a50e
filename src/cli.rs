use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// thermos: evaluate bias-corrected maximum-temperature model output.
#[derive(Parser)]
#[command(
    name = "thermos",
    version,
    about = "Compare raw and bias-corrected gridded Tx model output against observations"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Per-year RMSE and bias of every model at one threshold.
    Evaluate(EvaluateArgs),
    /// Mean RMSE of raw and corrected series over a range of thresholds.
    Sweep(SweepArgs),
    /// Descriptive statistics of one variable of a file.
    Stats(StatsArgs),
    /// List the dimensions, variables and attributes of a NetCDF file.
    Inspect(InspectArgs),
    /// Time-mean maps of one model and their corrected-minus-raw difference.
    Diff(DiffArgs),
}

/// Arguments for the `evaluate` subcommand.
#[derive(clap::Args)]
pub struct EvaluateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "thermos.toml")]
    pub config: PathBuf,

    /// Override the filter threshold from config.
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Override the filter mode from config: "cor" or "none".
    #[arg(long, value_parser = ["cor", "none"])]
    pub filter: Option<String>,

    /// Path for metrics JSON output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `sweep` subcommand.
#[derive(clap::Args)]
pub struct SweepArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "thermos.toml")]
    pub config: PathBuf,

    /// Override the first threshold from config.
    #[arg(long)]
    pub start: Option<f64>,

    /// Override the last threshold from config.
    #[arg(long)]
    pub stop: Option<f64>,

    /// Override the threshold step from config.
    #[arg(long)]
    pub step: Option<f64>,

    /// Path for sweep JSON output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `stats` subcommand.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// NetCDF file to summarise.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Variable name; defaults to the first of tasmax, tx, tasmaxAdjust present.
    /// Variables without a time axis, such as `diff` maps, are summarised
    /// as stored.
    #[arg(long)]
    pub variable: Option<String>,

    /// Only use years from this one on.
    #[arg(long)]
    pub first_year: Option<i32>,

    /// Only use years up to this one.
    #[arg(long)]
    pub last_year: Option<i32>,

    /// Also write the statistics as JSON.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `inspect` subcommand.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// NetCDF file to inspect.
    pub input: PathBuf,
}

/// Arguments for the `diff` subcommand.
#[derive(clap::Args)]
pub struct DiffArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "thermos.toml")]
    pub config: PathBuf,

    /// Model file name, as listed in `[models].files`.
    #[arg(short, long)]
    pub model: String,

    /// Path for the NetCDF map output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the per-year cor - brut series next to the maps.
    #[arg(long)]
    pub yearly: bool,
}
