use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level thermos configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThermosConfig {
    /// Input and output locations.
    pub paths: PathsToml,

    /// Which model files to compare.
    #[serde(default)]
    pub models: ModelsToml,

    /// Variable and coordinate names.
    #[serde(default)]
    pub variables: VariablesToml,

    /// Single-threshold evaluation settings.
    #[serde(default)]
    pub evaluate: EvaluateToml,

    /// Threshold sweep settings.
    #[serde(default)]
    pub sweep: SweepToml,
}

impl ThermosConfig {
    /// Read and parse a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsToml {
    /// Observation file.
    pub obs: PathBuf,
    /// Directory of uncorrected model files.
    pub brut_dir: PathBuf,
    /// Directory of bias-corrected model files, same file names as `brut_dir`.
    pub cor_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelsToml {
    /// Model file names. Empty means every `.nc` file in `brut_dir`.
    #[serde(default)]
    pub files: Vec<String>,
    /// Prefix stripped from file names to form model names.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for ModelsToml {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "txx_".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariablesToml {
    #[serde(default = "default_aliases")]
    pub model_aliases: Vec<String>,
    #[serde(default = "default_aliases")]
    pub obs_aliases: Vec<String>,
    #[serde(default = "default_time_aliases")]
    pub time_aliases: Vec<String>,
    #[serde(default = "default_true")]
    pub mask_and_scale: bool,
}

impl Default for VariablesToml {
    fn default() -> Self {
        Self {
            model_aliases: default_aliases(),
            obs_aliases: default_aliases(),
            time_aliases: default_time_aliases(),
            mask_and_scale: true,
        }
    }
}

fn default_aliases() -> Vec<String> {
    thermos_grid::DEFAULT_ALIASES
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_time_aliases() -> Vec<String> {
    vec!["time".to_string(), "t".to_string()]
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluateToml {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// `"cor"` filters cells by the corrected series, `"none"` keeps every
    /// cell with both model and observation data.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Inclusive `[first, last]` observation years; omit the key to keep the
    /// default, set it to an empty list to keep every year.
    #[serde(default = "default_obs_years")]
    pub obs_years: Vec<i32>,
}

impl Default for EvaluateToml {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            filter: default_filter(),
            obs_years: default_obs_years(),
        }
    }
}

fn default_threshold() -> f64 {
    30.0
}
fn default_filter() -> String {
    "cor".to_string()
}
fn default_obs_years() -> Vec<i32> {
    vec![1959, 2024]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepToml {
    #[serde(default = "default_sweep_start")]
    pub start: f64,
    #[serde(default = "default_sweep_stop")]
    pub stop: f64,
    #[serde(default = "default_sweep_step")]
    pub step: f64,
}

impl Default for SweepToml {
    fn default() -> Self {
        Self {
            start: default_sweep_start(),
            stop: default_sweep_stop(),
            step: default_sweep_step(),
        }
    }
}

fn default_sweep_start() -> f64 {
    30.0
}
fn default_sweep_stop() -> f64 {
    50.0
}
fn default_sweep_step() -> f64 {
    1.0
}
