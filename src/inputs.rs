//! Loading of observation and model series from the configured files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use thermos_evaluate::{ModelInputs, SkippedModel, model_name};
use thermos_grid::{GriddedSeries, load};
use thermos_io::read_dataset;
use tracing::{info, warn};

use crate::config::{ThermosConfig, VariablesToml};
use crate::convert;

/// Read `path` and load the first of `aliases` as a normalised series.
pub fn load_series(path: &Path, vars: &VariablesToml, aliases: &[String]) -> Result<GriddedSeries> {
    let reader = convert::build_reader_config(vars, aliases);
    let raw = read_dataset(path, &reader)
        .with_context(|| format!("failed to read NetCDF: {}", path.display()))?;
    load(&raw, aliases).with_context(|| format!("failed to load series from {}", path.display()))
}

/// Load the observation series named in the config.
pub fn load_obs(config: &ThermosConfig) -> Result<GriddedSeries> {
    let obs = load_series(&config.paths.obs, &config.variables, &config.variables.obs_aliases)
        .context("failed to load observations")?;
    info!(
        path = %config.paths.obs.display(),
        n_years = obs.n_years(),
        "observations loaded"
    );
    Ok(obs)
}

/// Model file names: the configured list, or every `.nc` file in `brut_dir`.
pub fn model_files(config: &ThermosConfig) -> Result<Vec<String>> {
    if !config.models.files.is_empty() {
        return Ok(config.models.files.clone());
    }
    let dir = &config.paths.brut_dir;
    let mut files: Vec<String> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list model directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".nc"))
        .collect();
    files.sort();
    if files.is_empty() {
        bail!("no .nc files found in {}", dir.display());
    }
    Ok(files)
}

/// Brut and cor paths of one model file.
pub fn model_paths(config: &ThermosConfig, file: &str) -> (PathBuf, PathBuf) {
    (config.paths.brut_dir.join(file), config.paths.cor_dir.join(file))
}

/// Load the brut and cor series of one model file.
pub fn load_model(config: &ThermosConfig, file: &str) -> Result<ModelInputs> {
    let (brut_path, cor_path) = model_paths(config, file);
    let aliases = &config.variables.model_aliases;
    let brut = load_series(&brut_path, &config.variables, aliases)?;
    let cor = load_series(&cor_path, &config.variables, aliases)?;
    Ok(ModelInputs::new(model_name(file, &config.models.prefix), brut, cor))
}

/// Load every configured model, skipping those that cannot be loaded.
pub fn load_models(config: &ThermosConfig) -> Result<(Vec<ModelInputs>, Vec<SkippedModel>)> {
    let mut models = Vec::new();
    let mut skipped = Vec::new();

    for file in model_files(config)? {
        match load_model(config, &file) {
            Ok(m) => models.push(m),
            Err(e) => {
                let name = model_name(&file, &config.models.prefix);
                let reason = format!("{e:#}");
                warn!(model = %name, error = %reason, "skipping model");
                skipped.push(SkippedModel {
                    model: name,
                    reason,
                });
            }
        }
    }

    info!(
        n_loaded = models.len(),
        n_skipped = skipped.len(),
        "models loaded"
    );
    Ok((models, skipped))
}
