//! Diff command: time-mean maps of one model and their cor - brut difference,
//! optionally with the per-year difference series.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use thermos_evaluate::{mean_difference, model_name, yearly_difference};
use thermos_io::{WriterConfig, write_maps, write_series};

use crate::cli::DiffArgs;
use crate::config::ThermosConfig;
use crate::inputs;

/// Write brut, cor and cor - brut time-mean maps of one model to NetCDF.
///
/// With `--yearly` the per-year cor - brut series goes to a second file
/// named `<stem>_yearly.nc` next to the maps.
pub fn run(args: DiffArgs) -> Result<()> {
    let _cmd = info_span!("diff", model = %args.model).entered();

    let config = ThermosConfig::from_file(&args.config)?;
    let model = inputs::load_model(&config, &args.model)?;
    let maps = mean_difference(&model).context("failed to compute mean maps")?;

    let path = args.output.unwrap_or_else(|| {
        let name = model_name(&args.model, &config.models.prefix);
        config.paths.output_dir.join(format!("diff_{name}.nc"))
    });
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    let writer = WriterConfig::default().with_title(format!("{} time-mean Tx, cor - brut", model.name()));
    write_maps(&path, &maps.into_vec(), &writer)
        .with_context(|| format!("failed to write maps: {}", path.display()))?;
    info!(path = %path.display(), "maps written");

    if args.yearly {
        let series = yearly_difference(&model).context("failed to compute yearly difference")?;
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("diff");
        let yearly_path = path.with_file_name(format!("{stem}_yearly.nc"));
        let writer = WriterConfig::default().with_title(format!("{} yearly Tx, cor - brut", model.name()));
        write_series(&yearly_path, &series, &writer)
            .with_context(|| format!("failed to write series: {}", yearly_path.display()))?;
        info!(path = %yearly_path.display(), n_years = series.n_years(), "yearly difference written");
    }

    Ok(())
}
