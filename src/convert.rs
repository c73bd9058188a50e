//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use thermos_evaluate::{EvaluateConfig, FilterMode, threshold_range};
use thermos_io::ReaderConfig;

use crate::config::{EvaluateToml, SweepToml, VariablesToml};

/// Builds a [`ReaderConfig`] reading only the given variable aliases.
pub fn build_reader_config(vars: &VariablesToml, aliases: &[String]) -> ReaderConfig {
    ReaderConfig::default()
        .with_time_aliases(vars.time_aliases.iter().cloned())
        .with_mask_and_scale(vars.mask_and_scale)
        .with_variables(aliases.iter().cloned())
}

/// Converts the TOML `obs_years` list into an inclusive range.
///
/// An empty list disables the restriction; otherwise exactly two ordered
/// years are required.
pub fn parse_obs_years(years: &[i32]) -> Result<Option<std::ops::RangeInclusive<i32>>> {
    match years {
        [] => Ok(None),
        [first, last] if first <= last => Ok(Some(*first..=*last)),
        [first, last] => bail!("obs_years must be ordered, got [{first}, {last}]"),
        other => bail!(
            "obs_years must be empty or [first, last], got {} values",
            other.len()
        ),
    }
}

/// Builds an [`EvaluateConfig`] from the TOML evaluate and sweep sections.
pub fn build_evaluate_config(eval: &EvaluateToml, sweep: &SweepToml) -> Result<EvaluateConfig> {
    let thresholds = threshold_range(sweep.start, sweep.stop, sweep.step)?;
    let filter: FilterMode = eval.filter.parse()?;
    let cfg = EvaluateConfig::default()
        .with_threshold(eval.threshold)
        .with_filter(filter)
        .with_obs_years(parse_obs_years(&eval.obs_years)?)
        .with_thresholds(thresholds);
    cfg.validate()?;
    Ok(cfg)
}
