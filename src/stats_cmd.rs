//! Stats command: descriptive statistics of one variable of one file.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{debug, info_span};

use thermos_grid::{DEFAULT_ALIASES, GriddedSeries, RawVariable, load};
use thermos_io::read_dataset;
use thermos_stats::{Summary, describe, nan_mean_iter};

use crate::cli::StatsArgs;
use crate::config::VariablesToml;
use crate::convert;
use crate::evaluate_cmd::write_json;

#[derive(Debug, Serialize)]
struct YearMean {
    year: i32,
    mean: f64,
}

#[derive(Debug, Serialize)]
struct StatsOutput {
    file: String,
    variable: String,
    years: Vec<i32>,
    summary: Option<Summary>,
    yearly_mean: Vec<YearMean>,
}

/// Print (and optionally save) the statistics of a field.
///
/// Variables with a time axis are loaded as series and reported in °C.
/// Variables without one, such as the maps written by `diff`, are
/// summarised as stored.
pub fn run(args: StatsArgs) -> Result<()> {
    let _cmd = info_span!("stats").entered();

    let aliases: Vec<String> = match &args.variable {
        Some(v) => vec![v.clone()],
        None => DEFAULT_ALIASES.iter().map(|s| s.to_string()).collect(),
    };
    let reader = convert::build_reader_config(&VariablesToml::default(), &aliases);
    let raw = read_dataset(&args.input, &reader)
        .with_context(|| format!("failed to read NetCDF: {}", args.input.display()))?;
    let Some((name, var)) = aliases
        .iter()
        .find_map(|a| raw.get(a).map(|v| (a.as_str(), v)))
    else {
        bail!("none of {} found in {}", aliases.join(", "), args.input.display());
    };
    let year_range = year_range(&args)?;

    let (output, unit) = if var.time().is_some() {
        let mut series = load(&raw, aliases.as_slice())
            .with_context(|| format!("failed to load series from {}", args.input.display()))?;
        if let Some(range) = year_range {
            series = series.select_years(range);
        }
        let output = StatsOutput {
            file: args.input.display().to_string(),
            variable: series.name().to_string(),
            years: series.years().to_vec(),
            summary: series.summary(),
            yearly_mean: yearly_means(&series),
        };
        (output, " °C")
    } else {
        if year_range.is_some() {
            bail!("variable '{name}' has no time axis, year bounds do not apply");
        }
        debug!(variable = name, "no time axis, summarising stored values");
        let output = StatsOutput {
            file: args.input.display().to_string(),
            variable: name.to_string(),
            years: Vec::new(),
            summary: stored_summary(var),
            yearly_mean: Vec::new(),
        };
        (output, "")
    };

    println!("{} ({})", output.file, output.variable);
    match &output.summary {
        Some(s) => {
            println!("  cells : {}", s.count);
            println!("  mean  : {:.3}{unit}", s.mean);
            println!("  std   : {:.3}{unit}", s.sd);
            println!("  min   : {:.3}{unit}", s.min);
            println!("  max   : {:.3}{unit}", s.max);
        }
        None => println!("  no valid values"),
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&output)?;
        write_json(path, &json)?;
    }
    Ok(())
}

/// The `--first-year`/`--last-year` bounds, if either is given.
fn year_range(args: &StatsArgs) -> Result<Option<std::ops::RangeInclusive<i32>>> {
    if args.first_year.is_none() && args.last_year.is_none() {
        return Ok(None);
    }
    let first = args.first_year.unwrap_or(i32::MIN);
    let last = args.last_year.unwrap_or(i32::MAX);
    if first > last {
        bail!("--first-year {first} is after --last-year {last}");
    }
    Ok(Some(first..=last))
}

fn stored_summary(var: &RawVariable) -> Option<Summary> {
    match var.values().as_slice() {
        Some(s) => describe(s),
        None => describe(&var.values().iter().copied().collect::<Vec<_>>()),
    }
}

fn yearly_means(series: &GriddedSeries) -> Vec<YearMean> {
    series
        .years()
        .iter()
        .zip(series.values().outer_iter())
        .map(|(&year, field)| YearMean {
            year,
            mean: nan_mean_iter(field.iter().copied()),
        })
        .collect()
}
