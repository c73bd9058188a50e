//! Inspect command: list the structure of a NetCDF file.

use anyhow::{Context, Result};

use crate::cli::InspectArgs;

pub fn run(args: InspectArgs) -> Result<()> {
    let summary = thermos_io::inspect(&args.input)
        .with_context(|| format!("failed to inspect {}", args.input.display()))?;
    print!("{summary}");
    Ok(())
}
