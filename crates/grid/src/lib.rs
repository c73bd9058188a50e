//! # thermos-grid
//!
//! Grid and time harmonisation of gridded temperature series, and
//! threshold-masked spatial error metrics between a model and observations.
//!
//! The crate performs no I/O. A data-access layer materialises a file into
//! a [`RawDataset`]; [`load`] turns one of its variables into a
//! [`GriddedSeries`] in degrees Celsius with integer-year time labels;
//! [`align`] puts a series on a reference's spatial labels; and
//! [`compute_metrics`] aggregates the model/observation difference per year
//! over the cells where a filter field reaches a threshold.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["RawDataset"] -->|"load()"| B["GriddedSeries (°C, years)"]
//!     B -->|"align(target, obs)"| C["aligned GriddedSeries"]
//!     C --> D["compute_metrics()"]
//!     B --> D
//!     D --> E["MetricSeries (years, rmse, bias)"]
//!     E -->|"mean_over_years()"| F["scalar"]
//!     B -->|"time_mean()"| G["MeanMap"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use thermos_grid::{DEFAULT_ALIASES, align, compute_metrics, load};
//!
//! let obs = load(&obs_raw, &["tx"])?;
//! let model = align(&load(&model_raw, &DEFAULT_ALIASES)?, &obs)?;
//! let metrics = compute_metrics(&model, &obs, &model, 30.0)?;
//! println!("mean RMSE: {:.3}", metrics.mean_rmse());
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `raw` | Materialised dataset handle (variables, dims, time axis) |
//! | `series` | `GriddedSeries`, `SpatialAxis` and year-wise differences |
//! | `units` | Kelvin detection heuristic and conversion |
//! | `loader` | Variable selection, time-to-year mapping, unit normalisation |
//! | `align` | Positional relabelling onto a reference grid |
//! | `metrics` | Masked per-year RMSE/bias and `mean_over_years` |
//! | `map` | Time-mean maps and map differences |
//! | `error` | Error types |

mod align;
mod error;
mod loader;
mod map;
mod metrics;
mod raw;
mod series;
mod units;

pub use align::align;
pub use error::GridError;
pub use loader::{DEFAULT_ALIASES, load, years_from_time_axis};
pub use map::{MeanMap, time_mean};
pub use metrics::{MetricSeries, compute_metrics, mean_over_years};
pub use raw::{RawDataset, RawVariable, TimeAxis};
pub use series::{GriddedSeries, SpatialAxis};
pub use units::{KELVIN_MEAN_THRESHOLD, KELVIN_OFFSET, is_kelvin, kelvin_to_celsius};
