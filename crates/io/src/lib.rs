//! # thermos-io
//!
//! Read gridded NetCDF files into the comparator's [`RawDataset`] handle,
//! list their structure, and write 2-D maps and per-year series back out. This is the
//! only crate in thermos that touches files.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `reader` | `ReaderConfig` and `read_dataset` |
//! | `inspect` | `FileSummary` of dimensions, variables, attributes |
//! | `writer` | `WriterConfig`, `write_maps` and `write_series` |
//! | `netcdf_read` | Low-level attribute and value helpers |
//! | `error` | Error types |
//!
//! [`RawDataset`]: thermos_grid::RawDataset

mod error;
mod inspect;
mod netcdf_read;
mod reader;
mod writer;

pub use error::IoError;
pub use inspect::{FileSummary, VariableSummary, inspect};
pub use reader::{ReaderConfig, read_dataset};
pub use writer::{WriterConfig, write_maps, write_series};
