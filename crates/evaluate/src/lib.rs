//! # thermos-evaluate
//!
//! Compare uncorrected ("brut") and bias-corrected ("cor") model series
//! against an observational reference, one model at a time or as a
//! parallel batch, and serialize the results to JSON.
//!
//! Each model's brut and cor series are aligned onto the observation grid
//! and scored with the masked metric engine, filtered by the corrected
//! series or, with [`FilterMode::Unfiltered`], on every cell both model and
//! observations cover. A threshold sweep repeats this over a list of thresholds and
//! reports the RMSE gain of the correction at each.
//!
//! ```mermaid
//! graph LR
//!     O["obs (years restricted)"] --> E["evaluate_model()"]
//!     M["ModelInputs (brut, cor)"] --> E
//!     E --> R["ModelReport"]
//!     O --> S["sweep_model()"]
//!     M --> S
//!     S --> P["SweepReport"]
//!     R --> B["BatchReport"]
//!     P --> B
//!     B -->|"to_json()"| J["JSON"]
//! ```

mod batch;
mod compare;
mod config;
mod error;
mod input;
mod maps;
mod output;

pub use batch::{evaluate_batch, sweep_batch};
pub use compare::{evaluate_model, sweep_model};
pub use config::{EvaluateConfig, FilterMode, threshold_range};
pub use error::EvaluateError;
pub use input::{ModelInputs, model_name};
pub use maps::{DifferenceMaps, mean_difference, yearly_difference};
pub use output::{
    BatchReport, ConfigSummary, MetricsOutput, ModelReport, SkippedModel, SweepPoint,
    SweepReport, to_json,
};
