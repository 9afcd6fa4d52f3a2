//! Sales dashboard data pipeline: load a sales export, clean it, and derive
//! the retailer, month, state and region/city views plus the state CSV.
pub mod chart;
pub mod clean;
pub mod error;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod reports;
pub mod settings;
pub mod types;
pub mod util;

pub use error::{PipelineError, Result, RowError};
pub use pipeline::{run, run_rows, Dashboard};
