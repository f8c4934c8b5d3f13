//! # tseval
//!
//! Evaluation tooling for time series estimators: an ETS (Error-Trend-
//! Seasonal) state-space fitting core, seeded dataset resampling, and
//! reading, writing, validating and repairing result files in the tsml
//! three-header-line format shared across classification, regression and
//! clustering experiments.

#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod error;
pub mod ets;
pub mod resample;
pub mod results;
pub mod utils;

pub use error::{EvalError, Result};

pub mod prelude {
    pub use crate::error::{EvalError, Result};
    pub use crate::ets::{fit_ets, ComponentKind, ErrorKind, EtsSpec, EtsState, SmoothingParams};
    pub use crate::resample::{resample_data, stratified_resample_data};
    pub use crate::results::{
        compare_result_file_resample, fix_broken_second_line, validate_results_file,
        ResultsWriter, Split, TaskKind,
    };
}
