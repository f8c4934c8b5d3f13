//! tsml-format result files: writer, structural validator, repair and
//! comparison tooling.
//!
//! A result file is plain comma-separated text with three header lines
//! followed by one line per case. The first line names the dataset,
//! estimator, split, resample and timing unit; the second is free-form
//! estimator parameter info; the third is a task-dependent numeric summary
//! whose arity identifies the task (classification 9 fields, regression 8,
//! clustering 7). Data lines hold the true label (`?` when missing), the
//! prediction and, optionally, an empty field followed by one probability
//! per class. Downstream tooling parses the format positionally, so the
//! layout is byte-compatible with the historical convention.

mod validate;
mod writer;

pub use validate::{
    compare_result_file_resample, fix_broken_second_line, third_line_task, validate_results_file,
};
pub use writer::{
    ClassificationSummary, ClusteringSummary, RegressionSummary, ResultsWriter, Split, TimingType,
};

/// Experiment task, discriminated by the arity of the third header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// 9 summary fields; data lines carry class probabilities.
    Classification,
    /// 8 summary fields; data lines are label/prediction pairs only.
    Regression,
    /// 7 summary fields; data lines carry cluster probabilities.
    Clustering,
}

impl TaskKind {
    /// Whether data lines for this task carry probability columns.
    pub fn has_probabilities(&self) -> bool {
        !matches!(self, TaskKind::Regression)
    }
}
