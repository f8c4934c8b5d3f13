//! Result file writer.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{EvalError, Result};

/// Train/test split a result file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Split {
    /// No split: single-file experiments.
    #[default]
    None,
    Train,
    Test,
}

impl Split {
    /// Parse a split label case-insensitively. `None` input means no split.
    pub fn parse(label: Option<&str>) -> Result<Self> {
        match label {
            None => Ok(Split::None),
            Some(s) if s.eq_ignore_ascii_case("train") => Ok(Split::Train),
            Some(s) if s.eq_ignore_ascii_case("test") => Ok(Split::Test),
            Some(other) => Err(EvalError::InvalidSplit(other.to_string())),
        }
    }

    /// Upper-case label used in file names: `""`, `"TRAIN"` or `"TEST"`.
    pub fn label(&self) -> &'static str {
        match self {
            Split::None => "",
            Split::Train => "TRAIN",
            Split::Test => "TEST",
        }
    }

    /// Label written to the first header line.
    fn header_label(&self) -> &'static str {
        match self {
            Split::None => "No split",
            Split::Train => "TRAIN",
            Split::Test => "TEST",
        }
    }
}

/// Unit used for timing fields in the summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingType {
    #[default]
    NotApplicable,
    Seconds,
    Milliseconds,
    Nanoseconds,
}

impl fmt::Display for TimingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimingType::NotApplicable => "N/A",
            TimingType::Seconds => "Seconds",
            TimingType::Milliseconds => "Milliseconds",
            TimingType::Nanoseconds => "Nanoseconds",
        };
        f.write_str(s)
    }
}

fn opt_count(v: Option<usize>) -> i64 {
    v.map(|c| c as i64).unwrap_or(-1)
}

/// Classification summary: the 9-field third line. Unset timings serialise
/// as `-1`, the train-estimate method as an empty string.
#[derive(Debug, Clone)]
pub struct ClassificationSummary {
    pub accuracy: f64,
    pub fit_time: i64,
    pub predict_time: i64,
    pub benchmark_time: i64,
    pub memory_usage: i64,
    pub n_classes: Option<usize>,
    pub train_estimate_method: String,
    pub train_estimate_time: i64,
    pub fit_and_estimate_time: i64,
}

impl Default for ClassificationSummary {
    fn default() -> Self {
        Self {
            accuracy: -1.0,
            fit_time: -1,
            predict_time: -1,
            benchmark_time: -1,
            memory_usage: -1,
            n_classes: None,
            train_estimate_method: String::new(),
            train_estimate_time: -1,
            fit_and_estimate_time: -1,
        }
    }
}

impl ClassificationSummary {
    fn render(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{}",
            self.accuracy,
            self.fit_time,
            self.predict_time,
            self.benchmark_time,
            self.memory_usage,
            opt_count(self.n_classes),
            self.train_estimate_method,
            self.train_estimate_time,
            self.fit_and_estimate_time
        )
    }
}

/// Regression summary: the 8-field third line.
#[derive(Debug, Clone)]
pub struct RegressionSummary {
    pub mse: f64,
    pub fit_time: i64,
    pub predict_time: i64,
    pub benchmark_time: i64,
    pub memory_usage: i64,
    pub train_estimate_method: String,
    pub train_estimate_time: i64,
    pub fit_and_estimate_time: i64,
}

impl Default for RegressionSummary {
    fn default() -> Self {
        Self {
            mse: -1.0,
            fit_time: -1,
            predict_time: -1,
            benchmark_time: -1,
            memory_usage: -1,
            train_estimate_method: String::new(),
            train_estimate_time: -1,
            fit_and_estimate_time: -1,
        }
    }
}

impl RegressionSummary {
    fn render(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{}",
            self.mse,
            self.fit_time,
            self.predict_time,
            self.benchmark_time,
            self.memory_usage,
            self.train_estimate_method,
            self.train_estimate_time,
            self.fit_and_estimate_time
        )
    }
}

/// Clustering summary: the 7-field, all-numeric third line.
#[derive(Debug, Clone)]
pub struct ClusteringSummary {
    pub clustering_accuracy: f64,
    pub fit_time: i64,
    pub predict_time: i64,
    pub benchmark_time: i64,
    pub memory_usage: i64,
    pub n_classes: Option<usize>,
    pub n_clusters: Option<usize>,
}

impl Default for ClusteringSummary {
    fn default() -> Self {
        Self {
            clustering_accuracy: -1.0,
            fit_time: -1,
            predict_time: -1,
            benchmark_time: -1,
            memory_usage: -1,
            n_classes: None,
            n_clusters: None,
        }
    }
}

impl ClusteringSummary {
    fn render(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.clustering_accuracy,
            self.fit_time,
            self.predict_time,
            self.benchmark_time,
            self.memory_usage,
            opt_count(self.n_classes),
            opt_count(self.n_clusters)
        )
    }
}

/// Builder for a single result file.
///
/// Configure the experiment metadata, then call [`ResultsWriter::write`]
/// with the per-case labels, predictions and optional probabilities. The
/// file name is derived from the split and resample id:
/// `trainResample0.csv`, `testResults.csv`, or all lower-case
/// (`resample0.csv`, `results.csv`) when no split is set.
#[derive(Debug, Clone)]
pub struct ResultsWriter {
    dataset_name: String,
    estimator_name: String,
    split: Split,
    resample_id: Option<usize>,
    timing_type: TimingType,
    first_line_comment: Option<String>,
    parameter_info: String,
    third_line: String,
    expected_columns: Option<usize>,
}

impl ResultsWriter {
    pub fn new(dataset_name: impl Into<String>, estimator_name: impl Into<String>) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            estimator_name: estimator_name.into(),
            split: Split::None,
            resample_id: None,
            timing_type: TimingType::default(),
            first_line_comment: None,
            parameter_info: "No Parameter Info".to_string(),
            third_line: "N/A".to_string(),
            expected_columns: None,
        }
    }

    pub fn with_split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    pub fn with_resample_id(mut self, resample_id: usize) -> Self {
        self.resample_id = Some(resample_id);
        self
    }

    pub fn with_timing_type(mut self, timing_type: TimingType) -> Self {
        self.timing_type = timing_type;
        self
    }

    /// Free-text comment appended to the first header line.
    pub fn with_first_line_comment(mut self, comment: impl Into<String>) -> Self {
        self.first_line_comment = Some(comment.into());
        self
    }

    /// Estimator-specific parameter dump written as the second line.
    pub fn with_parameter_info(mut self, info: impl Into<String>) -> Self {
        self.parameter_info = info.into();
        self
    }

    /// Free-text third line for callers assembling their own summary.
    pub fn with_third_line(mut self, line: impl Into<String>) -> Self {
        self.third_line = line.into();
        self
    }

    /// Use a classification summary as the third line. When `n_classes` is
    /// set, the probability matrix width is checked against it on write.
    pub fn classification(mut self, summary: &ClassificationSummary) -> Self {
        self.third_line = summary.render();
        self.expected_columns = summary.n_classes;
        self
    }

    /// Use a regression summary as the third line.
    pub fn regression(mut self, summary: &RegressionSummary) -> Self {
        self.third_line = summary.render();
        self.expected_columns = None;
        self
    }

    /// Use a clustering summary as the third line. When `n_clusters` is
    /// set, the probability matrix width is checked against it on write.
    pub fn clustering(mut self, summary: &ClusteringSummary) -> Self {
        self.third_line = summary.render();
        self.expected_columns = summary.n_clusters;
        self
    }

    /// File name this writer will produce.
    pub fn file_name(&self) -> String {
        let prefix = self.split.label().to_lowercase();
        let stem = match self.resample_id {
            Some(id) => format!("{}Resample{}", prefix, id),
            None => format!("{}Results", prefix),
        };
        let stem = if self.split == Split::None {
            stem.to_lowercase()
        } else {
            stem
        };
        format!("{}.csv", stem)
    }

    /// Write the result file into `output_dir`, creating the directory tree
    /// if needed, and return the full path.
    ///
    /// Fails fast, before any file is opened, if `predictions` and
    /// `true_labels` differ in length or the probability matrix does not
    /// match the case count (or the expected class/cluster count, when one
    /// was supplied via a summary).
    ///
    /// A `NaN` true label is serialised as the `?` missing marker. The
    /// write is not transactional: an I/O failure part-way leaves a
    /// truncated file.
    pub fn write(
        &self,
        output_dir: &Path,
        true_labels: &[f64],
        predictions: &[f64],
        probabilities: Option<&[Vec<f64>]>,
    ) -> Result<PathBuf> {
        if predictions.len() != true_labels.len() {
            return Err(EvalError::DimensionMismatch {
                expected: true_labels.len(),
                got: predictions.len(),
            });
        }
        if let Some(probs) = probabilities {
            if probs.len() != predictions.len() {
                return Err(EvalError::DimensionMismatch {
                    expected: predictions.len(),
                    got: probs.len(),
                });
            }
            if let Some(expected) = self.expected_columns {
                for row in probs {
                    if row.len() != expected {
                        return Err(EvalError::DimensionMismatch {
                            expected,
                            got: row.len(),
                        });
                    }
                }
            }
        }

        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(self.file_name());
        let mut file = BufWriter::new(File::create(&path)?);

        writeln!(
            file,
            "{},{},{},{},{},{}",
            self.dataset_name,
            self.estimator_name,
            self.split.header_label(),
            self.resample_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "None".to_string()),
            self.timing_type,
            self.first_line_comment.as_deref().unwrap_or("")
        )?;
        writeln!(file, "{}", self.parameter_info)?;
        writeln!(file, "{}", self.third_line)?;

        for (i, (&label, &pred)) in true_labels.iter().zip(predictions.iter()).enumerate() {
            if label.is_nan() {
                write!(file, "?,{}", pred)?;
            } else {
                write!(file, "{},{}", label, pred)?;
            }
            if let Some(probs) = probabilities {
                write!(file, ",")?;
                for p in &probs[i] {
                    write!(file, ",{}", p)?;
                }
            }
            writeln!(file)?;
        }

        file.flush()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_parsing_normalises_case() {
        assert_eq!(Split::parse(None).unwrap(), Split::None);
        assert_eq!(Split::parse(Some("train")).unwrap(), Split::Train);
        assert_eq!(Split::parse(Some("TEST")).unwrap(), Split::Test);
        assert_eq!(Split::parse(Some("Train")).unwrap(), Split::Train);
        assert!(matches!(
            Split::parse(Some("validation")),
            Err(EvalError::InvalidSplit(_))
        ));
    }

    #[test]
    fn file_names_follow_split_and_resample() {
        let writer = ResultsWriter::new("GunPoint", "Rocket");
        assert_eq!(writer.file_name(), "results.csv");

        let writer = ResultsWriter::new("GunPoint", "Rocket").with_resample_id(0);
        assert_eq!(writer.file_name(), "resample0.csv");

        let writer = ResultsWriter::new("GunPoint", "Rocket")
            .with_split(Split::Train)
            .with_resample_id(3);
        assert_eq!(writer.file_name(), "trainResample3.csv");

        let writer = ResultsWriter::new("GunPoint", "Rocket").with_split(Split::Test);
        assert_eq!(writer.file_name(), "testResults.csv");
    }

    #[test]
    fn summary_lines_have_expected_arity() {
        let line = ClassificationSummary::default().render();
        assert_eq!(line.split(',').count(), 9);

        let line = RegressionSummary::default().render();
        assert_eq!(line.split(',').count(), 8);

        let line = ClusteringSummary::default().render();
        assert_eq!(line.split(',').count(), 7);
    }

    #[test]
    fn unset_counts_render_as_minus_one() {
        let line = ClusteringSummary::default().render();
        assert_eq!(line, "-1,-1,-1,-1,-1,-1,-1");

        let line = ClassificationSummary {
            accuracy: 0.9,
            n_classes: Some(3),
            ..Default::default()
        }
        .render();
        assert!(line.starts_with("0.9,"));
        assert_eq!(line.split(',').nth(5), Some("3"));
    }

    #[test]
    fn length_mismatch_fails_before_io() {
        let writer = ResultsWriter::new("Dataset", "Estimator");
        let result = writer.write(
            Path::new("/nonexistent/should/never/be/created"),
            &[1.0, 0.0],
            &[1.0],
            None,
        );
        assert!(matches!(
            result,
            Err(EvalError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }
}
