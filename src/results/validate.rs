//! Structural validation, repair and comparison of result files.

use std::fs;
use std::path::Path;

use super::TaskKind;
use crate::error::{EvalError, Result};

/// Validate that a results file is structurally well-formed.
///
/// Checks the three header lines and every data line against the shape
/// implied by the detected task. Returns `false` on the first structural
/// violation; the semantic correctness of values is not checked. I/O
/// failures propagate as errors.
pub fn validate_results_file(path: &Path) -> Result<bool> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();

    if lines.len() < 3 {
        return Ok(false);
    }

    if !check_first_line(lines[0]) || !check_second_line(lines[1]) {
        return Ok(false);
    }

    let probabilities = match third_line_task(lines[2]) {
        Some(task) => task.has_probabilities(),
        None => return Ok(false),
    };

    for line in &lines[3..] {
        if !check_results_line(line, probabilities) {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Identify the task a third header line belongs to, by arity and numeric
/// layout. Returns `None` when the line matches no task.
pub fn third_line_task(line: &str) -> Option<TaskKind> {
    let fields: Vec<&str> = line.split(',').collect();

    // Field counts are disjoint across tasks; the one non-numeric field is
    // the train-estimate method name.
    if check_line_shape(&fields, 9, &[0, 1, 2, 3, 4, 5, 7, 8]) {
        Some(TaskKind::Classification)
    } else if check_line_shape(&fields, 8, &[0, 1, 2, 3, 4, 6, 7]) {
        Some(TaskKind::Regression)
    } else if check_line_shape(&fields, 7, &[0, 1, 2, 3, 4, 5, 6]) {
        Some(TaskKind::Clustering)
    } else {
        None
    }
}

/// Fix a results file whose second line contains embedded line breaks.
///
/// Scans forward from line index 2 for the first line matching a task
/// summary layout. Everything between the first line and that point is
/// concatenated into a single second line (line breaks replaced with
/// spaces) and the file is rewritten with exactly three header lines before
/// the data. An already well-formed file is left byte-identical unless
/// `save_path` requests a copy. Fails with
/// [`EvalError::NoValidThirdLine`] if no line matches, leaving the file
/// untouched.
pub fn fix_broken_second_line(path: &Path, save_path: Option<&Path>) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let mut lines: Vec<String> = content.split_inclusive('\n').map(String::from).collect();

    let mut idx = 2;
    loop {
        match lines.get(idx) {
            None => return Err(EvalError::NoValidThirdLine),
            Some(line) => {
                if third_line_task(strip_line_ending(line)).is_some() {
                    break;
                }
            }
        }
        idx += 1;
    }

    if idx != 2 {
        let mut merged = String::new();
        for line in &lines[1..idx - 1] {
            merged.push_str(&line.replace('\n', " ").replace('\r', " "));
        }
        merged.push_str(&lines[idx - 1]);
        lines[1] = merged;
        lines.drain(2..idx);
    }

    if save_path.is_some() || idx != 2 {
        let target = save_path.unwrap_or(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, lines.concat())?;
    }

    Ok(())
}

/// Check whether two results files were produced from the same resample:
/// equal line counts and positionally matching true labels on every data
/// line. Differing line counts are an error rather than a mismatch.
pub fn compare_result_file_resample(path1: &Path, path2: &Path) -> Result<bool> {
    let content1 = fs::read_to_string(path1)?;
    let content2 = fs::read_to_string(path2)?;
    let lines1: Vec<&str> = content1.lines().collect();
    let lines2: Vec<&str> = content2.lines().collect();

    if lines1.len() != lines2.len() {
        return Err(EvalError::LineCountMismatch(lines1.len(), lines2.len()));
    }

    for (l1, l2) in lines1.iter().zip(lines2.iter()).skip(3) {
        if l1.split(',').next() != l2.split(',').next() {
            return Ok(false);
        }
    }

    Ok(true)
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn check_first_line(line: &str) -> bool {
    line.split(',').count() >= 5
}

fn check_second_line(line: &str) -> bool {
    line.split(',').count() >= 1
}

fn check_line_shape(fields: &[&str], length: usize, numeric: &[usize]) -> bool {
    if fields.len() != length {
        return false;
    }
    numeric
        .iter()
        .all(|&i| fields[i].trim().parse::<f64>().is_ok())
}

/// Check a data line. With probabilities the line must be at least 5 fields
/// with an empty field at index 2 and numeric fields at 0, 1, 3 and 4;
/// without, exactly two numeric fields. The `?` missing-label marker does
/// not parse as a float and therefore fails this check.
fn check_results_line(line: &str, probabilities: bool) -> bool {
    let fields: Vec<&str> = line.split(',').collect();

    if fields.len() < 2 {
        return false;
    }
    if fields[0].trim().parse::<f64>().is_err() || fields[1].trim().parse::<f64>().is_err() {
        return false;
    }

    if probabilities {
        if fields.len() < 5 || !fields[2].is_empty() {
            return false;
        }
        fields[3].trim().parse::<f64>().is_ok() && fields[4].trim().parse::<f64>().is_ok()
    } else {
        fields.len() == 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_line_arity_discriminates_tasks() {
        assert_eq!(
            third_line_task("0.9,1,2,3,4,2,,5,6"),
            Some(TaskKind::Classification)
        );
        assert_eq!(
            third_line_task("0.05,1,2,3,4,,5,6"),
            Some(TaskKind::Regression)
        );
        assert_eq!(
            third_line_task("0.8,1,2,3,4,2,2"),
            Some(TaskKind::Clustering)
        );

        // Wrong field counts match no task.
        assert_eq!(third_line_task("0.9,1,2,3,4"), None);
        assert_eq!(third_line_task("0.9,1,2,3,4,2,,5,6,7"), None);
        // Non-numeric field in a numeric slot.
        assert_eq!(third_line_task("acc,1,2,3,4,2,2"), None);
    }

    #[test]
    fn data_line_with_probabilities() {
        assert!(check_results_line("1,1,,0.2,0.8", true));
        assert!(check_results_line("0,1,,0.1,0.6,0.3", true));

        // Missing empty separator field.
        assert!(!check_results_line("1,1,0.2,0.8", true));
        assert!(!check_results_line("1,1,x,0.2,0.8", true));
        // Too few probability columns.
        assert!(!check_results_line("1,1,,0.2", true));
    }

    #[test]
    fn data_line_without_probabilities() {
        assert!(check_results_line("1.5,1.4", false));
        assert!(!check_results_line("1.5,1.4,", false));
        assert!(!check_results_line("1.5", false));
        assert!(!check_results_line("a,1.4", false));
    }

    #[test]
    fn missing_label_marker_fails_strict_check() {
        // The writer serialises NaN labels as '?', which the structural
        // check rejects: field 0 must parse as a float.
        assert!(!check_results_line("?,1,,0.5,0.5", true));
        assert!(!check_results_line("?,1.4", false));
    }

    #[test]
    fn nan_and_inf_fields_parse_as_floats() {
        assert_eq!(
            third_line_task("nan,1,2,3,4,inf,2"),
            Some(TaskKind::Clustering)
        );
    }
}
