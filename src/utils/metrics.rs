//! Metrics for evaluating predictions against true labels.

use crate::error::{EvalError, Result};

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(EvalError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(EvalError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    Ok(())
}

/// Fraction of predictions exactly matching the true labels.
pub fn accuracy(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;
    let correct = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, p)| a == p)
        .count();
    Ok(correct as f64 / actual.len() as f64)
}

/// Mean squared error between true and predicted values.
pub fn mse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Root mean squared error between true and predicted values.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    Ok(mse(actual, predicted)?.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn accuracy_counts_exact_matches() {
        let actual = vec![0.0, 1.0, 1.0, 2.0];
        let predicted = vec![0.0, 1.0, 2.0, 2.0];
        assert_relative_eq!(
            accuracy(&actual, &predicted).unwrap(),
            0.75,
            epsilon = 1e-10
        );
    }

    #[test]
    fn mse_known_values() {
        let actual = vec![1.0, 2.0, 3.0];
        let predicted = vec![1.5, 2.5, 2.5];
        assert_relative_eq!(mse(&actual, &predicted).unwrap(), 0.25, epsilon = 1e-10);
        assert_relative_eq!(rmse(&actual, &predicted).unwrap(), 0.5, epsilon = 1e-10);
    }

    #[test]
    fn metrics_reject_mismatched_lengths() {
        let result = accuracy(&[1.0, 2.0], &[1.0]);
        assert!(matches!(
            result,
            Err(EvalError::DimensionMismatch { expected: 2, got: 1 })
        ));

        let result = mse(&[], &[]);
        assert!(matches!(result, Err(EvalError::EmptyData)));
    }
}
