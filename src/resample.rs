//! Seeded, reproducible dataset resampling.
//!
//! Combines train and test cases, reshuffles them under a seed-driven RNG
//! and splits back at the original train size, so every resample of a
//! dataset is reconstructible from its seed alone.

use rand::prelude::*;
use rand::SeedableRng;

use crate::error::{EvalError, Result};

/// A train/test split produced by resampling.
#[derive(Debug, Clone)]
pub struct ResampledSplit<T> {
    pub train_x: Vec<T>,
    pub train_y: Vec<f64>,
    pub test_x: Vec<T>,
    pub test_y: Vec<f64>,
}

/// Resample train and test data without replacement.
///
/// Pools all cases and labels, shuffles them with the seeded RNG and
/// returns new splits of the same sizes as the originals. Deterministic
/// for a fixed seed.
pub fn resample_data<T: Clone>(
    train_x: &[T],
    train_y: &[f64],
    test_x: &[T],
    test_y: &[f64],
    seed: u64,
) -> Result<ResampledSplit<T>> {
    check_shapes(train_x, train_y, test_x, test_y)?;

    let n_train = train_y.len();
    let all_x: Vec<T> = train_x.iter().chain(test_x.iter()).cloned().collect();
    let all_y: Vec<f64> = train_y.iter().chain(test_y.iter()).copied().collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..all_y.len()).collect();
    indices.shuffle(&mut rng);

    Ok(split_at(&all_x, &all_y, &indices, n_train))
}

/// Stratified resample: shuffles cases within each class so that the new
/// train and test splits keep the class distribution of the originals.
///
/// Fails fast if train and test do not contain the same set of classes.
pub fn stratified_resample_data<T: Clone>(
    train_x: &[T],
    train_y: &[f64],
    test_x: &[T],
    test_y: &[f64],
    seed: u64,
) -> Result<ResampledSplit<T>> {
    check_shapes(train_x, train_y, test_x, test_y)?;

    let train_classes = sorted_classes(train_y);
    let test_classes = sorted_classes(test_y);
    if train_classes != test_classes {
        return Err(EvalError::InvalidParameter(
            "train and test must contain the same classes for stratified resampling".to_string(),
        ));
    }

    let n_train = train_y.len();
    let all_x: Vec<T> = train_x.iter().chain(test_x.iter()).cloned().collect();
    let all_y: Vec<f64> = train_y.iter().chain(test_y.iter()).copied().collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_indices = Vec::with_capacity(n_train);
    let mut test_indices = Vec::with_capacity(test_y.len());

    for class in &train_classes {
        let count_in_train = train_y.iter().filter(|&&y| y == *class).count();
        let mut class_indices: Vec<usize> = all_y
            .iter()
            .enumerate()
            .filter(|(_, &y)| y == *class)
            .map(|(i, _)| i)
            .collect();
        class_indices.shuffle(&mut rng);

        train_indices.extend_from_slice(&class_indices[..count_in_train]);
        test_indices.extend_from_slice(&class_indices[count_in_train..]);
    }

    let ordered: Vec<usize> = train_indices.into_iter().chain(test_indices).collect();
    Ok(split_at(&all_x, &all_y, &ordered, n_train))
}

fn check_shapes<T>(train_x: &[T], train_y: &[f64], test_x: &[T], test_y: &[f64]) -> Result<()> {
    if train_x.is_empty() && test_x.is_empty() {
        return Err(EvalError::EmptyData);
    }
    if train_x.len() != train_y.len() {
        return Err(EvalError::DimensionMismatch {
            expected: train_x.len(),
            got: train_y.len(),
        });
    }
    if test_x.len() != test_y.len() {
        return Err(EvalError::DimensionMismatch {
            expected: test_x.len(),
            got: test_y.len(),
        });
    }
    Ok(())
}

fn split_at<T: Clone>(
    all_x: &[T],
    all_y: &[f64],
    indices: &[usize],
    n_train: usize,
) -> ResampledSplit<T> {
    let take = |range: &[usize]| -> (Vec<T>, Vec<f64>) {
        range
            .iter()
            .map(|&i| (all_x[i].clone(), all_y[i]))
            .unzip()
    };
    let (train_x, train_y) = take(&indices[..n_train]);
    let (test_x, test_y) = take(&indices[n_train..]);
    ResampledSplit {
        train_x,
        train_y,
        test_x,
        test_y,
    }
}

/// Distinct label values in ascending order.
fn sorted_classes(labels: &[f64]) -> Vec<f64> {
    let mut classes: Vec<f64> = Vec::new();
    for &label in labels {
        if !classes.contains(&label) {
            classes.push(label);
        }
    }
    classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    classes
}
