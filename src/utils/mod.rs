//! Utility functions for estimator evaluation.

pub mod metrics;

pub use metrics::{accuracy, mse, rmse};
