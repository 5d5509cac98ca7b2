//! Regression models for the calorie target.
//!
//! Models follow a two-type split:
//! - an estimator (e.g. [`RandomForestRegressor`]) holds hyperparameters and
//!   implements [`Regressor::fit`];
//! - the fitted model (e.g. [`FittedRandomForest`]) holds only what prediction
//!   needs and implements [`Predictor`].
//!
//! A fitted model has no training settings and cannot be refitted, and an
//! estimator cannot predict, so the two phases never mix.

pub mod forest;
pub mod metrics;
pub mod tree;

pub use forest::{FittedRandomForest, ForestConfig, RandomForestRegressor};
pub use metrics::{Metrics, RegressionMetrics};
pub use tree::{DecisionTreeRegressor, FittedDecisionTree};

use ndarray::{Array1, ArrayView1, ArrayView2};
use thiserror::Error;

/// Error type for fitting and prediction.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No samples or no features to fit on.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Feature matrix and target vector disagree on the number of samples.
    #[error("Length mismatch: {features} feature rows, {targets} targets")]
    LengthMismatch { features: usize, targets: usize },

    /// Input width differs from the width seen during fit.
    #[error("Feature mismatch: expected {expected} features, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    /// Invalid hyperparameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// An estimator that can be fitted on a feature matrix and a target vector.
pub trait Regressor {
    /// The fitted model type.
    type Fitted: Predictor;

    /// Fit on `x` of shape `(n_samples, n_features)` and `y` of length `n_samples`.
    ///
    /// # Errors
    /// Returns [`ModelError`] if the data is empty, the shapes disagree, or a
    /// hyperparameter is invalid.
    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>)
        -> Result<Self::Fitted, ModelError>;
}

/// A fitted model producing one scalar estimate per sample.
pub trait Predictor {
    /// Number of features seen during fit.
    fn n_features_in(&self) -> usize;

    /// Predict a single sample.
    ///
    /// # Errors
    /// [`ModelError::FeatureMismatch`] if `x.len() != n_features_in()`.
    fn predict(&self, x: ArrayView1<'_, f64>) -> Result<f64, ModelError>;

    /// Predict every row of `x`.
    fn predict_batch(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError> {
        x.rows()
            .into_iter()
            .map(|row| self.predict(row))
            .collect::<Result<Vec<f64>, _>>()
            .map(Array1::from)
    }
}

pub(crate) fn check_training_data(
    x: &ArrayView2<'_, f64>,
    y: &ArrayView1<'_, f64>,
) -> Result<(), ModelError> {
    if x.nrows() == 0 {
        return Err(ModelError::EmptyData("no samples to fit on".to_string()));
    }
    if x.ncols() == 0 {
        return Err(ModelError::EmptyData("no features to fit on".to_string()));
    }
    if x.nrows() != y.len() {
        return Err(ModelError::LengthMismatch {
            features: x.nrows(),
            targets: y.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_width(expected: usize, x: &ArrayView1<'_, f64>) -> Result<(), ModelError> {
    if x.len() != expected {
        return Err(ModelError::FeatureMismatch {
            expected,
            got: x.len(),
        });
    }
    Ok(())
}
