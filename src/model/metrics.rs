//! Regression metrics for evaluating fitted models.

use crate::model::ModelError;
use ndarray::ArrayView1;
use std::fmt;

/// Metrics for evaluating regression models.
pub struct Metrics;

impl Metrics {
    /// Calculate Mean Squared Error (MSE).
    ///
    /// MSE = mean((y_true - y_pred)^2)
    ///
    /// Returns `0.0` for empty input.
    ///
    /// # Errors
    /// [`ModelError::LengthMismatch`] if the inputs differ in length.
    pub fn mse(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        check_lengths(&y_true, &y_pred)?;
        if y_true.is_empty() {
            return Ok(0.0);
        }

        let sum_sq: f64 = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&t, &p)| (t - p).powi(2))
            .sum();

        Ok(sum_sq / y_true.len() as f64)
    }

    /// Calculate Root Mean Squared Error (RMSE), in the units of the target.
    pub fn rmse(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        Ok(Self::mse(y_true, y_pred)?.sqrt())
    }

    /// Calculate Mean Absolute Error (MAE).
    ///
    /// MAE = mean(|y_true - y_pred|)
    pub fn mae(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        check_lengths(&y_true, &y_pred)?;
        if y_true.is_empty() {
            return Ok(0.0);
        }

        let sum_abs: f64 = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&t, &p)| (t - p).abs())
            .sum();

        Ok(sum_abs / y_true.len() as f64)
    }

    /// Calculate R² (coefficient of determination).
    ///
    /// R² = 1 - (SS_res / SS_tot)
    ///
    /// where:
    /// - SS_res = sum((y_true - y_pred)^2)
    /// - SS_tot = sum((y_true - mean(y_true))^2)
    ///
    /// A constant target gives `1.0` for an exact fit and `0.0` otherwise.
    /// Values can be negative if the model is worse than the mean.
    pub fn r_squared(
        y_true: ArrayView1<'_, f64>,
        y_pred: ArrayView1<'_, f64>,
    ) -> Result<f64, ModelError> {
        check_lengths(&y_true, &y_pred)?;
        if y_true.is_empty() {
            return Ok(0.0);
        }

        let mean_true = y_true.sum() / y_true.len() as f64;

        let ss_res: f64 = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&t, &p)| (t - p).powi(2))
            .sum();

        let ss_tot: f64 = y_true.iter().map(|&t| (t - mean_true).powi(2)).sum();

        if ss_tot == 0.0 {
            return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
        }

        Ok(1.0 - ss_res / ss_tot)
    }

    /// Calculate all metrics at once.
    pub fn calculate_all(
        y_true: ArrayView1<'_, f64>,
        y_pred: ArrayView1<'_, f64>,
    ) -> Result<RegressionMetrics, ModelError> {
        Ok(RegressionMetrics {
            mse: Self::mse(y_true, y_pred)?,
            rmse: Self::rmse(y_true, y_pred)?,
            mae: Self::mae(y_true, y_pred)?,
            r_squared: Self::r_squared(y_true, y_pred)?,
        })
    }
}

fn check_lengths(y_true: &ArrayView1<'_, f64>, y_pred: &ArrayView1<'_, f64>) -> Result<(), ModelError> {
    if y_true.len() != y_pred.len() {
        return Err(ModelError::LengthMismatch {
            features: y_pred.len(),
            targets: y_true.len(),
        });
    }
    Ok(())
}

/// Collection of regression metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r_squared: f64,
}

impl fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MSE: {:.4}, RMSE: {:.4}, MAE: {:.4}, R²: {:.4}",
            self.mse, self.rmse, self.mae, self.r_squared
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mse_perfect() {
        let y = array![1.0, 2.0, 3.0];
        assert_eq!(Metrics::mse(y.view(), y.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_mse_and_rmse() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![2.0, 2.0, 5.0];
        // (1 + 0 + 4) / 3
        let mse = Metrics::mse(y_true.view(), y_pred.view()).unwrap();
        assert!((mse - 5.0 / 3.0).abs() < 1e-12);
        let rmse = Metrics::rmse(y_true.view(), y_pred.view()).unwrap();
        assert!((rmse - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_mae() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![2.0, 2.0, 5.0];
        let mae = Metrics::mae(y_true.view(), y_pred.view()).unwrap();
        assert!((mae - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_r_squared() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        assert!((Metrics::r_squared(y_true.view(), y_true.view()).unwrap() - 1.0).abs() < 1e-12);

        let mean = array![2.5, 2.5, 2.5, 2.5];
        assert!(Metrics::r_squared(y_true.view(), mean.view()).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_r_squared_constant_target() {
        let y = array![3.0, 3.0];
        assert_eq!(Metrics::r_squared(y.view(), y.view()).unwrap(), 1.0);
        let off = array![3.0, 4.0];
        assert_eq!(Metrics::r_squared(y.view(), off.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        let a = array![1.0, 2.0];
        let b = array![1.0];
        assert!(matches!(
            Metrics::calculate_all(a.view(), b.view()),
            Err(ModelError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_display() {
        let y_true = array![1.0, 2.0];
        let metrics = Metrics::calculate_all(y_true.view(), y_true.view()).unwrap();
        assert!(metrics.to_string().starts_with("MSE: 0.0000"));
    }
}
