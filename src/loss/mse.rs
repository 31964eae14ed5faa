use crate::error::Result;
use crate::loss::{check_pair, elementwise};
use crate::math::matrix::Matrix;

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((y - y_pred)²) over every element of the batch.
    pub fn loss(y: &Matrix, y_pred: &Matrix) -> Result<f64> {
        let n = check_pair("mse", y, y_pred)?;
        let sum: f64 = y.as_slice().iter().zip(y_pred.as_slice())
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        Ok(sum / n)
    }

    /// Gradient w.r.t. the predictions: 2·(y_pred - y) / N
    pub fn derivative(y: &Matrix, y_pred: &Matrix) -> Result<Matrix> {
        let n = check_pair("mse_derivative", y, y_pred)?;
        elementwise(y_pred, y, y_pred, |t, p| 2.0 * (p - t) / n)
    }
}
