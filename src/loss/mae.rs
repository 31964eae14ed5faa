use crate::error::Result;
use crate::loss::{check_pair, elementwise};
use crate::math::matrix::Matrix;

pub struct MaeLoss;

impl MaeLoss {
    /// Scalar MAE: mean(|y - y_pred|)
    pub fn loss(y: &Matrix, y_pred: &Matrix) -> Result<f64> {
        let n = check_pair("mae", y, y_pred)?;
        let sum: f64 = y.as_slice().iter().zip(y_pred.as_slice())
            .map(|(t, p)| (t - p).abs())
            .sum();
        Ok(sum / n)
    }

    /// Per-output subgradient: sign(y_pred - y) / N  (0 when equal)
    pub fn derivative(y: &Matrix, y_pred: &Matrix) -> Result<Matrix> {
        let n = check_pair("mae_derivative", y, y_pred)?;
        elementwise(y_pred, y, y_pred, |t, p| {
            let diff = p - t;
            if diff > 0.0 { 1.0 / n } else if diff < 0.0 { -1.0 / n } else { 0.0 }
        })
    }
}
