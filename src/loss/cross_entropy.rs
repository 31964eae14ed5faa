use crate::error::Result;
use crate::loss::bce::EPS;
use crate::loss::{check_pair, elementwise};
use crate::math::matrix::Matrix;

/// Categorical cross-entropy for use with a Softmax output layer.
///
/// Targets are one-hot (or soft) distributions, one per column. The loss is
/// summed over classes and averaged over the samples in the batch.
pub struct CrossEntropyLoss;

impl CrossEntropyLoss {
    /// L = -Σ y·ln(p) / batch
    pub fn loss(y: &Matrix, y_pred: &Matrix) -> Result<f64> {
        check_pair("cce", y, y_pred)?;
        let batch = y.cols() as f64;
        let sum: f64 = y.as_slice().iter().zip(y_pred.as_slice())
            .map(|(t, p)| -t * p.clamp(EPS, 1.0).ln())
            .sum();
        Ok(sum / batch)
    }

    /// ∂L/∂p = -y / (p · batch)
    ///
    /// Run through the Softmax Jacobian this becomes `(p - y) / batch` with
    /// respect to the logits.
    pub fn derivative(y: &Matrix, y_pred: &Matrix) -> Result<Matrix> {
        check_pair("cce_derivative", y, y_pred)?;
        let batch = y.cols() as f64;
        elementwise(y_pred, y, y_pred, |t, p| -t / (p.clamp(EPS, 1.0) * batch))
    }
}
