pub mod bce;
pub mod cross_entropy;
pub mod loss_type;
pub mod mae;
pub mod mse;

pub use bce::BceLoss;
pub use cross_entropy::CrossEntropyLoss;
pub use loss_type::LossType;
pub use mae::MaeLoss;
pub use mse::MseLoss;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Validates a `(targets, predictions)` pair and returns the element count.
pub(crate) fn check_pair(op: &'static str, y: &Matrix, y_pred: &Matrix) -> Result<f64> {
    y.ensure_non_empty(op)?;
    y_pred.ensure_non_empty(op)?;
    if y.shape() != y_pred.shape() {
        return Err(Error::mismatch(op, y.shape(), y_pred.shape()));
    }
    Ok(y.as_slice().len() as f64)
}

/// Builds a matrix shaped like `like` from a per-element closure over `(y, y_pred)`.
pub(crate) fn elementwise<F>(like: &Matrix, y: &Matrix, y_pred: &Matrix, f: F) -> Result<Matrix>
where
    F: Fn(f64, f64) -> f64,
{
    let data = y
        .as_slice()
        .iter()
        .zip(y_pred.as_slice())
        .map(|(&t, &p)| f(t, p))
        .collect();
    Matrix::from_vec(like.rows(), like.cols(), data)
}
