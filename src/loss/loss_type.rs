use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loss::{BceLoss, CrossEntropyLoss, MaeLoss, MseLoss};
use crate::math::matrix::Matrix;

/// Selects which loss function the training loop uses.
///
/// - `Mse`: mean-squared error; pair with Identity or Sigmoid output.
/// - `Mae`: mean absolute error; pair with Identity output.
/// - `Bce`: binary cross-entropy; pair with Sigmoid output.
/// - `Cce`: categorical cross-entropy; pair with Softmax output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossType {
    #[serde(rename = "MSE", alias = "mse")]
    Mse,
    #[serde(rename = "MAE", alias = "mae")]
    Mae,
    #[serde(rename = "BCE", alias = "bce")]
    Bce,
    #[serde(rename = "CCE", alias = "cce")]
    Cce,
}

impl LossType {
    /// Scalar loss of `y_pred` against the targets `y`.
    pub fn value(&self, y: &Matrix, y_pred: &Matrix) -> Result<f64> {
        match self {
            LossType::Mse => MseLoss::loss(y, y_pred),
            LossType::Mae => MaeLoss::loss(y, y_pred),
            LossType::Bce => BceLoss::loss(y, y_pred),
            LossType::Cce => CrossEntropyLoss::loss(y, y_pred),
        }
    }

    /// `dL/dy_pred`, shaped like `y_pred`.
    pub fn derivative(&self, y: &Matrix, y_pred: &Matrix) -> Result<Matrix> {
        match self {
            LossType::Mse => MseLoss::derivative(y, y_pred),
            LossType::Mae => MaeLoss::derivative(y, y_pred),
            LossType::Bce => BceLoss::derivative(y, y_pred),
            LossType::Cce => CrossEntropyLoss::derivative(y, y_pred),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pair() -> (Matrix, Matrix) {
        let y = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 2.0]]).unwrap();
        let p = Matrix::from_rows(vec![vec![0.5, 0.0], vec![1.0, 1.0]]).unwrap();
        (y, p)
    }

    #[test]
    fn mse_value_and_gradient() {
        let (y, p) = pair();
        assert_abs_diff_eq!(LossType::Mse.value(&y, &p).unwrap(), (0.25 + 1.0 + 1.0) / 4.0);
        let g = LossType::Mse.derivative(&y, &p).unwrap();
        assert_eq!(g.as_slice(), &[-0.25, 0.0, 0.5, -0.5]);
    }

    #[test]
    fn mae_gradient_is_zero_at_equality() {
        let (y, p) = pair();
        assert_abs_diff_eq!(LossType::Mae.value(&y, &p).unwrap(), 2.5 / 4.0);
        let g = LossType::Mae.derivative(&y, &p).unwrap();
        assert_eq!(g.as_slice(), &[-0.25, 0.0, 0.25, -0.25]);
    }

    #[test]
    fn cce_averages_over_samples() {
        let y = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let p = Matrix::from_rows(vec![vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
        assert_abs_diff_eq!(LossType::Cce.value(&y, &p).unwrap(), 2.0f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn mismatched_shapes_fail() {
        let y = Matrix::zeros(1, 3);
        let p = Matrix::zeros(3, 1);
        assert!(LossType::Bce.value(&y, &p).is_err());
        assert!(LossType::Mse.derivative(&y, &p).is_err());
    }

    #[test]
    fn parses_config_names() {
        let parsed: LossType = serde_json::from_str("\"BCE\"").unwrap();
        assert_eq!(parsed, LossType::Bce);
        assert!(serde_json::from_str::<LossType>("\"HUBER\"").is_err());
    }
}
