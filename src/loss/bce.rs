use crate::error::Result;
use crate::loss::{check_pair, elementwise};
use crate::math::matrix::Matrix;

pub struct BceLoss;

/// Predictions are clamped to [EPS, 1 - EPS] before any log or division.
pub const EPS: f64 = 1e-15;

fn clamp(p: f64) -> f64 {
    p.clamp(EPS, 1.0 - EPS)
}

impl BceLoss {
    /// Scalar BCE: -mean(y·ln(p) + (1-y)·ln(1-p)) with p clamped.
    pub fn loss(y: &Matrix, y_pred: &Matrix) -> Result<f64> {
        let n = check_pair("bce", y, y_pred)?;
        let sum: f64 = y.as_slice().iter().zip(y_pred.as_slice())
            .map(|(t, p)| {
                let p = clamp(*p);
                -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
            })
            .sum();
        Ok(sum / n)
    }

    /// Gradient: (-1/N)·(y/p - (1-y)/(1-p)) with the same clamped p.
    pub fn derivative(y: &Matrix, y_pred: &Matrix) -> Result<Matrix> {
        let n = check_pair("bce_derivative", y, y_pred)?;
        elementwise(y_pred, y, y_pred, |t, p| {
            let p = clamp(p);
            -(t / p - (1.0 - t) / (1.0 - p)) / n
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturated_predictions_stay_finite() {
        let y = Matrix::from_rows(vec![vec![1.0, 0.0, 1.0, 0.0]]).unwrap();
        let p = Matrix::from_rows(vec![vec![0.0, 1.0, 1.0, 0.0]]).unwrap();

        let loss = BceLoss::loss(&y, &p).unwrap();
        assert!(loss.is_finite());
        assert!(loss > 0.0);

        let grad = BceLoss::derivative(&y, &p).unwrap();
        assert!(grad.as_slice().iter().all(|g| g.is_finite()));
    }
}
