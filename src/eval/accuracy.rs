use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Converts every column into a one-hot vector marking its largest entry.
///
/// Ties go to the lowest row index.
pub fn one_hot_argmax(output: &Matrix) -> Result<Matrix> {
    output.ensure_non_empty("one_hot_argmax")?;
    let (rows, cols) = output.shape();
    let mut res = Matrix::create(rows, cols)?;
    for j in 0..cols {
        let mut best = 0;
        for i in 1..rows {
            if output.at(i, j) > output.at(best, j) {
                best = i;
            }
        }
        *res.at_mut(best, j) = 1.0;
    }
    Ok(res)
}

/// Fraction of samples (columns) classified correctly.
///
/// - Single-row output: binary classification, both prediction and target
///   are thresholded at 0.5.
/// - Multi-row output: the prediction is converted with [`one_hot_argmax`]
///   and must equal the target column exactly.
pub fn accuracy(output: &Matrix, expected: &Matrix) -> Result<f64> {
    output.ensure_non_empty("accuracy")?;
    expected.ensure_non_empty("accuracy")?;
    if output.shape() != expected.shape() {
        return Err(Error::mismatch("accuracy", output.shape(), expected.shape()));
    }

    let (rows, cols) = output.shape();
    let correct = if rows == 1 {
        (0..cols)
            .filter(|&j| (output.at(0, j) >= 0.5) == (expected.at(0, j) >= 0.5))
            .count()
    } else {
        let predictions = one_hot_argmax(output)?;
        (0..cols)
            .filter(|&j| (0..rows).all(|i| predictions.at(i, j) == expected.at(i, j)))
            .count()
    };

    Ok(correct as f64 / cols as f64)
}
