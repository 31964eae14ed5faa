use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Column-wise softmax: each column (one sample) is normalized independently.
///
/// The column maximum is subtracted before exponentiating so large logits
/// cannot overflow.
pub fn softmax(z: &Matrix) -> Result<Matrix> {
    z.ensure_non_empty("softmax")?;
    let (rows, cols) = z.shape();
    let mut res = Matrix::create(rows, cols)?;

    for j in 0..cols {
        let max = (0..rows).map(|i| z.at(i, j)).fold(f64::NEG_INFINITY, f64::max);

        let mut exp_sum = 0.0;
        for i in 0..rows {
            let e = (z.at(i, j) - max).exp();
            *res.at_mut(i, j) = e;
            exp_sum += e;
        }

        for i in 0..rows {
            *res.at_mut(i, j) /= exp_sum;
        }
    }

    Ok(res)
}

/// Softmax Jacobian-vector product.
///
/// `s` is the cached softmax output and `dl_da` the upstream gradient, both
/// `classes x batch`. Per column, `dL/dz_i = sum_j J_ij * dL/da_j` with
/// `J_ii = s_i (1 - s_i)` and `J_ij = -s_i s_j`, which collapses to
/// `s_i * (dL/da_i - sum_j s_j dL/da_j)`.
pub fn softmax_backward(s: &Matrix, dl_da: &Matrix) -> Result<Matrix> {
    s.ensure_non_empty("softmax_backward")?;
    dl_da.ensure_non_empty("softmax_backward")?;
    if s.shape() != dl_da.shape() {
        return Err(Error::mismatch("softmax_backward", s.shape(), dl_da.shape()));
    }

    let (rows, cols) = s.shape();
    let mut res = Matrix::create(rows, cols)?;

    for j in 0..cols {
        let dot: f64 = (0..rows).map(|k| s.at(k, j) * dl_da.at(k, j)).sum();
        for i in 0..rows {
            *res.at_mut(i, j) = s.at(i, j) * (dl_da.at(i, j) - dot);
        }
    }

    Ok(res)
}
