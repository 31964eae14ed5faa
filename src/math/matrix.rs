use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::error::{Error, Result};

/// Dense row-major matrix of `f64`.
///
/// A `0 x 0` matrix is the *empty sentinel*: it stands for "not computed yet"
/// (e.g. a layer cache before the first forward pass). Every other matrix has
/// `rows > 0`, `cols > 0` and exactly `rows * cols` elements. Operations reject
/// the sentinel with [`Error::EmptyMatrix`] instead of propagating it.
///
/// Matrices own their buffer. `clone()` is a deep copy, so two live values
/// never share storage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled matrix. A zero dimension yields the empty sentinel, and so
    /// does a shape whose buffer cannot be allocated; use [`Matrix::create`]
    /// to get the error instead.
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::create(rows, cols).unwrap_or_default()
    }

    /// Zero-filled matrix that reports an oversized or unallocatable shape as
    /// [`Error::AllocationFailure`].
    pub fn create(rows: usize, cols: usize) -> Result<Matrix> {
        if rows == 0 || cols == 0 {
            return Ok(Matrix::default());
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(Error::AllocationFailure { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::AllocationFailure { rows, cols })?;
        data.resize(len, 0.0);
        Ok(Matrix { rows, cols, data })
    }

    /// Wraps a row-major buffer. `data.len()` must equal `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        if rows == 0 || cols == 0 {
            return if data.is_empty() {
                Ok(Matrix::default())
            } else {
                Err(Error::mismatch("from_vec", (rows, cols), (data.len(), 1)))
            };
        }
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(Error::mismatch("from_vec", (rows, cols), (data.len(), 1)));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from a list of equally long rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Matrix> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(Error::mismatch("from_rows", (n_rows, n_cols), (1, row.len())));
            }
            data.extend(row);
        }
        Matrix::from_vec(n_rows, n_cols, data)
    }

    /// `n x n` identity matrix.
    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i * n + i] = 1.0;
        }
        res
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True for the `0 x 0` sentinel.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of the elements.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        let idx = self.index_of(row, col)?;
        Ok(self.data[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let idx = self.index_of(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    fn index_of(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// Unchecked read for crate-internal loops that already iterate in bounds.
    pub(crate) fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub(crate) fn at_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }

    pub(crate) fn ensure_non_empty(&self, op: &'static str) -> Result<()> {
        if self.is_empty() {
            Err(Error::EmptyMatrix { op })
        } else {
            Ok(())
        }
    }

    /// Applies `f` pairwise to two same-shape matrices.
    fn zip_with<F>(&self, other: &Matrix, op: &'static str, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.ensure_non_empty(op)?;
        other.ensure_non_empty(op)?;
        if self.shape() != other.shape() {
            return Err(Error::mismatch(op, self.shape(), other.shape()));
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Element-wise sum of two same-shape matrices.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "add", |a, b| a + b)
    }

    /// Element-wise difference of two same-shape matrices.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "sub", |a, b| a - b)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "hadamard", |a, b| a * b)
    }

    /// Standard matrix product; requires `self.cols == other.rows`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_non_empty("multiply")?;
        other.ensure_non_empty("multiply")?;
        if self.cols != other.rows {
            return Err(Error::mismatch("multiply", self.shape(), other.shape()));
        }

        let mut res = Matrix::create(self.rows, other.cols)?;
        for i in 0..self.rows {
            for k in 0..self.cols {
                let lhs = self.data[i * self.cols + k];
                let rhs_row = &other.data[k * other.cols..(k + 1) * other.cols];
                let out_row = &mut res.data[i * other.cols..(i + 1) * other.cols];
                for (out, &r) in out_row.iter_mut().zip(rhs_row) {
                    *out += lhs * r;
                }
            }
        }

        Ok(res)
    }

    /// Scales every element by `k`.
    pub fn scalar_multiply(&self, k: f64) -> Matrix {
        self.map(|x| x * k)
    }

    /// In-place `self -= k * other`; shapes must match.
    pub fn sub_scaled_assign(&mut self, other: &Matrix, k: f64) -> Result<()> {
        self.ensure_non_empty("sub_scaled_assign")?;
        other.ensure_non_empty("sub_scaled_assign")?;
        if self.shape() != other.shape() {
            return Err(Error::mismatch("sub_scaled_assign", self.shape(), other.shape()));
        }
        for (x, &g) in self.data.iter_mut().zip(other.data.iter()) {
            *x -= k * g;
        }
        Ok(())
    }

    /// Element-wise sum with NumPy-style broadcasting.
    ///
    /// On each axis the sizes must be equal or one of them must be 1; the
    /// result takes the larger size. Adding an `(n x 1)` bias column to an
    /// `(n x batch)` matrix replicates the column across the batch.
    pub fn broadcast_add(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_non_empty("broadcast_add")?;
        other.ensure_non_empty("broadcast_add")?;

        let rows = broadcast_axis(self.rows, other.rows)
            .ok_or_else(|| Error::mismatch("broadcast_add", self.shape(), other.shape()))?;
        let cols = broadcast_axis(self.cols, other.cols)
            .ok_or_else(|| Error::mismatch("broadcast_add", self.shape(), other.shape()))?;

        let mut res = Matrix::create(rows, cols)?;
        for i in 0..rows {
            let (ai, bi) = (i.min(self.rows - 1), i.min(other.rows - 1));
            for j in 0..cols {
                let (aj, bj) = (j.min(self.cols - 1), j.min(other.cols - 1));
                res.data[i * cols + j] = self.at(ai, aj) + other.at(bi, bj);
            }
        }

        Ok(res)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }

        res
    }

    /// Returns a new matrix with `functor` applied to every element.
    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    /// Column vector holding the mean of each row.
    pub fn row_mean(&self) -> Result<Matrix> {
        self.ensure_non_empty("row_mean")?;
        let data = self
            .data
            .chunks_exact(self.cols)
            .map(|row| row.iter().sum::<f64>() / self.cols as f64)
            .collect();
        Matrix::from_vec(self.rows, 1, data)
    }

    /// Sum of all elements.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// Broadcast size for one axis, or `None` if the sizes are incompatible.
fn broadcast_axis(a: usize, b: usize) -> Option<usize> {
    if a == b || b == 1 {
        Some(a)
    } else if a == 1 {
        Some(b)
    } else {
        None
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "[]");
        }
        for row in self.data.chunks_exact(self.cols) {
            let cells: Vec<String> = row.iter().map(|x| format!("{x:>10.6}")).collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}

impl Add for &Matrix {
    type Output = Result<Matrix>;

    fn add(self, rhs: &Matrix) -> Self::Output {
        Matrix::add(self, rhs)
    }
}

impl Sub for &Matrix {
    type Output = Result<Matrix>;

    fn sub(self, rhs: &Matrix) -> Self::Output {
        Matrix::sub(self, rhs)
    }
}

impl Mul for &Matrix {
    type Output = Result<Matrix>;

    fn mul(self, rhs: &Matrix) -> Self::Output {
        self.multiply(rhs)
    }
}
