use log::trace;

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Fully connected layer operating on column batches.
///
/// `weights` is `size x input_size` and `biases` is `size x 1`. The five
/// caches start as the empty sentinel; `z`/`a` are replaced by every forward
/// pass and `dl_dz`/`dl_dw`/`dl_db` by every backward pass. A replacement is
/// all-or-nothing: a failing pass leaves the previous caches untouched.
#[derive(Debug, Clone)]
pub struct Layer {
    weights: Matrix,
    biases: Matrix,
    pub activator: ActivationFunction,

    z: Matrix,     // pre-activation, size x batch
    a: Matrix,     // post-activation, size x batch
    dl_dz: Matrix, // size x batch
    dl_dw: Matrix, // size x input_size
    dl_db: Matrix, // size x 1
}

impl Layer {
    /// Zero-initialized layer; weights are meant to be overwritten by a
    /// [`WeightInit`](crate::init::WeightInit) strategy before training.
    ///
    /// Fails with [`Error::AllocationFailure`] when the weight matrix cannot
    /// be allocated.
    pub fn new(input_size: usize, size: usize, activation: ActivationFunction) -> Result<Layer> {
        Ok(Layer {
            weights: Matrix::create(size, input_size)?,
            biases: Matrix::create(size, 1)?,
            activator: activation,
            z: Matrix::default(),
            a: Matrix::default(),
            dl_dz: Matrix::default(),
            dl_dw: Matrix::default(),
            dl_db: Matrix::default(),
        })
    }

    /// Number of neurons (output rows).
    pub fn size(&self) -> usize {
        self.weights.rows()
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols()
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    pub(crate) fn weights_mut(&mut self) -> &mut Matrix {
        &mut self.weights
    }

    /// Replaces the weights; the shape must stay `size x input_size`.
    pub fn set_weights(&mut self, weights: Matrix) -> Result<()> {
        if weights.shape() != self.weights.shape() {
            return Err(Error::mismatch("set_weights", self.weights.shape(), weights.shape()));
        }
        self.weights = weights;
        Ok(())
    }

    /// Replaces the biases; the shape must stay `size x 1`.
    pub fn set_biases(&mut self, biases: Matrix) -> Result<()> {
        if biases.shape() != self.biases.shape() {
            return Err(Error::mismatch("set_biases", self.biases.shape(), biases.shape()));
        }
        self.biases = biases;
        Ok(())
    }

    pub fn z(&self) -> &Matrix {
        &self.z
    }

    pub fn a(&self) -> &Matrix {
        &self.a
    }

    pub fn dl_dz(&self) -> &Matrix {
        &self.dl_dz
    }

    pub fn dl_dw(&self) -> &Matrix {
        &self.dl_dw
    }

    pub fn dl_db(&self) -> &Matrix {
        &self.dl_db
    }

    /// Resets every cache to the empty sentinel.
    pub fn clear_caches(&mut self) {
        self.z = Matrix::default();
        self.a = Matrix::default();
        self.dl_dz = Matrix::default();
        self.dl_dw = Matrix::default();
        self.dl_db = Matrix::default();
    }

    /// Forward step: `z = W·x + b`, `a = f(z)`. Caches both and returns a copy of `a`.
    pub fn feed_from(&mut self, input: &Matrix) -> Result<Matrix> {
        let z = self.weights.multiply(input)?.broadcast_add(&self.biases)?;
        let a = self.activator.activate(&z)?;
        trace!(
            "{:?} layer: {:?} -> {:?}",
            self.activator,
            input.shape(),
            a.shape()
        );
        self.z = z;
        self.a = a.clone();
        Ok(a)
    }

    /// Backward step for this layer.
    ///
    /// `dl_da` is ∂L/∂a for this layer's output and `inputs` is what the
    /// layer consumed in the forward pass (the previous layer's `a`, or the
    /// network input). Produces ∂L/∂z, ∂L/∂W and the batch-averaged ∂L/∂b.
    pub fn compute_gradients(&mut self, index: usize, dl_da: &Matrix, inputs: &Matrix) -> Result<()> {
        if self.z.is_empty() || self.a.is_empty() {
            return Err(Error::MissingForwardPass { layer: index });
        }
        if dl_da.shape() != self.a.shape() {
            return Err(Error::mismatch("compute_gradients", self.a.shape(), dl_da.shape()));
        }

        let dl_dz = self.activator.backward(&self.z, &self.a, dl_da)?;
        let dl_dw = dl_dz.multiply(&inputs.transpose())?;
        let dl_db = dl_dz.row_mean()?;
        trace!(
            "layer {index}: dL/dz {:?}, dL/dW {:?}, dL/db {:?}",
            dl_dz.shape(),
            dl_dw.shape(),
            dl_db.shape()
        );

        self.dl_dz = dl_dz;
        self.dl_dw = dl_dw;
        self.dl_db = dl_db;
        Ok(())
    }

    /// Applies the cached gradients scaled by `lr` to weights and biases in place.
    pub fn apply_gradients(&mut self, lr: f64) -> Result<()> {
        self.dl_dw.ensure_non_empty("apply_gradients")?;
        self.dl_db.ensure_non_empty("apply_gradients")?;
        if self.dl_db.shape() != self.biases.shape() {
            return Err(Error::mismatch("apply_gradients", self.biases.shape(), self.dl_db.shape()));
        }
        self.weights.sub_scaled_assign(&self.dl_dw, lr)?;
        self.biases.sub_scaled_assign(&self.dl_db, lr)?;
        Ok(())
    }
}
