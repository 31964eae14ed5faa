use serde::{Deserialize, Serialize};

use crate::activation::softmax::{softmax, softmax_backward};
use crate::error::Result;
use crate::math::matrix::Matrix;

/// Activation applied after a layer's linear transform.
///
/// All variants except `Softmax` are element-wise and expose a scalar
/// function/derivative pair through [`ActivationFunction::pointwise`].
/// `Softmax` normalizes each column as a whole, so its backward step is a
/// Jacobian-vector product instead of a Hadamard product with `f'(z)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    #[serde(alias = "sigmoid", alias = "SIGMOID")]
    Sigmoid,
    #[serde(alias = "tanh", alias = "TANH")]
    Tanh,
    #[serde(rename = "ReLU", alias = "relu", alias = "ReLu", alias = "RELU")]
    ReLU,
    #[serde(alias = "softmax", alias = "SOFTMAX")]
    Softmax,
    #[serde(alias = "identity", alias = "linear", alias = "IDENTITY")]
    Identity,
}

type ScalarFn = fn(f64) -> f64;

impl ActivationFunction {
    /// Scalar `(function, derivative)` pair, or `None` for `Softmax`.
    pub fn pointwise(&self) -> Option<(ScalarFn, ScalarFn)> {
        match self {
            ActivationFunction::Sigmoid => Some((sigmoid, sigmoid_derivative)),
            ActivationFunction::Tanh => Some((tanh, tanh_derivative)),
            ActivationFunction::ReLU => Some((relu, relu_derivative)),
            ActivationFunction::Identity => Some((identity, identity_derivative)),
            ActivationFunction::Softmax => None,
        }
    }

    /// Maps the pre-activation `z` to the post-activation output.
    pub fn activate(&self, z: &Matrix) -> Result<Matrix> {
        match self.pointwise() {
            Some((f, _)) => Ok(z.map(f)),
            None => softmax(z),
        }
    }

    /// Turns `dL/da` into `dL/dz` using the cached `z` and `a = f(z)`.
    pub fn backward(&self, z: &Matrix, a: &Matrix, dl_da: &Matrix) -> Result<Matrix> {
        match self.pointwise() {
            Some((_, df)) => dl_da.hadamard(&z.map(df)),
            None => softmax_backward(a, dl_da),
        }
    }
}

pub fn sigmoid(x: f64) -> f64 {
    // Split by sign so exp() never sees a large positive argument.
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

pub fn sigmoid_derivative(x: f64) -> f64 {
    let s = sigmoid(x);
    s * (1.0 - s)
}

/// Saturates to ±1 beyond |x| = 20, where the result already rounds to ±1.
pub fn tanh(x: f64) -> f64 {
    if x > 20.0 {
        1.0
    } else if x < -20.0 {
        -1.0
    } else {
        x.tanh()
    }
}

pub fn tanh_derivative(x: f64) -> f64 {
    let t = tanh(x);
    1.0 - t * t
}

pub fn relu(x: f64) -> f64 {
    if x > 0.0 { x } else { 0.0 }
}

/// Step function; the value at exactly 0 is taken as 0.
pub fn relu_derivative(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { 0.0 }
}

pub fn identity(x: f64) -> f64 {
    x
}

pub fn identity_derivative(_x: f64) -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_abs_diff_eq!(sigmoid(0.0), 0.5);
        assert_abs_diff_eq!(sigmoid(1000.0), 1.0);
        assert_abs_diff_eq!(sigmoid(-1000.0), 0.0);
        assert!(sigmoid_derivative(-1000.0).is_finite());
    }

    #[test]
    fn tanh_saturates() {
        assert_eq!(tanh(50.0), 1.0);
        assert_eq!(tanh(-50.0), -1.0);
        assert_eq!(tanh_derivative(50.0), 0.0);
        assert_abs_diff_eq!(tanh(0.5), 0.5f64.tanh());
    }

    #[test]
    fn relu_derivative_at_zero_is_zero() {
        assert_eq!(relu_derivative(0.0), 0.0);
        assert_eq!(relu_derivative(1e-9), 1.0);
        assert_eq!(relu(-3.0), 0.0);
    }

    #[test]
    fn only_softmax_lacks_pointwise_pair() {
        assert!(ActivationFunction::Softmax.pointwise().is_none());
        assert!(ActivationFunction::Sigmoid.pointwise().is_some());
        assert!(ActivationFunction::Identity.pointwise().is_some());
    }

    #[test]
    fn parses_config_spellings() {
        let names = r#"["sigmoid", "Tanh", "ReLu", "softmax", "identity"]"#;
        let parsed: Vec<ActivationFunction> = serde_json::from_str(names).unwrap();
        assert_eq!(
            parsed,
            vec![
                ActivationFunction::Sigmoid,
                ActivationFunction::Tanh,
                ActivationFunction::ReLU,
                ActivationFunction::Softmax,
                ActivationFunction::Identity,
            ]
        );
        assert!(serde_json::from_str::<ActivationFunction>("\"swish\"").is_err());
    }
}
