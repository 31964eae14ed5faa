use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::math::matrix::Matrix;

/// Strategy used to overwrite a freshly zeroed weight matrix.
///
/// Weights are `fan_out x fan_in` (rows are output neurons, columns are the
/// inputs feeding them). The random source is always supplied by the caller so
/// initialization is reproducible with a seeded RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightInit {
    /// Uniform Xavier (Glorot): U(-L, L) with L = sqrt(6 / (fan_in + fan_out)).
    ///
    /// Recommended before Sigmoid/Tanh/Identity layers.
    #[serde(alias = "xavier", alias = "XAVIER")]
    Xavier,
    /// He normal: N(0, 2 / fan_in).
    ///
    /// Recommended before ReLU layers. The variance 2/fan_in accounts for
    /// the fact that ReLU zeroes half of its inputs on average.
    #[serde(alias = "he", alias = "HE")]
    He,
}

impl WeightInit {
    /// Replaces every element of `weights` with a fresh sample.
    pub fn initialize<R: Rng>(&self, weights: &mut Matrix, rng: &mut R) {
        let (fan_out, fan_in) = weights.shape();
        if weights.is_empty() {
            return;
        }

        match self {
            WeightInit::Xavier => {
                let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
                for i in 0..fan_out {
                    for j in 0..fan_in {
                        *weights.at_mut(i, j) = rng.gen_range(-limit..=limit);
                    }
                }
            }
            WeightInit::He => {
                let std_dev = (2.0 / fan_in as f64).sqrt();
                for i in 0..fan_out {
                    for j in 0..fan_in {
                        *weights.at_mut(i, j) = sample_standard_normal(rng) * std_dev;
                    }
                }
            }
        }
    }
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
fn sample_standard_normal<R: Rng>(rng: &mut R) -> f64 {
    // u1 and u2 in (0, 1] so ln(u1) is finite.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
