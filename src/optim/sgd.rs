use crate::error::Result;
use crate::network::network::Network;

/// Plain full-batch gradient descent: `W -= lr·∂L/∂W`, `b -= lr·∂L/∂b` for
/// every layer, using the gradients left by the last backward pass.
///
/// No momentum, weight decay or clipping.
pub fn gradient_descent(network: &mut Network, learning_rate: f64) -> Result<()> {
    for layer in network.layers_mut() {
        layer.apply_gradients(learning_rate)?;
    }
    Ok(())
}

/// Gradient descent with a fixed step size.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one update to every layer of `network`.
    pub fn step(&self, network: &mut Network) -> Result<()> {
        gradient_descent(network, self.learning_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::error::Error;
    use crate::math::matrix::Matrix;

    #[test]
    fn step_moves_against_the_gradient() {
        let mut net = Network::new(1, &[1], &[ActivationFunction::Identity]).unwrap();
        net.layers_mut()[0]
            .set_weights(Matrix::from_rows(vec![vec![1.0]]).unwrap())
            .unwrap();

        // y_pred = w·x with x = 2, dL/da = 1  =>  dL/dw = 2, dL/db = 1
        let x = Matrix::from_rows(vec![vec![2.0]]).unwrap();
        net.forward(&x).unwrap();
        net.backpropagate(&x, &Matrix::from_rows(vec![vec![1.0]]).unwrap()).unwrap();
        Sgd::new(0.5).step(&mut net).unwrap();

        assert_eq!(net.layers()[0].weights().as_slice(), &[0.0]);
        assert_eq!(net.layers()[0].biases().as_slice(), &[-0.5]);
    }

    #[test]
    fn descent_without_gradients_fails() {
        let mut net = Network::new(2, &[1], &[ActivationFunction::Sigmoid]).unwrap();
        assert!(matches!(
            gradient_descent(&mut net, 0.1),
            Err(Error::EmptyMatrix { .. })
        ));
    }
}
