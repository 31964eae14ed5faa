use log::trace;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

impl Network {
    /// Backpropagation from the output layer down to the first.
    ///
    /// Must follow a [`Network::forward`] over the same `input`: the cached
    /// `z`/`a` of every layer are read here. `loss_derivative` is ∂L/∂a of the
    /// output layer (`output_size x batch`). Afterwards every layer holds fresh
    /// `dl_dz`, `dl_dw` and `dl_db`.
    ///
    /// For layer `i`, ∂L/∂a comes from the layer above as `W_{i+1}ᵀ · ∂L/∂z_{i+1}`.
    pub fn backpropagate(&mut self, input: &Matrix, loss_derivative: &Matrix) -> Result<()> {
        input.ensure_non_empty("backpropagate")?;
        let first = &self.layers()[0];
        if first.z().is_empty() {
            return Err(Error::MissingForwardPass { layer: 0 });
        }
        if input.rows() != first.input_size() || input.cols() != first.z().cols() {
            return Err(Error::mismatch(
                "backpropagate",
                (first.input_size(), first.z().cols()),
                input.shape(),
            ));
        }

        let layers = self.layers_mut();
        let mut dl_da = loss_derivative.clone();

        for i in (0..layers.len()).rev() {
            let (below, rest) = layers.split_at_mut(i);
            let layer = &mut rest[0];
            let layer_input = if i == 0 { input } else { below[i - 1].a() };

            layer.compute_gradients(i, &dl_da, layer_input)?;

            if i > 0 {
                dl_da = layer.weights().transpose().multiply(layer.dl_dz())?;
            }
        }

        trace!("backpropagated through {} layers", layers.len());
        Ok(())
    }
}
