use log::{debug, trace};
use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::init::weight_init::WeightInit;
use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;
use crate::network::spec::NetworkSpec;

/// Ordered stack of dense layers.
///
/// Samples are matrix columns: an input batch is `input_size x batch`. The
/// network owns every layer's parameters and caches, and each pass mutates
/// them, so a `Network` has a single owner and is not meant to be shared
/// between concurrent passes.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Builds a zero-initialized network.
    ///
    /// Layer `i` takes `layer_sizes[i - 1]` inputs (or `input_size` for the
    /// first layer). Call [`Network::initialize`] before training.
    pub fn new(
        input_size: usize,
        layer_sizes: &[usize],
        activations: &[ActivationFunction],
    ) -> Result<Network> {
        if input_size == 0 {
            return Err(Error::InvalidConfiguration("input size must be at least 1".into()));
        }
        if layer_sizes.is_empty() {
            return Err(Error::InvalidConfiguration("network needs at least one layer".into()));
        }
        if layer_sizes.len() != activations.len() {
            return Err(Error::InvalidConfiguration(format!(
                "{} layer sizes but {} activations",
                layer_sizes.len(),
                activations.len()
            )));
        }

        let mut layers = Vec::with_capacity(layer_sizes.len());
        let mut fan_in = input_size;
        for (i, (&size, &activation)) in layer_sizes.iter().zip(activations).enumerate() {
            if size == 0 {
                return Err(Error::InvalidConfiguration(format!("layer {i} has zero nodes")));
            }
            layers.push(Layer::new(fan_in, size, activation)?);
            fan_in = size;
        }

        debug!("built network {input_size} -> {layer_sizes:?}");
        Ok(Network { layers })
    }

    /// Builds the network described by `spec` and draws its initial weights.
    pub fn from_spec<R: Rng>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;
        let mut network = Network::new(spec.input_nodes, &spec.layer_sizes(), &spec.activations())?;
        network.initialize(&spec.weight_inits(), rng)?;
        Ok(network)
    }

    /// Overwrites every layer's weights with the matching strategy. Biases stay as they are.
    pub fn initialize<R: Rng>(&mut self, inits: &[WeightInit], rng: &mut R) -> Result<()> {
        if inits.len() != self.layers.len() {
            return Err(Error::InvalidConfiguration(format!(
                "{} weight initializers for {} layers",
                inits.len(),
                self.layers.len()
            )));
        }
        for (layer, init) in self.layers.iter_mut().zip(inits) {
            init.initialize(layer.weights_mut(), rng);
        }
        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].size()
    }

    /// Forward pass; replaces every layer's `z`/`a` caches and returns the
    /// output layer's activations (`output_size x batch`).
    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        input.ensure_non_empty("forward")?;
        if input.rows() != self.input_size() {
            return Err(Error::mismatch(
                "forward",
                (self.input_size(), input.cols()),
                input.shape(),
            ));
        }

        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.feed_from(&current)?;
        }
        trace!("forward pass produced {:?}", current.shape());
        Ok(current)
    }
}
