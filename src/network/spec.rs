use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::config;
use crate::error::{Error, Result};
use crate::init::weight_init::WeightInit;

/// Describes one layer in a network configuration.
///
/// Fields:
/// - `nodes`: number of neurons in this layer
/// - `activation`: activation function applied after the linear transform
/// - `weight_init`: strategy used to draw the initial weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub nodes: usize,
    pub activation: ActivationFunction,
    pub weight_init: WeightInit,
}

/// A serializable description of a network architecture.
///
/// Layer `i` takes its input from layer `i - 1`, and layer 0 from the
/// `input_nodes` raw features, so input sizes are never stored per layer.
/// `num_layers` is optional and, when present, must agree with `layers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_nodes: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_layers: Option<usize>,
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    /// Checks the layer chain; every problem is an [`Error::InvalidConfiguration`].
    pub fn validate(&self) -> Result<()> {
        if self.input_nodes == 0 {
            return Err(Error::InvalidConfiguration("input_nodes must be at least 1".into()));
        }
        if self.layers.is_empty() {
            return Err(Error::InvalidConfiguration("network needs at least one layer".into()));
        }
        if let Some(n) = self.num_layers {
            if n != self.layers.len() {
                return Err(Error::InvalidConfiguration(format!(
                    "num_layers is {n} but {} layers are listed",
                    self.layers.len()
                )));
            }
        }
        if let Some(i) = self.layers.iter().position(|l| l.nodes == 0) {
            return Err(Error::InvalidConfiguration(format!("layer {i} has zero nodes")));
        }
        Ok(())
    }

    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.nodes).collect()
    }

    pub fn activations(&self) -> Vec<ActivationFunction> {
        self.layers.iter().map(|l| l.activation).collect()
    }

    pub fn weight_inits(&self) -> Vec<WeightInit> {
        self.layers.iter().map(|l| l.weight_init).collect()
    }

    /// Parses and validates a spec from a JSON string.
    pub fn from_json_str(text: &str) -> Result<NetworkSpec> {
        let spec: NetworkSpec = config::parse_json(text)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        config::save_json(self, path.as_ref())
    }

    /// Loads and validates a spec from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<NetworkSpec> {
        let spec: NetworkSpec = config::load_json(path.as_ref())?;
        spec.validate()?;
        Ok(spec)
    }
}
