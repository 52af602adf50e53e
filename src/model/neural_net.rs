use std::fmt;
use std::str::FromStr;

use rand::Rng;
use tracing::debug;

use super::activation::{Activation, ActivationKind};
use super::{check_learning_rate, Model};
use crate::error::{Error, Result};
use crate::matrix::{self, Matrix};

/// A fully connected layer: `weights` is nodes × inputs, `biases` is nodes × 1
#[derive(Debug, Clone)]
pub struct Layer {
    pub(crate) weights: Matrix,
    pub(crate) biases: Matrix,
    activation: Activation,
}

impl Layer {
    fn new(nodes: usize, inputs: usize, activation: Activation) -> Layer {
        Layer {
            weights: Matrix::new(nodes, inputs),
            biases: Matrix::new(nodes, 1),
            activation,
        }
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    /// Number of nodes, i.e. the size of this layer's output
    pub fn nodes(&self) -> usize {
        self.weights.rows()
    }
}

/// Layer description in the `NODES:ACTIVATION` form used on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerSpec {
    pub nodes: usize,
    pub activation: ActivationKind,
}

impl FromStr for LayerSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (nodes, activation) = s.split_once(':').ok_or_else(|| {
            Error::Construction(format!("layer `{}` should look like NODES:ACTIVATION", s))
        })?;
        let nodes = nodes
            .trim()
            .parse()
            .map_err(|_| Error::Construction(format!("invalid node count in layer `{}`", s)))?;

        Ok(LayerSpec {
            nodes,
            activation: activation.trim().parse()?,
        })
    }
}

/// How fresh weights are drawn
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitMethod {
    /// Weights and biases uniform on [-1, 1]
    Uniform,
    /// Weights uniform on ±sqrt(6 / (fan_in + fan_out)), biases zero
    Xavier,
}

/// Outcome of a forward pass
#[derive(Debug, Clone)]
pub struct Forward {
    /// The network's output
    pub output: Vec<f64>,
    /// `activations[0]` is the input column and `activations[i + 1]` is the
    /// activated output of layer `i`
    pub activations: Vec<Matrix>,
}

/// Represents a feedforward neural net trained with per-example backprop
#[derive(Debug, Clone)]
pub struct MultiLayerPerceptron {
    input_dimension: usize,
    pub(crate) layers: Vec<Layer>,
}

impl MultiLayerPerceptron {
    /// An empty network accepting inputs of length `input_dimension`
    pub fn new(input_dimension: usize) -> Result<MultiLayerPerceptron> {
        if input_dimension == 0 {
            return Err(Error::Construction(
                "input dimension must be > 0".to_owned(),
            ));
        }

        Ok(MultiLayerPerceptron {
            input_dimension,
            layers: vec![],
        })
    }

    /// Build a network from a list of layer descriptions
    pub fn from_specs(input_dimension: usize, specs: &[LayerSpec]) -> Result<MultiLayerPerceptron> {
        specs
            .iter()
            .try_fold(MultiLayerPerceptron::new(input_dimension)?, |mlp, spec| {
                mlp.add_layer(spec.nodes, spec.activation)
            })
    }

    /// Append a layer of `nodes` nodes. Its input size is the output size of
    /// the previous layer (or the input dimension for the first one). Weights
    /// and biases start at zero.
    ///
    /// This consumes the network, so a rejected layer drops it along with the
    /// error. Use [`MultiLayerPerceptron::push_layer`] to keep the network.
    pub fn add_layer(
        mut self,
        nodes: usize,
        activation: impl Into<Activation>,
    ) -> Result<MultiLayerPerceptron> {
        self.push_layer(nodes, activation)?;
        Ok(self)
    }

    /// Borrowing form of [`MultiLayerPerceptron::add_layer`]. On error the
    /// network is left as it was.
    pub fn push_layer(
        &mut self,
        nodes: usize,
        activation: impl Into<Activation>,
    ) -> Result<&mut Self> {
        if nodes == 0 {
            return Err(Error::Construction(
                "a layer needs at least one node".to_owned(),
            ));
        }

        let inputs = self.output_dimension();
        let activation = activation.into();
        debug!(
            layer = self.layers.len(),
            nodes,
            inputs,
            activation = activation.name(),
            "adding layer"
        );
        self.layers.push(Layer::new(nodes, inputs, activation));

        Ok(self)
    }

    pub fn input_dimension(&self) -> usize {
        self.input_dimension
    }

    /// Size of the network's output (the input dimension while there are no layers)
    pub fn output_dimension(&self) -> usize {
        self.layers
            .last()
            .map_or(self.input_dimension, Layer::nodes)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Draw every weight and bias uniformly from `[lower, upper]`
    pub fn randomize_weights(&mut self, lower: f64, upper: f64) -> Result<&mut Self> {
        self.randomize_weights_with(&mut rand::thread_rng(), lower, upper)
    }

    pub fn randomize_weights_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        lower: f64,
        upper: f64,
    ) -> Result<&mut Self> {
        matrix::uniform(lower, upper)?;

        for layer in self.layers.iter_mut() {
            layer.weights.randomize_with(rng, lower, upper)?;
            layer.biases.randomize_with(rng, lower, upper)?;
        }

        Ok(self)
    }

    /// Re-initialize all parameters according to `method`
    pub fn initialize_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        method: InitMethod,
    ) -> Result<&mut Self> {
        debug!(?method, "initializing weights");

        match method {
            InitMethod::Uniform => self.randomize_weights_with(rng, -1f64, 1f64),
            InitMethod::Xavier => {
                for layer in self.layers.iter_mut() {
                    let (fan_out, fan_in) = layer.weights.shape();
                    let boundary = (6f64 / (fan_in + fan_out) as f64).sqrt();
                    layer.weights.randomize_with(rng, -boundary, boundary)?;
                    layer.biases = Matrix::new(fan_out, 1);
                }
                Ok(self)
            }
        }
    }

    /// Perform a forward pass of the network on some input.
    pub fn forward(&self, input: &[f64]) -> Result<Forward> {
        let first = self
            .layers
            .first()
            .ok_or_else(|| Error::Construction("network has no layers".to_owned()))?;
        if input.len() != first.weights.cols() {
            return Err(Error::shape(format!(
                "input of length {} does not fit a network expecting {}",
                input.len(),
                first.weights.cols()
            )));
        }

        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        let mut current = Matrix::from_vector(input);

        for layer in &self.layers {
            let mut sum = layer.weights.dot(&current)?;
            sum.add_in_place(&layer.biases)?;
            sum.map_in_place(|z, _, _| layer.activation.value(z));

            activations.push(std::mem::replace(&mut current, sum));
        }

        let output = current.to_vec();
        activations.push(current);

        Ok(Forward {
            output,
            activations,
        })
    }

    /// Propagate `layer_error` (target - prediction at the output) back
    /// through the network and apply one gradient step to every layer.
    fn backward_and_update(
        &mut self,
        activations: &[Matrix],
        mut layer_error: Matrix,
        learning_rate: f64,
    ) -> Result<()> {
        for (idx, layer) in self.layers.iter_mut().enumerate().rev() {
            let mut gradient =
                activations[idx + 1].mapped(|y, _, _| layer.activation.derivative(y));
            gradient
                .multiply_in_place(&layer_error)?
                .scale_in_place(learning_rate);

            let weight_delta = gradient.dot(&activations[idx].transpose())?;

            // The error handed to the previous layer must see these weights
            // as they were before this step.
            if idx > 0 {
                layer_error = layer.weights.transpose().dot(&layer_error)?;
            }

            layer.weights.add_in_place(&weight_delta)?;
            layer.biases.add_in_place(&gradient)?;
        }

        Ok(())
    }
}

impl Model for MultiLayerPerceptron {
    fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        Ok(self.forward(input)?.output)
    }

    fn train_iteration(&mut self, input: &[f64], target: &[f64], learning_rate: f64) -> Result<()> {
        check_learning_rate(learning_rate)?;

        let Forward {
            output,
            activations,
        } = self.forward(input)?;
        if target.len() != output.len() {
            return Err(Error::shape(format!(
                "target of length {} does not match the network's {} outputs",
                target.len(),
                output.len()
            )));
        }

        let layer_error = Matrix::from_vector(target).subtract(&Matrix::from_vector(&output))?;

        self.backward_and_update(&activations, layer_error, learning_rate)
    }
}

/// Topology summary followed by each layer's parameters
impl fmt::Display for MultiLayerPerceptron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input: {}", self.input_dimension)?;
        for (idx, layer) in self.layers.iter().enumerate() {
            let (nodes, inputs) = layer.weights.shape();
            write!(
                f,
                "\nlayer {}: {} -> {} ({})\nweights:\n{}\nbiases:\n{}",
                idx,
                inputs,
                nodes,
                layer.activation.name(),
                layer.weights,
                layer.biases
            )?;
        }

        Ok(())
    }
}
