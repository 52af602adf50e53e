//! A minimal feedforward neural network toolkit.
//!
//! - `matrix` - dense, shape-checked `f64` matrix
//! - `model` - multilayer perceptron with per-example backprop, activation
//!   functions and weight persistence
//! - `parsing` - datasets and CSV loading
//!
//! ```
//! use rust_neuralnet::{ActivationKind, Dataset, Model, MultiLayerPerceptron, TrainConfig};
//!
//! # fn main() -> rust_neuralnet::Result<()> {
//! let mut mlp = MultiLayerPerceptron::new(2)?
//!     .add_layer(3, ActivationKind::Sigmoid)?
//!     .add_layer(1, ActivationKind::Sigmoid)?;
//! mlp.randomize_weights(-1.0, 1.0)?;
//!
//! let xor = Dataset::xor();
//! let config = TrainConfig { num_epochs: 10, ..TrainConfig::default() };
//! mlp.fit(&xor, &xor, &config)?;
//!
//! let prediction = mlp.predict(&[1.0, 0.0])?;
//! assert_eq!(prediction.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod matrix;
pub mod model;
pub mod parsing;

pub use error::{Error, Result};
pub use matrix::Matrix;
pub use model::{
    Activation, ActivationFunction, ActivationKind, InitMethod, LayerSpec, Model,
    MultiLayerPerceptron, TrainConfig,
};
pub use parsing::Dataset;
