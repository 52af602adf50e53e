//! Saving and loading trained parameters.
//!
//! Weights are exported in JSON format:
//! `{"weights": [layer0_rows, layer1_rows, ...], "biases": [layer0_rows, ...]}`
//! where every entry is the matrix as a list of rows.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use json::{object, JsonValue};
use tracing::debug;

use super::neural_net::MultiLayerPerceptron;
use crate::error::{Error, Result};
use crate::matrix::Matrix;

const WEIGHTS_KEY: &str = "weights";
const BIASES_KEY: &str = "biases";

/// The network's parameters as a JSON record
pub fn to_json(mlp: &MultiLayerPerceptron) -> JsonValue {
    let mut data = object! {};

    let weights: Vec<Vec<Vec<f64>>> = mlp.layers().iter().map(|l| l.weights().to_grid()).collect();
    let biases: Vec<Vec<Vec<f64>>> = mlp.layers().iter().map(|l| l.biases().to_grid()).collect();
    data[WEIGHTS_KEY] = weights.into();
    data[BIASES_KEY] = biases.into();

    data
}

/// Write the weights of the model to `path`
pub fn save_weights(mlp: &MultiLayerPerceptron, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    file.write_all(to_json(mlp).dump().as_bytes())?;
    debug!(path = %path.display(), layers = mlp.layers().len(), "saved weights");

    Ok(())
}

/// Replace the network's parameters with the ones stored at `path`.
///
/// Returns `Ok(false)` without touching the network when the file does not
/// exist.
pub fn load_weights(mlp: &mut MultiLayerPerceptron, path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "no saved weights");
        return Ok(false);
    }

    let contents = fs::read_to_string(path)?;
    apply_json(mlp, &json::parse(&contents)?)?;
    debug!(path = %path.display(), "loaded weights");

    Ok(true)
}

/// Replace each layer's weight and bias matrices, in order, with the ones in
/// `record`. The record is fully validated first; on error the network is
/// left as it was.
pub fn apply_json(mlp: &mut MultiLayerPerceptron, record: &JsonValue) -> Result<()> {
    let weights = parse_matrices(&record[WEIGHTS_KEY], WEIGHTS_KEY)?;
    let biases = parse_matrices(&record[BIASES_KEY], BIASES_KEY)?;

    let layers = mlp.layers().len();
    if weights.len() != layers || biases.len() != layers {
        return Err(Error::Persistence(format!(
            "record has {} weight and {} bias matrices for a network of {} layers",
            weights.len(),
            biases.len(),
            layers
        )));
    }

    let mut inputs = mlp.input_dimension();
    for (idx, (w, b)) in weights.iter().zip(&biases).enumerate() {
        if w.rows() == 0 || w.cols() != inputs || b.shape() != (w.rows(), 1) {
            return Err(Error::shape(format!(
                "layer {}: weights {:?} and biases {:?} do not fit an input of size {}",
                idx,
                w.shape(),
                b.shape(),
                inputs
            )));
        }
        inputs = w.rows();
    }

    for (layer, (w, b)) in mlp.layers.iter_mut().zip(weights.into_iter().zip(biases)) {
        layer.weights = w;
        layer.biases = b;
    }

    Ok(())
}

fn parse_matrices(value: &JsonValue, key: &str) -> Result<Vec<Matrix>> {
    if !value.is_array() {
        return Err(Error::Persistence(format!("missing `{}` list", key)));
    }

    value
        .members()
        .enumerate()
        .map(|(layer, matrix)| {
            let rows = matrix
                .members()
                .map(|row| {
                    row.members()
                        .map(|x| {
                            x.as_f64().ok_or_else(|| {
                                Error::Persistence(format!(
                                    "non-numeric value in `{}` of layer {}",
                                    key, layer
                                ))
                            })
                        })
                        .collect::<Result<Vec<f64>>>()
                })
                .collect::<Result<Vec<Vec<f64>>>>()?;

            Matrix::from_grid(&rows)
        })
        .collect()
}
