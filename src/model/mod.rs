use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::error::{Error, Result};
use crate::parsing::Dataset;

pub mod activation;
pub mod neural_net;
pub mod weights;

pub use activation::{Activation, ActivationFunction, ActivationKind, FnActivation};
pub use neural_net::{Forward, InitMethod, Layer, LayerSpec, MultiLayerPerceptron};

/// Training hyperparams
#[derive(Clone, Debug, PartialEq)]
pub struct TrainConfig {
    pub num_epochs: usize,
    pub learning_rate: f64,
    /// Evaluate and log the validation error after every epoch
    pub verbose: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            num_epochs: 10_000,
            learning_rate: 0.1,
            verbose: false,
        }
    }
}

/// Anything that can be trained one example at a time.
///
/// Implementors supply prediction and a single stochastic gradient step; the
/// epoch loop and the L1 evaluation are shared.
pub trait Model {
    fn predict(&self, input: &[f64]) -> Result<Vec<f64>>;

    /// One backpropagation step on a single example. Must leave the model
    /// untouched when it returns an error.
    fn train_iteration(&mut self, input: &[f64], target: &[f64], learning_rate: f64) -> Result<()>;

    /// Sum over all examples and output dimensions of `|prediction - target|`
    fn evaluate(&self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64> {
        check_counts(inputs.len(), targets.len())?;

        let mut error = 0f64;
        for (input, target) in inputs.iter().zip(targets) {
            let prediction = self.predict(input)?;
            if prediction.len() != target.len() {
                return Err(Error::shape(format!(
                    "target of length {} does not match a prediction of length {}",
                    target.len(),
                    prediction.len()
                )));
            }
            error += prediction
                .iter()
                .zip(target)
                .map(|(p, t)| (p - t).abs())
                .sum::<f64>();
        }

        Ok(error)
    }

    /// Fit the model to the dataset.
    /// Return the validation error per epoch (only collected when `verbose`).
    fn fit(
        &mut self,
        train: &Dataset,
        validation: &Dataset,
        config: &TrainConfig,
    ) -> Result<Vec<(usize, f64)>> {
        self.fit_with_rng(train, validation, config, &mut rand::thread_rng())
    }

    /// Same as [`Model::fit`], shuffling with the given generator
    fn fit_with_rng<R: Rng + ?Sized>(
        &mut self,
        train: &Dataset,
        validation: &Dataset,
        config: &TrainConfig,
        rng: &mut R,
    ) -> Result<Vec<(usize, f64)>> {
        train.validate()?;
        validation.validate()?;
        check_learning_rate(config.learning_rate)?;

        let mut losses = vec![];
        let mut order: Vec<usize> = (0..train.len()).collect();

        for epoch in 1..=config.num_epochs {
            order.shuffle(rng);

            for &idx in &order {
                self.train_iteration(
                    &train.inputs[idx],
                    &train.targets[idx],
                    config.learning_rate,
                )?;
            }

            if config.verbose {
                let error = self.evaluate(&validation.inputs, &validation.targets)?;
                info!(epoch, error, "finished epoch");
                losses.push((epoch, error));
            }
        }

        Ok(losses)
    }
}

pub(crate) fn check_learning_rate(learning_rate: f64) -> Result<()> {
    if !(learning_rate > 0f64 && learning_rate.is_finite()) {
        return Err(Error::Rate(learning_rate));
    }

    Ok(())
}

pub(crate) fn check_counts(inputs: usize, targets: usize) -> Result<()> {
    if inputs != targets {
        return Err(Error::shape(format!(
            "{} inputs but {} targets: supply one target for each input",
            inputs, targets
        )));
    }

    Ok(())
}
