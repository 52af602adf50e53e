//! End-to-end checks of the network through the public API.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rust_neuralnet::model::weights;
use rust_neuralnet::*;

fn identity_network(input_dimension: usize, widths: &[usize]) -> MultiLayerPerceptron {
    let mut mlp = MultiLayerPerceptron::new(input_dimension).unwrap();
    for &nodes in widths {
        mlp = mlp.add_layer(nodes, ActivationKind::Identity).unwrap();
    }
    mlp.randomize_weights(1.0, 1.0).unwrap();
    mlp
}

#[test]
fn forward_pass_examples() {
    assert_eq!(
        identity_network(2, &[2]).predict(&[1.0, 1.0]).unwrap(),
        vec![3.0, 3.0]
    );
    assert_eq!(
        identity_network(2, &[2, 2]).predict(&[1.0, 1.0]).unwrap(),
        vec![7.0, 7.0]
    );
}

#[test]
fn evaluate_sums_absolute_errors() {
    let mlp = identity_network(3, &[2]);
    let error = mlp
        .evaluate(&[vec![1.0, 1.0, 1.0]], &[vec![1.0, 1.0]])
        .unwrap();
    assert_eq!(error, 6.0);
}

#[test]
fn evaluate_does_not_mutate() {
    let mlp = identity_network(3, &[2]);
    let before = mlp.layers()[0].weights().clone();
    mlp.evaluate(&[vec![1.0, 2.0, 3.0]], &[vec![0.0, 0.0]]).unwrap();
    assert_eq!(mlp.layers()[0].weights(), &before);
}

#[test]
fn shared_activation_across_layers() {
    let sigmoid = Activation::from(ActivationKind::Sigmoid);
    let mlp = MultiLayerPerceptron::new(2)
        .unwrap()
        .add_layer(4, sigmoid.clone())
        .unwrap()
        .add_layer(1, sigmoid)
        .unwrap();
    assert_eq!(mlp.predict(&[0.0, 1.0]).unwrap(), vec![0.5]);
}

#[test]
fn training_reduces_xor_error() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut mlp = MultiLayerPerceptron::new(2)
        .unwrap()
        .add_layer(4, ActivationKind::Tanh)
        .unwrap()
        .add_layer(1, ActivationKind::Sigmoid)
        .unwrap();
    mlp.randomize_weights_with(&mut rng, -1.0, 1.0).unwrap();

    let xor = Dataset::xor();
    let before = mlp.evaluate(&xor.inputs, &xor.targets).unwrap();

    let config = TrainConfig {
        num_epochs: 2000,
        learning_rate: 0.3,
        verbose: false,
    };
    mlp.fit_with_rng(&xor, &xor, &config, &mut rng).unwrap();

    let after = mlp.evaluate(&xor.inputs, &xor.targets).unwrap();
    assert!(after < before, "error went from {before} to {after}");
}

#[test]
fn verbose_fit_reports_each_epoch() {
    let mut mlp = identity_network(2, &[1]);
    let data = Dataset::new(vec![vec![0.5, 0.5]], vec![vec![1.0]]).unwrap();
    let config = TrainConfig {
        num_epochs: 5,
        learning_rate: 0.05,
        verbose: true,
    };

    let losses = mlp.fit(&data, &data, &config).unwrap();
    let epochs: Vec<usize> = losses.iter().map(|(epoch, _)| *epoch).collect();
    assert_eq!(epochs, vec![1, 2, 3, 4, 5]);
    assert!(losses.windows(2).all(|w| w[1].1 < w[0].1));
}

#[test]
fn fit_rejects_mismatched_data_without_training() {
    let mut mlp = identity_network(2, &[1]);
    let bad = Dataset {
        inputs: vec![vec![1.0, 1.0], vec![0.0, 0.0]],
        targets: vec![vec![1.0]],
    };
    let good = Dataset::xor();

    assert!(matches!(
        mlp.fit(&bad, &good, &TrainConfig::default()),
        Err(Error::ShapeMismatch(_))
    ));
    assert!(mlp.layers()[0].weights().iter().all(|&w| w == 1.0));
}

#[test]
fn trained_weights_survive_a_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xor.json");

    let mut rng = StdRng::seed_from_u64(5);
    let specs: Vec<LayerSpec> = ["3:sigmoid", "1:sigmoid"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let mut mlp = MultiLayerPerceptron::from_specs(2, &specs).unwrap();
    mlp.initialize_with(&mut rng, InitMethod::Xavier).unwrap();
    let xor = Dataset::xor();
    mlp.fit_with_rng(
        &xor,
        &xor,
        &TrainConfig {
            num_epochs: 50,
            ..TrainConfig::default()
        },
        &mut rng,
    )
    .unwrap();
    weights::save_weights(&mlp, &path).unwrap();

    let mut restored = MultiLayerPerceptron::from_specs(2, &specs).unwrap();
    assert!(weights::load_weights(&mut restored, &path).unwrap());
    for input in &xor.inputs {
        assert_relative_eq!(
            restored.predict(input).unwrap()[0],
            mlp.predict(input).unwrap()[0],
            epsilon = 1e-9
        );
    }
}
