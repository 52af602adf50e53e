use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};

use rust_neuralnet::model::weights;
use rust_neuralnet::parsing::csv_data;
use rust_neuralnet::{Dataset, InitMethod, LayerSpec, Model, MultiLayerPerceptron, TrainConfig};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The path of the training dataset (CSV with a header row: input columns,
    /// then target columns). The XOR truth table is used when omitted
    #[arg(short, long)]
    train_path: Option<String>,

    /// The path of the validation dataset. Defaults to the training data
    #[arg(short, long)]
    validation_path: Option<String>,

    /// Length of every input vector
    #[arg(short = 'd', long, default_value_t = 2)]
    input_dimension: usize,

    /// Network layers as NODES:ACTIVATION, e.g. 4:tanh 1:sigmoid
    #[arg(
        short = 'L',
        long,
        num_args = 1..,
        value_delimiter = ' ',
        default_values = ["2:sigmoid", "2:sigmoid", "1:sigmoid"]
    )]
    layers: Vec<LayerSpec>,

    /// Learning rate of the network
    #[arg(short, long, default_value_t = 0.1)]
    learning_rate: f64,

    /// Number of epochs to train the network for
    #[arg(short, long, default_value_t = 10_000)]
    num_epochs: usize,

    /// Weight initialization method
    #[arg(short, long, value_enum, default_value_t = InitMethod::Uniform)]
    initialization: InitMethod,

    /// Seed for weight initialization and shuffling
    #[arg(short, long)]
    seed: Option<u64>,

    /// Report the validation error after every epoch
    #[arg(long)]
    verbose: bool,

    /// Weights are loaded from this JSON file when it exists and written
    /// back to it after training
    #[arg(short, long)]
    weight_path: Option<String>,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn load_dataset(path: &str, mlp: &MultiLayerPerceptron) -> Result<Dataset> {
    csv_data::parse_dataset(path, mlp.input_dimension(), mlp.output_dimension())
        .with_context(|| format!("failed to read dataset {}", path))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut mlp = MultiLayerPerceptron::from_specs(args.input_dimension, &args.layers)?;
    mlp.initialize_with(&mut rng, args.initialization)?;

    if let Some(path) = &args.weight_path {
        if weights::load_weights(&mut mlp, path)
            .with_context(|| format!("failed to load weights from {}", path))?
        {
            info!(path = %path, "resuming from saved weights");
        }
    }

    let train = match &args.train_path {
        Some(path) => load_dataset(path, &mlp)?,
        None => Dataset::xor(),
    };
    let validation = match &args.validation_path {
        Some(path) => load_dataset(path, &mlp)?,
        None => train.clone(),
    };

    let config = TrainConfig {
        num_epochs: args.num_epochs,
        learning_rate: args.learning_rate,
        verbose: args.verbose,
    };
    info!(
        examples = train.len(),
        epochs = config.num_epochs,
        learning_rate = config.learning_rate,
        "training"
    );
    mlp.fit_with_rng(&train, &validation, &config, &mut rng)?;

    for input in &validation.inputs {
        println!("{:?} => {:?}", input, mlp.predict(input)?);
    }
    println!(
        "Validation error: {}",
        mlp.evaluate(&validation.inputs, &validation.targets)?
    );

    if let Some(path) = &args.weight_path {
        weights::save_weights(&mlp, path)
            .with_context(|| format!("failed to save weights to {}", path))?;
        info!(path = %path, "saved weights");
    }

    Ok(())
}
