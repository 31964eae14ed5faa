// Command-line driver: trains a network on a dataset directory.
//
//   cargo run -- data/xor
//
// The directory must contain `nn_config.json`, `train_config.json` and
// `train.csv`; `test.csv` is optional and falls back to the training set.
// Set RUST_LOG=debug for construction details.

use std::path::{Path, PathBuf};

use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ferrite_mlp::train::LogReporter;
use ferrite_mlp::{accuracy, train_loop, Dataset, Network, NetworkSpec, Result, TrainConfig};

const DEFAULT_DATASET_DIR: &str = "data/xor";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_DIR));

    if let Err(e) = run(&dir) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(dir: &Path) -> Result<()> {
    let spec = NetworkSpec::load_json(dir.join("nn_config.json"))?;
    let config = TrainConfig::load_json(dir.join("train_config.json"))?;
    let train = Dataset::load_csv(dir.join("train.csv"))?;

    let test_path = dir.join("test.csv");
    let test = if test_path.exists() {
        Dataset::load_csv(test_path)?
    } else {
        info!("no test.csv in {}, evaluating on the training set", dir.display());
        train.clone()
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut network = Network::from_spec(&spec, &mut rng)?;

    info!(
        "training {} -> {:?} on {} samples for {} epochs",
        spec.input_nodes,
        spec.layer_sizes(),
        train.num_samples(),
        config.epochs
    );
    let report = train_loop(&mut network, &train.inputs, &train.targets, &config, &mut LogReporter)?;
    info!("final training loss: {:.6}", report.final_loss);

    let output = network.forward(&test.inputs)?;
    let loss = config.loss.value(&test.targets, &output)?;
    let acc = accuracy(&output, &test.targets)?;

    println!("Test output:\n{output}");
    println!("Expected test output:\n{}", test.targets);
    println!("Loss: {loss:.6}");
    println!("Accuracy: {:.2}%", acc * 100.0);
    Ok(())
}
