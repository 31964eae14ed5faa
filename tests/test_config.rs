// Network and training configuration files on disk.

use std::fs;
use std::path::PathBuf;

use ferrite_mlp::{
    ActivationFunction, Error, LayerSpec, LearningRateSchedule, LossType, Network, NetworkSpec,
    ScheduleKind, TrainConfig, WeightInit,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ferrite_mlp_{}_{name}", std::process::id()))
}

#[test]
fn network_spec_survives_save_and_load() {
    let spec = NetworkSpec {
        input_nodes: 4,
        num_layers: Some(2),
        layers: vec![
            LayerSpec {
                nodes: 8,
                activation: ActivationFunction::ReLU,
                weight_init: WeightInit::He,
            },
            LayerSpec {
                nodes: 3,
                activation: ActivationFunction::Softmax,
                weight_init: WeightInit::Xavier,
            },
        ],
    };

    let path = temp_path("network.json");
    spec.save_json(&path).unwrap();
    let loaded = NetworkSpec::load_json(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(loaded, spec);

    let mut rng = StdRng::seed_from_u64(0);
    let net = Network::from_spec(&loaded, &mut rng).unwrap();
    assert_eq!(net.num_layers(), 2);
    assert_eq!(net.layers()[0].weights().shape(), (8, 4));
    assert_eq!(net.output_size(), 3);
}

#[test]
fn activation_names_are_case_tolerant() {
    let text = r#"{
        "input_nodes": 1,
        "layers": [
            { "nodes": 2, "activation": "relu", "weight_init": "he" },
            { "nodes": 1, "activation": "linear", "weight_init": "xavier" }
        ]
    }"#;
    let spec = NetworkSpec::from_json_str(text).unwrap();
    assert_eq!(
        spec.activations(),
        vec![ActivationFunction::ReLU, ActivationFunction::Identity]
    );
}

#[test]
fn train_config_survives_save_and_load() {
    let config = TrainConfig::new(
        LossType::Cce,
        250,
        LearningRateSchedule::step_decay(0.2, 0.5, 50),
    )
    .with_report_every(25);

    let path = temp_path("train.json");
    config.save_json(&path).unwrap();
    let loaded = TrainConfig::load_json(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(loaded.loss, LossType::Cce);
    assert_eq!(loaded.epochs, 250);
    assert_eq!(loaded.schedule, config.schedule);
    assert_eq!(loaded.report_every, 25);
    assert!(loaded.stop_flag.is_none());
}

#[test]
fn flat_train_config_layout_is_understood() {
    let text = r#"{
        "loss": "MSE",
        "num_epoch": 100,
        "learning_rate": 0.01,
        "lr_schedule": "EXP_DECAY",
        "decay_rate": 0.05
    }"#;
    let config = TrainConfig::from_json_str(text).unwrap();
    assert_eq!(config.loss, LossType::Mse);
    assert_eq!(config.epochs, 100);
    assert_eq!(
        config.schedule.kind,
        ScheduleKind::ExponentialDecay { decay_rate: 0.05 }
    );
    assert_eq!(config.report_every, 0);
    assert_eq!(config.seed, None);
}

#[test]
fn missing_schedule_parameters_are_rejected() {
    let text = r#"{
        "loss": "MSE",
        "num_epoch": 10,
        "learning_rate": 0.1,
        "lr_schedule": "STEP_DECAY",
        "decay_factor": 0.5
    }"#;
    assert!(matches!(
        TrainConfig::from_json_str(text),
        Err(Error::InvalidConfiguration(_))
    ));
}

#[test]
fn unknown_loss_name_is_rejected() {
    let text = r#"{
        "loss": "HINGE",
        "num_epoch": 10,
        "learning_rate": 0.1,
        "lr_schedule": "FIXED"
    }"#;
    assert!(matches!(
        TrainConfig::from_json_str(text),
        Err(Error::InvalidConfiguration(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = NetworkSpec::load_json(temp_path("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
