// End-to-end training runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use approx::assert_abs_diff_eq;
use ferrite_mlp::train::{ChannelReporter, EpochStats, Silent};
use ferrite_mlp::{
    accuracy, train_loop, ActivationFunction, LearningRateSchedule, LossType, Matrix, Network,
    TrainConfig, WeightInit,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn xor_data() -> (Matrix, Matrix) {
    let inputs = Matrix::from_rows(vec![
        vec![0.0, 0.0, 1.0, 1.0],
        vec![0.0, 1.0, 0.0, 1.0],
    ])
    .unwrap();
    let expected = Matrix::from_rows(vec![vec![0.0, 1.0, 1.0, 0.0]]).unwrap();
    (inputs, expected)
}

fn xor_network() -> Network {
    let mut net = Network::new(
        2,
        &[2, 1],
        &[ActivationFunction::Tanh, ActivationFunction::Sigmoid],
    )
    .unwrap();
    net.layers_mut()[0]
        .set_weights(Matrix::from_rows(vec![vec![0.3, -0.6], vec![0.75, -0.9]]).unwrap())
        .unwrap();
    net.layers_mut()[1]
        .set_weights(Matrix::from_rows(vec![vec![0.4, -0.7]]).unwrap())
        .unwrap();
    net
}

#[test]
fn xor_converges_from_fixed_weights() {
    let (inputs, expected) = xor_data();
    let mut net = xor_network();
    let config = TrainConfig::new(LossType::Bce, 1000, LearningRateSchedule::fixed(0.1));

    let initial = LossType::Bce
        .value(&expected, &net.forward(&inputs).unwrap())
        .unwrap();
    let report = train_loop(&mut net, &inputs, &expected, &config, &mut Silent).unwrap();

    assert_eq!(report.epochs_run, 1000);
    assert!(!report.stopped_early);
    assert!(report.final_loss < initial);

    let output = net.forward(&inputs).unwrap();
    assert_eq!(accuracy(&output, &expected).unwrap(), 1.0);
}

#[test]
fn reported_learning_rates_follow_step_decay() {
    let (inputs, expected) = xor_data();
    let mut net = xor_network();
    let config = TrainConfig::new(LossType::Mse, 6, LearningRateSchedule::step_decay(1.0, 0.5, 2))
        .with_report_every(1);

    let mut seen = Vec::new();
    let mut record = |s: &EpochStats| seen.push((s.epoch, s.learning_rate));
    train_loop(&mut net, &inputs, &expected, &config, &mut record).unwrap();

    assert_eq!(
        seen,
        vec![(1, 1.0), (2, 1.0), (3, 0.5), (4, 0.5), (5, 0.25), (6, 0.25)]
    );
}

#[test]
fn exponential_decay_at_epoch_ten() {
    let s = LearningRateSchedule::exponential_decay(1.0, 0.1);
    assert_abs_diff_eq!(s.learning_rate(10), (-1.0f64).exp(), epsilon = 1e-12);
    assert_abs_diff_eq!(s.learning_rate(10), 0.3679, epsilon = 1e-4);
}

#[test]
fn softmax_classifier_learns_separable_classes() {
    // Three clusters, one per class, two samples each.
    let inputs = Matrix::from_rows(vec![
        vec![2.0, 1.8, -2.0, -1.8, 0.0, 0.2],
        vec![0.0, 0.2, 0.0, -0.2, 2.0, 1.8],
    ])
    .unwrap();
    let expected = Matrix::from_rows(vec![
        vec![1.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0],
    ])
    .unwrap();

    let mut rng = StdRng::seed_from_u64(3);
    let mut net = Network::new(2, &[3], &[ActivationFunction::Softmax]).unwrap();
    net.initialize(&[WeightInit::Xavier], &mut rng).unwrap();

    let config = TrainConfig::new(LossType::Cce, 300, LearningRateSchedule::fixed(0.5));
    let first = LossType::Cce
        .value(&expected, &net.forward(&inputs).unwrap())
        .unwrap();
    let report = train_loop(&mut net, &inputs, &expected, &config, &mut Silent).unwrap();

    assert!(report.final_loss < first);
    let output = net.forward(&inputs).unwrap();
    assert_eq!(accuracy(&output, &expected).unwrap(), 1.0);
}

#[test]
fn stop_flag_ends_training_before_first_epoch() {
    let (inputs, expected) = xor_data();
    let mut net = xor_network();
    let flag = Arc::new(AtomicBool::new(true));
    let config = TrainConfig::new(LossType::Bce, 50, LearningRateSchedule::fixed(0.1))
        .with_stop_flag(Arc::clone(&flag));

    let before = net.layers()[0].weights().clone();
    let report = train_loop(&mut net, &inputs, &expected, &config, &mut Silent).unwrap();

    assert_eq!(report.epochs_run, 0);
    assert!(report.stopped_early);
    assert_eq!(net.layers()[0].weights(), &before);
}

#[test]
fn stop_flag_set_from_reporter_halts_next_epoch() {
    let (inputs, expected) = xor_data();
    let mut net = xor_network();
    let flag = Arc::new(AtomicBool::new(false));
    let config = TrainConfig::new(LossType::Bce, 100, LearningRateSchedule::fixed(0.1))
        .with_report_every(1)
        .with_stop_flag(Arc::clone(&flag));

    let mut stop_at_five = |s: &EpochStats| {
        if s.epoch == 5 {
            flag.store(true, Ordering::SeqCst);
        }
    };
    let report = train_loop(&mut net, &inputs, &expected, &config, &mut stop_at_five).unwrap();

    assert_eq!(report.epochs_run, 5);
    assert!(report.stopped_early);
}

#[test]
fn channel_reporter_streams_stats_until_receiver_drops() {
    let (inputs, expected) = xor_data();
    let mut net = xor_network();
    let config = TrainConfig::new(LossType::Bce, 20, LearningRateSchedule::fixed(0.1))
        .with_report_every(5);

    let (tx, rx) = mpsc::channel();
    let mut reporter = ChannelReporter(tx);
    let report = train_loop(&mut net, &inputs, &expected, &config, &mut reporter).unwrap();
    drop(reporter);

    let epochs: Vec<usize> = rx.iter().map(|s| s.epoch).collect();
    assert_eq!(epochs, vec![5, 10, 15, 20]);
    assert_eq!(report.epochs_run, 20);

    let (tx, rx) = mpsc::channel();
    drop(rx);
    let report = train_loop(&mut net, &inputs, &expected, &config, &mut ChannelReporter(tx)).unwrap();
    assert_eq!(report.epochs_run, 5);
    assert!(report.stopped_early);
}

#[test]
fn zero_epochs_reports_current_loss() {
    let (inputs, expected) = xor_data();
    let mut net = xor_network();
    let config = TrainConfig::new(LossType::Mse, 0, LearningRateSchedule::fixed(0.1));
    let report = train_loop(&mut net, &inputs, &expected, &config, &mut Silent).unwrap();

    let out = net.forward(&inputs).unwrap();
    assert_eq!(report.epochs_run, 0);
    assert!(!report.stopped_early);
    assert_eq!(report.final_loss, LossType::Mse.value(&expected, &out).unwrap());
}

#[test]
fn mismatched_targets_are_rejected() {
    let (inputs, _) = xor_data();
    let mut net = xor_network();
    let config = TrainConfig::new(LossType::Mse, 1, LearningRateSchedule::fixed(0.1));
    let wrong = Matrix::zeros(1, 3);
    assert!(train_loop(&mut net, &inputs, &wrong, &config, &mut Silent).is_err());
}
