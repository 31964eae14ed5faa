use std::sync::atomic::Ordering;

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::lr_schedule::update_learning_rate;
use crate::optim::sgd::gradient_descent;
use crate::train::epoch_stats::EpochStats;
use crate::train::reporter::ProgressReporter;
use crate::train::train_config::TrainConfig;

/// Outcome of a [`train_loop`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// Loss of the last completed epoch, or of the untouched network when no
    /// epoch ran.
    pub final_loss: f64,
    pub epochs_run: usize,
    /// True when the stop flag or the reporter ended the run early.
    pub stopped_early: bool,
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// One full-batch gradient step: forward pass, loss derivative,
/// backpropagation, gradient descent. Returns the loss measured by the
/// forward pass (before the update).
pub fn train_step(
    network: &mut Network,
    input: &Matrix,
    expected: &Matrix,
    loss: LossType,
    learning_rate: f64,
) -> Result<f64> {
    let output = network.forward(input)?;
    let loss_value = loss.value(expected, &output)?;
    let loss_derivative = loss.derivative(expected, &output)?;
    network.backpropagate(input, &loss_derivative)?;
    gradient_descent(network, learning_rate)?;
    Ok(loss_value)
}

/// Trains `network` for `config.epochs` full-batch steps.
///
/// `input` is `features x samples` and `expected` is `outputs x samples`; the
/// columns must line up one-to-one. The learning rate for epoch 0 is
/// `schedule.learning_rate(0)`, and after each completed epoch the schedule
/// is queried for the next one.
///
/// # Early termination
/// The loop stops before starting the next epoch if:
/// - `config.stop_flag` is set to `true`, **or**
/// - the reporter returns `false` (e.g. a dropped channel receiver).
pub fn train_loop<P: ProgressReporter + ?Sized>(
    network: &mut Network,
    input: &Matrix,
    expected: &Matrix,
    config: &TrainConfig,
    reporter: &mut P,
) -> Result<TrainReport> {
    input.ensure_non_empty("train_loop")?;
    expected.ensure_non_empty("train_loop")?;
    if input.cols() != expected.cols() {
        return Err(Error::mismatch("train_loop", input.shape(), expected.shape()));
    }
    if expected.rows() != network.output_size() {
        return Err(Error::mismatch(
            "train_loop",
            (network.output_size(), input.cols()),
            expected.shape(),
        ));
    }
    config.schedule.validate()?;

    debug!(
        "training for {} epochs on {} samples with {:?}",
        config.epochs,
        input.cols(),
        config.loss
    );

    let mut learning_rate = update_learning_rate(0, &config.schedule);
    let mut last_loss = None;
    let mut epochs_run = 0;
    let mut stopped_early = false;

    for epoch in 0..config.epochs {
        if stop_requested(config) {
            stopped_early = true;
            break;
        }

        let loss = train_step(network, input, expected, config.loss, learning_rate)?;
        if !loss.is_finite() && last_loss.map_or(true, f64::is_finite) {
            warn!(
                "loss became {loss} at epoch {}; learning rate {learning_rate} may be too high",
                epoch + 1
            );
        }
        last_loss = Some(loss);
        epochs_run = epoch + 1;

        let stats = EpochStats {
            epoch: epochs_run,
            total_epochs: config.epochs,
            loss,
            learning_rate,
        };
        learning_rate = update_learning_rate(epoch + 1, &config.schedule);

        if should_report(config, epochs_run) && !reporter.report(&stats) {
            stopped_early = epochs_run < config.epochs;
            break;
        }
    }

    let final_loss = match last_loss {
        Some(loss) => loss,
        None => evaluate_loss(network, input, expected, config.loss)?,
    };

    if stopped_early {
        info!("training stopped after {epochs_run}/{} epochs", config.epochs);
    }

    Ok(TrainReport {
        final_loss,
        epochs_run,
        stopped_early,
    })
}

/// Loss of the current network on a dataset, without touching gradients.
pub fn evaluate_loss(
    network: &mut Network,
    input: &Matrix,
    expected: &Matrix,
    loss: LossType,
) -> Result<f64> {
    let output = network.forward(input)?;
    loss.value(expected, &output)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

fn should_report(config: &TrainConfig, completed: usize) -> bool {
    config.report_every > 0 && (completed % config.report_every == 0 || completed == config.epochs)
}
