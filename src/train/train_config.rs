use std::path::Path;
use std::sync::{atomic::AtomicBool, Arc};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{Error, Result};
use crate::loss::loss_type::LossType;
use crate::optim::lr_schedule::{LearningRateSchedule, ScheduleKind};

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `loss`: loss function whose derivative drives backpropagation
/// - `epochs`: number of full-batch gradient steps
/// - `schedule`: learning rate per epoch
/// - `report_every`: report progress every N epochs (0 = never); the final
///   epoch is always reported when N > 0
/// - `seed`: optional RNG seed for weight initialization
/// - `stop_flag`: optional atomic flag; when set to `true` from another
///   thread the loop terminates before the next epoch
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub loss: LossType,
    pub epochs: usize,
    pub schedule: LearningRateSchedule,
    pub report_every: usize,
    pub seed: Option<u64>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no reporting and no stop flag.
    pub fn new(loss: LossType, epochs: usize, schedule: LearningRateSchedule) -> Self {
        TrainConfig {
            loss,
            epochs,
            schedule,
            report_every: 0,
            seed: None,
            stop_flag: None,
        }
    }

    pub fn with_report_every(mut self, report_every: usize) -> Self {
        self.report_every = report_every;
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    /// Parses a training config document.
    pub fn from_json_str(text: &str) -> Result<TrainConfig> {
        let file: TrainConfigFile = config::parse_json(text)?;
        TrainConfig::try_from(file)
    }

    /// Loads a training config file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<TrainConfig> {
        let file: TrainConfigFile = config::load_json(path.as_ref())?;
        TrainConfig::try_from(file)
    }

    /// Writes the config in the same flat layout `load_json` reads.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        config::save_json(&TrainConfigFile::from(self), path.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum ScheduleName {
    #[serde(rename = "FIXED", alias = "fixed")]
    Fixed,
    #[serde(rename = "STEP_DECAY", alias = "step_decay")]
    StepDecay,
    #[serde(rename = "EXP_DECAY", alias = "exp_decay", alias = "EXPONENTIAL_DECAY")]
    ExpDecay,
}

/// On-disk layout: schedule parameters sit next to the schedule name.
#[derive(Debug, Serialize, Deserialize)]
struct TrainConfigFile {
    loss: LossType,
    num_epoch: usize,
    learning_rate: f64,
    lr_schedule: ScheduleName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decay_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    step_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decay_rate: Option<f64>,
    #[serde(default)]
    report_every: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

fn required<T>(value: Option<T>, name: &str, schedule: &str) -> Result<T> {
    value.ok_or_else(|| Error::InvalidConfiguration(format!("{schedule} requires \"{name}\"")))
}

impl TryFrom<TrainConfigFile> for TrainConfig {
    type Error = Error;

    fn try_from(file: TrainConfigFile) -> Result<TrainConfig> {
        let kind = match file.lr_schedule {
            ScheduleName::Fixed => ScheduleKind::Fixed,
            ScheduleName::StepDecay => ScheduleKind::StepDecay {
                decay_factor: required(file.decay_factor, "decay_factor", "STEP_DECAY")?,
                step_size: required(file.step_size, "step_size", "STEP_DECAY")?,
            },
            ScheduleName::ExpDecay => ScheduleKind::ExponentialDecay {
                decay_rate: required(file.decay_rate, "decay_rate", "EXP_DECAY")?,
            },
        };
        let schedule = LearningRateSchedule { base_lr: file.learning_rate, kind };
        schedule.validate()?;

        Ok(TrainConfig {
            loss: file.loss,
            epochs: file.num_epoch,
            schedule,
            report_every: file.report_every,
            seed: file.seed,
            stop_flag: None,
        })
    }
}

impl From<&TrainConfig> for TrainConfigFile {
    fn from(config: &TrainConfig) -> Self {
        let mut file = TrainConfigFile {
            loss: config.loss,
            num_epoch: config.epochs,
            learning_rate: config.schedule.base_lr,
            lr_schedule: ScheduleName::Fixed,
            decay_factor: None,
            step_size: None,
            decay_rate: None,
            report_every: config.report_every,
            seed: config.seed,
        };
        match config.schedule.kind {
            ScheduleKind::Fixed => {}
            ScheduleKind::StepDecay { decay_factor, step_size } => {
                file.lr_schedule = ScheduleName::StepDecay;
                file.decay_factor = Some(decay_factor);
                file.step_size = Some(step_size);
            }
            ScheduleKind::ExponentialDecay { decay_rate } => {
                file.lr_schedule = ScheduleName::ExpDecay;
                file.decay_rate = Some(decay_rate);
            }
        }
        file
    }
}
