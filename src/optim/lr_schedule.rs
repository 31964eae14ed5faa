use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the learning rate evolves with the epoch index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleKind {
    /// Constant `base_lr`.
    Fixed,
    /// `base_lr · decay_factor^⌊epoch / step_size⌋`
    StepDecay { decay_factor: f64, step_size: usize },
    /// `base_lr · e^(-decay_rate · epoch)`
    ExponentialDecay { decay_rate: f64 },
}

/// Learning-rate schedule: a pure function of the epoch index.
///
/// Holds no state between calls, so the same epoch always yields the same rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningRateSchedule {
    pub base_lr: f64,
    pub kind: ScheduleKind,
}

impl LearningRateSchedule {
    pub fn fixed(base_lr: f64) -> Self {
        LearningRateSchedule { base_lr, kind: ScheduleKind::Fixed }
    }

    pub fn step_decay(base_lr: f64, decay_factor: f64, step_size: usize) -> Self {
        LearningRateSchedule {
            base_lr,
            kind: ScheduleKind::StepDecay { decay_factor, step_size },
        }
    }

    pub fn exponential_decay(base_lr: f64, decay_rate: f64) -> Self {
        LearningRateSchedule {
            base_lr,
            kind: ScheduleKind::ExponentialDecay { decay_rate },
        }
    }

    /// Rejects non-finite or non-positive base rates and a zero step size.
    pub fn validate(&self) -> Result<()> {
        if !self.base_lr.is_finite() || self.base_lr <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "learning_rate must be positive, got {}",
                self.base_lr
            )));
        }
        match self.kind {
            ScheduleKind::StepDecay { step_size: 0, .. } => Err(Error::InvalidConfiguration(
                "step_size must be at least 1".into(),
            )),
            ScheduleKind::StepDecay { decay_factor, .. } if !decay_factor.is_finite() => Err(
                Error::InvalidConfiguration(format!("decay_factor must be finite, got {decay_factor}")),
            ),
            ScheduleKind::ExponentialDecay { decay_rate } if !decay_rate.is_finite() => Err(
                Error::InvalidConfiguration(format!("decay_rate must be finite, got {decay_rate}")),
            ),
            _ => Ok(()),
        }
    }

    /// Learning rate to use for `epoch` (0-based).
    pub fn learning_rate(&self, epoch: usize) -> f64 {
        match self.kind {
            ScheduleKind::Fixed => self.base_lr,
            // A zero step size never decays; validate() rejects it up front.
            ScheduleKind::StepDecay { step_size: 0, .. } => self.base_lr,
            ScheduleKind::StepDecay { decay_factor, step_size } => {
                let steps = (epoch / step_size) as i32;
                self.base_lr * decay_factor.powi(steps)
            }
            ScheduleKind::ExponentialDecay { decay_rate } => {
                self.base_lr * (-decay_rate * epoch as f64).exp()
            }
        }
    }
}

/// Free-function form of [`LearningRateSchedule::learning_rate`].
pub fn update_learning_rate(epoch: usize, schedule: &LearningRateSchedule) -> f64 {
    schedule.learning_rate(epoch)
}
