use serde::{Deserialize, Serialize};

/// Per-epoch training statistics handed to a [`ProgressReporter`](super::ProgressReporter).
///
/// Reporting is purely observational; nothing here feeds back into training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number (number of completed epochs).
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Full-batch loss measured by this epoch's forward pass, i.e. before its update.
    pub loss: f64,
    /// Learning rate that was applied during this epoch.
    pub learning_rate: f64,
}
