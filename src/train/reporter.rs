use std::sync::mpsc;

use log::info;

use crate::train::epoch_stats::EpochStats;

/// Receives progress from [`train_loop`](super::train_loop).
///
/// Returning `false` asks the loop to stop before the next epoch.
pub trait ProgressReporter {
    fn report(&mut self, stats: &EpochStats) -> bool;
}

impl<F> ProgressReporter for F
where
    F: FnMut(&EpochStats),
{
    fn report(&mut self, stats: &EpochStats) -> bool {
        self(stats);
        true
    }
}

/// Forwards stats over a channel. A dropped receiver stops training.
pub struct ChannelReporter(pub mpsc::Sender<EpochStats>);

impl ProgressReporter for ChannelReporter {
    fn report(&mut self, stats: &EpochStats) -> bool {
        self.0.send(stats.clone()).is_ok()
    }
}

/// Writes one `info!` line per report.
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&mut self, stats: &EpochStats) -> bool {
        info!(
            "epoch {}/{}: loss = {:.6}, lr = {:.6}",
            stats.epoch, stats.total_epochs, stats.loss, stats.learning_rate
        );
        true
    }
}

/// Discards every report.
pub struct Silent;

impl ProgressReporter for Silent {
    fn report(&mut self, _stats: &EpochStats) -> bool {
        true
    }
}
