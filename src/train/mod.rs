pub mod epoch_stats;
pub mod loop_fn;
pub mod reporter;
pub mod train_config;

pub use epoch_stats::EpochStats;
pub use loop_fn::{evaluate_loss, train_loop, train_step, TrainReport};
pub use reporter::{ChannelReporter, LogReporter, ProgressReporter, Silent};
pub use train_config::TrainConfig;
