pub mod lr_schedule;
pub mod sgd;

pub use lr_schedule::{update_learning_rate, LearningRateSchedule, ScheduleKind};
pub use sgd::{gradient_descent, Sgd};
