pub mod error;
mod config;
pub mod math;
pub mod activation;
pub mod loss;
pub mod init;
pub mod layers;
pub mod network;
pub mod optim;
pub mod train;
pub mod eval;
pub mod data;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use loss::loss_type::LossType;
pub use init::weight_init::WeightInit;
pub use layers::dense::Layer;
pub use network::network::Network;
pub use network::spec::{LayerSpec, NetworkSpec};
pub use optim::lr_schedule::{LearningRateSchedule, ScheduleKind};
pub use optim::sgd::{gradient_descent, Sgd};
pub use train::loop_fn::{train_loop, train_step, TrainReport};
pub use train::train_config::TrainConfig;
pub use eval::accuracy::accuracy;
pub use data::dataset::Dataset;
