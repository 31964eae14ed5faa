pub mod accuracy;

pub use accuracy::{accuracy, one_hot_argmax};
