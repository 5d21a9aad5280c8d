//! A feed-forward neural network with a single hidden layer, trained by per sample
//! backpropagation with momentum over dense or sparse inputs.

pub mod arch;
pub mod config;
pub mod error;
mod persistence;
pub mod training;

pub use arch::{Network, SparseInput};
pub use config::{NetworkConfig, TrainConfig};
pub use error::{NetErr, Result};
pub use persistence::SNAPSHOT_VERSION;
pub use training::{LogObserver, TrainObserver, Trainer};
