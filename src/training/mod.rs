mod observer;
mod shuffle;
mod trainer;

pub use observer::{LogObserver, TrainObserver, reports_epoch};
pub use shuffle::shuffled_indices;
pub use trainer::Trainer;
