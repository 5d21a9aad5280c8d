mod sigmoid;

pub use sigmoid::{dsigmoid, sigmoid};
