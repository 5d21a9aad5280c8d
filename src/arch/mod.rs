pub mod activations;
pub mod init;
mod network;

pub use network::{Network, SparseInput};
