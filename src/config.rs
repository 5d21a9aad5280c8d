use std::{fs, num::NonZeroUsize, path::Path};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::Result;

/// Learning rate used when none is given.
pub const DEFAULT_LEARNING_RATE: f64 = 0.25;

/// Momentum coefficient used when none is given.
pub const DEFAULT_MOMENTUM: f64 = 0.1;

/// Amount of samples between two progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// The shape, mode and rates of a `Network`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    /// If true the output layer is a plain weighted sum, otherwise it's squashed by a sigmoid.
    #[serde(default)]
    pub regression: bool,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_momentum")]
    pub momentum: f64,
}

impl NetworkConfig {
    /// Creates a new `NetworkConfig` with the default rates.
    ///
    /// # Arguments
    /// * `input_size` - Amount of input variables, without the bias unit.
    /// * `hidden_size` - Amount of hidden units, without the bias unit.
    /// * `output_size` - Amount of output variables.
    /// * `regression` - Whether the output layer skips the sigmoid.
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize, regression: bool) -> Self {
        Self {
            input_size,
            hidden_size,
            output_size,
            regression,
            learning_rate: DEFAULT_LEARNING_RATE,
            momentum: DEFAULT_MOMENTUM,
        }
    }

    /// Overrides the learning rate and the momentum coefficient.
    pub fn with_rates(mut self, learning_rate: f64, momentum: f64) -> Self {
        self.learning_rate = learning_rate;
        self.momentum = momentum;
        self
    }

    /// Reads a `NetworkConfig` from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        from_json_file(path)
    }
}

/// Parameters of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    /// Seed for the shuffling random source, `None` seeds it from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_progress_interval")]
    pub progress_interval: NonZeroUsize,
}

impl TrainConfig {
    /// Creates a new `TrainConfig` with an OS seeded random source.
    pub fn new(epochs: usize) -> Self {
        Self {
            epochs,
            seed: None,
            progress_interval: default_progress_interval(),
        }
    }

    /// Fixes the seed of the shuffling random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Changes how many samples go by between progress reports.
    pub fn with_progress_interval(mut self, progress_interval: NonZeroUsize) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    /// Builds the random source described by this config.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Reads a `TrainConfig` from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        from_json_file(path)
    }
}

/// Reads and deserializes any JSON config file.
pub fn from_json_file<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

fn default_momentum() -> f64 {
    DEFAULT_MOMENTUM
}

fn default_progress_interval() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_PROGRESS_INTERVAL).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_config_fills_in_default_rates() {
        let json = r#"{ "input_size": 2, "hidden_size": 3, "output_size": 1 }"#;
        let config: NetworkConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config, NetworkConfig::new(2, 3, 1, false));
        assert_eq!(config.learning_rate, 0.25);
        assert_eq!(config.momentum, 0.1);
    }

    #[test]
    fn network_config_keeps_explicit_rates() {
        let json = r#"{
            "input_size": 4,
            "hidden_size": 8,
            "output_size": 2,
            "regression": true,
            "learning_rate": 0.05,
            "momentum": 0.5
        }"#;
        let config: NetworkConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config, NetworkConfig::new(4, 8, 2, true).with_rates(0.05, 0.5));
    }

    #[test]
    fn train_config_defaults() {
        let config: TrainConfig = serde_json::from_str(r#"{ "epochs": 10 }"#).unwrap();

        assert_eq!(config.epochs, 10);
        assert_eq!(config.seed, None);
        assert_eq!(config.progress_interval.get(), DEFAULT_PROGRESS_INTERVAL);
    }

    #[test]
    fn seeded_configs_build_equal_rngs() {
        use rand::Rng;

        let config = TrainConfig::new(1).with_seed(3);
        let a: u64 = config.rng().random();
        let b: u64 = config.rng().random();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let err = NetworkConfig::from_json_file("/nonexistent/neuro/config.json").unwrap_err();
        assert!(matches!(err, crate::NetErr::Io(_)));
    }
}
