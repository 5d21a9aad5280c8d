use std::{env, process};

use anyhow::Context;
use log::info;
use neuro::{LogObserver, Network, NetworkConfig, TrainConfig, Trainer, config};
use rand::rngs::StdRng;
use serde::Deserialize;

/// A training run read from JSON, every section falls back to the XOR problem.
#[derive(Debug, Deserialize)]
struct RunConfig {
    #[serde(default = "xor_network")]
    network: NetworkConfig,
    #[serde(default = "xor_training")]
    training: TrainConfig,
    #[serde(default = "xor_inputs")]
    inputs: Vec<Vec<f64>>,
    #[serde(default = "xor_targets")]
    targets: Vec<Vec<f64>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            network: xor_network(),
            training: xor_training(),
            inputs: xor_inputs(),
            targets: xor_targets(),
        }
    }
}

fn xor_network() -> NetworkConfig {
    NetworkConfig::new(2, 4, 1, false)
}

fn xor_training() -> TrainConfig {
    TrainConfig::new(5000)
}

fn xor_inputs() -> Vec<Vec<f64>> {
    vec![vec![0., 0.], vec![0., 1.], vec![1., 0.], vec![1., 1.]]
}

fn xor_targets() -> Vec<Vec<f64>> {
    vec![vec![0.], vec![1.], vec![1.], vec![0.]]
}

/// Builds the network and its trainer from a single random stream, the trainer keeps shuffling
/// where the weight initialization stopped.
fn setup(run_config: &RunConfig) -> neuro::Result<(Network, Trainer<StdRng, LogObserver>)> {
    let mut rng = run_config.training.rng();
    let net = Network::new(run_config.network, &mut rng)?;
    let trainer = Trainer::new(&run_config.training, rng, LogObserver);

    Ok((net, trainer))
}

fn run(config_path: Option<&str>, output_path: Option<&str>) -> anyhow::Result<()> {
    let run_config: RunConfig = match config_path {
        Some(path) => config::from_json_file(path)
            .with_context(|| format!("cannot read run config '{path}'"))?,
        None => RunConfig::default(),
    };

    let (mut net, mut trainer) = setup(&run_config)?;
    let history = trainer.train(&mut net, &run_config.inputs, &run_config.targets)?;

    if let Some(mse) = history.last() {
        info!("final mse: {mse:.5}");
    }

    for (x, t) in run_config.inputs.iter().zip(&run_config.targets) {
        let y = net.forward(x)?;
        info!("{x:?} -> {y} (expected {t:?})");
    }

    if let Some(path) = output_path {
        net.save_to_path(path)
            .with_context(|| format!("cannot save network to '{path}'"))?;
        info!("network saved to {path}");
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() > 3 {
        eprintln!("Usage: {} [run_config.json] [output.json]", args[0]);
        process::exit(1);
    }

    let config_path = args.get(1).map(String::as_str);
    let output_path = args.get(2).map(String::as_str);

    if let Err(e) = run(config_path, output_path) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_xor(seed: u64) -> RunConfig {
        RunConfig {
            training: TrainConfig::new(50).with_seed(seed),
            ..RunConfig::default()
        }
    }

    #[test]
    fn trainer_continues_the_initialization_stream() {
        let run_config = seeded_xor(11);

        let (mut net, trainer) = setup(&run_config).unwrap();
        let history = trainer
            .with_observer(())
            .train(&mut net, &run_config.inputs, &run_config.targets)
            .unwrap();

        let mut rng = run_config.training.rng();
        let mut expected_net = Network::new(run_config.network, &mut rng).unwrap();
        let expected = Trainer::new(&run_config.training, rng, ())
            .train(&mut expected_net, &run_config.inputs, &run_config.targets)
            .unwrap();

        assert_eq!(history, expected);
        assert_eq!(net, expected_net);
    }

    #[test]
    fn shuffling_does_not_replay_the_initialization_stream() {
        let run_config = seeded_xor(11);

        let (mut net, trainer) = setup(&run_config).unwrap();
        let mut replayed_net = net.clone();

        let history = trainer
            .with_observer(())
            .train(&mut net, &run_config.inputs, &run_config.targets)
            .unwrap();
        let replayed = Trainer::new(&run_config.training, run_config.training.rng(), ())
            .train(&mut replayed_net, &run_config.inputs, &run_config.targets)
            .unwrap();

        assert_ne!(history, replayed);
    }
}
