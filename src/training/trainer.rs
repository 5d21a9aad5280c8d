use std::num::NonZeroUsize;

use log::debug;
use rand::{Rng, rngs::StdRng};

use super::{LogObserver, TrainObserver, shuffled_indices};
use crate::{
    NetErr, Result,
    arch::{Network, SparseInput},
    config::TrainConfig,
};

/// Drives a `Network` through epochs of per sample backpropagation.
///
/// The samples are visited in a new random order every epoch, drawn from the trainer's own
/// random source.
pub struct Trainer<R, O>
where
    R: Rng,
    O: TrainObserver,
{
    epochs: usize,
    progress_interval: NonZeroUsize,
    rng: R,
    observer: O,
}

impl Trainer<StdRng, LogObserver> {
    /// Creates a new `Trainer` from a config, reporting through the `log` facade.
    pub fn from_config(config: &TrainConfig) -> Self {
        Self::new(config, config.rng(), LogObserver)
    }
}

impl<R, O> Trainer<R, O>
where
    R: Rng,
    O: TrainObserver,
{
    /// Creates a new `Trainer`.
    ///
    /// # Arguments
    /// * `config` - The amount of epochs and the progress interval, its seed is ignored.
    /// * `rng` - The random source used for shuffling the samples.
    /// * `observer` - Receives the progress and the mse of each epoch.
    pub fn new(config: &TrainConfig, rng: R, observer: O) -> Self {
        Self {
            epochs: config.epochs,
            progress_interval: config.progress_interval,
            rng,
            observer,
        }
    }

    /// Swaps the observer of this trainer.
    pub fn with_observer<P: TrainObserver>(self, observer: P) -> Trainer<R, P> {
        Trainer {
            epochs: self.epochs,
            progress_interval: self.progress_interval,
            rng: self.rng,
            observer,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Trains `net` over dense samples.
    ///
    /// Every sample and target is validated before the first update, so a malformed dataset
    /// leaves the network untouched.
    ///
    /// # Arguments
    /// * `net` - The network to train.
    /// * `inputs` - The input samples.
    /// * `targets` - The expected output for each sample.
    ///
    /// # Returns
    /// The mse of every epoch.
    pub fn train<X, Y>(&mut self, net: &mut Network, inputs: &[X], targets: &[Y]) -> Result<Vec<f64>>
    where
        X: AsRef<[f64]>,
        Y: AsRef<[f64]>,
    {
        check_counts(inputs.len(), targets.len())?;

        for (x, y) in inputs.iter().zip(targets) {
            net.check_input(x.as_ref())?;
            net.check_target(y.as_ref())?;
        }

        self.run(net, inputs.len(), |net, k| {
            let target = targets[k].as_ref();
            net.forward(inputs[k].as_ref())?;
            net.backward(target)?;
            net.calc_error(target)
        })
    }

    /// Trains `net` over sparse samples.
    ///
    /// # Returns
    /// The mse of every epoch.
    pub fn train_sparse<Y>(
        &mut self,
        net: &mut Network,
        inputs: &[SparseInput],
        targets: &[Y],
    ) -> Result<Vec<f64>>
    where
        Y: AsRef<[f64]>,
    {
        check_counts(inputs.len(), targets.len())?;

        for (x, y) in inputs.iter().zip(targets) {
            net.check_sparse_input(x)?;
            net.check_target(y.as_ref())?;
        }

        self.run(net, inputs.len(), |net, k| {
            let target = targets[k].as_ref();
            net.forward_sparse(&inputs[k])?;
            net.backward_sparse(target, &inputs[k])?;
            net.calc_error(target)
        })
    }

    fn run<F>(&mut self, net: &mut Network, len: usize, mut step: F) -> Result<Vec<f64>>
    where
        F: FnMut(&mut Network, usize) -> Result<f64>,
    {
        debug!("training on {len} samples for {} epochs", self.epochs);

        let interval = self.progress_interval.get();
        let mut history = Vec::with_capacity(self.epochs);

        for epoch in 0..self.epochs {
            let order = shuffled_indices(len, &mut self.rng);
            let mut total_err = 0.;

            for (i, &k) in order.iter().enumerate() {
                total_err += step(net, k)?;

                if (i + 1) % interval == 0 {
                    self.observer.on_progress(epoch, i + 1, len);
                }
            }

            let mse = total_err / len as f64;
            self.observer.on_epoch(epoch, self.epochs, mse);
            history.push(mse);
        }

        self.observer.on_done(&history);
        Ok(history)
    }
}

fn check_counts(inputs: usize, targets: usize) -> Result<()> {
    if inputs != targets {
        return Err(NetErr::SampleCountMismatch { inputs, targets });
    }

    if inputs == 0 {
        return Err(NetErr::EmptyDataset);
    }

    Ok(())
}

impl Network {
    /// Trains this network over dense samples with an OS seeded shuffle, logging its progress.
    ///
    /// # Returns
    /// The mse of every epoch.
    pub fn train<X, Y>(&mut self, inputs: &[X], targets: &[Y], epochs: usize) -> Result<Vec<f64>>
    where
        X: AsRef<[f64]>,
        Y: AsRef<[f64]>,
    {
        Trainer::from_config(&TrainConfig::new(epochs)).train(self, inputs, targets)
    }

    /// Trains this network over sparse samples with an OS seeded shuffle, logging its progress.
    ///
    /// # Returns
    /// The mse of every epoch.
    pub fn train_sparse<Y>(
        &mut self,
        inputs: &[SparseInput],
        targets: &[Y],
        epochs: usize,
    ) -> Result<Vec<f64>>
    where
        Y: AsRef<[f64]>,
    {
        Trainer::from_config(&TrainConfig::new(epochs)).train_sparse(self, inputs, targets)
    }
}
