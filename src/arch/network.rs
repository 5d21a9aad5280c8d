use std::collections::BTreeMap;

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip, s};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    activations::{dsigmoid, sigmoid},
    init,
};
use crate::{NetErr, Result, config::NetworkConfig};

/// A sparse input sample, maps an input index to its value.
///
/// Indices are visited in ascending order, so a map listing every index adds up the weighted
/// sums in the same order a dense sample does.
pub type SparseInput = BTreeMap<usize, f64>;

/// A feed-forward network with a single hidden layer, trained one sample at a time through
/// backpropagation with momentum.
///
/// The input and hidden layers carry an extra trailing unit fixed at `1.0` (the bias unit), the
/// weights attached to it act as each downstream unit's offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    input_layer: Array1<f64>,
    hidden_layer: Array1<f64>,
    output_layer: Array1<f64>,

    // (hidden_size, input_size + 1), the hidden bias unit has no incoming weights
    weight_hidden: Array2<f64>,
    // (output_size, hidden_size + 1)
    weight_output: Array2<f64>,

    // Momentum history, the change applied to each weight on the last update
    last_change_hidden: Array2<f64>,
    last_change_output: Array2<f64>,

    // Per sample error signals
    err_output: Array1<f64>,
    err_hidden: Array1<f64>,

    regression: bool,
    learning_rate: f64,
    momentum: f64,
}

impl Network {
    /// Creates a new `Network` with weights sampled uniformly from `[-1, 1]` and no momentum.
    ///
    /// # Arguments
    /// * `config` - The sizes, output mode and rates of the network.
    /// * `rng` - The random source the initial weights are sampled from.
    ///
    /// # Returns
    /// A new `Network` or an error if the weights couldn't be sampled.
    pub fn new<R>(config: NetworkConfig, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let NetworkConfig {
            input_size,
            hidden_size,
            output_size,
            regression,
            learning_rate,
            momentum,
        } = config;

        let weight_hidden = init::uniform((hidden_size, input_size + 1), -1., 1., rng)?;
        let weight_output = init::uniform((output_size, hidden_size + 1), -1., 1., rng)?;

        let mut input_layer = Array1::zeros(input_size + 1);
        input_layer[input_size] = 1.;
        let mut hidden_layer = Array1::zeros(hidden_size + 1);
        hidden_layer[hidden_size] = 1.;

        debug!(
            "created network: input={input_size} hidden={hidden_size} output={output_size} \
             regression={regression} learning_rate={learning_rate} momentum={momentum}"
        );

        Ok(Self {
            input_layer,
            hidden_layer,
            output_layer: Array1::zeros(output_size),
            last_change_hidden: init::zeros_like(&weight_hidden),
            last_change_output: init::zeros_like(&weight_output),
            weight_hidden,
            weight_output,
            err_output: Array1::zeros(output_size),
            err_hidden: Array1::zeros(hidden_size),
            regression,
            learning_rate,
            momentum,
        })
    }

    /// Creates a new `Network` with the default learning rate (`0.25`) and momentum (`0.1`).
    pub fn with_default_rates<R>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        regression: bool,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let config = NetworkConfig::new(input_size, hidden_size, output_size, regression);
        Self::new(config, rng)
    }

    /// Amount of input variables, without the bias unit.
    pub fn input_size(&self) -> usize {
        self.input_layer.len() - 1
    }

    /// Amount of hidden units, without the bias unit.
    pub fn hidden_size(&self) -> usize {
        self.hidden_layer.len() - 1
    }

    pub fn output_size(&self) -> usize {
        self.output_layer.len()
    }

    pub fn is_regression(&self) -> bool {
        self.regression
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// Rebuilds the config this network was created with.
    pub fn config(&self) -> NetworkConfig {
        NetworkConfig::new(
            self.input_size(),
            self.hidden_size(),
            self.output_size(),
            self.regression,
        )
        .with_rates(self.learning_rate, self.momentum)
    }

    pub fn input_layer(&self) -> ArrayView1<'_, f64> {
        self.input_layer.view()
    }

    pub fn hidden_layer(&self) -> ArrayView1<'_, f64> {
        self.hidden_layer.view()
    }

    pub fn output_layer(&self) -> ArrayView1<'_, f64> {
        self.output_layer.view()
    }

    pub fn weight_hidden(&self) -> ArrayView2<'_, f64> {
        self.weight_hidden.view()
    }

    pub fn weight_output(&self) -> ArrayView2<'_, f64> {
        self.weight_output.view()
    }

    pub fn last_change_hidden(&self) -> ArrayView2<'_, f64> {
        self.last_change_hidden.view()
    }

    pub fn last_change_output(&self) -> ArrayView2<'_, f64> {
        self.last_change_output.view()
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `input` - The input values, one per input variable.
    ///
    /// # Returns
    /// A view of the output layer, which gets overwritten by the next forward pass, or an
    /// error if the input has the wrong length.
    pub fn forward(&mut self, input: &[f64]) -> Result<ArrayView1<'_, f64>> {
        self.check_input(input)?;

        let bias = self.input_size();
        self.input_layer
            .slice_mut(s![..bias])
            .assign(&ArrayView1::from(input));
        self.input_layer[bias] = 1.;

        self.propagate(0..=bias);
        Ok(self.output_layer.view())
    }

    /// Makes a forward pass through the network reading only the listed inputs.
    ///
    /// The listed values are written over the input layer, unlisted slots keep whatever the
    /// previous passes left there. Those leftovers never reach the hidden sums though, since only
    /// the listed columns are added up. Listing the bias index (`input_size`) brings its weight
    /// column into the sum, its value is still forced to `1.0`.
    ///
    /// # Returns
    /// A view of the output layer or an error if an index is past the bias unit.
    pub fn forward_sparse(&mut self, input: &SparseInput) -> Result<ArrayView1<'_, f64>> {
        self.check_sparse_input(input)?;

        for (&j, &x) in input {
            self.input_layer[j] = x;
        }

        let bias = self.input_size();
        self.input_layer[bias] = 1.;

        self.propagate(input.keys().copied());
        Ok(self.output_layer.view())
    }

    /// Backpropagates the error of the last forward pass and updates every weight.
    ///
    /// # Arguments
    /// * `target` - The expected output for the last forwarded input.
    ///
    /// # Returns
    /// An error if the target has the wrong length, in which case nothing is modified.
    pub fn backward(&mut self, target: &[f64]) -> Result<()> {
        self.check_target(target)?;

        let columns = 0..self.input_layer.len();
        self.backpropagate(target, columns);
        Ok(())
    }

    /// Backpropagates the error of the last sparse forward pass.
    ///
    /// Only the hidden weight columns listed in `input` are updated.
    ///
    /// # Arguments
    /// * `target` - The expected output for the last forwarded input.
    /// * `input` - The sparse sample that was forwarded.
    pub fn backward_sparse(&mut self, target: &[f64], input: &SparseInput) -> Result<()> {
        self.check_target(target)?;
        self.check_sparse_input(input)?;

        self.backpropagate(target, input.keys().copied());
        Ok(())
    }

    /// Computes the squared error of the current output layer against `target`, halved.
    pub fn calc_error(&self, target: &[f64]) -> Result<f64> {
        self.check_target(target)?;

        let err = self
            .output_layer
            .iter()
            .zip(target)
            .map(|(y, t)| {
                let e = y - t;
                0.5 * e * e
            })
            .sum();

        Ok(err)
    }

    fn propagate<I>(&mut self, columns: I)
    where
        I: Iterator<Item = usize> + Clone,
    {
        let hidden_size = self.hidden_size();

        for i in 0..hidden_size {
            let weights = self.weight_hidden.row(i);
            let sum = columns
                .clone()
                .fold(0., |acc, j| acc + self.input_layer[j] * weights[j]);

            self.hidden_layer[i] = sigmoid(sum);
        }

        self.hidden_layer[hidden_size] = 1.;

        for (y, weights) in self.output_layer.iter_mut().zip(self.weight_output.rows()) {
            let sum = self
                .hidden_layer
                .iter()
                .zip(weights)
                .fold(0., |acc, (h, w)| acc + h * w);

            *y = if self.regression { sum } else { sigmoid(sum) };
        }
    }

    fn backpropagate<I>(&mut self, target: &[f64], columns: I)
    where
        I: Iterator<Item = usize> + Clone,
    {
        let (lr, mu) = (self.learning_rate, self.momentum);
        let regression = self.regression;
        let output_slope = |y: f64| if regression { 1. } else { dsigmoid(y) };
        let hidden_size = self.hidden_size();
        let output_size = self.output_size();

        Zip::from(&mut self.err_output)
            .and(&self.output_layer)
            .and(&ArrayView1::from(target))
            .for_each(|e, &y, &t| *e = y - t);

        // Uses the output weights as they were before this update.
        for i in 0..hidden_size {
            self.err_hidden[i] = (0..output_size).fold(0., |acc, j| {
                acc + self.err_output[j]
                    * self.weight_output[[j, i]]
                    * output_slope(self.output_layer[j])
            });
        }

        let output_rows = self
            .weight_output
            .rows_mut()
            .into_iter()
            .zip(self.last_change_output.rows_mut());

        for (i, (weights, changes)) in output_rows.enumerate() {
            let delta = self.err_output[i] * output_slope(self.output_layer[i]);

            Zip::from(weights)
                .and(changes)
                .and(&self.hidden_layer)
                .for_each(|w, c, &h| {
                    let change = lr * delta * h + mu * *c;
                    *w -= change;
                    *c = change;
                });
        }

        // The hidden slope applies in regression mode too.
        for i in 0..hidden_size {
            let delta = self.err_hidden[i] * dsigmoid(self.hidden_layer[i]);

            for j in columns.clone() {
                let change =
                    lr * delta * self.input_layer[j] + mu * self.last_change_hidden[[i, j]];
                self.weight_hidden[[i, j]] -= change;
                self.last_change_hidden[[i, j]] = change;
            }
        }
    }

    pub(crate) fn check_input(&self, input: &[f64]) -> Result<()> {
        let expected = self.input_size();

        if input.len() != expected {
            return Err(NetErr::InputSizeMismatch {
                got: input.len(),
                expected,
            });
        }

        Ok(())
    }

    pub(crate) fn check_sparse_input(&self, input: &SparseInput) -> Result<()> {
        let input_size = self.input_size();

        match input.last_key_value() {
            Some((&index, _)) if index > input_size => {
                Err(NetErr::SparseIndexOutOfRange { index, input_size })
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn check_target(&self, target: &[f64]) -> Result<()> {
        let expected = self.output_size();

        if target.len() != expected {
            return Err(NetErr::OutputSizeMismatch {
                got: target.len(),
                expected,
            });
        }

        Ok(())
    }

    /// Validates that every stored value is finite, the first offending field is named in the
    /// error.
    pub(crate) fn check_finite(&self) -> Result<()> {
        let rates = [
            ("learning_rate", self.learning_rate),
            ("momentum", self.momentum),
        ];

        for (name, rate) in rates {
            if !rate.is_finite() {
                return Err(NetErr::NonFiniteState(format!("{name} is {rate}")));
            }
        }

        let vectors = [
            ("input_layer", &self.input_layer),
            ("hidden_layer", &self.hidden_layer),
            ("output_layer", &self.output_layer),
            ("err_output", &self.err_output),
            ("err_hidden", &self.err_hidden),
        ];

        for (name, values) in vectors {
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(NetErr::NonFiniteState(format!(
                    "{name}[{i}] is {}",
                    values[i]
                )));
            }
        }

        let matrices = [
            ("weight_hidden", &self.weight_hidden),
            ("weight_output", &self.weight_output),
            ("last_change_hidden", &self.last_change_hidden),
            ("last_change_output", &self.last_change_output),
        ];

        for (name, values) in matrices {
            if let Some((idx, v)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
                return Err(NetErr::NonFiniteState(format!("{name}{idx:?} is {v}")));
            }
        }

        Ok(())
    }

    /// Validates that the layers, buffers and matrices fit together, used on freshly decoded
    /// networks.
    pub(crate) fn check_shapes(&self) -> Result<()> {
        let inputs = self.input_layer.len();
        let hidden = self.hidden_layer.len();
        let outputs = self.output_layer.len();

        if inputs == 0 || hidden == 0 {
            return Err(NetErr::CorruptSnapshot(
                "the input and hidden layers must hold at least the bias unit".into(),
            ));
        }

        let matrices = [
            ("weight_hidden", self.weight_hidden.dim(), (hidden - 1, inputs)),
            ("last_change_hidden", self.last_change_hidden.dim(), (hidden - 1, inputs)),
            ("weight_output", self.weight_output.dim(), (outputs, hidden)),
            ("last_change_output", self.last_change_output.dim(), (outputs, hidden)),
        ];

        for (name, got, expected) in matrices {
            if got != expected {
                return Err(NetErr::CorruptSnapshot(format!(
                    "{name} has shape {got:?}, expected {expected:?}"
                )));
            }
        }

        let buffers = [
            ("err_output", self.err_output.len(), outputs),
            ("err_hidden", self.err_hidden.len(), hidden - 1),
        ];

        for (name, got, expected) in buffers {
            if got != expected {
                return Err(NetErr::CorruptSnapshot(format!(
                    "{name} has length {got}, expected {expected}"
                )));
            }
        }

        Ok(())
    }
}
