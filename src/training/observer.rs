use log::{debug, info};

/// Receives the progress of a training run.
///
/// Every method has an empty default, so implementors only pick what they care about. `()` is
/// the silent observer.
pub trait TrainObserver {
    /// Called every `progress_interval` samples inside an epoch.
    ///
    /// # Arguments
    /// * `epoch` - The zero based epoch being run.
    /// * `processed` - Samples processed so far in this epoch.
    /// * `total` - Samples in the dataset.
    fn on_progress(&mut self, _epoch: usize, _processed: usize, _total: usize) {}

    /// Called once an epoch ends.
    ///
    /// # Arguments
    /// * `epoch` - The zero based epoch that just ended.
    /// * `epochs` - The total amount of epochs of the run.
    /// * `mse` - The mean of the per sample errors of this epoch.
    fn on_epoch(&mut self, _epoch: usize, _epochs: usize, _mse: f64) {}

    /// Called once the last epoch ends with the mse of every epoch.
    fn on_done(&mut self, _history: &[f64]) {}
}

impl TrainObserver for () {}

impl<O: TrainObserver + ?Sized> TrainObserver for &mut O {
    fn on_progress(&mut self, epoch: usize, processed: usize, total: usize) {
        (**self).on_progress(epoch, processed, total);
    }

    fn on_epoch(&mut self, epoch: usize, epochs: usize, mse: f64) {
        (**self).on_epoch(epoch, epochs, mse);
    }

    fn on_done(&mut self, history: &[f64]) {
        (**self).on_done(history);
    }
}

/// Whether the epoch's mse is worth reporting: every epoch on short runs, roughly ten times
/// spread over the run otherwise.
pub fn reports_epoch(epoch: usize, epochs: usize) -> bool {
    epochs < 10 || (epoch + 1) % (epochs / 10) == 0
}

/// Reports the training progress through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl TrainObserver for LogObserver {
    fn on_progress(&mut self, epoch: usize, processed: usize, total: usize) {
        let pct = processed as f64 * 100. / total as f64;
        debug!("epoch {} / progress {pct:.2} %", epoch + 1);
    }

    fn on_epoch(&mut self, epoch: usize, epochs: usize, mse: f64) {
        if reports_epoch(epoch, epochs) {
            info!("epoch {}/{epochs} mse: {mse:.5}", epoch + 1);
        }
    }

    fn on_done(&mut self, history: &[f64]) {
        info!("done after {} epochs", history.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_runs_report_every_epoch() {
        assert!((0..9).all(|epoch| reports_epoch(epoch, 9)));
    }

    #[test]
    fn long_runs_report_ten_times() {
        let reported = (0..100).filter(|&epoch| reports_epoch(epoch, 100)).count();
        assert_eq!(reported, 10);
        assert!(reports_epoch(9, 100));
        assert!(!reports_epoch(10, 100));
        assert!(reports_epoch(99, 100));
    }

    #[test]
    fn uneven_runs_report_about_ten_times() {
        let reported = (0..25).filter(|&epoch| reports_epoch(epoch, 25)).count();
        assert_eq!(reported, 12);
    }
}
