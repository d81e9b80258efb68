//! Multi-epoch fit loops

use super::core::Trainer;
use super::result::TrainResult;
use crate::train::callback::CallbackAction;
use crate::train::{Batch, Dataset};
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

impl Trainer {
    /// Train on in-memory data for epochs `initial_epoch..epochs`.
    ///
    /// Samples are reshuffled every epoch when the config asks for it.
    /// Epoch numbering continues from `initial_epoch`, so a resumed run
    /// reports the same epoch indices an uninterrupted one would.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use mtcnn_train::train::{Dataset, Trainer};
    /// # let mut trainer: Trainer = todo!();
    /// # let dataset: Dataset = todo!();
    /// let result = trainer.fit(&dataset, 384, 0, 30)?;
    /// println!("stopped at epoch {}, loss {:.4}", result.final_epoch, result.final_loss);
    /// # Ok::<(), mtcnn_train::Error>(())
    /// ```
    pub fn fit(
        &mut self,
        dataset: &Dataset,
        batch_size: usize,
        initial_epoch: usize,
        epochs: usize,
    ) -> Result<TrainResult> {
        assert!(batch_size > 0, "batch size must be positive");
        let mut rng = self.config.shuffle.then(|| match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        });
        self.run(initial_epoch, epochs, || {
            dataset.batches(batch_size, rng.as_mut())
        })
    }

    /// Train from a batch stream, drawing `steps_per_epoch` batches per epoch.
    ///
    /// A stream that runs dry ends training early.
    pub fn fit_generator<I>(
        &mut self,
        generator: &mut I,
        steps_per_epoch: usize,
        initial_epoch: usize,
        epochs: usize,
    ) -> Result<TrainResult>
    where
        I: Iterator<Item = Batch>,
    {
        assert!(steps_per_epoch > 0, "steps per epoch must be positive");
        self.run(initial_epoch, epochs, || {
            generator.by_ref().take(steps_per_epoch).collect()
        })
    }

    fn run<B>(&mut self, initial_epoch: usize, epochs: usize, mut batch_fn: B) -> Result<TrainResult>
    where
        B: FnMut() -> Vec<Batch>,
    {
        let start = Instant::now();
        self.start_time = Some(start);
        self.best_loss = None;
        let mut stopped_early = false;
        let mut final_loss = 0.0;
        let mut final_accuracy = 0.0;
        let mut epochs_run = 0;
        let mut epoch = initial_epoch;

        tracing::info!(
            stage = %self.network.stage(),
            initial_epoch,
            epochs,
            "training started"
        );

        let ctx = self.build_context(initial_epoch, epochs, 0, 0, 0.0, 0.0);
        if self.callbacks.on_train_begin(&ctx) == CallbackAction::Stop {
            stopped_early = true;
        }

        while !stopped_early && epoch < epochs {
            let ctx = self.build_context(epoch, epochs, 0, 0, final_loss, final_accuracy);
            match self.callbacks.on_epoch_begin(&ctx) {
                CallbackAction::Stop => {
                    stopped_early = true;
                    break;
                }
                CallbackAction::SkipEpoch => {
                    epoch += 1;
                    continue;
                }
                CallbackAction::Continue => {}
            }

            let batches = batch_fn();
            if batches.is_empty() {
                tracing::warn!(epoch, "no batches available, stopping");
                stopped_early = true;
                break;
            }
            let steps_per_epoch = batches.len();

            let mut total_loss = 0.0;
            let mut total_accuracy = 0.0;
            let mut num_batches = 0;

            for (step, batch) in batches.iter().enumerate() {
                let ctx = self.build_context(
                    epoch,
                    epochs,
                    step,
                    steps_per_epoch,
                    final_loss,
                    final_accuracy,
                );
                if self.callbacks.on_step_begin(&ctx) == CallbackAction::Stop {
                    stopped_early = true;
                    break;
                }

                let out = self.train_step(batch);
                total_loss += out.loss;
                total_accuracy += out.accuracy;
                num_batches += 1;

                let ctx =
                    self.build_context(epoch, epochs, step, steps_per_epoch, out.loss, out.accuracy);
                if self.callbacks.on_step_end(&ctx) == CallbackAction::Stop {
                    stopped_early = true;
                    break;
                }
            }

            if stopped_early {
                break;
            }

            final_loss = total_loss / num_batches as f32;
            final_accuracy = total_accuracy / num_batches as f32;
            if self.best_loss.map_or(true, |best| final_loss < best) {
                self.best_loss = Some(final_loss);
            }
            self.metrics.record_epoch(final_loss, final_accuracy, self.lr());
            epochs_run += 1;

            let ctx = self.build_context(
                epoch,
                epochs,
                steps_per_epoch,
                steps_per_epoch,
                final_loss,
                final_accuracy,
            );
            let action = self.callbacks.on_epoch_end(&ctx);
            self.callbacks.on_weights(&ctx, self.network.as_ref())?;
            epoch += 1;

            if action == CallbackAction::Stop {
                stopped_early = true;
            }
        }

        let ctx = self.build_context(epoch, epochs, 0, 0, final_loss, final_accuracy);
        self.callbacks.on_train_end(&ctx);

        let result = TrainResult {
            final_epoch: epoch,
            epochs_run,
            final_loss,
            final_accuracy,
            best_loss: self.best_loss.unwrap_or(final_loss),
            stopped_early,
            elapsed_secs: start.elapsed().as_secs_f64(),
        };
        tracing::info!(
            final_epoch = result.final_epoch,
            final_loss = result.final_loss,
            stopped_early = result.stopped_early,
            "training finished"
        );
        Ok(result)
    }
}
