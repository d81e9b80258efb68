//! Training step operations

use super::core::Trainer;
use crate::autograd::backward;
use crate::train::Batch;

/// Loss and metric of one batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutput {
    pub loss: f32,
    pub accuracy: f32,
}

impl Trainer {
    /// One optimizer update: zero grads, forward, loss, backward, step
    pub fn train_step(&mut self, batch: &Batch) -> StepOutput {
        let loss_fn = self
            .loss_fn
            .as_ref()
            .expect("Loss function must be set before training");

        self.optimizer.zero_grad(self.network.params_mut());

        let predictions = self.network.forward(&batch.inputs, batch.rows);
        let mut loss = loss_fn.forward(&predictions, &batch.targets);
        let loss_val = loss.data()[0];
        let accuracy = self
            .metric
            .as_ref()
            .map_or(0.0, |m| m.compute(&predictions, &batch.targets));

        backward(&mut loss, None);

        self.optimizer.step(self.network.params_mut());
        self.metrics.increment_step();

        StepOutput {
            loss: loss_val,
            accuracy,
        }
    }

    /// Loss and metric without touching parameters
    pub fn evaluate_batch(&self, batch: &Batch) -> StepOutput {
        let loss_fn = self
            .loss_fn
            .as_ref()
            .expect("Loss function must be set before evaluation");
        let predictions = self.network.forward(&batch.inputs, batch.rows);
        StepOutput {
            loss: loss_fn.forward(&predictions, &batch.targets).data()[0],
            accuracy: self
                .metric
                .as_ref()
                .map_or(0.0, |m| m.compute(&predictions, &batch.targets)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{LabelMap, SampleKind, TargetLayout};
    use crate::network::{LinearNetwork, Stage};
    use crate::optim::Adam;
    use crate::train::{LabelAccuracy, MultiTaskLoss, TrainConfig};
    use crate::Tensor;

    fn batch() -> Batch {
        let map = LabelMap::default();
        let mut targets = Vec::new();
        for kind in [SampleKind::Positive, SampleKind::Negative, SampleKind::Positive] {
            targets.extend_from_slice(&map.encode(kind));
            targets.extend_from_slice(&[0.1, -0.1, 0.2, 0.0]);
        }
        let inputs = vec![1.0, 0.0, 0.5, -1.0, 0.2, 0.0, 0.9, 0.1, 0.4];
        Batch::new(
            Tensor::from_vec(inputs, false),
            Tensor::from_vec(targets, false),
            3,
        )
    }

    fn trainer(lr: f32) -> Trainer {
        let layout = TargetLayout::new(0);
        let net = LinearNetwork::new(Stage::Refine, 3, layout, 11);
        let mut trainer = Trainer::new(
            Box::new(net),
            Box::new(Adam::default_params(lr)),
            TrainConfig::default(),
        );
        trainer.compile(
            Box::new(MultiTaskLoss::new(layout).with_keep_ratio(1.0)),
            Box::new(LabelAccuracy::new(layout)),
        );
        trainer
    }

    #[test]
    fn test_train_step_updates_parameters() {
        let mut trainer = trainer(0.01);
        let before = trainer.network().params()[0].data().clone();

        let out = trainer.train_step(&batch());

        assert!(out.loss.is_finite());
        assert!(out.loss > 0.0);
        assert!((0.0..=1.0).contains(&out.accuracy));
        assert_ne!(trainer.network().params()[0].data(), &before);
        assert_eq!(trainer.metrics.steps, 1);
    }

    #[test]
    fn test_repeated_steps_reduce_loss() {
        let mut trainer = trainer(0.05);
        let batch = batch();
        let first = trainer.evaluate_batch(&batch).loss;
        for _ in 0..100 {
            trainer.train_step(&batch);
        }
        let last = trainer.evaluate_batch(&batch).loss;
        assert!(last < first, "loss did not decrease: {first} -> {last}");
    }

    #[test]
    #[should_panic(expected = "Loss function must be set")]
    fn test_train_step_without_loss() {
        let net = LinearNetwork::new(Stage::Refine, 3, TargetLayout::new(0), 0);
        let mut trainer = Trainer::new(
            Box::new(net),
            Box::new(Adam::default_params(0.01)),
            TrainConfig::default(),
        );
        trainer.train_step(&batch());
    }
}
