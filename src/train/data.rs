//! In-memory training data and mini-batch iteration

use crate::label::TargetLayout;
use crate::train::Batch;
use crate::{Error, Result, Tensor};
use ndarray::{Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Input rows paired with concatenated `[label, bbox, landmark]` target rows
#[derive(Debug, Clone)]
pub struct Dataset {
    inputs: Array2<f32>,
    targets: Array2<f32>,
    layout: TargetLayout,
}

impl Dataset {
    /// Build from already-concatenated targets
    pub fn new(inputs: Array2<f32>, targets: Array2<f32>, layout: TargetLayout) -> Result<Self> {
        if targets.ncols() != layout.width() || targets.nrows() != inputs.nrows() {
            return Err(Error::shape(
                "targets",
                vec![inputs.nrows(), layout.width()],
                vec![targets.nrows(), targets.ncols()],
            ));
        }
        Ok(Self {
            inputs,
            targets,
            layout,
        })
    }

    /// Build from the separate label, box and landmark arrays
    pub fn from_parts<'a>(
        inputs: ArrayView2<'_, f32>,
        labels: ArrayView2<'a, f32>,
        bboxes: ArrayView2<'a, f32>,
        landmarks: ArrayView2<'a, f32>,
        layout: TargetLayout,
    ) -> Result<Self> {
        let targets = layout.concat(labels, bboxes, landmarks)?;
        Self::new(inputs.to_owned(), targets, layout)
    }

    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.nrows() == 0
    }

    pub fn input_dim(&self) -> usize {
        self.inputs.ncols()
    }

    pub fn layout(&self) -> TargetLayout {
        self.layout
    }

    pub fn targets(&self) -> ArrayView2<'_, f32> {
        self.targets.view()
    }

    /// Gather the given sample indices into one batch
    pub fn batch(&self, indices: &[usize]) -> Batch {
        let inputs = self.inputs.select(Axis(0), indices);
        let targets = self.targets.select(Axis(0), indices);
        Batch::new(
            Tensor::from_vec(inputs.into_iter().collect(), false),
            Tensor::from_vec(targets.into_iter().collect(), false),
            indices.len(),
        )
    }

    /// Split one pass over the data into batches of at most `batch_size`
    /// samples, optionally shuffled
    pub fn batches(&self, batch_size: usize, rng: Option<&mut StdRng>) -> Vec<Batch> {
        assert!(batch_size > 0, "batch size must be positive");
        let mut order: Vec<usize> = (0..self.len()).collect();
        if let Some(rng) = rng {
            order.shuffle(rng);
        }
        order.chunks(batch_size).map(|c| self.batch(c)).collect()
    }

    /// Endless batch stream over this dataset
    pub fn generator(self, batch_size: usize, seed: Option<u64>) -> BatchGenerator {
        BatchGenerator::new(self, batch_size, seed)
    }
}

/// Endless iterator of shuffled batches, reshuffling after every full pass
#[derive(Debug)]
pub struct BatchGenerator {
    dataset: Dataset,
    batch_size: usize,
    rng: StdRng,
    order: Vec<usize>,
    cursor: usize,
}

impl BatchGenerator {
    pub fn new(dataset: Dataset, batch_size: usize, seed: Option<u64>) -> Self {
        assert!(batch_size > 0, "batch size must be positive");
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let order = (0..dataset.len()).collect();
        let mut generator = Self {
            dataset,
            batch_size,
            rng,
            order,
            cursor: 0,
        };
        generator.reshuffle();
        generator
    }

    /// Batches needed to cover the dataset once
    pub fn steps_per_pass(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size)
    }

    pub fn layout(&self) -> TargetLayout {
        self.dataset.layout()
    }

    fn reshuffle(&mut self) {
        self.order.shuffle(&mut self.rng);
        self.cursor = 0;
    }
}

impl Iterator for BatchGenerator {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.dataset.is_empty() {
            return None;
        }
        if self.cursor >= self.order.len() {
            self.reshuffle();
        }
        let end = (self.cursor + self.batch_size).min(self.order.len());
        let batch = self.dataset.batch(&self.order[self.cursor..end]);
        self.cursor = end;
        Some(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn dataset(n: usize) -> Dataset {
        let layout = TargetLayout::new(1);
        let inputs = Array2::from_shape_fn((n, 3), |(i, j)| (i * 3 + j) as f32);
        let labels = Array2::from_shape_fn((n, 2), |(i, _)| if i % 2 == 0 { 1.0 } else { 0.0 });
        let bboxes = Array2::zeros((n, 4));
        let landmarks = Array2::zeros((n, 2));
        Dataset::from_parts(
            inputs.view(),
            labels.view(),
            bboxes.view(),
            landmarks.view(),
            layout,
        )
        .unwrap()
    }

    #[test]
    fn test_from_parts_concatenates_targets() {
        let data = dataset(4);
        assert_eq!(data.len(), 4);
        assert_eq!(data.input_dim(), 3);
        assert_eq!(data.targets().dim(), (4, 8));
        assert_eq!(data.targets()[[0, 0]], 1.0);
    }

    #[test]
    fn test_from_parts_rejects_row_mismatch() {
        let layout = TargetLayout::new(1);
        let inputs = Array2::<f32>::zeros((3, 3));
        let labels = Array2::<f32>::zeros((2, 2));
        let bboxes = Array2::<f32>::zeros((2, 4));
        let landmarks = Array2::<f32>::zeros((2, 2));
        let err = Dataset::from_parts(
            inputs.view(),
            labels.view(),
            bboxes.view(),
            landmarks.view(),
            layout,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_batches_cover_every_sample_once() {
        let data = dataset(5);
        let batches = data.batches(2, None);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].rows, 1);
        assert_eq!(batches[0].inputs.data().to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_shuffled_batches_are_a_permutation() {
        let data = dataset(6);
        let mut rng = StdRng::seed_from_u64(3);
        let batches = data.batches(4, Some(&mut rng));
        let mut firsts: Vec<f32> = batches
            .iter()
            .flat_map(|b| b.inputs.data().iter().step_by(3).copied().collect::<Vec<_>>())
            .collect();
        firsts.sort_by(f32::total_cmp);
        assert_eq!(firsts, vec![0.0, 3.0, 6.0, 9.0, 12.0, 15.0]);
    }

    #[test]
    fn test_generator_cycles() {
        let mut generator = dataset(3).generator(2, Some(1));
        assert_eq!(generator.steps_per_pass(), 2);
        let sizes: Vec<usize> = (0..4).map(|_| generator.next().unwrap().rows).collect();
        assert_eq!(sizes, vec![2, 1, 2, 1]);
    }

    #[test]
    fn test_generator_on_empty_dataset_ends() {
        let mut generator = dataset(0).generator(2, Some(1));
        assert!(generator.next().is_none());
    }
}
