//! Per-task validity masks derived from the class field

use crate::{Error, Result};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two class-field entries of one sample, truncated to integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassPair(pub i32, pub i32);

impl ClassPair {
    /// Truncates toward zero, matching a float to int32 cast
    pub fn from_values(first: f32, second: f32) -> Self {
        Self(first as i32, second as i32)
    }

    /// Column of the label head holding this sample's true class
    pub fn true_class(self) -> usize {
        usize::from(self.0 == 1)
    }
}

/// A head of the multi-task network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    #[serde(rename = "label", alias = "classification")]
    Classification,
    #[serde(rename = "bbox")]
    BoundingBox,
    Landmark,
}

impl Task {
    pub const ALL: [Task; 3] = [Task::Classification, Task::BoundingBox, Task::Landmark];

    /// Whether a sample with this class field carries a target for the task
    pub fn is_valid(self, pair: ClassPair) -> bool {
        match self {
            Task::Classification => pair.0 == pair.1,
            Task::BoundingBox => pair.0 == 1,
            Task::Landmark => !(pair.0 == 1 && pair.1 == 1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Task::Classification => "label",
            Task::BoundingBox => "bbox",
            Task::Landmark => "landmark",
        }
    }
}

impl FromStr for Task {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "label" | "classification" | "cls" => Ok(Task::Classification),
            "bbox" | "box" => Ok(Task::BoundingBox),
            "landmark" => Ok(Task::Landmark),
            other => Err(Error::UnknownTask(other.to_string())),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-sample validity for one task within one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityMask {
    bits: Vec<bool>,
}

impl ValidityMask {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_valid(&self, i: usize) -> bool {
        self.bits[i]
    }

    pub fn count_valid(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Indices of the valid samples, in batch order
    pub fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(i, _)| i)
    }

    /// 0/1 integer form
    pub fn to_ints(&self) -> Vec<i32> {
        self.bits.iter().map(|&b| i32::from(b)).collect()
    }
}

/// Decode the class field (shape `[n, 2]`) into class pairs
pub fn class_pairs(labels: ArrayView2<'_, f32>) -> Vec<ClassPair> {
    assert_eq!(labels.ncols(), 2, "Class field must be 2 columns wide");
    labels
        .rows()
        .into_iter()
        .map(|row| ClassPair::from_values(row[0], row[1]))
        .collect()
}

/// Compute the validity mask of `task` for every sample of a batch
pub fn validity_mask(task: Task, pairs: &[ClassPair]) -> ValidityMask {
    ValidityMask::from_bits(pairs.iter().map(|&p| task.is_valid(p)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{LabelMap, SampleKind};
    use ndarray::Array2;

    fn pair(kind: SampleKind) -> ClassPair {
        let [a, b] = LabelMap::default().encode(kind);
        ClassPair::from_values(a, b)
    }

    #[test]
    fn test_classification_rule() {
        assert!(Task::Classification.is_valid(pair(SampleKind::Negative)));
        assert!(Task::Classification.is_valid(pair(SampleKind::Positive)));
        assert!(!Task::Classification.is_valid(pair(SampleKind::Partial)));
        assert!(!Task::Classification.is_valid(pair(SampleKind::Landmark)));
    }

    #[test]
    fn test_bbox_rule() {
        assert!(!Task::BoundingBox.is_valid(pair(SampleKind::Negative)));
        assert!(Task::BoundingBox.is_valid(pair(SampleKind::Positive)));
        assert!(Task::BoundingBox.is_valid(pair(SampleKind::Partial)));
        assert!(!Task::BoundingBox.is_valid(pair(SampleKind::Landmark)));
    }

    #[test]
    fn test_landmark_rule() {
        assert!(Task::Landmark.is_valid(pair(SampleKind::Landmark)));
        assert!(Task::Landmark.is_valid(pair(SampleKind::Partial)));
        assert!(!Task::Landmark.is_valid(pair(SampleKind::Positive)));
        assert!(Task::Landmark.is_valid(ClassPair(1, 0)));
        assert!(Task::Landmark.is_valid(ClassPair(0, 1)));
    }

    #[test]
    fn test_true_class() {
        assert_eq!(pair(SampleKind::Positive).true_class(), 1);
        assert_eq!(pair(SampleKind::Negative).true_class(), 0);
    }

    #[test]
    fn test_values_truncate_like_int_cast() {
        assert_eq!(ClassPair::from_values(0.9, -0.9), ClassPair(0, 0));
        assert_eq!(ClassPair::from_values(1.7, -1.2), ClassPair(1, -1));
    }

    #[test]
    fn test_task_parsing() {
        assert_eq!("label".parse::<Task>().unwrap(), Task::Classification);
        assert_eq!("bbox".parse::<Task>().unwrap(), Task::BoundingBox);
        assert_eq!("landmark".parse::<Task>().unwrap(), Task::Landmark);
        for task in Task::ALL {
            assert_eq!(task.as_str().parse::<Task>().unwrap(), task);
        }
    }

    #[test]
    fn test_serde_names_match_tags() {
        for task in Task::ALL {
            let json = serde_json::to_string(&task).unwrap();
            assert_eq!(json, format!("\"{}\"", task.as_str()));
            assert_eq!(serde_json::from_str::<Task>(&json).unwrap(), task);
        }
        assert_eq!(
            serde_json::from_str::<Task>("\"classification\"").unwrap(),
            Task::Classification
        );
    }

    #[test]
    fn test_unknown_task_is_fatal_error() {
        let err = "score".parse::<Task>().unwrap_err();
        assert!(matches!(err, Error::UnknownTask(ref t) if t == "score"));
    }

    #[test]
    fn test_mask_from_class_field() {
        let labels =
            Array2::from_shape_vec((4, 2), vec![0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0])
                .unwrap();
        let pairs = class_pairs(labels.view());

        let cls = validity_mask(Task::Classification, &pairs);
        assert_eq!(cls.to_ints(), vec![1, 1, 0, 0]);
        assert_eq!(cls.count_valid(), 2);

        let bbox = validity_mask(Task::BoundingBox, &pairs);
        assert_eq!(bbox.valid_indices().collect::<Vec<_>>(), vec![1, 2]);

        let landmark = validity_mask(Task::Landmark, &pairs);
        assert_eq!(landmark.to_ints(), vec![1, 0, 1, 1]);
    }

    #[test]
    fn test_empty_batch_mask() {
        let mask = validity_mask(Task::BoundingBox, &[]);
        assert!(mask.is_empty());
        assert_eq!(mask.count_valid(), 0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The mask is a pure function of the class field
        #[test]
        fn mask_is_idempotent(
            rows in proptest::collection::vec((-2i32..=1, -2i32..=1), 0..32),
        ) {
            let pairs: Vec<ClassPair> = rows
                .iter()
                .map(|(a, b)| ClassPair::from_values(*a as f32, *b as f32))
                .collect();

            for task in Task::ALL {
                let first = validity_mask(task, &pairs);
                let second = validity_mask(task, &pairs);
                prop_assert_eq!(&first, &second);
                prop_assert_eq!(first.len(), rows.len());
                prop_assert!(first.count_valid() <= rows.len());
            }
        }
    }
}
