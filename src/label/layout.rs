//! Column layout of target and prediction rows

use crate::label::Task;
use crate::{Error, Result};
use ndarray::{concatenate, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Width of the class field
pub const LABEL_WIDTH: usize = 2;

/// Width of the bounding-box regression target (dx1, dy1, dx2, dy2)
pub const BBOX_WIDTH: usize = 4;

/// Landmark points annotated per face by default (eyes, nose, mouth corners)
pub const DEFAULT_LANDMARK_POINTS: usize = 5;

/// Row layout `[label(2), bbox(4), landmark(2 * points)]`, shared by true and
/// predicted tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLayout {
    landmark_points: usize,
}

impl Default for TargetLayout {
    fn default() -> Self {
        Self::new(DEFAULT_LANDMARK_POINTS)
    }
}

impl TargetLayout {
    pub fn new(landmark_points: usize) -> Self {
        Self { landmark_points }
    }

    pub fn landmark_points(&self) -> usize {
        self.landmark_points
    }

    pub fn landmark_width(&self) -> usize {
        self.landmark_points * 2
    }

    /// Total row width
    pub fn width(&self) -> usize {
        LABEL_WIDTH + BBOX_WIDTH + self.landmark_width()
    }

    pub fn label_columns(&self) -> Range<usize> {
        0..LABEL_WIDTH
    }

    pub fn bbox_columns(&self) -> Range<usize> {
        LABEL_WIDTH..LABEL_WIDTH + BBOX_WIDTH
    }

    pub fn landmark_columns(&self) -> Range<usize> {
        LABEL_WIDTH + BBOX_WIDTH..self.width()
    }

    /// Columns a task's loss reads from
    pub fn task_columns(&self, task: Task) -> Range<usize> {
        match task {
            Task::Classification => self.label_columns(),
            Task::BoundingBox => self.bbox_columns(),
            Task::Landmark => self.landmark_columns(),
        }
    }

    /// Number of rows in a flat buffer, panicking on ragged input
    pub fn num_rows(&self, flat_len: usize) -> usize {
        assert!(
            flat_len % self.width() == 0,
            "Flat length {flat_len} is not a multiple of row width {}",
            self.width()
        );
        flat_len / self.width()
    }

    /// View a flat row-major buffer as `[rows, width]`
    pub fn rows<'a>(&self, flat: &'a [f32]) -> ArrayView2<'a, f32> {
        let n = self.num_rows(flat.len());
        ArrayView2::from_shape((n, self.width()), flat).expect("row layout is consistent")
    }

    /// Concatenate per-field arrays along the feature axis
    pub fn concat<'a>(
        &self,
        labels: ArrayView2<'a, f32>,
        bboxes: ArrayView2<'a, f32>,
        landmarks: ArrayView2<'a, f32>,
    ) -> Result<Array2<f32>> {
        let n = labels.nrows();
        check_field("labels", labels, n, LABEL_WIDTH)?;
        check_field("bboxes", bboxes, n, BBOX_WIDTH)?;
        check_field("landmarks", landmarks, n, self.landmark_width())?;

        concatenate(Axis(1), &[labels, bboxes, landmarks])
            .map_err(|e| Error::Serialization(format!("target concatenation failed: {e}")))
    }
}

fn check_field(name: &str, field: ArrayView2<'_, f32>, rows: usize, cols: usize) -> Result<()> {
    if field.nrows() != rows || field.ncols() != cols {
        return Err(Error::shape(
            name,
            vec![rows, cols],
            vec![field.nrows(), field.ncols()],
        ));
    }
    Ok(())
}
