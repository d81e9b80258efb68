//! Top-K hardest valid sample selection

use crate::label::ValidityMask;
use std::cmp::Ordering;

/// How many ranked valid samples survive into the mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeepPolicy {
    /// Keep `floor(num_valid * ratio)` samples, `ratio` in (0, 1]
    Ratio(f32),
    /// Keep every valid sample
    AllValid,
}

impl KeepPolicy {
    /// Keep count for a batch with `num_valid` valid samples
    pub fn keep_count(self, num_valid: usize) -> usize {
        match self {
            KeepPolicy::Ratio(ratio) => {
                assert!(
                    ratio > 0.0 && ratio <= 1.0,
                    "keep ratio must be in (0, 1], got {ratio}"
                );
                // f32 product, truncated
                ((num_valid as f32 * ratio) as usize).min(num_valid)
            }
            KeepPolicy::AllValid => num_valid,
        }
    }
}

/// Result of ranking one task's per-sample errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Batch indices of the kept samples, hardest first
    pub indices: Vec<usize>,
    /// Errors of the kept samples, same order as `indices`
    pub values: Vec<f32>,
    /// Number of samples the mask marked valid
    pub num_valid: usize,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Mean of the kept errors; an empty selection contributes 0.0
    pub fn mean(&self) -> f32 {
        if self.values.is_empty() {
            0.0
        } else {
            self.values.iter().sum::<f32>() / self.values.len() as f32
        }
    }
}

/// Rank the valid samples by descending error and keep the hardest ones.
///
/// Invalid samples are filtered out before ranking, so the selection is
/// always a subset of the valid samples. Ties keep batch order.
pub fn select_hardest(errors: &[f32], mask: &ValidityMask, policy: KeepPolicy) -> Selection {
    assert_eq!(
        errors.len(),
        mask.len(),
        "Errors and validity mask must have same length"
    );

    let mut ranked: Vec<usize> = mask.valid_indices().collect();
    let num_valid = ranked.len();
    ranked.sort_by(|&a, &b| match errors[b].total_cmp(&errors[a]) {
        Ordering::Equal => a.cmp(&b),
        other => other,
    });
    ranked.truncate(policy.keep_count(num_valid));

    let values = ranked.iter().map(|&i| errors[i]).collect();
    Selection {
        indices: ranked,
        values,
        num_valid,
    }
}
