//! Label codec, hard example selection and composite loss properties

use approx::assert_relative_eq;
use mtcnn_train::label::{
    class_pairs, validity_mask, LabelMap, SampleKind, TargetLayout, Task, ValidityMask,
};
use mtcnn_train::ohem::{select_hardest, KeepPolicy, NUM_KEEP_RATIO};
use mtcnn_train::train::{LossFn, MultiTaskLoss};
use mtcnn_train::Tensor;
use ndarray::{s, Array2};
use proptest::prelude::*;

fn kind_strategy() -> impl Strategy<Value = SampleKind> {
    prop::sample::select(SampleKind::ALL.to_vec())
}

fn class_field(kinds: &[SampleKind], map: &LabelMap) -> Array2<f32> {
    Array2::from_shape_fn((kinds.len(), 2), |(i, j)| map.encode(kinds[i])[j])
}

#[test]
fn default_tags_give_box_targets_to_positive_and_partial() {
    let map = LabelMap::default();
    let kinds: Vec<SampleKind> = ["0", "1", "-1", "-2"]
        .iter()
        .map(|t| t.parse().unwrap())
        .collect();
    let pairs = class_pairs(class_field(&kinds, &map).view());

    assert_eq!(validity_mask(Task::BoundingBox, &pairs).to_ints(), vec![0, 1, 1, 0]);
    assert_eq!(validity_mask(Task::Classification, &pairs).to_ints(), vec![1, 1, 0, 0]);
    assert_eq!(validity_mask(Task::Landmark, &pairs).to_ints(), vec![1, 0, 1, 1]);
}

#[test]
fn negative_partial_marker_leaves_only_the_positive_bbox_valid() {
    let map = LabelMap {
        partial: [-1.0, 0.0],
        landmark: [-2.0, 0.0],
        ..LabelMap::default()
    };
    let kinds: Vec<SampleKind> = ["0", "1", "-1", "-2"]
        .iter()
        .map(|t| t.parse().unwrap())
        .collect();
    let pairs = class_pairs(class_field(&kinds, &map).view());

    assert_eq!(validity_mask(Task::BoundingBox, &pairs).to_ints(), vec![0, 1, 0, 0]);
}

#[test]
fn unknown_task_tag_is_an_error() {
    let err = "pose".parse::<Task>().unwrap_err();
    assert!(matches!(err, mtcnn_train::Error::UnknownTask(t) if t == "pose"));
}

#[test]
fn combine_weights_heads() {
    assert_relative_eq!(MultiTaskLoss::combine(2.0, 1.0, 0.4), 2.7, epsilon = 1e-6);
}

#[test]
fn bbox_loss_without_valid_samples_is_zero() {
    let layout = TargetLayout::new(1);
    let map = LabelMap::default();
    let mut targets = Vec::new();
    for kind in [SampleKind::Negative, SampleKind::Landmark, SampleKind::Negative] {
        targets.extend_from_slice(&map.encode(kind));
        targets.extend_from_slice(&[0.0; 6]);
    }
    let preds = vec![0.5; targets.len()];

    let breakdown = MultiTaskLoss::new(layout).breakdown(
        &Tensor::from_vec(preds, false),
        &Tensor::from_vec(targets, false),
    );

    assert_eq!(breakdown.bbox, 0.0);
    assert!(breakdown.total.is_finite());
}

/// 4 positive, 3 negative, 2 partial, 1 landmark sample
#[test]
fn bbox_loss_matches_hand_computed_mean() {
    let layout = TargetLayout::new(1);
    let map = LabelMap::default();
    let kinds = [
        SampleKind::Positive,
        SampleKind::Negative,
        SampleKind::Positive,
        SampleKind::Partial,
        SampleKind::Negative,
        SampleKind::Positive,
        SampleKind::Landmark,
        SampleKind::Partial,
        SampleKind::Negative,
        SampleKind::Positive,
    ];
    // Box error (squared, summed) per bbox-valid sample in batch order:
    // positives 1, 2, 4, 3 and partials 9, 6
    let valid_boxes = [
        [1.0, 0.0, 0.0, 0.0],
        [1.0, -1.0, 0.0, 0.0],
        [3.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 2.0],
        [1.0, 1.0, 2.0, 0.0],
        [1.0, 1.0, -1.0, 0.0],
    ];

    let mut targets = Vec::new();
    let mut preds = Vec::new();
    let mut boxes = valid_boxes.iter();
    for kind in kinds {
        let label = map.encode(kind);
        targets.extend_from_slice(&label);
        targets.extend_from_slice(&[0.0; 6]);

        preds.extend_from_slice(&[0.5, 0.5]);
        if matches!(kind, SampleKind::Positive | SampleKind::Partial) {
            preds.extend_from_slice(boxes.next().unwrap());
        } else {
            preds.extend_from_slice(&[10.0; 4]);
        }
        preds.extend_from_slice(&[0.0, 0.0]);
    }
    assert!(boxes.next().is_none());

    let loss_fn = MultiTaskLoss::new(layout);
    let breakdown = loss_fn.breakdown(
        &Tensor::from_vec(preds.clone(), false),
        &Tensor::from_vec(targets.clone(), false),
    );

    assert_relative_eq!(
        breakdown.bbox,
        (1.0 + 2.0 + 9.0 + 4.0 + 6.0 + 3.0) / 6.0,
        epsilon = 1e-6
    );
    assert_eq!(breakdown.landmark, 0.0);

    let loss = loss_fn.forward(&Tensor::from_vec(preds, true), &Tensor::from_vec(targets, false));
    assert_relative_eq!(loss.data()[0], breakdown.total, epsilon = 1e-6);
}

proptest! {
    #[test]
    fn prop_codec_depends_only_on_class_field(
        kinds in prop::collection::vec(kind_strategy(), 1..32),
        noise in -5.0f32..5.0,
    ) {
        let layout = TargetLayout::new(1);
        let map = LabelMap::default();
        let labels = class_field(&kinds, &map);
        let mut rows = Array2::<f32>::from_elem((kinds.len(), layout.width()), noise);
        rows.slice_mut(s![.., layout.label_columns()]).assign(&labels);

        let direct = class_pairs(labels.view());
        let from_rows = class_pairs(rows.slice(s![.., layout.label_columns()]));
        for task in Task::ALL {
            let first = validity_mask(task, &direct);
            prop_assert_eq!(&first, &validity_mask(task, &direct));
            prop_assert_eq!(&first, &validity_mask(task, &from_rows));
        }
    }

    #[test]
    fn prop_selection_is_a_bounded_subset_of_valid(
        entries in prop::collection::vec((any::<bool>(), 0.0f32..100.0), 0..64),
        ratio in 0.01f32..=1.0,
    ) {
        let mask = ValidityMask::from_bits(entries.iter().map(|(v, _)| *v).collect());
        let errors: Vec<f32> = entries.iter().map(|(_, e)| *e).collect();
        let valid = mask.count_valid();

        let selection = select_hardest(&errors, &mask, KeepPolicy::Ratio(ratio));

        prop_assert!(selection.len() <= valid);
        prop_assert_eq!(selection.len(), (valid as f32 * ratio) as usize);
        prop_assert!(selection.indices.iter().all(|&i| mask.is_valid(i)));
        prop_assert!(selection.values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn prop_default_keep_ratio_floors(valid in 0usize..200) {
        let mask = ValidityMask::from_bits(vec![true; valid]);
        let errors = vec![1.0; valid];
        let selection = select_hardest(&errors, &mask, KeepPolicy::Ratio(NUM_KEEP_RATIO));
        prop_assert_eq!(selection.len(), (valid as f32 * 0.7) as usize);
    }
}
