//! Information-gain split scoring
use crate::{data::dataset::BinaryDataset, errors::TreeError};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Binary entropy, in bits, of a label distribution with positive rate `p`.
///
/// Pure nodes (`p` of 0 or 1) have zero entropy.
pub fn entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    -(p * p.log2() + (1.0 - p) * (1.0 - p).log2())
}

/// Information gain of splitting `dataset` into `feature == 1` and `feature == 0`.
///
/// An empty partition contributes a positive rate of 0, so constant features score
/// a gain of 0 rather than failing. An empty dataset also scores 0.
///
/// # Errors
///
/// Returns `DimensionMismatch` if rows and labels disagree, and `FeatureOutOfBounds` if
/// `feature` isn't a column of `dataset`.
pub fn information_gain(dataset: &BinaryDataset, feature: usize) -> Result<f64, TreeError> {
    dataset.check_dimensions()?;
    if feature >= dataset.ncols() {
        return Err(TreeError::FeatureOutOfBounds {
            feature,
            width: dataset.ncols(),
        });
    }
    Ok(split_gain(dataset, feature))
}

/// Gains of every feature, indexed by feature.
pub fn feature_gains(dataset: &BinaryDataset) -> Vec<f64> {
    (0..dataset.ncols())
        .into_par_iter()
        .map(|feature| split_gain(dataset, feature))
        .collect()
}

/// The feature with the highest information gain on `dataset`.
///
/// Ties go to the lowest feature index. Returns `None` when the dataset has no features.
pub fn best_split(dataset: &BinaryDataset) -> Option<usize> {
    first_max(&feature_gains(dataset))
}

fn first_max(gains: &[f64]) -> Option<usize> {
    gains
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (feature, &gain)| match best {
            Some((_, best_gain)) if gain <= best_gain => best,
            _ => Some((feature, gain)),
        })
        .map(|(feature, _)| feature)
}

fn split_gain(dataset: &BinaryDataset, feature: usize) -> f64 {
    let num_samples = dataset.nrows();
    if num_samples == 0 {
        return 0.0;
    }

    let (left_count, left_positives, right_count, right_positives) = dataset
        .x
        .column(feature)
        .iter()
        .zip(dataset.y.iter())
        .fold((0usize, 0usize, 0usize, 0usize), |acc, (&value, &label)| {
            let (lc, lp, rc, rp) = acc;
            let positive = usize::from(label == 1);
            if value == 1 {
                (lc + 1, lp + positive, rc, rp)
            } else {
                (lc, lp, rc + 1, rp + positive)
            }
        });

    let weight_left = left_count as f64 / num_samples as f64;
    let weight_right = right_count as f64 / num_samples as f64;

    // Summed before subtracting so a feature and its complement score identically.
    entropy(dataset.label_mean())
        - (weight_left * entropy(positive_rate(left_positives, left_count))
            + weight_right * entropy(positive_rate(right_positives, right_count)))
}

fn positive_rate(positives: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        positives as f64 / count as f64
    }
}
