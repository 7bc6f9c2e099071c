//! Greediness audit
//!
//! Checks whether a tree built by some other search procedure, typically a member of a
//! Rashomon set, splits where the greedy scorer would have split. Trees are read in
//! their nested-mapping form, so any exporter producing [`TreeDict`] JSON can be audited.
use crate::{
    data::dataset::BinaryDataset,
    errors::TreeError,
    trees::{node::TreeDict, split::best_split},
};
use log::warn;

/// Whether the root split of `tree` is the greedy choice on `dataset`.
///
/// Leaves are always greedy. A split reached by no training rows can't be second-guessed
/// and also counts as greedy.
///
/// # Errors
///
/// Returns `DimensionMismatch` if rows and labels disagree, and `FeatureOutOfBounds` if
/// the split feature isn't a column of `dataset`.
pub fn is_greedy(tree: &TreeDict, dataset: &BinaryDataset) -> Result<bool, TreeError> {
    dataset.check_dimensions()?;
    match tree {
        TreeDict::Leaf { .. } => Ok(true),
        TreeDict::Split { feature, .. } => {
            check_feature(*feature, dataset)?;
            if dataset.is_empty() {
                warn!(
                    "Split on feature {} receives no training rows; treating it as greedy.",
                    feature
                );
                return Ok(true);
            }
            Ok(best_split(dataset) == Some(*feature))
        }
    }
}

/// Collects the subtrees found `depth` levels down, each with the rows that reach it.
///
/// Depth 1 is `tree` itself, depth 2 its two children, and so on. Branches that end in a
/// leaf before reaching `depth` contribute nothing, so the frontier may be one-sided or
/// empty.
///
/// # Errors
///
/// Returns `InvalidParameter` for a depth of 0, `DimensionMismatch` if rows and labels
/// disagree, and `FeatureOutOfBounds` if a split on the way down references a missing
/// column.
pub fn go_to_depth<'a>(
    tree: &'a TreeDict,
    dataset: &BinaryDataset,
    depth: usize,
) -> Result<Vec<(&'a TreeDict, BinaryDataset)>, TreeError> {
    if depth == 0 {
        return Err(TreeError::InvalidParameter(
            "depth".to_string(),
            "a value of at least 1".to_string(),
            depth.to_string(),
        ));
    }
    dataset.check_dimensions()?;
    if depth == 1 {
        return Ok(vec![(tree, dataset.clone())]);
    }

    match tree {
        TreeDict::Leaf { .. } => Ok(Vec::new()),
        TreeDict::Split {
            feature,
            on_true,
            on_false,
        } => {
            let (true_rows, false_rows) = split_rows(*feature, dataset)?;
            let mut frontier = go_to_depth(on_true, &true_rows, depth - 1)?;
            frontier.extend(go_to_depth(on_false, &false_rows, depth - 1)?);
            Ok(frontier)
        }
    }
}

/// Whether every split of `tree` from `depth` downwards is the greedy choice on the rows
/// that reach it.
///
/// Stops at the first non-greedy split found.
pub fn check_greedy(
    tree: &TreeDict,
    dataset: &BinaryDataset,
    depth: usize,
) -> Result<bool, TreeError> {
    for (subtree, rows) in go_to_depth(tree, dataset, depth)? {
        if !is_greedy_below(subtree, &rows)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_greedy_below(tree: &TreeDict, dataset: &BinaryDataset) -> Result<bool, TreeError> {
    if !is_greedy(tree, dataset)? {
        return Ok(false);
    }
    match tree {
        TreeDict::Leaf { .. } => Ok(true),
        TreeDict::Split {
            feature,
            on_true,
            on_false,
        } => {
            let (true_rows, false_rows) = split_rows(*feature, dataset)?;
            Ok(is_greedy_below(on_true, &true_rows)? && is_greedy_below(on_false, &false_rows)?)
        }
    }
}

fn split_rows(
    feature: usize,
    dataset: &BinaryDataset,
) -> Result<(BinaryDataset, BinaryDataset), TreeError> {
    check_feature(feature, dataset)?;
    dataset.split_on_feature(feature)
}

fn check_feature(feature: usize, dataset: &BinaryDataset) -> Result<(), TreeError> {
    if feature >= dataset.ncols() {
        return Err(TreeError::FeatureOutOfBounds {
            feature,
            width: dataset.ncols(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::dataset::Dataset, trees::classifier::GreedyTreeClassifier};
    use nalgebra::{DMatrix, DVector};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn leaf(prediction: u8) -> TreeDict {
        TreeDict::Leaf { prediction }
    }

    fn split(feature: usize, on_true: TreeDict, on_false: TreeDict) -> TreeDict {
        TreeDict::Split {
            feature,
            on_true: Box::new(on_true),
            on_false: Box::new(on_false),
        }
    }

    // y = x0 AND x1; feature 2 is noise. Greedy picks feature 0 first (ties with
    // feature 1 go to the lower index), then feature 1 under x0 = 1.
    fn and_dataset() -> BinaryDataset {
        let x = DMatrix::from_row_slice(
            8,
            3,
            &[
                0, 0, 0, //
                0, 0, 1, //
                0, 1, 0, //
                0, 1, 1, //
                1, 0, 0, //
                1, 0, 1, //
                1, 1, 0, //
                1, 1, 1, //
            ],
        );
        let y = DVector::from_vec(vec![0, 0, 0, 0, 0, 0, 1, 1]);
        Dataset::new(x, y).unwrap()
    }

    #[test]
    fn test_leaf_is_greedy() {
        assert!(is_greedy(&leaf(1), &and_dataset()).unwrap());
    }

    #[test]
    fn test_is_greedy_root_split() {
        let data = and_dataset();
        assert!(is_greedy(&split(0, leaf(1), leaf(0)), &data).unwrap());
        assert!(!is_greedy(&split(1, leaf(1), leaf(0)), &data).unwrap());
        assert!(!is_greedy(&split(2, leaf(1), leaf(0)), &data).unwrap());
    }

    #[test]
    fn test_is_greedy_out_of_bounds() {
        assert_eq!(
            is_greedy(&split(3, leaf(1), leaf(0)), &and_dataset()).unwrap_err(),
            TreeError::FeatureOutOfBounds { feature: 3, width: 3 }
        );
    }

    #[test]
    fn test_is_greedy_on_empty_rows() {
        let empty = Dataset::new(DMatrix::<u8>::zeros(0, 3), DVector::<u8>::zeros(0)).unwrap();
        assert!(is_greedy(&split(2, leaf(1), leaf(0)), &empty).unwrap());
    }

    #[test]
    fn test_go_to_depth_frontier() {
        let data = and_dataset();
        let tree = split(0, split(1, leaf(1), leaf(0)), leaf(0));

        let first = go_to_depth(&tree, &data, 1).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].0, &tree);
        assert_eq!(first[0].1.nrows(), 8);

        let second = go_to_depth(&tree, &data, 2).unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].0.feature(), Some(1));
        assert_eq!(second[0].1.nrows(), 4);
        assert!(second[1].0.is_leaf());
        assert_eq!(second[1].1.nrows(), 4);

        // Only the true branch survives to depth 3.
        let third = go_to_depth(&tree, &data, 3).unwrap();
        assert_eq!(third.len(), 2);
        assert_eq!(third[0].1.y, DVector::from_vec(vec![1, 1]));
        assert_eq!(third[1].1.y, DVector::from_vec(vec![0, 0]));

        assert!(go_to_depth(&tree, &data, 4).unwrap().is_empty());
    }

    #[test]
    fn test_check_greedy_on_mismatched_rows() {
        let data = Dataset {
            x: DMatrix::from_row_slice(4, 2, &[1, 0, 1, 1, 0, 0, 0, 1]),
            y: DVector::from_vec(vec![1, 0]),
        };
        let tree = split(0, split(1, leaf(1), leaf(0)), leaf(0));
        let expected = TreeError::DimensionMismatch { rows: 4, labels: 2 };

        assert_eq!(is_greedy(&tree, &data).unwrap_err(), expected);
        assert_eq!(check_greedy(&tree, &data, 1).unwrap_err(), expected);
        assert_eq!(check_greedy(&tree, &data, 2).unwrap_err(), expected);
    }

    #[test]
    fn test_go_to_depth_zero() {
        assert!(matches!(
            go_to_depth(&leaf(0), &and_dataset(), 0),
            Err(TreeError::InvalidParameter(..))
        ));
    }

    #[test]
    fn test_check_greedy_on_greedy_tree() {
        let data = and_dataset();
        let tree = split(0, split(1, leaf(1), leaf(0)), leaf(0));
        for depth in 1..=4 {
            assert!(check_greedy(&tree, &data, depth).unwrap());
        }
    }

    #[test]
    fn test_check_greedy_finds_deep_non_greedy_split() {
        let data = and_dataset();
        let tree = split(0, split(2, leaf(1), leaf(0)), leaf(0));

        assert!(!check_greedy(&tree, &data, 1).unwrap());
        assert!(!check_greedy(&tree, &data, 2).unwrap());
        assert!(check_greedy(&tree, &data, 3).unwrap());
    }

    #[test]
    fn test_check_greedy_skips_root_above_depth() {
        let data = and_dataset();
        // Non-greedy root, greedy splits below it.
        let tree = split(1, split(0, leaf(1), leaf(0)), leaf(0));

        assert!(!check_greedy(&tree, &data, 1).unwrap());
        assert!(check_greedy(&tree, &data, 2).unwrap());
    }

    #[test]
    fn test_check_greedy_uses_each_branch_rows() {
        // Under x0 = 1 the labels follow x1; under x0 = 0 they follow x2.
        let x = DMatrix::from_row_slice(
            8,
            3,
            &[
                0, 0, 0, //
                0, 0, 1, //
                0, 1, 0, //
                0, 1, 1, //
                1, 0, 0, //
                1, 0, 1, //
                1, 1, 0, //
                1, 1, 1, //
            ],
        );
        let y = DVector::from_vec(vec![0, 1, 0, 1, 0, 0, 1, 1]);
        let data = Dataset::new(x, y).unwrap();

        let correct = split(0, split(1, leaf(1), leaf(0)), split(2, leaf(1), leaf(0)));
        assert!(check_greedy(&correct, &data, 2).unwrap());

        // Reusing the true branch's rows for the false branch would accept this tree.
        let swapped = split(0, split(1, leaf(1), leaf(0)), split(1, leaf(1), leaf(0)));
        assert!(!check_greedy(&swapped, &data, 2).unwrap());
    }

    #[test]
    fn test_greedy_classifier_passes_its_own_audit() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..10 {
            let x = DMatrix::from_fn(40, 5, |_, _| rng.gen_range(0..2u8));
            let y = DVector::from_fn(40, |_, _| rng.gen_range(0..2u8));
            let data = Dataset::new(x, y).unwrap();

            let mut classifier = GreedyTreeClassifier::with_params(Some(4), Some(0.0)).unwrap();
            classifier.fit(&data).unwrap();
            let tree = classifier.tree_to_dict().unwrap();

            assert!(check_greedy(&tree, &data, 1).unwrap());
        }
    }
}
