//! # greedy-trees
//!
//! `greedy-trees` grows greedy binary decision trees over binary features and audits
//! whether trees found by other searches, such as the members of a Rashomon set, make
//! the same split choices the greedy builder would.
//!
//! Each node splits on the feature with the highest information gain. A split is kept
//! only when the regularized loss of the two subtrees is lower than the loss of a leaf,
//! where every leaf costs a fixed `regularization` penalty.
//!
//! ## Example Usage
//!
//! ```rust
//! use greedy_trees::audit::check_greedy;
//! use greedy_trees::data::dataset::Dataset;
//! use greedy_trees::trees::classifier::GreedyTreeClassifier;
//! use nalgebra::{DMatrix, DVector};
//!
//! let x = DMatrix::from_row_slice(4, 2, &[1, 0, 1, 1, 0, 0, 0, 1]);
//! let y = DVector::from_vec(vec![1, 1, 0, 0]);
//! let dataset = Dataset::new(x, y).unwrap();
//!
//! let mut model = GreedyTreeClassifier::with_params(Some(2), Some(0.0)).unwrap();
//! model.fit(&dataset).unwrap();
//!
//! let predictions = model.predict(&dataset.x).unwrap();
//! assert_eq!(predictions, DVector::from_vec(vec![1, 1, 0, 0]));
//! assert_eq!(model.num_leaves().unwrap(), 2);
//!
//! let tree = model.tree_to_dict().unwrap();
//! assert!(check_greedy(&tree, &dataset, 1).unwrap());
//! ```

/// Greediness audit of externally built trees
pub mod audit;
/// Dataset container and validation
pub mod data;
/// Error type
pub mod errors;
/// Functions for evaluating model performance
pub mod metrics;
/// Rashomon-set enumerator interfaces
pub mod rashomon;
/// Greedy decision trees
pub mod trees;
