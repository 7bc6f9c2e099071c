//! Rashomon-set collaborators
//!
//! The exhaustive enumerator producing a Rashomon set lives outside this crate. These
//! traits describe what the audit needs from it: indexable trees that can be exported
//! as a [`TreeDict`], scored, and printed.
use crate::{
    audit::check_greedy,
    data::dataset::BinaryDataset,
    errors::TreeError,
    metrics::confusion::ClassificationMetrics,
    trees::{classifier::GreedyTreeClassifier, node::TreeDict},
};
use log::info;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Settings handed to a Rashomon-set enumerator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RashomonConfig {
    /// Loss penalty per leaf.
    pub regularization: f64,
    /// Relative loss gap, above the best tree's loss, still admitted into the set.
    pub rashomon_bound_multiplier: f64,
}

impl Default for RashomonConfig {
    fn default() -> Self {
        Self {
            regularization: 0.01,
            rashomon_bound_multiplier: 0.05,
        }
    }
}

impl RashomonConfig {
    pub fn new(regularization: f64, rashomon_bound_multiplier: f64) -> Result<Self, TreeError> {
        let config = Self {
            regularization,
            rashomon_bound_multiplier,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn json_dump(&self) -> Result<String, TreeError> {
        serde_json::to_string(self).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    pub fn from_json(json_str: &str) -> Result<Self, TreeError> {
        let config: Self =
            serde_json::from_str(json_str).map_err(|e| TreeError::UnableToRead(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), TreeError> {
        for (name, value) in [
            ("regularization", self.regularization),
            ("rashomon_bound_multiplier", self.rashomon_bound_multiplier),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TreeError::InvalidParameter(
                    name.to_string(),
                    "a finite, non-negative value".to_string(),
                    value.to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// A single tree taken from a Rashomon set.
pub trait RashomonTree: Display {
    fn to_dict(&self) -> Result<TreeDict, TreeError>;

    /// Accuracy on `dataset`.
    fn score(&self, dataset: &BinaryDataset) -> Result<f64, TreeError>;
}

/// An indexable collection of alternative trees.
pub trait RashomonSet {
    type Tree: RashomonTree;

    fn len(&self) -> usize;

    fn tree(&self, index: usize) -> Option<&Self::Tree>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ClassificationMetrics for TreeDict {}

impl RashomonTree for TreeDict {
    fn to_dict(&self) -> Result<TreeDict, TreeError> {
        Ok(self.clone())
    }

    fn score(&self, dataset: &BinaryDataset) -> Result<f64, TreeError> {
        let node = self.to_node();
        let predictions = dataset
            .x
            .row_iter()
            .map(|row| node.predict_row(row.transpose().as_slice()))
            .collect::<Result<Vec<_>, _>>()?;
        self.accuracy(&dataset.y, &DVector::from_vec(predictions))
    }
}

impl RashomonTree for GreedyTreeClassifier {
    fn to_dict(&self) -> Result<TreeDict, TreeError> {
        self.tree_to_dict()
    }

    fn score(&self, dataset: &BinaryDataset) -> Result<f64, TreeError> {
        GreedyTreeClassifier::score(self, dataset)
    }
}

impl<T: RashomonTree> RashomonSet for [T] {
    type Tree = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn tree(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

impl<T: RashomonTree> RashomonSet for Vec<T> {
    type Tree = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn tree(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

/// Indices of the trees in `set` whose splits are all greedy from `depth` down.
pub fn greedy_subset<S: RashomonSet + ?Sized>(
    set: &S,
    dataset: &BinaryDataset,
    depth: usize,
) -> Result<Vec<usize>, TreeError> {
    let mut greedy = Vec::new();
    for index in 0..set.len() {
        if let Some(tree) = set.tree(index) {
            if check_greedy(&tree.to_dict()?, dataset, depth)? {
                greedy.push(index);
            }
        }
    }

    info!(
        "{} of {} trees are greedy from depth {}.",
        greedy.len(),
        set.len(),
        depth
    );
    Ok(greedy)
}
