//! Greedy Decision Tree Classifier
use super::{
    node::{Node, TreeDict},
    params::GreedyTreeParams,
    split::best_split,
};
use crate::{
    data::dataset::{BinaryDataset, DataValue, Dataset},
    errors::TreeError,
    metrics::confusion::ClassificationMetrics,
};
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Greedy binary decision tree.
///
/// Each node splits on the feature with the highest information gain, and a split is
/// only kept if it lowers the regularized loss of the node it replaces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GreedyTreeClassifier {
    root: Option<Node>,
    loss: Option<f64>,
    tree_params: GreedyTreeParams,
}

impl Default for GreedyTreeClassifier {
    /// Creates a new instance of the classifier with default parameters.
    fn default() -> Self {
        Self::new()
    }
}

impl ClassificationMetrics for GreedyTreeClassifier {}

impl GreedyTreeClassifier {
    /// Creates a new instance of the classifier with default parameters.
    pub fn new() -> Self {
        Self {
            root: None,
            loss: None,
            tree_params: GreedyTreeParams::new(),
        }
    }

    /// Creates a new instance of the classifier with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `depth_budget` - Number of levels the tree may have; 1 allows only a single leaf.
    /// * `regularization` - Loss penalty charged for every leaf.
    ///
    /// # Errors
    ///
    /// This method will return an error if the depth budget is 0 or if the regularization is
    /// negative or not finite.
    pub fn with_params(
        depth_budget: Option<u16>,
        regularization: Option<f64>,
    ) -> Result<Self, TreeError> {
        let mut tree = Self::new();

        if let Some(depth_budget) = depth_budget {
            tree.set_depth_budget(depth_budget)?;
        }
        if let Some(regularization) = regularization {
            tree.set_regularization(regularization)?;
        }
        Ok(tree)
    }

    pub fn set_depth_budget(&mut self, depth_budget: u16) -> Result<(), TreeError> {
        self.tree_params.set_depth_budget(depth_budget)
    }

    pub fn set_regularization(&mut self, regularization: f64) -> Result<(), TreeError> {
        self.tree_params.set_regularization(regularization)
    }

    pub fn depth_budget(&self) -> u16 {
        self.tree_params.depth_budget()
    }

    pub fn regularization(&self) -> f64 {
        self.tree_params.regularization()
    }

    /// The fitted tree, if any.
    pub fn tree(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Regularized training loss of the fitted tree.
    pub fn loss(&self) -> Option<f64> {
        self.loss
    }

    /// Builds the tree from a dataset of binary features and labels.
    ///
    /// An empty dataset produces a single leaf predicting 0.
    ///
    /// # Errors
    ///
    /// Returns an error if a feature or label is not 0 or 1.
    pub fn fit<XT: DataValue, YT: DataValue>(
        &mut self,
        dataset: &Dataset<XT, YT>,
    ) -> Result<String, TreeError> {
        let dataset = dataset.to_binary()?;
        let (root, loss) = self.build_tree(&dataset, self.depth_budget(), dataset.nrows())?;

        info!(
            "Built greedy tree on {} samples: {} leaves, depth {}, loss {:.6}.",
            dataset.nrows(),
            root.num_leaves(),
            root.depth(),
            loss
        );
        self.root = Some(root);
        self.loss = Some(loss);
        Ok("Finished building the tree.".into())
    }

    /// Predicts the label of every row of `features`.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet or if a split refers
    /// to a column `features` doesn't have.
    pub fn predict<XT: DataValue>(&self, features: &DMatrix<XT>) -> Result<DVector<u8>, TreeError> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        let predictions = features
            .row_iter()
            .map(|row| root.predict_row(row.transpose().as_slice()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DVector::from_vec(predictions))
    }

    /// Predicts the label of a single sample.
    pub fn predict_row<XT: DataValue>(&self, sample: &[XT]) -> Result<u8, TreeError> {
        self.root
            .as_ref()
            .ok_or(TreeError::NotFitted)?
            .predict_row(sample)
    }

    /// Accuracy of the tree on `dataset`.
    pub fn score<XT: DataValue, YT: DataValue>(
        &self,
        dataset: &Dataset<XT, YT>,
    ) -> Result<f64, TreeError> {
        let dataset = dataset.to_binary()?;
        let predictions = self.predict(&dataset.x)?;
        self.accuracy(&dataset.y, &predictions)
    }

    /// Nested-mapping export of the fitted tree.
    pub fn tree_to_dict(&self) -> Result<TreeDict, TreeError> {
        self.root
            .as_ref()
            .map(Node::to_dict)
            .ok_or(TreeError::NotFitted)
    }

    pub fn num_leaves(&self) -> Result<usize, TreeError> {
        self.root
            .as_ref()
            .map(Node::num_leaves)
            .ok_or(TreeError::NotFitted)
    }

    /// Serializes the whole classifier, parameters included, to JSON.
    pub fn json_dump(&self) -> Result<String, TreeError> {
        serde_json::to_string(self).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    /// Loads a classifier written by [`json_dump`](Self::json_dump).
    ///
    /// # Errors
    ///
    /// Returns `UnableToRead` for malformed JSON and `InvalidParameter` if the stored
    /// parameters are out of range.
    pub fn from_json(json_str: &str) -> Result<Self, TreeError> {
        let classifier: Self =
            serde_json::from_str(json_str).map_err(|e| TreeError::UnableToRead(e.to_string()))?;
        classifier.tree_params.validate()?;
        Ok(classifier)
    }

    fn build_tree(
        &self,
        dataset: &BinaryDataset,
        depth_budget: u16,
        total_samples: usize,
    ) -> Result<(Node, f64), TreeError> {
        let num_samples = dataset.nrows();
        if num_samples == 0 {
            return Ok((Node::leaf(0, 0.0), 0.0));
        }

        let positives = dataset.positives();
        let prediction = u8::from(2 * positives > num_samples);
        let errors = if prediction == 1 {
            num_samples - positives
        } else {
            positives
        };
        // Normalized by the full training size so losses of disjoint subtrees add up.
        let misclassification = errors as f64 / total_samples as f64;
        let leaf_loss = misclassification + self.regularization();

        if depth_budget > 1 {
            if let Some(feature) = best_split(dataset) {
                let (left, right) = dataset.split_on_feature(feature)?;

                if !left.is_empty() && !right.is_empty() {
                    let (left_node, left_loss) =
                        self.build_tree(&left, depth_budget - 1, total_samples)?;
                    let (right_node, right_loss) =
                        self.build_tree(&right, depth_budget - 1, total_samples)?;

                    let split_loss = left_loss + right_loss;
                    if split_loss < leaf_loss {
                        debug!(
                            "Split on feature {} ({} samples): loss {:.6} -> {:.6}.",
                            feature, num_samples, leaf_loss, split_loss
                        );
                        return Ok((Node::internal(feature, left_node, right_node), split_loss));
                    }
                    debug!(
                        "Rejected split on feature {} ({} samples): loss {:.6} >= {:.6}.",
                        feature, num_samples, split_loss, leaf_loss
                    );
                }
            }
        }

        Ok((Node::leaf(prediction, misclassification), leaf_loss))
    }
}

impl Display for GreedyTreeClassifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => Display::fmt(root, f),
            None => writeln!(f, "<unfitted tree>"),
        }
    }
}
