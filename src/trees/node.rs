use crate::{data::dataset::DataValue, errors::TreeError};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Decision tree node
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Terminal node. `loss` is the fraction of the whole training set it misclassifies.
    Leaf { prediction: u8, loss: f64 },
    /// Split on a binary feature: rows with the feature set go `left`, the rest go `right`.
    Internal {
        feature: usize,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn leaf(prediction: u8, loss: f64) -> Self {
        Node::Leaf { prediction, loss }
    }

    pub fn internal(feature: usize, left: Node, right: Node) -> Self {
        Node::Internal {
            feature,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn num_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.num_leaves() + right.num_leaves(),
        }
    }

    /// Number of levels, counting a lone leaf as depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Regularized loss of this subtree: leaf losses plus `regularization` per leaf.
    pub fn objective(&self, regularization: f64) -> f64 {
        match self {
            Node::Leaf { loss, .. } => loss + regularization,
            Node::Internal { left, right, .. } => {
                left.objective(regularization) + right.objective(regularization)
            }
        }
    }

    /// Follows `sample` from this node down to a leaf and returns its prediction.
    ///
    /// Any non-zero feature value takes the left branch.
    ///
    /// # Errors
    ///
    /// Returns `FeatureOutOfBounds` if a split references a column `sample` doesn't have.
    pub fn predict_row<XT: DataValue>(&self, sample: &[XT]) -> Result<u8, TreeError> {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { prediction, .. } => return Ok(*prediction),
                Node::Internal {
                    feature,
                    left,
                    right,
                } => {
                    let value = sample.get(*feature).ok_or(TreeError::FeatureOutOfBounds {
                        feature: *feature,
                        width: sample.len(),
                    })?;
                    node = if value.is_zero() { right } else { left };
                }
            }
        }
    }

    pub fn to_dict(&self) -> TreeDict {
        TreeDict::from(self)
    }

    fn render(&self, f: &mut Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "    ".repeat(indent);
        match self {
            Node::Leaf { prediction, .. } => writeln!(f, "{}predict {}", pad, prediction),
            Node::Internal {
                feature,
                left,
                right,
            } => {
                writeln!(f, "{}if x[{}] = 1 then:", pad, feature)?;
                left.render(f, indent + 1)?;
                writeln!(f, "{}else:", pad)?;
                right.render(f, indent + 1)
            }
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

/// Nested-mapping form of a tree.
///
/// A leaf is `{"prediction": label}` and a split is
/// `{"feature": index, "True": subtree, "False": subtree}`. Reading also accepts the
/// lowercase `"true"`/`"false"` keys and ignores extra fields, which is how trees
/// exported by Rashomon-set enumerators look.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeDict {
    Split {
        feature: usize,
        #[serde(rename = "True", alias = "true")]
        on_true: Box<TreeDict>,
        #[serde(rename = "False", alias = "false")]
        on_false: Box<TreeDict>,
    },
    Leaf {
        prediction: u8,
    },
}

impl TreeDict {
    pub fn from_json(json_str: &str) -> Result<Self, TreeError> {
        serde_json::from_str(json_str).map_err(|e| TreeError::UnableToRead(e.to_string()))
    }

    pub fn json_dump(&self) -> Result<String, TreeError> {
        serde_json::to_string(self).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeDict::Leaf { .. })
    }

    /// The split feature, or `None` for a leaf.
    pub fn feature(&self) -> Option<usize> {
        match self {
            TreeDict::Split { feature, .. } => Some(*feature),
            TreeDict::Leaf { .. } => None,
        }
    }

    pub fn num_leaves(&self) -> usize {
        match self {
            TreeDict::Leaf { .. } => 1,
            TreeDict::Split {
                on_true, on_false, ..
            } => on_true.num_leaves() + on_false.num_leaves(),
        }
    }

    /// Rebuilds the owning tree. Leaf losses aren't part of the mapping and come back as 0.
    pub fn to_node(&self) -> Node {
        Node::from(self)
    }
}

impl From<&Node> for TreeDict {
    fn from(node: &Node) -> Self {
        match node {
            Node::Leaf { prediction, .. } => TreeDict::Leaf {
                prediction: *prediction,
            },
            Node::Internal {
                feature,
                left,
                right,
            } => TreeDict::Split {
                feature: *feature,
                on_true: Box::new(TreeDict::from(left.as_ref())),
                on_false: Box::new(TreeDict::from(right.as_ref())),
            },
        }
    }
}

impl From<&TreeDict> for Node {
    fn from(dict: &TreeDict) -> Self {
        match dict {
            TreeDict::Leaf { prediction } => Node::leaf(*prediction, 0.0),
            TreeDict::Split {
                feature,
                on_true,
                on_false,
            } => Node::internal(
                *feature,
                Node::from(on_true.as_ref()),
                Node::from(on_false.as_ref()),
            ),
        }
    }
}

impl Display for TreeDict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.to_node().render(f, 0)
    }
}
