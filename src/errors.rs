//! Errors
//!
//! Error type shared by dataset validation, training, prediction and auditing.
use thiserror::Error;

/// Errors that can occur while building, using or auditing a tree.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    /// The feature matrix and the label vector disagree on the sample count.
    #[error("Feature matrix has {rows} rows but the label vector has {labels} entries.")]
    DimensionMismatch { rows: usize, labels: usize },
    /// A feature value other than 0 or 1 was found.
    #[error("Feature value {value} at row {row}, column {column} is not binary, expected 0 or 1.")]
    NonBinaryFeature {
        row: usize,
        column: usize,
        value: String,
    },
    /// A label value other than 0 or 1 was found.
    #[error("Label value {value} at row {row} is not binary, expected 0 or 1.")]
    NonBinaryLabel { row: usize, value: String },
    /// A split references a column the sample doesn't have.
    #[error("Feature index {feature} is out of bounds for samples with {width} features.")]
    FeatureOutOfBounds { feature: usize, width: usize },
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Prediction was requested before `fit`.
    #[error("Tree wasn't built yet.")]
    NotFitted,
    /// Two label vectors that should be aligned have different lengths.
    #[error("Predictions and labels are of different sizes ({0} vs {1}).")]
    LengthMismatch(usize, usize),
    /// Unable to serialize a model or configuration.
    #[error("Unable to write model: {0}")]
    UnableToWrite(String),
    /// Unable to deserialize a model or configuration.
    #[error("Unable to read model: {0}")]
    UnableToRead(String),
}
