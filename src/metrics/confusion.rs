use nalgebra::{DMatrix, DVector};

use crate::errors::TreeError;

type ConfusionMatrix = DMatrix<usize>;

/// Metrics for binary (0/1) classifiers.
///
/// Every metric of an empty label vector is 0.
pub trait ClassificationMetrics {
    /// Computes the 2x2 confusion matrix, rows indexed by the true label and columns by the
    /// predicted one.
    ///
    /// # Errors
    ///
    /// Fails if the vectors have different lengths or a label isn't 0 or 1.
    fn confusion_matrix(
        &self,
        y_true: &DVector<u8>,
        y_pred: &DVector<u8>,
    ) -> Result<ConfusionMatrix, TreeError> {
        if y_true.len() != y_pred.len() {
            return Err(TreeError::LengthMismatch(y_true.len(), y_pred.len()));
        }

        let mut matrix = DMatrix::zeros(2, 2);
        for (row, (&y_t, &y_p)) in y_true.iter().zip(y_pred.iter()).enumerate() {
            for label in [y_t, y_p] {
                if label > 1 {
                    return Err(TreeError::NonBinaryLabel {
                        row,
                        value: label.to_string(),
                    });
                }
            }
            matrix[(y_t as usize, y_p as usize)] += 1;
        }

        Ok(matrix)
    }

    /// Fraction of predictions equal to the true label.
    fn accuracy(&self, y_true: &DVector<u8>, y_pred: &DVector<u8>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        Ok(ratio(matrix.trace(), y_true.len()))
    }

    /// Fraction of predictions that differ from the true label.
    fn misclassification_rate(
        &self,
        y_true: &DVector<u8>,
        y_pred: &DVector<u8>,
    ) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        Ok(ratio(matrix[(0, 1)] + matrix[(1, 0)], y_true.len()))
    }

    /// Precision of the positive class.
    fn precision(&self, y_true: &DVector<u8>, y_pred: &DVector<u8>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        let tp = matrix[(1, 1)];
        let fp = matrix[(0, 1)];
        Ok(ratio(tp, tp + fp))
    }

    /// Recall of the positive class.
    fn recall(&self, y_true: &DVector<u8>, y_pred: &DVector<u8>) -> Result<f64, TreeError> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        let tp = matrix[(1, 1)];
        let fn_ = matrix[(1, 0)];
        Ok(ratio(tp, tp + fn_))
    }

    /// Harmonic mean of precision and recall.
    fn f1_score(&self, y_true: &DVector<u8>, y_pred: &DVector<u8>) -> Result<f64, TreeError> {
        let precision = self.precision(y_true, y_pred)?;
        let recall = self.recall(y_true, y_pred)?;

        if precision + recall == 0.0 {
            return Ok(0.0);
        }
        Ok(2.0 * precision * recall / (precision + recall))
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct MockClassifier;

    impl ClassificationMetrics for MockClassifier {}

    fn labels() -> (DVector<u8>, DVector<u8>) {
        (
            DVector::from_vec(vec![1, 1, 1, 0, 0, 0, 0, 1]),
            DVector::from_vec(vec![1, 1, 0, 0, 0, 1, 0, 1]),
        )
    }

    #[test]
    fn test_confusion_matrix() {
        let (y_true, y_pred) = labels();
        let matrix = MockClassifier.confusion_matrix(&y_true, &y_pred).unwrap();
        assert_eq!(matrix, DMatrix::from_row_slice(2, 2, &[3, 1, 1, 3]));
    }

    #[test]
    fn test_confusion_matrix_length_mismatch() {
        let y_true = DVector::from_vec(vec![1, 0]);
        let y_pred = DVector::from_vec(vec![1]);
        assert_eq!(
            MockClassifier.confusion_matrix(&y_true, &y_pred).unwrap_err(),
            TreeError::LengthMismatch(2, 1)
        );
    }

    #[test]
    fn test_confusion_matrix_non_binary_label() {
        let y_true = DVector::from_vec(vec![1, 0]);
        let y_pred = DVector::from_vec(vec![1, 3]);
        assert!(matches!(
            MockClassifier.confusion_matrix(&y_true, &y_pred),
            Err(TreeError::NonBinaryLabel { row: 1, .. })
        ));
    }

    #[test]
    fn test_accuracy_and_misclassification() {
        let (y_true, y_pred) = labels();
        assert_relative_eq!(MockClassifier.accuracy(&y_true, &y_pred).unwrap(), 0.75);
        assert_relative_eq!(
            MockClassifier
                .misclassification_rate(&y_true, &y_pred)
                .unwrap(),
            0.25
        );
    }

    #[test]
    fn test_precision_recall_f1() {
        let (y_true, y_pred) = labels();
        assert_relative_eq!(MockClassifier.precision(&y_true, &y_pred).unwrap(), 0.75);
        assert_relative_eq!(MockClassifier.recall(&y_true, &y_pred).unwrap(), 0.75);
        assert_relative_eq!(MockClassifier.f1_score(&y_true, &y_pred).unwrap(), 0.75);
    }

    #[test]
    fn test_metrics_without_positive_predictions() {
        let y_true = DVector::from_vec(vec![1, 0]);
        let y_pred = DVector::from_vec(vec![0, 0]);
        assert_eq!(MockClassifier.precision(&y_true, &y_pred).unwrap(), 0.0);
        assert_eq!(MockClassifier.recall(&y_true, &y_pred).unwrap(), 0.0);
        assert_eq!(MockClassifier.f1_score(&y_true, &y_pred).unwrap(), 0.0);
    }

    #[test]
    fn test_metrics_of_empty_vectors() {
        let empty = DVector::<u8>::zeros(0);
        assert_eq!(MockClassifier.accuracy(&empty, &empty).unwrap(), 0.0);
        assert_eq!(
            MockClassifier.misclassification_rate(&empty, &empty).unwrap(),
            0.0
        );
    }
}
