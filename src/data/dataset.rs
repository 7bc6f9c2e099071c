use crate::errors::TreeError;
use nalgebra::{DMatrix, DVector};
use num_traits::{FromPrimitive, Num, ToPrimitive};
use std::fmt::{self, Display};
use std::fmt::{Debug, Formatter};

pub trait DataValue:
    Debug + Clone + Copy + Num + FromPrimitive + ToPrimitive + Send + Sync + Display + 'static
{
}

impl<T> DataValue for T where
    T: Debug + Clone + Copy + Num + FromPrimitive + ToPrimitive + Send + Sync + Display + 'static
{
}

/// Dataset whose features and labels have been validated to be exactly 0 or 1.
pub type BinaryDataset = Dataset<u8, u8>;

#[derive(Clone, PartialEq)]
pub struct Dataset<XT: DataValue, YT: DataValue> {
    pub x: DMatrix<XT>,
    pub y: DVector<YT>,
}

impl<XT: DataValue, YT: DataValue> Debug for Dataset<XT, YT> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    x: [\n")?;

        for row in self.x.row_iter() {
            write!(f, "        [")?;
            for value in row.iter() {
                write!(f, "{:?}, ", value)?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ],\n    y: [")?;
        for label in self.y.iter() {
            write!(f, "{:?}, ", label)?;
        }
        write!(f, "]\n}}")
    }
}

impl<XT: DataValue, YT: DataValue> Dataset<XT, YT> {
    /// Pairs a feature matrix with its labels.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the matrix row count differs from the label count.
    pub fn new(x: DMatrix<XT>, y: DVector<YT>) -> Result<Self, TreeError> {
        let dataset = Self { x, y };
        dataset.check_dimensions()?;
        Ok(dataset)
    }

    /// Fails with `DimensionMismatch` unless there is one label per matrix row.
    ///
    /// Datasets built as struct literals skip `new`, so row-pairing operations call this.
    pub fn check_dimensions(&self) -> Result<(), TreeError> {
        if self.x.nrows() != self.y.len() {
            return Err(TreeError::DimensionMismatch {
                rows: self.x.nrows(),
                labels: self.y.len(),
            });
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.nrows() == 0
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    /// Validates that every feature and label is 0 or 1 and converts the data to bytes.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the row and label counts differ, otherwise
    /// `NonBinaryFeature` or `NonBinaryLabel` naming the first offending cell.
    pub fn to_binary(&self) -> Result<BinaryDataset, TreeError> {
        self.check_dimensions()?;
        let nrows = self.nrows();

        // nalgebra iterates column-major, the same order `from_vec` expects.
        let features = self
            .x
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                as_binary(value).ok_or_else(|| TreeError::NonBinaryFeature {
                    row: index % nrows,
                    column: index / nrows,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let labels = self
            .y
            .iter()
            .enumerate()
            .map(|(row, &value)| {
                as_binary(value).ok_or_else(|| TreeError::NonBinaryLabel {
                    row,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Dataset {
            x: DMatrix::from_vec(nrows, self.ncols(), features),
            y: DVector::from_vec(labels),
        })
    }
}

impl BinaryDataset {
    /// Splits the rows into those where `feature == 1` (left) and `feature == 0` (right).
    ///
    /// Row order is preserved inside each half. Either half may be empty.
    pub fn split_on_feature(&self, feature: usize) -> Result<(Self, Self), TreeError> {
        self.check_dimensions()?;
        if feature >= self.ncols() {
            return Err(TreeError::FeatureOutOfBounds {
                feature,
                width: self.ncols(),
            });
        }
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            (0..self.nrows()).partition(|&row| self.x[(row, feature)] == 1);

        Ok((self.select_rows(&left_rows), self.select_rows(&right_rows)))
    }

    /// Number of rows labelled 1.
    pub fn positives(&self) -> usize {
        self.y.iter().filter(|&&label| label == 1).count()
    }

    /// Fraction of rows labelled 1, or 0 for an empty dataset.
    pub fn label_mean(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.positives() as f64 / self.nrows() as f64
    }

    fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            x: self.x.select_rows(rows),
            y: self.y.select_rows(rows),
        }
    }
}

fn as_binary<T: DataValue>(value: T) -> Option<u8> {
    if value == T::zero() {
        Some(0)
    } else if value == T::one() {
        Some(1)
    } else {
        None
    }
}
