use crate::errors::TreeError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GreedyTreeParams {
    pub depth_budget: u16,
    pub regularization: f64,
}

impl Default for GreedyTreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl GreedyTreeParams {
    pub fn new() -> Self {
        Self {
            depth_budget: 5,
            regularization: 0.001,
        }
    }

    pub fn set_depth_budget(&mut self, depth_budget: u16) -> Result<(), TreeError> {
        check_depth_budget(depth_budget)?;
        self.depth_budget = depth_budget;
        Ok(())
    }

    pub fn set_regularization(&mut self, regularization: f64) -> Result<(), TreeError> {
        check_regularization(regularization)?;
        self.regularization = regularization;
        Ok(())
    }

    /// Re-checks both fields, for parameters that didn't come through the setters.
    pub fn validate(&self) -> Result<(), TreeError> {
        check_depth_budget(self.depth_budget)?;
        check_regularization(self.regularization)
    }

    pub fn depth_budget(&self) -> u16 {
        self.depth_budget
    }

    pub fn regularization(&self) -> f64 {
        self.regularization
    }
}

fn check_depth_budget(depth_budget: u16) -> Result<(), TreeError> {
    if depth_budget < 1 {
        return Err(TreeError::InvalidParameter(
            "depth_budget".to_string(),
            "a value of at least 1".to_string(),
            depth_budget.to_string(),
        ));
    }
    Ok(())
}

fn check_regularization(regularization: f64) -> Result<(), TreeError> {
    if !regularization.is_finite() || regularization < 0.0 {
        return Err(TreeError::InvalidParameter(
            "regularization".to_string(),
            "a finite, non-negative value".to_string(),
            regularization.to_string(),
        ));
    }
    Ok(())
}
