//! Checks on weight tables before a weighted draw.
//!
//! Play-call weights are summed from slider and rating terms. A negative or
//! non-finite term means a formula went wrong upstream, so the table is
//! rejected instead of silently skewing the draw.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightError {
    #[error("weight table is empty")]
    Empty,

    #[error("weight {index} is {value}")]
    Invalid { index: usize, value: f64 },

    #[error("weights sum to zero")]
    ZeroSum,

    #[error("normalized weights sum to {sum:.6}")]
    Drift { sum: f64 },
}

/// Normalizes play-call weights into probabilities.
#[derive(Debug, Clone, Copy)]
pub struct ProbabilityValidator {
    /// Allowed distance of a normalized table's sum from 1.0 (default: 0.001)
    tolerance: f64,
}

impl Default for ProbabilityValidator {
    fn default() -> Self {
        Self { tolerance: 0.001 }
    }
}

impl ProbabilityValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_terms(values: &[f64]) -> Result<(), WeightError> {
        if values.is_empty() {
            return Err(WeightError::Empty);
        }
        match values.iter().position(|v| !v.is_finite() || *v < 0.0) {
            Some(index) => Err(WeightError::Invalid { index, value: values[index] }),
            None => Ok(()),
        }
    }

    /// A table of probabilities that already claims to sum to one.
    fn validate_distribution(&self, probabilities: &[f64]) -> Result<(), WeightError> {
        Self::check_terms(probabilities)?;
        let sum: f64 = probabilities.iter().sum();
        if (sum - 1.0).abs() > self.tolerance {
            return Err(WeightError::Drift { sum });
        }
        Ok(())
    }

    pub fn normalize_weights(&self, weights: &[f64]) -> Result<Vec<f64>, WeightError> {
        Self::check_terms(weights)?;
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(WeightError::ZeroSum);
        }
        let probs: Vec<f64> = weights.iter().map(|w| w / total).collect();
        self.validate_distribution(&probs)?;
        Ok(probs)
    }
}
