use serde::Serialize;
use thiserror::Error;

use crate::features::{FeatureVector, FEATURE_COUNT};

#[cfg_attr(not(test), allow(dead_code))]
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Error, PartialEq)]
pub enum WeightError {
    #[error("weight {index} is negative or not finite: {value}")]
    Invalid { index: usize, value: f64 },

    #[error("weights must sum to 1.0, got {0}")]
    Sum(f64),
}

/// One non-negative weight per feature index, summing to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightVector([f64; FEATURE_COUNT]);

impl WeightVector {
    pub const DEFAULT: Self = Self([
        0.15, // commit frequency
        0.10, // consistency
        0.15, // code quality
        0.10, // complexity
        0.05, // language diversity
        0.10, // resume depth
        0.05, // resume variation
        0.15, // market alignment
        0.10, // GPA
        0.05, // internships
    ]);

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn new(weights: [f64; FEATURE_COUNT]) -> Result<Self, WeightError> {
        if let Some((index, &value)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(WeightError::Invalid { index, value });
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightError::Sum(sum));
        }
        Ok(Self(weights))
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Reduces a feature vector to a 0–100 score with a fixed weight vector.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: WeightVector,
}

impl ScoringEngine {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn new(weights: WeightVector) -> Self {
        Self { weights }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    /// `round(dot(features, weights) * 100)`, kept inside [0, 100].
    pub fn calculate_score(&self, features: &FeatureVector) -> u8 {
        let dot: f64 = features
            .values()
            .iter()
            .zip(self.weights.values())
            .map(|(x, w)| x * w)
            .sum();
        (dot * 100.0).round().clamp(0.0, 100.0) as u8
    }
}
