//! Importance weights per dimension

use serde::Serialize;

use crate::questionnaire::WEIGHT_TOLERANCE;

/// Ordered `(dimension name, weight)` pairs. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weights(Vec<(String, f64)>);

impl Weights {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }

    pub fn get(&self, dimension: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(name, _)| name == dimension)
            .map(|(_, w)| *w)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, w)| (name.as_str(), *w))
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().map(|(_, w)| w).sum()
    }

    /// True if the weights add up to 1.0 within tolerance
    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= WEIGHT_TOLERANCE
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
