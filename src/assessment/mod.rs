//! Assessment module - weighted maturity scoring

pub mod engine;
pub mod scoring;
pub mod weights;

pub use engine::{DimensionAverages, ScoringEngine};
pub use scoring::ScoreCalculator;
pub use weights::Weights;
