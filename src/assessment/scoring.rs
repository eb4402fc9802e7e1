//! Display helpers derived from a scored assessment

use crate::questionnaire::Questionnaire;
use crate::{AssessmentResult, DimensionScore, Tier};

/// Dimensions averaging below this get their advice in the recommendations
pub const ADVICE_THRESHOLD: f64 = 2.5;

/// A global index above this earns the "advanced" note
pub const ADVANCED_THRESHOLD: f64 = 3.5;

pub const ADVANCED_NOTE: &str =
    "Your level is high! You are ready to explore Artificial Intelligence and Big Data.";

/// Stateless helpers for describing a result
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Get a description of the tier
    pub fn tier_description(tier: Tier) -> &'static str {
        match tier {
            Tier::Initial => "Paper and spreadsheets dominate; digital tools are used ad hoc",
            Tier::Aware => "Digital tools exist but live in silos without a shared plan",
            Tier::Defined => "Core processes are digitised and starting to integrate",
            Tier::Managed => "Integrated systems and data drive everyday decisions",
            Tier::Optimized => "Digital is the engine of innovation across the business",
        }
    }

    /// Short status word for an average or index on the 1-5 scale
    pub fn status_label(value: f64) -> &'static str {
        if value < 1.5 {
            "critical"
        } else if value < ADVICE_THRESHOLD {
            "weak"
        } else if value < ADVANCED_THRESHOLD {
            "fair"
        } else if value < 4.5 {
            "good"
        } else {
            "excellent"
        }
    }

    /// Dimensions that fall below the advice threshold, in questionnaire order
    pub fn weak_dimensions(result: &AssessmentResult) -> Vec<&DimensionScore> {
        result
            .dimensions
            .iter()
            .filter(|d| d.average < ADVICE_THRESHOLD)
            .collect()
    }

    /// Rule-based recommendations: advice for each weak dimension plus the
    /// advanced note when the index is high enough.
    pub fn recommendations(result: &AssessmentResult, questionnaire: &Questionnaire) -> Vec<String> {
        let mut recs: Vec<String> = Self::weak_dimensions(result)
            .into_iter()
            .filter_map(|score| {
                questionnaire
                    .dimension(&score.name)
                    .and_then(|d| d.advice.clone())
            })
            .collect();

        if result.global_index > ADVANCED_THRESHOLD {
            recs.push(ADVANCED_NOTE.to_string());
        }

        recs
    }
}
