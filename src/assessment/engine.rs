//! Scoring engine - turns a response set into an assessment result

use std::collections::HashSet;

use tracing::debug;

use crate::questionnaire::Questionnaire;
use crate::responses::ResponseSet;
use crate::{AssessmentError, AssessmentResult, DimensionScore, Tier};

use super::Weights;

/// Mean rating per dimension, in questionnaire order
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionAverages(Vec<(String, f64)>);

impl DimensionAverages {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }

    /// Convenience constructor from borrowed names
    pub fn from_pairs(entries: &[(&str, f64)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(name, avg)| (name.to_string(), *avg))
                .collect(),
        )
    }

    pub fn get(&self, dimension: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(name, _)| name == dimension)
            .map(|(_, avg)| *avg)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, avg)| (name.as_str(), *avg))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Scores response sets against one validated questionnaire.
///
/// Construction is the startup validation point: a questionnaire whose
/// weights or dimensions are inconsistent never produces an engine.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    questionnaire: Questionnaire,
    weights: Weights,
}

impl ScoringEngine {
    /// Validate the questionnaire and build an engine for it
    pub fn new(questionnaire: Questionnaire) -> Result<Self, AssessmentError> {
        questionnaire.validate()?;
        let weights = questionnaire.weights();
        debug!(
            dimensions = questionnaire.dimensions.len(),
            items = questionnaire.total_items(),
            "scoring engine ready"
        );
        Ok(Self {
            questionnaire,
            weights,
        })
    }

    /// Engine for the built-in questionnaire
    pub fn builtin() -> Self {
        let questionnaire = Questionnaire::builtin();
        let weights = questionnaire.weights();
        Self {
            questionnaire,
            weights,
        }
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Score a response set: averages, weighted index, tier and extremes.
    ///
    /// The returned result carries no narrative.
    pub fn evaluate(&self, responses: &ResponseSet) -> Result<AssessmentResult, AssessmentError> {
        let averages = self.compute_dimension_averages(responses)?;
        let global_index = Self::compute_global_index(&averages, &self.weights)?;
        let tier = Self::classify_tier(global_index);
        let (strongest, weakest) = Self::select_extremes(&averages)?;

        let dimensions = self
            .questionnaire
            .dimensions
            .iter()
            .zip(averages.iter())
            .map(|(dim, (_, average))| DimensionScore {
                name: dim.name.clone(),
                short_name: dim.short_name().to_string(),
                weight: dim.weight,
                average,
            })
            .collect();

        debug!(global_index, %tier, %strongest, %weakest, "assessment scored");

        Ok(AssessmentResult {
            global_index,
            tier,
            dimensions,
            strongest,
            weakest,
            narrative: None,
        })
    }

    /// Mean rating of every configured dimension, in questionnaire order.
    pub fn compute_dimension_averages(
        &self,
        responses: &ResponseSet,
    ) -> Result<DimensionAverages, AssessmentError> {
        let mut entries = Vec::with_capacity(self.questionnaire.dimensions.len());
        for dim in &self.questionnaire.dimensions {
            let ratings = match responses.get(&dim.name) {
                Some(r) if !r.is_empty() => r,
                _ => {
                    return Err(AssessmentError::IncompleteAssessment {
                        dimension: dim.name.clone(),
                        missing: dim.items.iter().map(|i| i.prompt.clone()).collect(),
                    })
                }
            };
            let sum: u32 = ratings.iter().map(|r| u32::from(r.value())).sum();
            entries.push((dim.name.clone(), f64::from(sum) / ratings.len() as f64));
        }
        Ok(DimensionAverages(entries))
    }

    /// Weighted sum of the averages. No rounding happens here.
    pub fn compute_global_index(
        averages: &DimensionAverages,
        weights: &Weights,
    ) -> Result<f64, AssessmentError> {
        let avg_names: HashSet<&str> = averages.iter().map(|(name, _)| name).collect();
        let weight_names: HashSet<&str> = weights.names().collect();
        if avg_names.len() != averages.len()
            || weight_names.len() != weights.len()
            || avg_names != weight_names
        {
            let mut only_avg: Vec<&str> = avg_names.difference(&weight_names).copied().collect();
            let mut only_weight: Vec<&str> =
                weight_names.difference(&avg_names).copied().collect();
            only_avg.sort_unstable();
            only_weight.sort_unstable();
            return Err(AssessmentError::ConfigurationMismatch(format!(
                "dimensions without weight: [{}]; weights without dimension: [{}]",
                only_avg.join(", "),
                only_weight.join(", ")
            )));
        }

        let mut index = 0.0;
        for (name, average) in averages.iter() {
            // Presence checked above
            let weight = weights.get(name).unwrap_or_default();
            index += average * weight;
        }
        Ok(index)
    }

    /// Map a global index (1.0-5.0) to its maturity tier
    pub fn classify_tier(global_index: f64) -> Tier {
        Tier::from_index(global_index)
    }

    /// `(strongest, weakest)` dimension names. On ties the first dimension
    /// in questionnaire order wins.
    pub fn select_extremes(
        averages: &DimensionAverages,
    ) -> Result<(String, String), AssessmentError> {
        let mut iter = averages.iter();
        let Some((first_name, first_avg)) = iter.next() else {
            return Err(AssessmentError::IncompleteAssessment {
                dimension: "(none)".to_string(),
                missing: vec![],
            });
        };

        let (mut strongest, mut max) = (first_name, first_avg);
        let (mut weakest, mut min) = (first_name, first_avg);
        for (name, avg) in iter {
            if avg > max {
                strongest = name;
                max = avg;
            }
            if avg < min {
                weakest = name;
                min = avg;
            }
        }

        Ok((strongest.to_string(), weakest.to_string()))
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::builtin()
    }
}
