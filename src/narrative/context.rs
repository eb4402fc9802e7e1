use serde::Serialize;

use crate::{AssessmentResult, CompanySize, DimensionScore, Profile, Sector, Tier};

/// Everything a narrative provider may see about one assessment.
///
/// Built from computed values only; providers never read the raw answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeContext {
    pub business_name: String,
    pub sector: Sector,
    pub size: CompanySize,
    pub global_index: f64,
    pub tier: Tier,
    pub strongest: String,
    pub weakest: String,
    pub dimensions: Vec<DimensionScore>,
}

impl NarrativeContext {
    pub fn new(profile: &Profile, result: &AssessmentResult) -> Self {
        Self {
            business_name: profile.business_name.clone(),
            sector: profile.sector,
            size: profile.size,
            global_index: result.global_index,
            tier: result.tier,
            strongest: result.strongest.clone(),
            weakest: result.weakest.clone(),
            dimensions: result.dimensions.clone(),
        }
    }

    pub fn average(&self, dimension: &str) -> Option<f64> {
        self.dimensions
            .iter()
            .find(|d| d.name == dimension)
            .map(|d| d.average)
    }
}
