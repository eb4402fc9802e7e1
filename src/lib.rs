//! Linares-Digital: digital maturity self-assessment for small businesses
//!
//! This library scores a questionnaire answered by a PYME across five
//! weighted dimensions, classifies the result into a maturity tier, picks the
//! strongest and weakest dimension, and renders a report with an advisory
//! narrative.

pub mod assessment;
pub mod config;
pub mod error;
pub mod narrative;
pub mod questionnaire;
pub mod reporter;
pub mod responses;

pub use error::{AssessmentError, ProviderError, ReportError};

use serde::{Deserialize, Serialize};

use crate::assessment::ScoringEngine;
use crate::narrative::{Narrative, NarrativeContext, NarrativeService};
use crate::reporter::AssessmentReport;
use crate::responses::{AnswerSheet, ResponseSet};

/// The outcome of scoring one answer sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    /// Weighted maturity index (1.0-5.0), never rounded
    pub global_index: f64,
    /// Maturity tier derived from the global index
    pub tier: Tier,
    /// Per-dimension averages in questionnaire order
    pub dimensions: Vec<DimensionScore>,
    /// Name of the dimension with the highest average (first wins on ties)
    pub strongest: String,
    /// Name of the dimension with the lowest average (first wins on ties)
    pub weakest: String,
    /// Advisory text, attached after scoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<Narrative>,
}

impl AssessmentResult {
    /// Attach a narrative to a scored result
    pub fn with_narrative(mut self, narrative: Narrative) -> Self {
        self.narrative = Some(narrative);
        self
    }

    /// Look up a dimension score by name or short name
    pub fn dimension(&self, name: &str) -> Option<&DimensionScore> {
        self.dimensions
            .iter()
            .find(|d| d.name == name || d.short_name == name)
    }
}

/// Average score of one dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
    /// Dimension name (e.g. "Strategy & Leadership")
    pub name: String,
    /// Short label (e.g. "Strategy")
    pub short_name: String,
    /// Configured importance weight
    pub weight: f64,
    /// Arithmetic mean of the dimension's ratings (1.0-5.0)
    pub average: f64,
}

/// Maturity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Initial,
    Aware,
    Defined,
    Managed,
    Optimized,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Initial,
        Tier::Aware,
        Tier::Defined,
        Tier::Managed,
        Tier::Optimized,
    ];

    /// Classify a global index. Lower bounds are inclusive; 5.0 falls in the top tier.
    pub fn from_index(global_index: f64) -> Self {
        debug_assert!(
            (1.0 - 1e-9..=5.0 + 1e-9).contains(&global_index),
            "global index {} outside 1-5",
            global_index
        );
        if global_index < 1.5 {
            Tier::Initial
        } else if global_index < 2.5 {
            Tier::Aware
        } else if global_index < 3.5 {
            Tier::Defined
        } else if global_index < 4.5 {
            Tier::Managed
        } else {
            Tier::Optimized
        }
    }

    /// Ordinal level 1-5
    pub fn level(self) -> u8 {
        match self {
            Tier::Initial => 1,
            Tier::Aware => 2,
            Tier::Defined => 3,
            Tier::Managed => 4,
            Tier::Optimized => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Initial => "Initial/Analog",
            Tier::Aware => "Aware/Siloed",
            Tier::Defined => "Defined/Integrated",
            Tier::Managed => "Managed/Data-driven",
            Tier::Optimized => "Optimized/Innovative",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tier {}: {}", self.level(), self.label())
    }
}

/// Business profile, passed through to the narrative and the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default = "default_business_name")]
    pub business_name: String,
    pub sector: Sector,
    pub size: CompanySize,
}

fn default_business_name() -> String {
    "Unnamed business".to_string()
}

/// Sector of activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sector {
    IndustryMetal,
    Retail,
    Services,
    AgriFood,
    Other,
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sector::IndustryMetal => write!(f, "Industry/Metal"),
            Sector::Retail => write!(f, "Retail"),
            Sector::Services => write!(f, "Services"),
            Sector::AgriFood => write!(f, "Agri-food"),
            Sector::Other => write!(f, "Other"),
        }
    }
}

/// Company size band by headcount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    Micro,
    Small,
    Medium,
}

impl std::fmt::Display for CompanySize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompanySize::Micro => write!(f, "Micro (<10)"),
            CompanySize::Small => write!(f, "Small (10-49)"),
            CompanySize::Medium => write!(f, "Medium (50-250)"),
        }
    }
}

/// Public API: score an answer sheet and attach a narrative.
///
/// Scoring errors (incomplete or malformed answers) are returned; narrative
/// problems never are, the service falls back to the template text.
pub fn evaluate_sheet(
    sheet: &AnswerSheet,
    engine: &ScoringEngine,
    narrator: &NarrativeService,
    evaluated_on: chrono::NaiveDate,
) -> Result<AssessmentReport, AssessmentError> {
    let responses = ResponseSet::collect(engine.questionnaire(), sheet)?;
    let result = engine.evaluate(&responses)?;
    let context = NarrativeContext::new(&sheet.profile, &result);
    let narrative = narrator.narrate(&context);
    Ok(AssessmentReport::new(
        sheet.profile.clone(),
        evaluated_on,
        result.with_narrative(narrative),
    ))
}
