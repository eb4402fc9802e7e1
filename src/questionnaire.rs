//! Questionnaire definition: dimensions, weights, items and their scales

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::assessment::Weights;
use crate::AssessmentError;

/// Number of rungs on every item scale
pub const SCALE_RUNGS: usize = 5;

/// Tolerance for the weights-sum-to-one check
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// One survey question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub prompt: String,
    /// Labels for ratings 1..=5, lowest maturity first
    pub scale: Vec<String>,
}

impl Item {
    pub fn new(prompt: impl Into<String>, scale: Vec<String>) -> Self {
        Self {
            prompt: prompt.into(),
            scale,
        }
    }

    /// Item whose scale is built from its two anchor descriptions
    pub fn anchored(prompt: &str, low: &str, high: &str) -> Self {
        Self::new(
            prompt,
            vec![
                low.to_string(),
                "Emerging".to_string(),
                "Developing".to_string(),
                "Established".to_string(),
                high.to_string(),
            ],
        )
    }
}

/// A weighted category of digital maturity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub name: String,
    /// Label used in summaries; defaults to `name`
    #[serde(default)]
    pub short_name: Option<String>,
    pub weight: f64,
    pub items: Vec<Item>,
    /// Recommendation shown when this dimension scores low
    #[serde(default)]
    pub advice: Option<String>,
}

impl Dimension {
    pub fn short_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }

    /// True if `key` is this dimension's name or short name
    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.short_name() == key
    }
}

/// The full set of dimensions for one assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub dimensions: Vec<Dimension>,
}

impl Questionnaire {
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self { dimensions }
    }

    /// The built-in Linares-Digital questionnaire (AHP-derived weights).
    pub fn builtin() -> Self {
        Self::new(vec![
            Dimension {
                name: "Strategy & Leadership".to_string(),
                short_name: Some("Strategy".to_string()),
                weight: 0.30,
                items: vec![
                    Item::anchored(
                        "Is there a formal digital strategy?",
                        "Does not exist",
                        "Strategy is central to the business",
                    ),
                    Item::anchored(
                        "Is there a specific budget for digitalisation?",
                        "No",
                        "Consolidated annual budget",
                    ),
                    Item::anchored(
                        "Does management drive digital change?",
                        "Passive",
                        "Proactive leadership",
                    ),
                ],
                advice: Some(
                    "Strategy: define a two-year plan. Do not buy technology without knowing what it is for."
                        .to_string(),
                ),
            },
            Dimension {
                name: "People & Culture".to_string(),
                short_name: Some("People".to_string()),
                weight: 0.25,
                items: vec![
                    Item::anchored("Digital skills of the team", "Very low", "Experts"),
                    Item::anchored(
                        "Willingness to learn and change",
                        "Resistance",
                        "Innovative culture",
                    ),
                    Item::anchored(
                        "Use of collaboration tools",
                        "Email only",
                        "Full suites (Teams/Slack)",
                    ),
                ],
                advice: Some(
                    "Culture: start basic digital training workshops. Resistance to change is your biggest current risk."
                        .to_string(),
                ),
            },
            Dimension {
                name: "Operations & Processes".to_string(),
                short_name: Some("Operations".to_string()),
                weight: 0.20,
                items: vec![
                    Item::anchored(
                        "Level of systems integration (ERP, etc.)",
                        "Spreadsheets/paper",
                        "Fully integrated ERP",
                    ),
                    Item::anchored(
                        "Automation of repetitive tasks",
                        "Manual",
                        "Automated",
                    ),
                    Item::anchored(
                        "Use of real-time data",
                        "Intuition",
                        "Real-time dashboards",
                    ),
                ],
                advice: Some(
                    "Processes: leave paper and spreadsheets behind. Adopt a basic cloud ERP (e.g. Odoo, Sage)."
                        .to_string(),
                ),
            },
            Dimension {
                name: "Customers & Products".to_string(),
                short_name: Some("Customers".to_string()),
                weight: 0.15,
                items: vec![
                    Item::anchored("Presence in digital channels", "None", "Omnichannel"),
                    Item::anchored(
                        "Personalisation of products/services",
                        "Standard",
                        "Data-driven mass personalisation",
                    ),
                ],
                advice: Some(
                    "Customers: build a basic online presence and start collecting customer data before personalising."
                        .to_string(),
                ),
            },
            Dimension {
                name: "Technology & Infrastructure".to_string(),
                short_name: Some("Technology".to_string()),
                weight: 0.10,
                items: vec![
                    Item::anchored(
                        "Connectivity and cybersecurity",
                        "Basic",
                        "Advanced and monitored",
                    ),
                    Item::anchored("Use of the cloud", "Local server", "Everything in the cloud"),
                ],
                advice: Some(
                    "Technology: review your cybersecurity. A cloud backup is the mandatory first step."
                        .to_string(),
                ),
            },
        ])
    }

    /// Check the invariants the scoring engine relies on.
    pub fn validate(&self) -> Result<(), AssessmentError> {
        if self.dimensions.is_empty() {
            return Err(mismatch("questionnaire has no dimensions"));
        }

        let mut names = HashSet::new();
        let mut short_names = HashSet::new();
        for dim in &self.dimensions {
            if dim.name.trim().is_empty() {
                return Err(mismatch("dimension with an empty name"));
            }
            if !names.insert(dim.name.as_str()) {
                return Err(mismatch(format!("duplicate dimension '{}'", dim.name)));
            }
            if !short_names.insert(dim.short_name()) {
                return Err(mismatch(format!(
                    "duplicate short name '{}'",
                    dim.short_name()
                )));
            }
            if !dim.weight.is_finite() || dim.weight <= 0.0 || dim.weight > 1.0 {
                return Err(mismatch(format!(
                    "weight {} of '{}' is outside (0, 1]",
                    dim.weight, dim.name
                )));
            }
            if dim.items.is_empty() {
                return Err(mismatch(format!("dimension '{}' has no items", dim.name)));
            }
            for item in &dim.items {
                if item.scale.len() != SCALE_RUNGS {
                    return Err(mismatch(format!(
                        "item '{}' in '{}' has {} scale rungs, expected {}",
                        item.prompt,
                        dim.name,
                        item.scale.len(),
                        SCALE_RUNGS
                    )));
                }
            }
        }

        // Short names must not collide with another dimension's full name
        for dim in &self.dimensions {
            let short = dim.short_name();
            if short != dim.name && names.contains(short) {
                return Err(mismatch(format!(
                    "short name '{}' collides with a dimension name",
                    short
                )));
            }
        }

        let weights = self.weights();
        if !weights.is_normalized() {
            return Err(mismatch(format!(
                "weights sum to {}, expected 1.0",
                weights.sum()
            )));
        }

        Ok(())
    }

    pub fn weights(&self) -> Weights {
        Weights::new(
            self.dimensions
                .iter()
                .map(|d| (d.name.clone(), d.weight))
                .collect(),
        )
    }

    /// Find a dimension by name or short name
    pub fn dimension(&self, key: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.matches(key))
    }

    pub fn total_items(&self) -> usize {
        self.dimensions.iter().map(|d| d.items.len()).sum()
    }
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::builtin()
    }
}

fn mismatch(msg: impl Into<String>) -> AssessmentError {
    AssessmentError::ConfigurationMismatch(msg.into())
}
