//! Answer sheets and the immutable response set handed to the scoring engine

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::questionnaire::Questionnaire;
use crate::{AssessmentError, Profile};

/// A single answer on the 1-5 maturity scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = AssessmentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AssessmentError::InvalidRating(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// The file a business fills in: profile plus ratings grouped by dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSheet {
    pub profile: Profile,
    /// Dimension name (or short name) -> ratings in item order
    #[serde(deserialize_with = "deserialize_unique_keys")]
    pub responses: HashMap<String, Vec<Rating>>,
}

/// Deserialize the responses object, rejecting a key that appears twice
fn deserialize_unique_keys<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, Vec<Rating>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueKeys;

    impl<'de> Visitor<'de> for UniqueKeys {
        type Value = HashMap<String, Vec<Rating>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of dimension name to ratings")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut responses = HashMap::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, ratings)) = map.next_entry::<String, Vec<Rating>>()? {
                match responses.entry(key) {
                    Entry::Occupied(entry) => {
                        return Err(de::Error::custom(AssessmentError::DuplicateDimension(
                            entry.key().clone(),
                        )));
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(ratings);
                    }
                }
            }
            Ok(responses)
        }
    }

    deserializer.deserialize_map(UniqueKeys)
}

impl AnswerSheet {
    /// Read and parse an answer sheet from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read answer sheet: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid answer sheet: {}", path.display()))
    }

    /// A sheet with every item rated `value`, used as a fill-in template
    pub fn template(questionnaire: &Questionnaire, profile: Profile, value: Rating) -> Self {
        let responses = questionnaire
            .dimensions
            .iter()
            .map(|d| (d.name.clone(), vec![value; d.items.len()]))
            .collect();
        Self { profile, responses }
    }
}

/// Ratings per dimension, in questionnaire order. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSet {
    entries: Vec<(String, Vec<Rating>)>,
}

impl ResponseSet {
    /// Build a set directly from `(dimension name, ratings)` pairs
    pub fn new(entries: Vec<(String, Vec<Rating>)>) -> Self {
        Self { entries }
    }

    /// Validate an answer sheet against the questionnaire.
    ///
    /// Keys may use the dimension name or its short name. Every item must be
    /// answered exactly once.
    pub fn collect(
        questionnaire: &Questionnaire,
        sheet: &AnswerSheet,
    ) -> Result<Self, AssessmentError> {
        let mut by_dimension: HashMap<&str, &Vec<Rating>> = HashMap::new();
        // Sorted so the reported unknown key does not depend on hash order
        let mut keys: Vec<&String> = sheet.responses.keys().collect();
        keys.sort();
        for key in keys {
            let dim = questionnaire
                .dimension(key)
                .ok_or_else(|| AssessmentError::UnknownDimension(key.clone()))?;
            if by_dimension.insert(dim.name.as_str(), &sheet.responses[key]).is_some() {
                return Err(AssessmentError::DuplicateDimension(dim.name.clone()));
            }
        }

        let mut entries = Vec::with_capacity(questionnaire.dimensions.len());
        for dim in &questionnaire.dimensions {
            let ratings = by_dimension.get(dim.name.as_str()).copied();
            let answered = ratings.map_or(0, |r| r.len());
            let expected = dim.items.len();

            if answered < expected {
                return Err(AssessmentError::IncompleteAssessment {
                    dimension: dim.name.clone(),
                    missing: dim.items[answered..]
                        .iter()
                        .map(|item| item.prompt.clone())
                        .collect(),
                });
            }
            if answered > expected {
                return Err(AssessmentError::UnexpectedResponses {
                    dimension: dim.name.clone(),
                    expected,
                    got: answered,
                });
            }

            entries.push((dim.name.clone(), ratings.cloned().unwrap_or_default()));
        }

        Ok(Self { entries })
    }

    pub fn get(&self, dimension: &str) -> Option<&[Rating]> {
        self.entries
            .iter()
            .find(|(name, _)| name == dimension)
            .map(|(_, ratings)| ratings.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rating])> {
        self.entries
            .iter()
            .map(|(name, ratings)| (name.as_str(), ratings.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
