//! Story mechanics: emotional dimensions, world-event kinds, trigger
//! conditions and consequences.

mod rules;

pub use rules::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BibleError;

/// Mood dimensions updated from the tags of every story memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodDimension {
    Happiness,
    Confidence,
    Attraction,
    Trust,
    Openness,
}

impl MoodDimension {
    pub const ALL: [MoodDimension; 5] = [
        MoodDimension::Happiness,
        MoodDimension::Confidence,
        MoodDimension::Attraction,
        MoodDimension::Trust,
        MoodDimension::Openness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodDimension::Happiness => "happiness",
            MoodDimension::Confidence => "confidence",
            MoodDimension::Attraction => "attraction",
            MoodDimension::Trust => "trust",
            MoodDimension::Openness => "openness",
        }
    }
}

impl FromStr for MoodDimension {
    type Err = BibleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoodDimension::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| BibleError::InvalidDimension {
                kind: "mood",
                name: s.to_string(),
            })
    }
}

impl std::fmt::Display for MoodDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship dimensions, moved only by world-event consequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipDimension {
    PersonalAffection,
    ProfessionalRespect,
    EmotionalIntimacy,
    RomanticTension,
}

impl RelationshipDimension {
    pub const ALL: [RelationshipDimension; 4] = [
        RelationshipDimension::PersonalAffection,
        RelationshipDimension::ProfessionalRespect,
        RelationshipDimension::EmotionalIntimacy,
        RelationshipDimension::RomanticTension,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipDimension::PersonalAffection => "personal_affection",
            RelationshipDimension::ProfessionalRespect => "professional_respect",
            RelationshipDimension::EmotionalIntimacy => "emotional_intimacy",
            RelationshipDimension::RomanticTension => "romantic_tension",
        }
    }
}

impl FromStr for RelationshipDimension {
    type Err = BibleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationshipDimension::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| BibleError::InvalidDimension {
                kind: "relationship",
                name: s.to_string(),
            })
    }
}

impl std::fmt::Display for RelationshipDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories of world events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldEventType {
    GateOutbreak,
    HunterPolitics,
    RelationshipMilestone,
    PersonalGrowth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_names_round_trip() {
        for dimension in MoodDimension::ALL {
            assert_eq!(dimension.as_str().parse::<MoodDimension>().unwrap(), dimension);
        }
        for dimension in RelationshipDimension::ALL {
            assert_eq!(
                dimension.as_str().parse::<RelationshipDimension>().unwrap(),
                dimension
            );
        }
    }

    #[test]
    fn test_unknown_dimension_rejected() {
        assert!(matches!(
            "jealousy".parse::<MoodDimension>(),
            Err(BibleError::InvalidDimension { kind: "mood", .. })
        ));
    }
}
