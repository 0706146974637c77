//! Trigger conditions and consequences for world events.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{MoodDimension, RelationshipDimension};
use crate::error::BibleError;

/// Tag counted by [`TriggerCondition::IntimateConversationCount`].
pub const INTIMATE_CONVERSATION_TAG: &str = "intimate_conversation";

const AFFECTION_PREFIX: &str = "affection_above_";
const LOCATION_PREFIX: &str = "location_";
const INTIMATE_COUNT_PREFIX: &str = "intimate_conversation_count_";

/// A single predicate of a world event. All of an event's conditions must
/// hold for it to fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    /// `personal_affection * 100 > threshold`.
    AffectionAbove(u32),

    /// The triggering memory happened at this location.
    Location(String),

    /// At least this many memories tagged `intimate_conversation`, all time.
    IntimateConversationCount(u32),

    /// A predicate outside the known grammar. Never satisfied.
    Unrecognized(String),
}

impl TriggerCondition {
    /// Parse a condition string, keeping unknown grammar as
    /// [`TriggerCondition::Unrecognized`] instead of failing.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse()
            .unwrap_or_else(|_| TriggerCondition::Unrecognized(raw.to_string()))
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, TriggerCondition::Unrecognized(_))
    }
}

impl FromStr for TriggerCondition {
    type Err = BibleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BibleError::InvalidCondition(s.to_string());

        // The count prefix must be checked before anything shorter could match it.
        if let Some(n) = s.strip_prefix(INTIMATE_COUNT_PREFIX) {
            return n
                .parse()
                .map(TriggerCondition::IntimateConversationCount)
                .map_err(|_| invalid());
        }
        if let Some(n) = s.strip_prefix(AFFECTION_PREFIX) {
            return n
                .parse()
                .map(TriggerCondition::AffectionAbove)
                .map_err(|_| invalid());
        }
        if let Some(location) = s.strip_prefix(LOCATION_PREFIX) {
            if location.is_empty() {
                return Err(invalid());
            }
            return Ok(TriggerCondition::Location(location.to_string()));
        }
        Err(invalid())
    }
}

impl std::fmt::Display for TriggerCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerCondition::AffectionAbove(n) => write!(f, "{}{}", AFFECTION_PREFIX, n),
            TriggerCondition::Location(loc) => write!(f, "{}{}", LOCATION_PREFIX, loc),
            TriggerCondition::IntimateConversationCount(n) => {
                write!(f, "{}{}", INTIMATE_COUNT_PREFIX, n)
            }
            TriggerCondition::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// Where a consequence lands in a character's emotional state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    Mood(MoodDimension),
    Relationship(RelationshipDimension),
}

/// One additive shift produced by a consequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalEffect {
    pub target: EffectTarget,
    pub delta: f32,
}

impl EmotionalEffect {
    const fn relationship(dimension: RelationshipDimension, delta: f32) -> Self {
        Self {
            target: EffectTarget::Relationship(dimension),
            delta,
        }
    }

    const fn mood(dimension: MoodDimension, delta: f32) -> Self {
        Self {
            target: EffectTarget::Mood(dimension),
            delta,
        }
    }
}

/// What happens to the target character when a world event fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consequence {
    RelationshipDynamicShift,
    EmotionalIntimacyIncrease,
    RomanticTensionIncrease,
    ProfessionalRespectIncrease,
    TrustIncrease,
    /// Unknown key, applied as a no-op.
    Unrecognized(String),
}

const RELATIONSHIP_DYNAMIC_SHIFT: &[EmotionalEffect] = &[
    EmotionalEffect::relationship(RelationshipDimension::PersonalAffection, 0.1),
    EmotionalEffect::mood(MoodDimension::Openness, 0.1),
];
const EMOTIONAL_INTIMACY_INCREASE: &[EmotionalEffect] = &[EmotionalEffect::relationship(
    RelationshipDimension::EmotionalIntimacy,
    0.2,
)];
const ROMANTIC_TENSION_INCREASE: &[EmotionalEffect] = &[EmotionalEffect::relationship(
    RelationshipDimension::RomanticTension,
    0.15,
)];
const PROFESSIONAL_RESPECT_INCREASE: &[EmotionalEffect] = &[EmotionalEffect::relationship(
    RelationshipDimension::ProfessionalRespect,
    0.1,
)];
const TRUST_INCREASE: &[EmotionalEffect] = &[EmotionalEffect::mood(MoodDimension::Trust, 0.1)];

impl Consequence {
    /// Map a consequence key to its variant. Never fails.
    pub fn parse(key: &str) -> Self {
        match key {
            "relationship_dynamic_shift" => Consequence::RelationshipDynamicShift,
            "emotional_intimacy_increase" => Consequence::EmotionalIntimacyIncrease,
            "romantic_tension_increase" => Consequence::RomanticTensionIncrease,
            "professional_respect_increase" => Consequence::ProfessionalRespectIncrease,
            "trust_increase" => Consequence::TrustIncrease,
            other => Consequence::Unrecognized(other.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Consequence::RelationshipDynamicShift => "relationship_dynamic_shift",
            Consequence::EmotionalIntimacyIncrease => "emotional_intimacy_increase",
            Consequence::RomanticTensionIncrease => "romantic_tension_increase",
            Consequence::ProfessionalRespectIncrease => "professional_respect_increase",
            Consequence::TrustIncrease => "trust_increase",
            Consequence::Unrecognized(key) => key,
        }
    }

    /// The emotional shifts this consequence applies. Empty for unknown keys.
    pub fn effects(&self) -> &'static [EmotionalEffect] {
        match self {
            Consequence::RelationshipDynamicShift => RELATIONSHIP_DYNAMIC_SHIFT,
            Consequence::EmotionalIntimacyIncrease => EMOTIONAL_INTIMACY_INCREASE,
            Consequence::RomanticTensionIncrease => ROMANTIC_TENSION_INCREASE,
            Consequence::ProfessionalRespectIncrease => PROFESSIONAL_RESPECT_INCREASE,
            Consequence::TrustIncrease => TRUST_INCREASE,
            Consequence::Unrecognized(_) => &[],
        }
    }
}

impl std::fmt::Display for Consequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
