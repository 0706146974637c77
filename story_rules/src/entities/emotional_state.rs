//! Emotional state of a tracked character, as seen by one player.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CharacterId;
use crate::chronicle::MemoryId;
use crate::mechanics::{MoodDimension, RelationshipDimension};

/// Mood and relationship vectors for a character.
///
/// Every numeric entry lives in 0.0 - 1.0. The mutators clamp, so the range
/// holds after any sequence of updates. The three history lists only grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterEmotionalState {
    pub character_id: CharacterId,
    pub base_personality: BTreeMap<String, f32>,
    pub current_mood: BTreeMap<MoodDimension, f32>,
    pub relationship_dynamics: BTreeMap<RelationshipDimension, f32>,
    pub growth_trajectory: Vec<String>,
    pub trauma_events: Vec<MemoryId>,
    pub joyful_memories: Vec<MemoryId>,
}

impl CharacterEmotionalState {
    /// Current mood value; absent dimensions read as 0.0.
    pub fn mood(&self, dimension: MoodDimension) -> f32 {
        self.current_mood.get(&dimension).copied().unwrap_or(0.0)
    }

    /// Current relationship value; absent dimensions read as 0.0.
    pub fn relationship(&self, dimension: RelationshipDimension) -> f32 {
        self.relationship_dynamics
            .get(&dimension)
            .copied()
            .unwrap_or(0.0)
    }

    /// Shift a mood dimension and return the clamped result.
    pub fn adjust_mood(&mut self, dimension: MoodDimension, delta: f32) -> f32 {
        let value = (self.mood(dimension) + delta).clamp(0.0, 1.0);
        self.current_mood.insert(dimension, value);
        value
    }

    /// Shift a relationship dimension and return the clamped result.
    pub fn adjust_relationship(&mut self, dimension: RelationshipDimension, delta: f32) -> f32 {
        let value = (self.relationship(dimension) + delta).clamp(0.0, 1.0);
        self.relationship_dynamics.insert(dimension, value);
        value
    }

    /// The strongest mood. Ties go to the dimension listed first.
    pub fn dominant_mood(&self) -> (MoodDimension, f32) {
        let mut best = (MoodDimension::ALL[0], self.mood(MoodDimension::ALL[0]));
        for dimension in MoodDimension::ALL.into_iter().skip(1) {
            let value = self.mood(dimension);
            if value > best.1 {
                best = (dimension, value);
            }
        }
        best
    }

    /// The strongest relationship dimension. Ties go to the dimension listed first.
    pub fn dominant_relationship(&self) -> (RelationshipDimension, f32) {
        let first = RelationshipDimension::ALL[0];
        let mut best = (first, self.relationship(first));
        for dimension in RelationshipDimension::ALL.into_iter().skip(1) {
            let value = self.relationship(dimension);
            if value > best.1 {
                best = (dimension, value);
            }
        }
        best
    }

    /// Check that every mood and relationship value is within 0.0 - 1.0.
    pub fn is_within_bounds(&self) -> bool {
        self.current_mood
            .values()
            .chain(self.relationship_dynamics.values())
            .all(|v| (0.0..=1.0).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CharacterProfile;

    fn state() -> CharacterEmotionalState {
        CharacterProfile::new("cha_hae_in", "Cha Hae-In")
            .with_mood(MoodDimension::Happiness, 0.6)
            .with_mood(MoodDimension::Confidence, 0.8)
            .with_relationship(RelationshipDimension::ProfessionalRespect, 0.7)
            .fresh_state()
    }

    #[test]
    fn test_absent_dimension_reads_zero() {
        let state = state();
        assert_eq!(state.mood(MoodDimension::Attraction), 0.0);
        assert_eq!(state.relationship(RelationshipDimension::RomanticTension), 0.0);
    }

    #[test]
    fn test_adjust_clamps() {
        let mut state = state();
        assert_eq!(state.adjust_mood(MoodDimension::Happiness, 0.9), 1.0);
        assert_eq!(state.adjust_mood(MoodDimension::Openness, -0.3), 0.0);
        assert_eq!(
            state.adjust_relationship(RelationshipDimension::PersonalAffection, 2.0),
            1.0
        );
        assert!(state.is_within_bounds());
    }

    #[test]
    fn test_dominant_dimensions() {
        let state = state();
        assert_eq!(state.dominant_mood().0, MoodDimension::Confidence);
        assert_eq!(
            state.dominant_relationship().0,
            RelationshipDimension::ProfessionalRespect
        );
    }

    #[test]
    fn test_dominant_tie_prefers_first_dimension() {
        let state = CharacterProfile::new("npc", "Npc").fresh_state();
        assert_eq!(state.dominant_mood(), (MoodDimension::Happiness, 0.0));
    }
}
