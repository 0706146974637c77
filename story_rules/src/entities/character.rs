//! Character definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CharacterEmotionalState, CharacterId};
use crate::mechanics::{MoodDimension, RelationshipDimension};

/// Static description of a tracked character: who they are and how they feel
/// before any player has interacted with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub id: CharacterId,
    pub name: String,

    /// Fixed personality traits, each in 0.0 - 1.0.
    pub base_personality: BTreeMap<String, f32>,

    pub initial_mood: BTreeMap<MoodDimension, f32>,
    pub initial_relationship: BTreeMap<RelationshipDimension, f32>,
}

impl CharacterProfile {
    /// Create a profile with empty trait and mood tables.
    pub fn new(id: impl Into<CharacterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_personality: BTreeMap::new(),
            initial_mood: BTreeMap::new(),
            initial_relationship: BTreeMap::new(),
        }
    }

    pub fn with_trait(mut self, name: impl Into<String>, value: f32) -> Self {
        self.base_personality.insert(name.into(), value.clamp(0.0, 1.0));
        self
    }

    pub fn with_mood(mut self, dimension: MoodDimension, value: f32) -> Self {
        self.initial_mood.insert(dimension, value.clamp(0.0, 1.0));
        self
    }

    pub fn with_relationship(mut self, dimension: RelationshipDimension, value: f32) -> Self {
        self.initial_relationship
            .insert(dimension, value.clamp(0.0, 1.0));
        self
    }

    /// Build the emotional state a new player starts with.
    pub fn fresh_state(&self) -> CharacterEmotionalState {
        CharacterEmotionalState {
            character_id: self.id.clone(),
            base_personality: self.base_personality.clone(),
            current_mood: self.initial_mood.clone(),
            relationship_dynamics: self.initial_relationship.clone(),
            growth_trajectory: Vec::new(),
            trauma_events: Vec::new(),
            joyful_memories: Vec::new(),
        }
    }
}

impl From<String> for CharacterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
