//! Serializable image of all engine state, for callers that persist it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use story_rules::{CharacterEmotionalState, PlayerId, StoryMemory};

use crate::error::Result;
use crate::story_arc::StoryArc;
use crate::world_events::WorldEvent;

/// One player's complete story state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub memories: Vec<StoryMemory>,
    pub arcs: Vec<StoryArc>,
    pub emotional_states: Vec<CharacterEmotionalState>,
    pub world_events: Vec<WorldEvent>,
}

/// Every player's state, keyed by player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub players: BTreeMap<PlayerId, PlayerSnapshot>,
}

impl EngineSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NarrativeError;

    #[test]
    fn test_invalid_json_is_a_snapshot_error() {
        assert!(matches!(
            EngineSnapshot::from_json("{ not json"),
            Err(NarrativeError::Snapshot(_))
        ));
    }

    #[test]
    fn test_empty_snapshot_json() {
        let json = EngineSnapshot::default().to_json().unwrap();
        assert_eq!(EngineSnapshot::from_json(&json).unwrap(), EngineSnapshot::default());
    }
}
