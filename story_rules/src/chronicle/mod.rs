//! Story memories - immutable records of narratively significant events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::entities::CharacterId;

/// Bound on the magnitude of a memory's emotional impact.
pub const MAX_EMOTIONAL_IMPACT: f32 = 10.0;

/// Unique identifier for story memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemoryId(pub Uuid);

impl MemoryId {
    /// Create a new random memory ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MemoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MemoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A story tag such as `intimate_conversation` or `professional_recognition`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryTag(String);

impl StoryTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StoryTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for StoryTag {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for StoryTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A memory as supplied by the caller, before it has an id or timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDraft {
    pub event: String,
    pub location: String,
    pub participants: Vec<CharacterId>,
    pub emotional_impact: f32,
    pub story_tags: BTreeSet<StoryTag>,
    pub consequences: Vec<String>,
}

impl MemoryDraft {
    /// Start a draft describing the given event.
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_participant(mut self, character: impl Into<CharacterId>) -> Self {
        self.participants.push(character.into());
        self
    }

    /// Set the emotional impact, clamped to -10.0 - 10.0. Non-finite
    /// values count as 0.0.
    pub fn with_impact(mut self, impact: f32) -> Self {
        self.emotional_impact = bounded_impact(impact);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<StoryTag>) -> Self {
        self.story_tags.insert(tag.into());
        self
    }

    pub fn with_tags<T: Into<StoryTag>>(mut self, tags: impl IntoIterator<Item = T>) -> Self {
        self.story_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_consequence(mut self, consequence: impl Into<String>) -> Self {
        self.consequences.push(consequence.into());
        self
    }

    /// Seal the draft into an immutable memory with a fresh id.
    pub fn into_memory(self, timestamp: DateTime<Utc>) -> StoryMemory {
        StoryMemory {
            id: MemoryId::new(),
            timestamp,
            event: self.event,
            location: self.location,
            participants: self.participants,
            emotional_impact: bounded_impact(self.emotional_impact),
            story_tags: self.story_tags,
            consequences: self.consequences,
        }
    }
}

fn bounded_impact(impact: f32) -> f32 {
    if impact.is_finite() {
        impact.clamp(-MAX_EMOTIONAL_IMPACT, MAX_EMOTIONAL_IMPACT)
    } else {
        0.0
    }
}

/// A recorded story event. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryMemory {
    pub id: MemoryId,
    pub timestamp: DateTime<Utc>,

    /// Free-text description of what happened.
    pub event: String,

    /// Location key, e.g. `hongdae_cafe`.
    pub location: String,

    pub participants: Vec<CharacterId>,

    /// Signed impact, -10.0 (devastating) to 10.0 (elating).
    pub emotional_impact: f32,

    pub story_tags: BTreeSet<StoryTag>,
    pub consequences: Vec<String>,
}

impl StoryMemory {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.story_tags.iter().any(|t| t.as_str() == tag)
    }

    /// Number of this memory's tags that appear in `vocabulary`.
    pub fn count_matching_tags<S: AsRef<str>>(&self, vocabulary: &[S]) -> usize {
        self.story_tags
            .iter()
            .filter(|tag| vocabulary.iter().any(|v| v.as_ref() == tag.as_str()))
            .count()
    }

    /// Check whether the event text mentions `needle`, ignoring case.
    pub fn event_mentions(&self, needle: &str) -> bool {
        self.event
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}
