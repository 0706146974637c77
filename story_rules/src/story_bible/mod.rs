//! The story bible - the static definition of a story: its arcs, characters,
//! tag vocabularies and world events, plus the tuning constants the engine
//! runs with.

mod loader;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::entities::{CharacterId, CharacterProfile};
use crate::error::{BibleError, Result};
use crate::mechanics::{Consequence, MoodDimension, TriggerCondition, WorldEventType};

/// TOML source of the bible shipped with the crate.
const BUILTIN_BIBLE: &str = include_str!("../../data/solo_romance.toml");

/// Identifier of a story arc.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArcId(pub String);

impl ArcId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArcId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for ArcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a world event.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldEventId(pub String);

impl WorldEventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorldEventId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for WorldEventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric constants of the emotional and pacing rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeTuning {
    /// Mood shift per matching tag at full impact.
    pub mood_step: f32,

    /// Divisor turning emotional impact into a -1.0 - 1.0 multiplier.
    pub impact_scale: f32,

    /// How many recent memories feed narrative tension.
    pub tension_window: usize,

    /// Summed absolute impact that saturates tension at 1.0.
    pub tension_divisor: f32,

    /// Impact at or above which a memory is remembered as joyful.
    pub joyful_threshold: f32,

    /// Impact at or below the negated value is remembered as trauma.
    pub trauma_threshold: f32,

    /// Tag that records a memory in a character's growth trajectory.
    pub growth_tag: String,
}

impl NarrativeTuning {
    /// Reject values that would turn mood or tension arithmetic into NaN.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("impact_scale", self.impact_scale),
            ("tension_divisor", self.tension_divisor),
        ];
        let finite = [
            ("mood_step", self.mood_step),
            ("joyful_threshold", self.joyful_threshold),
            ("trauma_threshold", self.trauma_threshold),
        ];

        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(BibleError::InvalidTuning { field, value });
            }
        }
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(BibleError::InvalidTuning { field, value });
            }
        }
        Ok(())
    }
}

impl Default for NarrativeTuning {
    fn default() -> Self {
        Self {
            mood_step: 0.05,
            impact_scale: 10.0,
            tension_window: 10,
            tension_divisor: 50.0,
            joyful_threshold: 5.0,
            trauma_threshold: 5.0,
            growth_tag: "personal_growth".to_string(),
        }
    }
}

/// A chapter-based story arc as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcDefinition {
    pub id: ArcId,
    pub title: String,
    pub theme: String,
    pub total_chapters: u32,

    /// Chapter -> tags that move the arc out of that chapter.
    pub chapter_triggers: BTreeMap<u32, Vec<String>>,

    /// Chapter -> description of what reaching that chapter unlocks.
    pub chapter_unlocks: BTreeMap<u32, String>,
}

impl ArcDefinition {
    pub fn new(id: impl Into<ArcId>, title: impl Into<String>, total_chapters: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            theme: String::new(),
            total_chapters,
            chapter_triggers: BTreeMap::new(),
            chapter_unlocks: BTreeMap::new(),
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn with_triggers<S: Into<String>>(
        mut self,
        chapter: u32,
        tags: impl IntoIterator<Item = S>,
    ) -> Self {
        self.chapter_triggers
            .insert(chapter, tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_unlock(mut self, chapter: u32, description: impl Into<String>) -> Self {
        self.chapter_unlocks.insert(chapter, description.into());
        self
    }

    /// Trigger vocabulary for leaving `chapter`. Empty if none is authored.
    pub fn triggers_for(&self, chapter: u32) -> &[String] {
        self.chapter_triggers
            .get(&chapter)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn unlock_for(&self, chapter: u32) -> Option<&str> {
        self.chapter_unlocks.get(&chapter).map(String::as_str)
    }
}

/// A one-shot world event as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEventDefinition {
    pub id: WorldEventId,
    pub event_type: WorldEventType,
    pub title: String,
    pub description: String,
    pub trigger_conditions: Vec<TriggerCondition>,
    pub consequences: Vec<Consequence>,

    /// Character whose affection is tested and who receives the consequences.
    pub target_character: CharacterId,
}

impl WorldEventDefinition {
    pub fn new(
        id: impl Into<WorldEventId>,
        event_type: WorldEventType,
        title: impl Into<String>,
        target_character: impl Into<CharacterId>,
    ) -> Self {
        Self {
            id: id.into(),
            event_type,
            title: title.into(),
            description: String::new(),
            trigger_conditions: Vec::new(),
            consequences: Vec::new(),
            target_character: target_character.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_condition(mut self, condition: TriggerCondition) -> Self {
        self.trigger_conditions.push(condition);
        self
    }

    pub fn with_consequence(mut self, consequence: Consequence) -> Self {
        self.consequences.push(consequence);
        self
    }
}

/// Everything the engine needs to know about a story before play begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryBible {
    pub tuning: NarrativeTuning,

    /// Arc whose chapter drives pacing.
    pub main_arc: ArcId,

    /// Character described in the emotional context of generated narrative.
    pub primary_character: CharacterId,

    pub arcs: Vec<ArcDefinition>,
    pub characters: Vec<CharacterProfile>,

    /// Mood dimension -> tags that move it.
    pub mood_tags: BTreeMap<MoodDimension, Vec<String>>,

    pub world_events: Vec<WorldEventDefinition>,
}

impl StoryBible {
    /// Create a bible with a single arc and a single character.
    pub fn new(arc: ArcDefinition, character: CharacterProfile) -> Self {
        Self {
            tuning: NarrativeTuning::default(),
            main_arc: arc.id.clone(),
            primary_character: character.id.clone(),
            arcs: vec![arc],
            characters: vec![character],
            mood_tags: BTreeMap::new(),
            world_events: Vec::new(),
        }
    }

    /// The bible shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_BIBLE)
    }

    /// Parse and validate a bible from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let bible = loader::parse_bible(content)?;
        bible.validate()?;
        Ok(bible)
    }

    /// Load and validate a bible from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check tuning values, cross references and arc shapes.
    pub fn validate(&self) -> Result<()> {
        self.tuning.validate()?;

        for arc in &self.arcs {
            if arc.total_chapters == 0 {
                return Err(BibleError::InvalidArc {
                    arc: arc.id.to_string(),
                    reason: "an arc needs at least one chapter".to_string(),
                });
            }
            let out_of_range = arc
                .chapter_triggers
                .keys()
                .chain(arc.chapter_unlocks.keys())
                .find(|c| **c == 0 || **c > arc.total_chapters);
            if let Some(chapter) = out_of_range {
                return Err(BibleError::InvalidArc {
                    arc: arc.id.to_string(),
                    reason: format!(
                        "chapter {} outside 1..={}",
                        chapter, arc.total_chapters
                    ),
                });
            }
        }

        if self.arc(&self.main_arc).is_none() {
            return Err(BibleError::InvalidArc {
                arc: self.main_arc.to_string(),
                reason: "main arc is not defined".to_string(),
            });
        }

        if self.character(&self.primary_character).is_none() {
            return Err(BibleError::UnknownCharacter {
                event: "primary_character".to_string(),
                character: self.primary_character.to_string(),
            });
        }

        for event in &self.world_events {
            if self.character(&event.target_character).is_none() {
                return Err(BibleError::UnknownCharacter {
                    event: event.id.to_string(),
                    character: event.target_character.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn arc(&self, id: &ArcId) -> Option<&ArcDefinition> {
        self.arcs.iter().find(|a| &a.id == id)
    }

    pub fn character(&self, id: &CharacterId) -> Option<&CharacterProfile> {
        self.characters.iter().find(|c| &c.id == id)
    }
}
