//! Narrative context builder - folds memories, arcs, emotions and world
//! events into a snapshot, and turns that snapshot into material for an
//! external dialogue generator.
//!
//! The builder is read-only:
//! 1. **Gather**: collect the player's arcs, memories, emotional states and catalog
//! 2. **Measure**: compute narrative tension from the most recent memories
//! 3. **Classify**: derive pacing from tension and main-arc progress
//! 4. **Render**: format the prompt, emotional summary and suggested responses

mod pacing;

pub use pacing::*;

use serde::{Deserialize, Serialize};

use story_rules::{
    ArcId, CharacterEmotionalState, CharacterId, NarrativeTuning, PlayerId, StoryBible,
    StoryMemory,
};

use crate::emotion::EmotionalStateModel;
use crate::memory_store::MemoryStore;
use crate::story_arc::{StoryArc, StoryArcTracker};
use crate::world_events::{WorldEvent, WorldEventEngine};

/// Everything known about a player's story at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeContext {
    pub player: PlayerId,
    pub active_arcs: Vec<StoryArc>,
    pub memories: Vec<StoryMemory>,
    pub emotional_states: Vec<CharacterEmotionalState>,
    pub world_events: Vec<WorldEvent>,

    /// 0.0 - 1.0.
    pub narrative_tension: f32,
    pub pacing: Pacing,
}

impl NarrativeContext {
    pub fn arc(&self, id: &ArcId) -> Option<&StoryArc> {
        self.active_arcs.iter().find(|a| &a.id == id)
    }

    pub fn emotional_state(&self, character: &CharacterId) -> Option<&CharacterEmotionalState> {
        self.emotional_states
            .iter()
            .find(|s| &s.character_id == character)
    }
}

/// Material handed to the dialogue generator and the choice menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeBundle {
    pub narrative_prompt: String,
    pub emotional_context: String,
    pub suggested_responses: Vec<String>,
}

/// Builds [`NarrativeContext`]s and [`NarrativeBundle`]s.
pub struct NarrativeContextBuilder {
    tuning: NarrativeTuning,
    main_arc: ArcId,
    primary_character: CharacterId,
}

impl NarrativeContextBuilder {
    pub fn new(bible: &StoryBible) -> Self {
        Self {
            tuning: bible.tuning.clone(),
            main_arc: bible.main_arc.clone(),
            primary_character: bible.primary_character.clone(),
        }
    }

    /// Assemble the context for a player.
    pub fn build(
        &self,
        player: &PlayerId,
        memories: &MemoryStore,
        arcs: &StoryArcTracker,
        emotions: &EmotionalStateModel,
        world_events: &WorldEventEngine,
    ) -> NarrativeContext {
        let active_arcs = arcs.arcs_for(player);
        let recent = memories.recent(player, self.tuning.tension_window);
        let narrative_tension = narrative_tension(&recent, self.tuning.tension_divisor);

        let main_chapter = active_arcs
            .iter()
            .find(|a| a.id == self.main_arc)
            .map(|a| a.current_chapter)
            .unwrap_or(1);

        NarrativeContext {
            player: player.clone(),
            memories: memories.list(player),
            emotional_states: emotions.states_for(player),
            world_events: world_events.events_for(player),
            pacing: Pacing::classify(narrative_tension, main_chapter),
            narrative_tension,
            active_arcs,
        }
    }

    /// Render the prompt bundle for a situation.
    pub fn generate(
        &self,
        context: &NarrativeContext,
        character_name: &str,
        situation: &str,
    ) -> NarrativeBundle {
        NarrativeBundle {
            narrative_prompt: self.narrative_prompt(context, situation),
            emotional_context: self.emotional_context(context, character_name),
            suggested_responses: context
                .pacing
                .suggested_responses()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    fn narrative_prompt(&self, context: &NarrativeContext, situation: &str) -> String {
        let mut prompt = String::new();

        match context.arc(&self.main_arc) {
            Some(arc) => prompt.push_str(&format!(
                "Story arc: {} (Chapter {} of {})\n",
                arc.title, arc.current_chapter, arc.total_chapters
            )),
            None => prompt.push_str("Story arc: none\n"),
        }
        prompt.push_str(&format!("Pacing: {}\n", context.pacing));
        prompt.push_str(&format!(
            "Narrative tension: {}%\n",
            percent(context.narrative_tension)
        ));
        prompt.push_str(&format!("\nSituation: {}\n", situation));
        prompt.push_str(&format!(
            "\nContinue the scene with {} pacing, consistent with the relationship so far.",
            context.pacing
        ));

        prompt
    }

    fn emotional_context(&self, context: &NarrativeContext, character_name: &str) -> String {
        let Some(state) = context.emotional_state(&self.primary_character) else {
            return format!("No emotional state recorded for {}.", character_name);
        };

        let (mood, mood_value) = state.dominant_mood();
        let (relationship, relationship_value) = state.dominant_relationship();
        format!(
            "{} is feeling mostly {} ({}%). Strongest bond: {} ({}%).",
            character_name,
            mood,
            percent(mood_value),
            relationship.as_str().replace('_', " "),
            percent(relationship_value)
        )
    }

    pub fn primary_character(&self) -> &CharacterId {
        &self.primary_character
    }
}

fn percent(value: f32) -> u32 {
    (value.clamp(0.0, 1.0) * 100.0).round() as u32
}
