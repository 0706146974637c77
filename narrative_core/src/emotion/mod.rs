//! Emotional state model - mood and relationship vectors per
//! (player, character) pair, moved by memory tags and event consequences.

use std::collections::BTreeMap;

use story_rules::{
    CharacterEmotionalState, CharacterId, CharacterProfile, Consequence, EffectTarget,
    MoodDimension, NarrativeTuning, PlayerId, StoryBible, StoryMemory,
};

use crate::repository::{InMemoryRepository, Keyed, PlayerScopedRepository};

impl Keyed for CharacterEmotionalState {
    type Key = CharacterId;

    fn key(&self) -> &CharacterId {
        &self.character_id
    }
}

/// Updates tracked characters' emotional state from story memories.
pub struct EmotionalStateModel {
    profiles: Vec<CharacterProfile>,
    mood_tags: BTreeMap<MoodDimension, Vec<String>>,
    tuning: NarrativeTuning,
    primary_character: CharacterId,
    states: Box<dyn PlayerScopedRepository<CharacterEmotionalState>>,
}

impl EmotionalStateModel {
    pub fn new(
        bible: &StoryBible,
        states: Box<dyn PlayerScopedRepository<CharacterEmotionalState>>,
    ) -> Self {
        Self {
            profiles: bible.characters.clone(),
            mood_tags: bible.mood_tags.clone(),
            tuning: bible.tuning.clone(),
            primary_character: bible.primary_character.clone(),
            states,
        }
    }

    pub fn in_memory(bible: &StoryBible) -> Self {
        Self::new(bible, Box::new(InMemoryRepository::new()))
    }

    /// Give a player a fresh state for every tracked character they do not
    /// have yet. Existing states are left alone.
    pub fn initialize_player(&mut self, player: &PlayerId) {
        for profile in &self.profiles {
            if self.states.get(player, &profile.id).is_none() {
                self.states.put(player, profile.fresh_state());
            }
        }
    }

    /// Mood shift a memory causes on one dimension:
    /// matching tags * mood step * (impact / impact scale).
    pub fn mood_delta(&self, memory: &StoryMemory, dimension: MoodDimension) -> f32 {
        let matches = memory.count_matching_tags(self.vocabulary(dimension)) as f32;
        matches * self.tuning.mood_step * (memory.emotional_impact / self.tuning.impact_scale)
    }

    /// Tags that move `dimension`. Empty if the bible lists none.
    pub fn vocabulary(&self, dimension: MoodDimension) -> &[String] {
        self.mood_tags
            .get(&dimension)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Characters a memory affects: its tracked participants, or the primary
    /// character when the memory names no participants.
    pub fn affected_characters(&self, memory: &StoryMemory) -> Vec<CharacterId> {
        if memory.participants.is_empty() {
            return vec![self.primary_character.clone()];
        }
        let mut affected: Vec<CharacterId> = Vec::new();
        for id in &memory.participants {
            if self.profiles.iter().any(|p| &p.id == id) && !affected.contains(id) {
                affected.push(id.clone());
            }
        }
        affected
    }

    /// Apply a memory to the characters it affects.
    pub fn update(&mut self, player: &PlayerId, memory: &StoryMemory) {
        let deltas: Vec<(MoodDimension, f32)> = MoodDimension::ALL
            .into_iter()
            .map(|d| (d, self.mood_delta(memory, d)))
            .collect();

        for character in self.affected_characters(memory) {
            let Some(mut state) = self.states.get(player, &character) else {
                continue;
            };
            for (dimension, delta) in &deltas {
                if *delta != 0.0 {
                    let value = state.adjust_mood(*dimension, *delta);
                    tracing::debug!(
                        player = %player,
                        character = %state.character_id,
                        dimension = %dimension,
                        delta,
                        value,
                        "mood shifted"
                    );
                }
            }
            self.record_history(&mut state, memory);
            self.states.put(player, state);
        }
    }

    fn record_history(&self, state: &mut CharacterEmotionalState, memory: &StoryMemory) {
        if memory.emotional_impact >= self.tuning.joyful_threshold {
            state.joyful_memories.push(memory.id);
        } else if memory.emotional_impact <= -self.tuning.trauma_threshold {
            state.trauma_events.push(memory.id);
        }
        if memory.has_tag(&self.tuning.growth_tag) {
            state.growth_trajectory.push(memory.event.clone());
        }
    }

    /// Apply a consequence to one character. Returns whether anything changed.
    ///
    /// Unknown consequences and characters without a state for this player
    /// are skipped.
    pub fn apply_consequence(
        &mut self,
        player: &PlayerId,
        character: &CharacterId,
        consequence: &Consequence,
    ) -> bool {
        if let Consequence::Unrecognized(key) = consequence {
            tracing::warn!(player = %player, consequence = %key, "unrecognized consequence ignored");
            return false;
        }

        let Some(mut state) = self.states.get(player, character) else {
            tracing::warn!(
                player = %player,
                character = %character,
                "no emotional state for character, consequence skipped"
            );
            return false;
        };

        for effect in consequence.effects() {
            match effect.target {
                EffectTarget::Mood(dimension) => {
                    state.adjust_mood(dimension, effect.delta);
                }
                EffectTarget::Relationship(dimension) => {
                    state.adjust_relationship(dimension, effect.delta);
                }
            }
        }
        self.states.put(player, state);
        true
    }

    /// State of one character for a player, if initialized.
    pub fn state(&self, player: &PlayerId, character: &CharacterId) -> Option<CharacterEmotionalState> {
        self.states.get(player, character)
    }

    /// All states of a player; players never seen get their starting states.
    pub fn states_for(&self, player: &PlayerId) -> Vec<CharacterEmotionalState> {
        if self.states.has_player(player) {
            self.states.all_for_player(player)
        } else {
            self.profiles.iter().map(CharacterProfile::fresh_state).collect()
        }
    }

    pub fn character_name(&self, character: &CharacterId) -> Option<&str> {
        self.profiles
            .iter()
            .find(|p| &p.id == character)
            .map(|p| p.name.as_str())
    }

    pub fn players(&self) -> Vec<PlayerId> {
        self.states.players()
    }

    pub(crate) fn restore(&mut self, player: &PlayerId, state: CharacterEmotionalState) {
        self.states.put(player, state);
    }

    pub(crate) fn clear(&mut self) {
        self.states.clear();
    }
}
