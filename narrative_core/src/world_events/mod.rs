//! World event engine - one-shot rules that fire when their compound
//! conditions hold and then reshape a character's emotional state.

mod conditions;

pub use conditions::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use story_rules::{
    CharacterId, Consequence, PlayerId, RelationshipDimension, StoryBible, StoryMemory,
    TriggerCondition, WorldEventDefinition, WorldEventId, WorldEventType,
    INTIMATE_CONVERSATION_TAG,
};

use crate::emotion::EmotionalStateModel;
use crate::memory_store::MemoryStore;
use crate::repository::{InMemoryRepository, Keyed, PlayerScopedRepository};

/// A world event in one player's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEvent {
    pub id: WorldEventId,
    pub event_type: WorldEventType,
    pub title: String,
    pub description: String,
    pub trigger_conditions: Vec<TriggerCondition>,
    pub consequences: Vec<Consequence>,
    pub target_character: CharacterId,

    /// Flips to true once and stays there.
    pub is_triggered: bool,
    pub trigger_date: Option<DateTime<Utc>>,
}

impl WorldEvent {
    pub fn from_definition(definition: &WorldEventDefinition) -> Self {
        Self {
            id: definition.id.clone(),
            event_type: definition.event_type,
            title: definition.title.clone(),
            description: definition.description.clone(),
            trigger_conditions: definition.trigger_conditions.clone(),
            consequences: definition.consequences.clone(),
            target_character: definition.target_character.clone(),
            is_triggered: false,
            trigger_date: None,
        }
    }

    /// Mark the event as fired. Returns false if it already was.
    pub fn mark_triggered(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_triggered {
            return false;
        }
        self.is_triggered = true;
        self.trigger_date = Some(now);
        true
    }
}

impl Keyed for WorldEvent {
    type Key = WorldEventId;

    fn key(&self) -> &WorldEventId {
        &self.id
    }
}

/// Evaluates each player's world-event catalog against new memories.
pub struct WorldEventEngine {
    catalog: Vec<WorldEventDefinition>,
    events: Box<dyn PlayerScopedRepository<WorldEvent>>,
}

impl WorldEventEngine {
    pub fn new(bible: &StoryBible, events: Box<dyn PlayerScopedRepository<WorldEvent>>) -> Self {
        Self {
            catalog: bible.world_events.clone(),
            events,
        }
    }

    pub fn in_memory(bible: &StoryBible) -> Self {
        Self::new(bible, Box::new(InMemoryRepository::new()))
    }

    /// Copy catalog entries the player does not have yet into their scope.
    pub fn initialize_player(&mut self, player: &PlayerId) {
        for definition in &self.catalog {
            if self.events.get(player, &definition.id).is_none() {
                self.events.put(player, WorldEvent::from_definition(definition));
            }
        }
    }

    /// Fire every untriggered event whose conditions all hold.
    ///
    /// Consequences of an event are applied before the next event in the
    /// catalog is evaluated. Returns the events fired by this memory.
    pub fn check_triggers(
        &mut self,
        player: &PlayerId,
        memory: &StoryMemory,
        memories: &MemoryStore,
        emotions: &mut EmotionalStateModel,
        now: DateTime<Utc>,
    ) -> Vec<WorldEvent> {
        let intimate_conversations = memories.count_tagged(player, INTIMATE_CONVERSATION_TAG);
        let mut fired = Vec::new();

        for mut event in self.events.all_for_player(player) {
            if event.is_triggered {
                continue;
            }

            let ctx = ConditionContext {
                memory,
                affection: emotions
                    .state(player, &event.target_character)
                    .map(|s| s.relationship(RelationshipDimension::PersonalAffection)),
                intimate_conversations,
            };
            if !all_satisfied(&event.trigger_conditions, &ctx) {
                continue;
            }

            if !event.mark_triggered(now) {
                continue;
            }
            tracing::info!(
                player = %player,
                event = %event.id,
                title = %event.title,
                "world event triggered"
            );

            for consequence in &event.consequences {
                emotions.apply_consequence(player, &event.target_character, consequence);
            }

            self.events.put(player, event.clone());
            fired.push(event);
        }

        fired
    }

    /// A player's catalog; players never seen get the untriggered catalog.
    pub fn events_for(&self, player: &PlayerId) -> Vec<WorldEvent> {
        if self.events.has_player(player) {
            self.events.all_for_player(player)
        } else {
            self.catalog.iter().map(WorldEvent::from_definition).collect()
        }
    }

    pub fn event(&self, player: &PlayerId, id: &WorldEventId) -> Option<WorldEvent> {
        self.events.get(player, id)
    }

    pub fn players(&self) -> Vec<PlayerId> {
        self.events.players()
    }

    pub(crate) fn restore(&mut self, player: &PlayerId, event: WorldEvent) {
        self.events.put(player, event);
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_rules::{ArcDefinition, CharacterProfile, MemoryDraft};

    fn bible() -> StoryBible {
        let mut bible = StoryBible::new(
            ArcDefinition::new("main", "Main", 3),
            CharacterProfile::new("cha_hae_in", "Cha Hae-In")
                .with_relationship(RelationshipDimension::PersonalAffection, 0.45),
        );
        bible.world_events.push(
            WorldEventDefinition::new(
                "first_coffee_date",
                WorldEventType::RelationshipMilestone,
                "First Coffee Date",
                "cha_hae_in",
            )
            .with_condition(TriggerCondition::AffectionAbove(40))
            .with_condition(TriggerCondition::Location("hongdae_cafe".into()))
            .with_consequence(Consequence::RomanticTensionIncrease),
        );
        bible
    }

    struct Harness {
        player: PlayerId,
        memories: MemoryStore,
        emotions: EmotionalStateModel,
        engine: WorldEventEngine,
    }

    impl Harness {
        fn new(bible: &StoryBible) -> Self {
            let player = PlayerId::new("p1");
            let mut emotions = EmotionalStateModel::in_memory(bible);
            let mut engine = WorldEventEngine::in_memory(bible);
            emotions.initialize_player(&player);
            engine.initialize_player(&player);
            Self {
                player,
                memories: MemoryStore::in_memory(),
                emotions,
                engine,
            }
        }

        fn visit(&mut self, location: &str) -> Vec<WorldEvent> {
            let memory = self
                .memories
                .append(&self.player, MemoryDraft::new("visit").at(location), Utc::now());
            self.engine.check_triggers(
                &self.player,
                &memory,
                &self.memories,
                &mut self.emotions,
                Utc::now(),
            )
        }
    }

    #[test]
    fn test_event_fires_once_and_applies_consequences() {
        let bible = bible();
        let mut h = Harness::new(&bible);

        assert!(h.visit("gangnam").is_empty());

        let fired = h.visit("hongdae_cafe");
        assert_eq!(fired.len(), 1);
        assert!(fired[0].is_triggered);
        assert!(fired[0].trigger_date.is_some());

        let state = h
            .emotions
            .state(&h.player, &CharacterId::new("cha_hae_in"))
            .unwrap();
        assert!((state.relationship(RelationshipDimension::RomanticTension) - 0.15).abs() < 1e-6);

        assert!(h.visit("hongdae_cafe").is_empty());
        let stored = h
            .engine
            .event(&h.player, &WorldEventId::new("first_coffee_date"))
            .unwrap();
        assert_eq!(stored.trigger_date, fired[0].trigger_date);
    }

    #[test]
    fn test_unrecognized_condition_never_fires() {
        let mut bible = bible();
        bible.world_events[0]
            .trigger_conditions
            .push(TriggerCondition::Unrecognized("foo_bar_123".into()));
        let mut h = Harness::new(&bible);

        for _ in 0..5 {
            assert!(h.visit("hongdae_cafe").is_empty());
        }
    }

    #[test]
    fn test_mark_triggered_is_one_way() {
        let mut event = WorldEvent::from_definition(&bible().world_events[0]);
        let first = Utc::now();
        assert!(event.mark_triggered(first));
        assert!(!event.mark_triggered(Utc::now()));
        assert_eq!(event.trigger_date, Some(first));
    }

    #[test]
    fn test_catalogs_are_scoped_per_player() {
        let bible = bible();
        let mut h = Harness::new(&bible);
        h.visit("hongdae_cafe");

        let other = h.engine.events_for(&PlayerId::new("p2"));
        assert!(other.iter().all(|e| !e.is_triggered));
    }
}
