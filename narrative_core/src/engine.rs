//! The narrative engine - the single entry point for recording story
//! memories and reading narrative context.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use story_rules::{
    ArcId, CharacterEmotionalState, CharacterId, MemoryDraft, MemoryId, PlayerId, StoryBible,
    StoryMemory, WorldEventId, WorldEventType,
};

use crate::context_builder::{NarrativeBundle, NarrativeContext, NarrativeContextBuilder};
use crate::emotion::EmotionalStateModel;
use crate::error::Result;
use crate::events::{EventBus, NarrativeEvent, NarrativeSubscriber};
use crate::memory_store::MemoryStore;
use crate::repository::{
    InMemoryMemoryRepository, InMemoryRepository, MemoryRepository, PlayerScopedRepository,
};
use crate::snapshot::{EngineSnapshot, PlayerSnapshot};
use crate::story_arc::{StoryArc, StoryArcTracker};
use crate::world_events::{WorldEvent, WorldEventEngine};

/// Storage backing an engine.
pub struct Repositories {
    pub memories: Box<dyn MemoryRepository>,
    pub arcs: Box<dyn PlayerScopedRepository<StoryArc>>,
    pub emotional_states: Box<dyn PlayerScopedRepository<CharacterEmotionalState>>,
    pub world_events: Box<dyn PlayerScopedRepository<WorldEvent>>,
}

impl Repositories {
    /// Volatile storage that lives as long as the engine.
    pub fn in_memory() -> Self {
        Self {
            memories: Box::new(InMemoryMemoryRepository::new()),
            arcs: Box::new(InMemoryRepository::new()),
            emotional_states: Box::new(InMemoryRepository::new()),
            world_events: Box::new(InMemoryRepository::new()),
        }
    }
}

impl Default for Repositories {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Records memories and runs the story analyses over them.
///
/// Writing a memory runs, synchronously and in this order: arc progression,
/// world-event evaluation, emotional update. Subscribers see a
/// `MemoryAdded` event first, then any chapter events, then any world
/// events fired by that memory.
pub struct NarrativeEngine {
    memories: MemoryStore,
    arcs: StoryArcTracker,
    world_events: WorldEventEngine,
    emotions: EmotionalStateModel,
    context: NarrativeContextBuilder,
    bus: EventBus,
}

impl NarrativeEngine {
    /// Create an engine with in-memory storage.
    pub fn new(bible: StoryBible) -> Result<Self> {
        Self::with_repositories(bible, Repositories::in_memory())
    }

    /// Create an engine running the builtin story.
    pub fn with_builtin_bible() -> Result<Self> {
        Self::new(StoryBible::builtin()?)
    }

    /// Create an engine over caller-supplied storage.
    pub fn with_repositories(bible: StoryBible, repositories: Repositories) -> Result<Self> {
        bible.validate()?;

        Ok(Self {
            memories: MemoryStore::new(repositories.memories),
            arcs: StoryArcTracker::new(&bible, repositories.arcs),
            world_events: WorldEventEngine::new(&bible, repositories.world_events),
            emotions: EmotionalStateModel::new(&bible, repositories.emotional_states),
            context: NarrativeContextBuilder::new(&bible),
            bus: EventBus::new(),
        })
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn NarrativeSubscriber>) {
        self.bus.subscribe(subscriber);
    }

    /// Record a memory stamped with the current time.
    pub fn add_story_memory(&mut self, player: &PlayerId, draft: MemoryDraft) -> MemoryId {
        self.add_story_memory_at(player, draft, Utc::now())
    }

    /// Record a memory with an explicit timestamp, then run the analyses.
    pub fn add_story_memory_at(
        &mut self,
        player: &PlayerId,
        draft: MemoryDraft,
        timestamp: DateTime<Utc>,
    ) -> MemoryId {
        self.initialize_player(player);

        let memory = self.memories.append(player, draft, timestamp);
        self.bus.publish(NarrativeEvent::MemoryAdded {
            player: player.clone(),
            memory: memory.id,
        });

        for advance in self.arcs.evaluate(player, &memory) {
            if let Some(unlock) = advance.unlock {
                self.bus.publish(NarrativeEvent::ChapterEvent {
                    player: player.clone(),
                    arc: advance.arc_id,
                    chapter: advance.to_chapter,
                    unlock,
                });
            }
        }

        let fired = self.world_events.check_triggers(
            player,
            &memory,
            &self.memories,
            &mut self.emotions,
            timestamp,
        );
        for event in fired {
            if event.event_type == WorldEventType::RelationshipMilestone {
                self.arcs.record_milestone(player, event.title.clone());
            }
            self.bus.publish(NarrativeEvent::WorldEventTriggered {
                player: player.clone(),
                event: event.id,
                event_type: event.event_type,
                title: event.title,
            });
        }

        self.emotions.update(player, &memory);

        memory.id
    }

    fn initialize_player(&mut self, player: &PlayerId) {
        self.arcs.initialize_player(player);
        self.world_events.initialize_player(player);
        self.emotions.initialize_player(player);
    }

    /// Snapshot of the player's story for display.
    pub fn story_context(&self, player: &PlayerId) -> NarrativeContext {
        self.context.build(
            player,
            &self.memories,
            &self.arcs,
            &self.emotions,
            &self.world_events,
        )
    }

    /// Prompt, emotional summary and choices for the dialogue generator.
    pub fn generate_contextual_narrative(&self, player: &PlayerId, situation: &str) -> NarrativeBundle {
        let context = self.story_context(player);
        let primary = self.context.primary_character();
        let name = self
            .emotions
            .character_name(primary)
            .unwrap_or(primary.as_str());
        self.context.generate(&context, name, situation)
    }

    pub fn memories(&self, player: &PlayerId) -> Vec<StoryMemory> {
        self.memories.list(player)
    }

    pub fn emotional_state(
        &self,
        player: &PlayerId,
        character: &CharacterId,
    ) -> Option<CharacterEmotionalState> {
        self.emotions.state(player, character)
    }

    pub fn story_arc(&self, player: &PlayerId, arc: &ArcId) -> Option<StoryArc> {
        self.arcs.arc(player, arc)
    }

    pub fn world_event(&self, player: &PlayerId, event: &WorldEventId) -> Option<WorldEvent> {
        self.world_events.event(player, event)
    }

    /// Every player the engine holds state for.
    pub fn players(&self) -> Vec<PlayerId> {
        let players: BTreeSet<PlayerId> = self
            .memories
            .players()
            .into_iter()
            .chain(self.arcs.players())
            .chain(self.emotions.players())
            .chain(self.world_events.players())
            .collect();
        players.into_iter().collect()
    }

    /// Capture all state for persistence.
    pub fn snapshot(&self) -> EngineSnapshot {
        let players = self
            .players()
            .into_iter()
            .map(|player| {
                let snapshot = PlayerSnapshot {
                    memories: self.memories.list(&player),
                    arcs: self.arcs.arcs_for(&player),
                    emotional_states: self.emotions.states_for(&player),
                    world_events: self.world_events.events_for(&player),
                };
                (player, snapshot)
            })
            .collect();

        EngineSnapshot { players }
    }

    /// Replace all state with a snapshot. Subscribers are kept and are not
    /// notified.
    pub fn restore(&mut self, snapshot: EngineSnapshot) {
        self.memories.clear();
        self.arcs.clear();
        self.emotions.clear();
        self.world_events.clear();

        for (player, state) in snapshot.players {
            self.restore_player(&player, state);
        }
        tracing::info!(players = self.players().len(), "narrative state restored");
    }

    /// Put back one player's state, then open anything the current bible
    /// defines that the snapshot predates.
    fn restore_player(&mut self, player: &PlayerId, state: PlayerSnapshot) {
        for memory in state.memories {
            self.memories.restore(player, memory);
        }
        for arc in state.arcs {
            self.arcs.restore(player, arc);
        }
        for emotional_state in state.emotional_states {
            self.emotions.restore(player, emotional_state);
        }
        for event in state.world_events {
            self.world_events.restore(player, event);
        }
        self.initialize_player(player);
    }
}
