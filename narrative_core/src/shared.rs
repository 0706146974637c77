//! Thread-safe handle to a narrative engine.
//!
//! Every operation takes the engine lock for its full duration, so a memory
//! write and all the analyses it triggers are atomic with respect to readers.

use std::sync::{Arc, Mutex, MutexGuard};

use story_rules::{ArcId, CharacterEmotionalState, CharacterId, MemoryDraft, MemoryId, PlayerId};

use crate::context_builder::{NarrativeBundle, NarrativeContext};
use crate::engine::NarrativeEngine;
use crate::error::{NarrativeError, Result};
use crate::events::NarrativeSubscriber;
use crate::snapshot::EngineSnapshot;
use crate::story_arc::StoryArc;

#[derive(Clone)]
pub struct SharedNarrativeEngine {
    inner: Arc<Mutex<NarrativeEngine>>,
}

impl SharedNarrativeEngine {
    pub fn new(engine: NarrativeEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, NarrativeEngine>> {
        self.inner.lock().map_err(|_| NarrativeError::LockPoisoned)
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut NarrativeEngine) -> R) -> Result<R> {
        let mut engine = self.lock()?;
        Ok(f(&mut engine))
    }

    pub fn subscribe(&self, subscriber: Box<dyn NarrativeSubscriber>) -> Result<()> {
        self.lock()?.subscribe(subscriber);
        Ok(())
    }

    pub fn add_story_memory(&self, player: &PlayerId, draft: MemoryDraft) -> Result<MemoryId> {
        Ok(self.lock()?.add_story_memory(player, draft))
    }

    pub fn story_context(&self, player: &PlayerId) -> Result<NarrativeContext> {
        Ok(self.lock()?.story_context(player))
    }

    pub fn generate_contextual_narrative(
        &self,
        player: &PlayerId,
        situation: &str,
    ) -> Result<NarrativeBundle> {
        Ok(self.lock()?.generate_contextual_narrative(player, situation))
    }

    pub fn emotional_state(
        &self,
        player: &PlayerId,
        character: &CharacterId,
    ) -> Result<Option<CharacterEmotionalState>> {
        Ok(self.lock()?.emotional_state(player, character))
    }

    pub fn story_arc(&self, player: &PlayerId, arc: &ArcId) -> Result<Option<StoryArc>> {
        Ok(self.lock()?.story_arc(player, arc))
    }

    pub fn snapshot(&self) -> Result<EngineSnapshot> {
        Ok(self.lock()?.snapshot())
    }

    pub fn restore(&self, snapshot: EngineSnapshot) -> Result<()> {
        self.lock()?.restore(snapshot);
        Ok(())
    }
}
