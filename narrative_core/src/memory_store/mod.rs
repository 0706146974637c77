//! Memory store - the append-only log of what each player has lived through.

use chrono::{DateTime, Utc};

use story_rules::{MemoryDraft, PlayerId, StoryMemory};

use crate::repository::{InMemoryMemoryRepository, MemoryRepository};

/// Records story memories and answers history queries over them.
pub struct MemoryStore {
    repository: Box<dyn MemoryRepository>,
}

impl MemoryStore {
    pub fn new(repository: Box<dyn MemoryRepository>) -> Self {
        Self { repository }
    }

    /// Create a store backed by volatile memory.
    pub fn in_memory() -> Self {
        Self::new(Box::new(InMemoryMemoryRepository::new()))
    }

    /// Seal a draft with a fresh id and the given timestamp and append it.
    ///
    /// Returns the stored record; the store itself never hands out mutable
    /// access to it again.
    pub fn append(
        &mut self,
        player: &PlayerId,
        draft: MemoryDraft,
        timestamp: DateTime<Utc>,
    ) -> StoryMemory {
        let memory = draft.into_memory(timestamp);
        tracing::debug!(
            player = %player,
            memory = %memory.id,
            location = %memory.location,
            impact = memory.emotional_impact,
            "story memory recorded"
        );
        self.repository.append(player, memory.clone());
        memory
    }

    /// All memories of a player, oldest first.
    pub fn list(&self, player: &PlayerId) -> Vec<StoryMemory> {
        self.repository.list(player)
    }

    pub fn count_tagged(&self, player: &PlayerId, tag: &str) -> usize {
        self.repository.count_tagged(player, tag)
    }

    /// The last `n` memories of a player, oldest first.
    pub fn recent(&self, player: &PlayerId, n: usize) -> Vec<StoryMemory> {
        self.repository.recent(player, n)
    }

    pub fn len(&self, player: &PlayerId) -> usize {
        self.repository.len(player)
    }

    pub fn is_empty(&self, player: &PlayerId) -> bool {
        self.len(player) == 0
    }

    pub fn players(&self) -> Vec<PlayerId> {
        self.repository.players()
    }

    /// Put back a previously recorded memory, keeping its id and timestamp.
    pub(crate) fn restore(&mut self, player: &PlayerId, memory: StoryMemory) {
        self.repository.append(player, memory);
    }

    pub(crate) fn clear(&mut self) {
        self.repository.clear();
    }
}
