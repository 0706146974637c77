//! Storage seams for engine state.
//!
//! Rule logic talks to these traits only, so the in-memory stores below can
//! be swapped for persistent ones without touching the analyses.

use std::collections::HashMap;

use story_rules::{PlayerId, StoryMemory};

/// Append-only log of story memories, one ordered list per player.
pub trait MemoryRepository: Send {
    /// Append a memory to the end of the player's list.
    fn append(&mut self, player: &PlayerId, memory: StoryMemory);

    /// All memories of a player in insertion order.
    fn list(&self, player: &PlayerId) -> Vec<StoryMemory>;

    /// Every player with at least one memory.
    fn players(&self) -> Vec<PlayerId>;

    /// Drop all stored memories.
    fn clear(&mut self);

    /// Number of memories of a player carrying `tag`.
    fn count_tagged(&self, player: &PlayerId, tag: &str) -> usize {
        self.list(player).iter().filter(|m| m.has_tag(tag)).count()
    }

    /// The last `n` memories of a player, oldest first.
    fn recent(&self, player: &PlayerId, n: usize) -> Vec<StoryMemory> {
        let all = self.list(player);
        let skip = all.len().saturating_sub(n);
        all.into_iter().skip(skip).collect()
    }

    fn len(&self, player: &PlayerId) -> usize {
        self.list(player).len()
    }
}

/// Values that can be looked up by a key within one player's scope.
pub trait Keyed {
    type Key: Eq;

    fn key(&self) -> &Self::Key;
}

/// Keyed, mutable per-player records (arcs, emotional states, world events).
pub trait PlayerScopedRepository<T: Keyed>: Send {
    fn get(&self, player: &PlayerId, key: &T::Key) -> Option<T>;

    /// Insert or replace the record with the same key.
    fn put(&mut self, player: &PlayerId, value: T);

    /// Visit the player's records in insertion order.
    fn for_each_for_player(&self, player: &PlayerId, f: &mut dyn FnMut(&T));

    fn players(&self) -> Vec<PlayerId>;

    fn clear(&mut self);

    fn all_for_player(&self, player: &PlayerId) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = Vec::new();
        self.for_each_for_player(player, &mut |v| values.push(v.clone()));
        values
    }

    fn has_player(&self, player: &PlayerId) -> bool {
        let mut found = false;
        self.for_each_for_player(player, &mut |_| found = true);
        found
    }
}

/// Volatile memory log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemoryRepository {
    memories: HashMap<PlayerId, Vec<StoryMemory>>,
}

impl InMemoryMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryRepository for InMemoryMemoryRepository {
    fn append(&mut self, player: &PlayerId, memory: StoryMemory) {
        self.memories.entry(player.clone()).or_default().push(memory);
    }

    fn list(&self, player: &PlayerId) -> Vec<StoryMemory> {
        self.memories.get(player).cloned().unwrap_or_default()
    }

    fn players(&self) -> Vec<PlayerId> {
        self.memories.keys().cloned().collect()
    }

    fn clear(&mut self) {
        self.memories.clear();
    }

    fn count_tagged(&self, player: &PlayerId, tag: &str) -> usize {
        self.memories
            .get(player)
            .map(|list| list.iter().filter(|m| m.has_tag(tag)).count())
            .unwrap_or(0)
    }

    fn recent(&self, player: &PlayerId, n: usize) -> Vec<StoryMemory> {
        self.memories
            .get(player)
            .map(|list| list[list.len().saturating_sub(n)..].to_vec())
            .unwrap_or_default()
    }

    fn len(&self, player: &PlayerId) -> usize {
        self.memories.get(player).map(Vec::len).unwrap_or(0)
    }
}

/// Volatile keyed store preserving insertion order per player.
#[derive(Debug, Clone)]
pub struct InMemoryRepository<T> {
    entries: HashMap<PlayerId, Vec<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PlayerScopedRepository<T> for InMemoryRepository<T>
where
    T: Keyed + Clone + Send,
{
    fn get(&self, player: &PlayerId, key: &T::Key) -> Option<T> {
        self.entries
            .get(player)
            .and_then(|values| values.iter().find(|v| v.key() == key))
            .cloned()
    }

    fn put(&mut self, player: &PlayerId, value: T) {
        let values = self.entries.entry(player.clone()).or_default();
        if let Some(existing) = values.iter_mut().find(|v| v.key() == value.key()) {
            *existing = value;
        } else {
            values.push(value);
        }
    }

    fn for_each_for_player(&self, player: &PlayerId, f: &mut dyn FnMut(&T)) {
        if let Some(values) = self.entries.get(player) {
            values.iter().for_each(|v| f(v));
        }
    }

    fn players(&self) -> Vec<PlayerId> {
        self.entries.keys().cloned().collect()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
