//! Story arc tracker - chapter progression per player.

use serde::{Deserialize, Serialize};

use story_rules::{ArcDefinition, ArcId, MemoryId, PlayerId, StoryBible, StoryMemory};

use crate::repository::{InMemoryRepository, Keyed, PlayerScopedRepository};

/// A player's progress through one arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryArc {
    pub id: ArcId,
    pub title: String,
    pub theme: String,

    /// Starts at 1, never decreases, never exceeds `total_chapters`.
    pub current_chapter: u32,
    pub total_chapters: u32,

    /// Memories that moved this arc forward.
    pub major_events: Vec<MemoryId>,
    pub relationship_milestones: Vec<String>,
}

impl StoryArc {
    pub fn from_definition(definition: &ArcDefinition) -> Self {
        Self {
            id: definition.id.clone(),
            title: definition.title.clone(),
            theme: definition.theme.clone(),
            current_chapter: 1,
            total_chapters: definition.total_chapters,
            major_events: Vec::new(),
            relationship_milestones: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_chapter == self.total_chapters
    }

    /// Move to the next chapter. Returns the new chapter, or `None` when the
    /// arc is already complete.
    pub fn advance(&mut self) -> Option<u32> {
        if self.current_chapter >= self.total_chapters {
            return None;
        }
        self.current_chapter += 1;
        Some(self.current_chapter)
    }
}

impl Keyed for StoryArc {
    type Key = ArcId;

    fn key(&self) -> &ArcId {
        &self.id
    }
}

/// A successful chapter advance.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterAdvance {
    pub arc_id: ArcId,
    pub from_chapter: u32,
    pub to_chapter: u32,

    /// What reaching `to_chapter` unlocks, if the arc authors anything.
    pub unlock: Option<String>,
}

/// Advances arcs when a memory matches the current chapter's triggers.
pub struct StoryArcTracker {
    definitions: Vec<ArcDefinition>,
    main_arc: ArcId,
    arcs: Box<dyn PlayerScopedRepository<StoryArc>>,
}

impl StoryArcTracker {
    pub fn new(bible: &StoryBible, arcs: Box<dyn PlayerScopedRepository<StoryArc>>) -> Self {
        Self {
            definitions: bible.arcs.clone(),
            main_arc: bible.main_arc.clone(),
            arcs,
        }
    }

    pub fn in_memory(bible: &StoryBible) -> Self {
        Self::new(bible, Box::new(InMemoryRepository::new()))
    }

    /// Open, at chapter 1, every authored arc the player does not have yet.
    pub fn initialize_player(&mut self, player: &PlayerId) {
        for definition in &self.definitions {
            if self.arcs.get(player, &definition.id).is_none() {
                self.arcs.put(player, StoryArc::from_definition(definition));
            }
        }
    }

    /// Whether `memory` moves `arc` out of its current chapter.
    ///
    /// Matches either a tag in the chapter's trigger list, or any trigger
    /// appearing as a case-insensitive substring of the event text. The
    /// substring fallback is loose on purpose and accepts false positives.
    pub fn should_advance(definition: &ArcDefinition, arc: &StoryArc, memory: &StoryMemory) -> bool {
        let triggers = definition.triggers_for(arc.current_chapter);
        if triggers.is_empty() {
            return false;
        }
        if memory.count_matching_tags(triggers) > 0 {
            return true;
        }
        triggers.iter().any(|t| memory.event_mentions(t))
    }

    /// Check every arc of the player against a new memory.
    pub fn evaluate(&mut self, player: &PlayerId, memory: &StoryMemory) -> Vec<ChapterAdvance> {
        let mut advances = Vec::new();

        for mut arc in self.arcs.all_for_player(player) {
            let Some(definition) = self.definitions.iter().find(|d| d.id == arc.id) else {
                continue;
            };
            if arc.is_complete() || !Self::should_advance(definition, &arc, memory) {
                continue;
            }

            let from_chapter = arc.current_chapter;
            let Some(to_chapter) = arc.advance() else {
                continue;
            };
            arc.major_events.push(memory.id);

            tracing::info!(
                player = %player,
                arc = %arc.id,
                from_chapter,
                to_chapter,
                "story arc advanced"
            );

            advances.push(ChapterAdvance {
                arc_id: arc.id.clone(),
                from_chapter,
                to_chapter,
                unlock: definition.unlock_for(to_chapter).map(str::to_string),
            });
            self.arcs.put(player, arc);
        }

        advances
    }

    /// Note a relationship milestone on the player's main arc.
    pub fn record_milestone(&mut self, player: &PlayerId, milestone: impl Into<String>) {
        if let Some(mut arc) = self.arcs.get(player, &self.main_arc) {
            arc.relationship_milestones.push(milestone.into());
            self.arcs.put(player, arc);
        }
    }

    /// All arcs of a player; players never seen get fresh arcs.
    pub fn arcs_for(&self, player: &PlayerId) -> Vec<StoryArc> {
        if self.arcs.has_player(player) {
            self.arcs.all_for_player(player)
        } else {
            self.definitions.iter().map(StoryArc::from_definition).collect()
        }
    }

    pub fn arc(&self, player: &PlayerId, id: &ArcId) -> Option<StoryArc> {
        self.arcs.get(player, id)
    }

    pub fn players(&self) -> Vec<PlayerId> {
        self.arcs.players()
    }

    pub(crate) fn restore(&mut self, player: &PlayerId, arc: StoryArc) {
        self.arcs.put(player, arc);
    }

    pub(crate) fn clear(&mut self) {
        self.arcs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use story_rules::{CharacterProfile, MemoryDraft};

    fn bible() -> StoryBible {
        StoryBible::new(
            ArcDefinition::new("main", "Shadows and Swords", 3)
                .with_triggers(1, ["professional_recognition"])
                .with_triggers(2, ["raid"])
                .with_unlock(2, "Late-night calls unlocked."),
            CharacterProfile::new("cha_hae_in", "Cha Hae-In"),
        )
    }

    fn memory(event: &str, tags: &[&str]) -> StoryMemory {
        MemoryDraft::new(event)
            .with_tags(tags.iter().copied())
            .into_memory(Utc::now())
    }

    fn main_arc() -> ArcId {
        ArcId::new("main")
    }

    #[test]
    fn test_tag_match_advances_with_unlock() {
        let mut tracker = StoryArcTracker::in_memory(&bible());
        let player = PlayerId::new("p1");
        tracker.initialize_player(&player);

        let recognised = memory("Praised by the Association", &["professional_recognition"]);
        let advances = tracker.evaluate(&player, &recognised);

        assert_eq!(
            advances,
            vec![ChapterAdvance {
                arc_id: main_arc(),
                from_chapter: 1,
                to_chapter: 2,
                unlock: Some("Late-night calls unlocked.".to_string()),
            }]
        );
        let arc = tracker.arc(&player, &main_arc()).unwrap();
        assert_eq!(arc.current_chapter, 2);
        assert_eq!(arc.major_events, vec![recognised.id]);
    }

    #[test]
    fn test_unrelated_memory_does_not_advance() {
        let mut tracker = StoryArcTracker::in_memory(&bible());
        let player = PlayerId::new("p1");
        tracker.initialize_player(&player);

        assert!(tracker.evaluate(&player, &memory("Bought groceries", &["errand"])).is_empty());
        assert_eq!(tracker.arc(&player, &main_arc()).unwrap().current_chapter, 1);
    }

    #[test]
    fn test_substring_fallback_is_case_insensitive() {
        let mut tracker = StoryArcTracker::in_memory(&bible());
        let player = PlayerId::new("p1");
        tracker.initialize_player(&player);
        tracker.evaluate(&player, &memory("x", &["professional_recognition"]));

        let advances = tracker.evaluate(&player, &memory("Joined the RAID on Jeju island", &[]));
        assert_eq!(advances.len(), 1);
        assert_eq!(advances[0].to_chapter, 3);
        assert_eq!(advances[0].unlock, None);
    }

    #[test]
    fn test_complete_arc_never_advances() {
        let mut tracker = StoryArcTracker::in_memory(&bible());
        let player = PlayerId::new("p1");
        tracker.initialize_player(&player);
        tracker.evaluate(&player, &memory("x", &["professional_recognition"]));
        tracker.evaluate(&player, &memory("x", &["raid"]));

        let arc = tracker.arc(&player, &main_arc()).unwrap();
        assert!(arc.is_complete());

        let advances = tracker.evaluate(&player, &memory("raid again", &["raid", "professional_recognition"]));
        assert!(advances.is_empty());
        assert_eq!(tracker.arc(&player, &main_arc()).unwrap().current_chapter, 3);
    }

    #[test]
    fn test_advance_caps_at_total() {
        let mut arc = StoryArc::from_definition(&ArcDefinition::new("short", "Short", 2));
        assert_eq!(arc.advance(), Some(2));
        assert_eq!(arc.advance(), None);
        assert_eq!(arc.current_chapter, 2);
    }

    #[test]
    fn test_single_chapter_arc_is_complete_from_start() {
        let arc = StoryArc::from_definition(&ArcDefinition::new("oneshot", "One Shot", 1));
        assert!(arc.is_complete());
    }

    #[test]
    fn test_record_milestone_on_main_arc() {
        let mut tracker = StoryArcTracker::in_memory(&bible());
        let player = PlayerId::new("p1");
        tracker.initialize_player(&player);

        tracker.record_milestone(&player, "First Coffee Date");
        assert_eq!(
            tracker.arc(&player, &main_arc()).unwrap().relationship_milestones,
            vec!["First Coffee Date".to_string()]
        );
    }

    #[test]
    fn test_unseen_player_gets_fresh_arcs() {
        let tracker = StoryArcTracker::in_memory(&bible());
        let arcs = tracker.arcs_for(&PlayerId::new("newcomer"));
        assert_eq!(arcs.len(), 1);
        assert_eq!(arcs[0].current_chapter, 1);
    }
}
