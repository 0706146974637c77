use chrono::{TimeZone, Utc};
use narrative_core::{narrative_tension, EngineSnapshot, NarrativeEngine, Pacing};
use proptest::prelude::*;
use story_rules::{
    ArcId, CharacterId, MemoryDraft, MoodDimension, PlayerId, RelationshipDimension, WorldEventId,
};

const TAGS: &[&str] = &[
    "intimate_conversation",
    "professional_recognition",
    "joy",
    "victory",
    "vulnerability",
    "shared_meal",
    "date",
    "confession",
    "crisis",
    "personal_growth",
    "errand",
];

const LOCATIONS: &[&str] = &[
    "hunter_association",
    "hongdae_cafe",
    "red_gate",
    "training_grounds",
    "han_river_park",
    "home",
];

fn draft() -> impl Strategy<Value = MemoryDraft> {
    (
        prop::sample::select(LOCATIONS),
        prop::collection::vec(prop::sample::select(TAGS), 0..4),
        -10.0_f32..=10.0,
    )
        .prop_map(|(location, tags, impact)| {
            MemoryDraft::new("Something happened")
                .at(location)
                .with_tags(tags)
                .with_impact(impact)
        })
}

fn run(drafts: &[MemoryDraft]) -> NarrativeEngine {
    let mut engine = NarrativeEngine::with_builtin_bible().unwrap();
    let player = PlayerId::new("p");
    for draft in drafts {
        engine.add_story_memory(&player, draft.clone());
    }
    engine
}

proptest! {
    #[test]
    fn emotional_dimensions_stay_in_bounds(drafts in prop::collection::vec(draft(), 1..40)) {
        let engine = run(&drafts);
        let player = PlayerId::new("p");
        for id in ["cha_hae_in", "yoo_jin_ho"] {
            let state = engine.emotional_state(&player, &CharacterId::new(id)).unwrap();
            prop_assert!(state.is_within_bounds());
            for dim in MoodDimension::ALL {
                let v = state.mood(dim);
                prop_assert!((0.0..=1.0).contains(&v));
            }
            for dim in RelationshipDimension::ALL {
                let v = state.relationship(dim);
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn chapters_never_go_backwards(drafts in prop::collection::vec(draft(), 1..40)) {
        let mut engine = NarrativeEngine::with_builtin_bible().unwrap();
        let player = PlayerId::new("p");
        let main = ArcId::new("main_story");
        let mut last = 1;
        for draft in drafts {
            engine.add_story_memory(&player, draft);
            let arc = engine.story_arc(&player, &main).unwrap();
            prop_assert!(arc.current_chapter >= last);
            prop_assert!(arc.current_chapter <= last + 1);
            prop_assert!(arc.current_chapter <= arc.total_chapters);
            last = arc.current_chapter;
        }
    }

    #[test]
    fn world_events_fire_at_most_once(drafts in prop::collection::vec(draft(), 1..60)) {
        let mut engine = NarrativeEngine::with_builtin_bible().unwrap();
        let player = PlayerId::new("p");
        let id = WorldEventId::new("association_briefing");
        let mut first_date = None;
        for draft in drafts {
            engine.add_story_memory(&player, draft);
            let event = engine.world_event(&player, &id).unwrap();
            match first_date {
                Some(date) => {
                    prop_assert!(event.is_triggered);
                    prop_assert_eq!(event.trigger_date, Some(date));
                }
                None => first_date = event.trigger_date,
            }
        }
    }

    #[test]
    fn same_drafts_give_same_story(drafts in prop::collection::vec(draft(), 1..30)) {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let player = PlayerId::new("p");
        let mut a = NarrativeEngine::with_builtin_bible().unwrap();
        let mut b = NarrativeEngine::with_builtin_bible().unwrap();
        for draft in &drafts {
            a.add_story_memory_at(&player, draft.clone(), at);
            b.add_story_memory_at(&player, draft.clone(), at);
        }

        let (x, y) = (a.story_context(&player), b.story_context(&player));
        prop_assert_eq!(x.narrative_tension, y.narrative_tension);
        prop_assert_eq!(x.pacing, y.pacing);
        let chapters = |arcs: &[narrative_core::StoryArc]| {
            arcs.iter().map(|arc| (arc.id.clone(), arc.current_chapter)).collect::<Vec<_>>()
        };
        prop_assert_eq!(chapters(&x.active_arcs), chapters(&y.active_arcs));
        prop_assert_eq!(x.emotional_states.len(), y.emotional_states.len());
        for (sx, sy) in x.emotional_states.iter().zip(&y.emotional_states) {
            prop_assert_eq!(&sx.current_mood, &sy.current_mood);
            prop_assert_eq!(&sx.relationship_dynamics, &sy.relationship_dynamics);
        }
        prop_assert_eq!(x.world_events, y.world_events);
    }

    #[test]
    fn tension_is_bounded(impacts in prop::collection::vec(-10.0_f32..=10.0, 0..30)) {
        let memories: Vec<_> = impacts
            .iter()
            .map(|i| MemoryDraft::new("x").with_impact(*i).into_memory(Utc::now()))
            .collect();
        let tension = narrative_tension(&memories, 50.0);
        prop_assert!((0.0..=1.0).contains(&tension));
    }

    #[test]
    fn pacing_never_slows_as_tension_rises(a in 0.0_f32..=1.0, b in 0.0_f32..=1.0, chapter in 1_u32..13) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(Pacing::classify(low, chapter) <= Pacing::classify(high, chapter));
    }

    #[test]
    fn snapshots_survive_json(drafts in prop::collection::vec(draft(), 0..20)) {
        let engine = run(&drafts);
        let snapshot = engine.snapshot();
        let decoded = EngineSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        prop_assert_eq!(decoded, snapshot);
    }
}
