//! TOML representation of a story bible and its conversion to typed rules.
//!
//! TOML keys are always strings, so chapter numbers and dimension names are
//! read as text here and parsed into their typed form, rejecting anything
//! outside the known vocabulary.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::{ArcDefinition, ArcId, NarrativeTuning, StoryBible, WorldEventDefinition, WorldEventId};
use crate::entities::{CharacterId, CharacterProfile};
use crate::error::{BibleError, Result};
use crate::mechanics::{
    Consequence, MoodDimension, RelationshipDimension, TriggerCondition, WorldEventType,
};

#[derive(Debug, Deserialize)]
struct RawBible {
    #[serde(default)]
    tuning: NarrativeTuning,
    main_arc: String,
    primary_character: String,
    arcs: Vec<RawArc>,
    characters: Vec<RawCharacter>,
    #[serde(default)]
    mood_tags: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    world_events: Vec<RawWorldEvent>,
}

#[derive(Debug, Deserialize)]
struct RawArc {
    id: String,
    title: String,
    #[serde(default)]
    theme: String,
    total_chapters: u32,
    #[serde(default)]
    chapter_triggers: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    chapter_unlocks: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawCharacter {
    id: String,
    name: String,
    #[serde(default)]
    base_personality: BTreeMap<String, f32>,
    #[serde(default)]
    mood: BTreeMap<String, f32>,
    #[serde(default)]
    relationship: BTreeMap<String, f32>,
}

#[derive(Debug, Deserialize)]
struct RawWorldEvent {
    id: String,
    event_type: WorldEventType,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    conditions: Vec<String>,
    #[serde(default)]
    consequences: Vec<String>,
    target_character: Option<String>,
}

pub(super) fn parse_bible(content: &str) -> Result<StoryBible> {
    let raw: RawBible = toml::from_str(content)?;
    let primary_character = CharacterId::new(raw.primary_character);

    let arcs = raw
        .arcs
        .into_iter()
        .map(convert_arc)
        .collect::<Result<Vec<_>>>()?;

    let characters = raw
        .characters
        .into_iter()
        .map(convert_character)
        .collect::<Result<Vec<_>>>()?;

    let mut mood_tags = BTreeMap::new();
    for (name, tags) in raw.mood_tags {
        mood_tags.insert(name.parse::<MoodDimension>()?, tags);
    }

    let world_events = raw
        .world_events
        .into_iter()
        .map(|event| convert_event(event, &primary_character))
        .collect::<Result<Vec<_>>>()?;

    Ok(StoryBible {
        tuning: raw.tuning,
        main_arc: ArcId::new(raw.main_arc),
        primary_character,
        arcs,
        characters,
        mood_tags,
        world_events,
    })
}

fn parse_chapter(arc: &str, key: &str) -> Result<u32> {
    key.parse().map_err(|_| BibleError::InvalidArc {
        arc: arc.to_string(),
        reason: format!("chapter key '{}' is not a number", key),
    })
}

fn convert_arc(raw: RawArc) -> Result<ArcDefinition> {
    let mut arc = ArcDefinition::new(raw.id.as_str(), raw.title, raw.total_chapters)
        .with_theme(raw.theme);

    for (key, tags) in raw.chapter_triggers {
        let chapter = parse_chapter(&raw.id, &key)?;
        arc = arc.with_triggers(chapter, tags);
    }
    for (key, description) in raw.chapter_unlocks {
        let chapter = parse_chapter(&raw.id, &key)?;
        arc = arc.with_unlock(chapter, description);
    }

    Ok(arc)
}

fn convert_character(raw: RawCharacter) -> Result<CharacterProfile> {
    let mut profile = CharacterProfile::new(raw.id, raw.name);

    for (name, value) in raw.base_personality {
        profile = profile.with_trait(name, value);
    }
    for (name, value) in raw.mood {
        profile = profile.with_mood(name.parse::<MoodDimension>()?, value);
    }
    for (name, value) in raw.relationship {
        profile = profile.with_relationship(name.parse::<RelationshipDimension>()?, value);
    }

    Ok(profile)
}

fn convert_event(raw: RawWorldEvent, primary: &CharacterId) -> Result<WorldEventDefinition> {
    let target = raw
        .target_character
        .map(CharacterId::new)
        .unwrap_or_else(|| primary.clone());

    let trigger_conditions = raw
        .conditions
        .iter()
        .map(|c| c.parse::<TriggerCondition>())
        .collect::<Result<Vec<_>>>()?;

    let mut event = WorldEventDefinition::new(
        WorldEventId::new(raw.id),
        raw.event_type,
        raw.title,
        target,
    )
    .with_description(raw.description);
    event.trigger_conditions = trigger_conditions;
    event.consequences = raw.consequences.iter().map(|c| Consequence::parse(c)).collect();

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        main_arc = "main"
        primary_character = "npc"

        [[arcs]]
        id = "main"
        title = "Main"
        total_chapters = 3

        [arcs.chapter_triggers]
        1 = ["first_meeting"]

        [arcs.chapter_unlocks]
        2 = "They know your name."

        [[characters]]
        id = "npc"
        name = "Npc"
        mood = { happiness = 0.5 }
        relationship = { personal_affection = 0.25 }

        [mood_tags]
        happiness = ["joy"]

        [[world_events]]
        id = "meet_cute"
        event_type = "relationship_milestone"
        title = "Meet Cute"
        conditions = ["location_park", "affection_above_20"]
        consequences = ["romantic_tension_increase", "mystery_key"]
    "#;

    #[test]
    fn test_parse_minimal_bible() {
        let bible = parse_bible(MINIMAL).unwrap();

        let arc = &bible.arcs[0];
        assert_eq!(arc.triggers_for(1), ["first_meeting".to_string()]);
        assert_eq!(arc.unlock_for(2), Some("They know your name."));

        let npc = &bible.characters[0];
        assert_eq!(npc.initial_mood[&MoodDimension::Happiness], 0.5);

        let event = &bible.world_events[0];
        assert_eq!(event.target_character, CharacterId::new("npc"));
        assert_eq!(event.trigger_conditions.len(), 2);
        assert_eq!(
            event.consequences[1],
            Consequence::Unrecognized("mystery_key".to_string())
        );
        assert_eq!(bible.tuning, NarrativeTuning::default());
    }

    #[test]
    fn test_unknown_condition_fails_load() {
        let content = MINIMAL.replace("location_park", "foo_bar_123");
        assert!(matches!(
            parse_bible(&content),
            Err(BibleError::InvalidCondition(raw)) if raw == "foo_bar_123"
        ));
    }

    #[test]
    fn test_unknown_mood_dimension_fails_load() {
        let content = MINIMAL.replace("happiness = [\"joy\"]", "melancholy = [\"rain\"]");
        assert!(matches!(
            parse_bible(&content),
            Err(BibleError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_degenerate_tuning_fails_load() {
        for (line, field) in [
            ("impact_scale = 0.0", "impact_scale"),
            ("tension_divisor = -50.0", "tension_divisor"),
            ("mood_step = nan", "mood_step"),
        ] {
            let content = MINIMAL.replace(
                "primary_character = \"npc\"",
                &format!("primary_character = \"npc\"\n[tuning]\n{line}"),
            );
            let err = StoryBible::from_toml_str(&content).unwrap_err();
            assert!(
                matches!(&err, BibleError::InvalidTuning { field: f, .. } if *f == field),
                "{line} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(parse_bible("main_arc = "), Err(BibleError::Toml(_))));
    }
}
