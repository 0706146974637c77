//! Narrative tension and pacing tiers.

use serde::{Deserialize, Serialize};

use story_rules::StoryMemory;

/// How fast the story should feel, from calm to peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    Slow,
    Moderate,
    Intense,
    Climactic,
}

impl Pacing {
    /// Classify from tension and the main arc's chapter. Tiers are checked
    /// from the top down; the first match wins.
    pub fn classify(tension: f32, main_chapter: u32) -> Self {
        if tension > 0.8 || main_chapter >= 10 {
            Pacing::Climactic
        } else if tension > 0.6 || main_chapter >= 7 {
            Pacing::Intense
        } else if tension > 0.3 || main_chapter >= 4 {
            Pacing::Moderate
        } else {
            Pacing::Slow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pacing::Slow => "slow",
            Pacing::Moderate => "moderate",
            Pacing::Intense => "intense",
            Pacing::Climactic => "climactic",
        }
    }

    /// The canned player choices offered at this pacing.
    pub fn suggested_responses(&self) -> [&'static str; 3] {
        match self {
            Pacing::Climactic => [
                "Stand beside her no matter what comes through the gate.",
                "Tell her everything you have been holding back.",
                "Take her hand and face it together.",
            ],
            Pacing::Intense => [
                "Ask her what she is really afraid of.",
                "Promise to have her back in the next raid.",
                "Close the distance between you.",
            ],
            Pacing::Moderate => [
                "Suggest grabbing a meal after the briefing.",
                "Ask about her training routine.",
                "Share a story from your early days as a hunter.",
            ],
            Pacing::Slow => [
                "Greet her with a nod.",
                "Comment on the latest gate reports.",
                "Offer to help with the paperwork.",
            ],
        }
    }
}

impl std::fmt::Display for Pacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summed absolute impact of `recent` divided by `divisor`, capped at 1.0.
pub fn narrative_tension(recent: &[StoryMemory], divisor: f32) -> f32 {
    if divisor <= 0.0 {
        return 0.0;
    }
    let total: f32 = recent.iter().map(|m| m.emotional_impact.abs()).sum();
    (total / divisor).min(1.0)
}
