//! Evaluation of world-event trigger conditions.

use story_rules::{StoryMemory, TriggerCondition};

/// Facts a condition can be tested against.
#[derive(Debug, Clone, Copy)]
pub struct ConditionContext<'a> {
    /// The memory that prompted this evaluation.
    pub memory: &'a StoryMemory,

    /// `personal_affection` of the event's target character, if tracked.
    pub affection: Option<f32>,

    /// All-time count of `intimate_conversation` memories, including `memory`.
    pub intimate_conversations: usize,
}

/// Test a single condition.
pub fn is_satisfied(condition: &TriggerCondition, ctx: &ConditionContext<'_>) -> bool {
    match condition {
        TriggerCondition::AffectionAbove(threshold) => ctx
            .affection
            .map(|a| a * 100.0 > *threshold as f32)
            .unwrap_or(false),
        TriggerCondition::Location(location) => ctx.memory.location == *location,
        TriggerCondition::IntimateConversationCount(n) => {
            ctx.intimate_conversations >= *n as usize
        }
        TriggerCondition::Unrecognized(raw) => {
            tracing::warn!(condition = %raw, "unrecognized trigger condition evaluates false");
            false
        }
    }
}

/// AND over every condition.
pub fn all_satisfied(conditions: &[TriggerCondition], ctx: &ConditionContext<'_>) -> bool {
    conditions.iter().all(|c| is_satisfied(c, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use story_rules::MemoryDraft;

    fn memory_at(location: &str) -> StoryMemory {
        MemoryDraft::new("x").at(location).into_memory(Utc::now())
    }

    #[test]
    fn test_affection_threshold_is_strict() {
        let memory = memory_at("anywhere");
        let mut ctx = ConditionContext {
            memory: &memory,
            affection: Some(0.45),
            intimate_conversations: 0,
        };
        assert!(is_satisfied(&TriggerCondition::AffectionAbove(40), &ctx));
        assert!(!is_satisfied(&TriggerCondition::AffectionAbove(50), &ctx));

        ctx.affection = None;
        assert!(!is_satisfied(&TriggerCondition::AffectionAbove(0), &ctx));
    }

    #[test]
    fn test_location_exact_match() {
        let memory = memory_at("hongdae_cafe");
        let ctx = ConditionContext {
            memory: &memory,
            affection: None,
            intimate_conversations: 0,
        };
        assert!(is_satisfied(&TriggerCondition::Location("hongdae_cafe".into()), &ctx));
        assert!(!is_satisfied(&TriggerCondition::Location("hongdae".into()), &ctx));
    }

    #[test]
    fn test_intimate_count_is_inclusive() {
        let memory = memory_at("anywhere");
        let ctx = ConditionContext {
            memory: &memory,
            affection: None,
            intimate_conversations: 5,
        };
        assert!(is_satisfied(&TriggerCondition::IntimateConversationCount(5), &ctx));
        assert!(!is_satisfied(&TriggerCondition::IntimateConversationCount(6), &ctx));
    }

    #[test]
    fn test_unrecognized_poisons_conjunction() {
        let memory = memory_at("hongdae_cafe");
        let ctx = ConditionContext {
            memory: &memory,
            affection: Some(1.0),
            intimate_conversations: 100,
        };
        let conditions = vec![
            TriggerCondition::Location("hongdae_cafe".into()),
            TriggerCondition::Unrecognized("foo_bar_123".into()),
        ];
        assert!(!all_satisfied(&conditions, &ctx));
        assert!(all_satisfied(&conditions[..1], &ctx));
    }
}
