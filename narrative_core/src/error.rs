use story_rules::BibleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Story bible error: {0}")]
    Bible(#[from] BibleError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Narrative engine lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, NarrativeError>;
