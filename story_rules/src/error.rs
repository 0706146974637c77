//! Errors raised while loading or validating a story bible.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BibleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid trigger condition '{0}'")]
    InvalidCondition(String),

    #[error("Unknown {kind} dimension '{name}'")]
    InvalidDimension { kind: &'static str, name: String },

    #[error("Invalid tuning value {field} = {value}")]
    InvalidTuning { field: &'static str, value: f32 },

    #[error("Invalid arc '{arc}': {reason}")]
    InvalidArc { arc: String, reason: String },

    #[error("World event '{event}' targets unknown character '{character}'")]
    UnknownCharacter { event: String, character: String },
}

pub type Result<T> = std::result::Result<T, BibleError>;
