//! # Story Rules
//!
//! The "Story Bible" crate - identifiers, story memories, emotional dimensions,
//! arc definitions and world-event rules. This crate describes what the story
//! *is*; it holds no mutable engine state and contains no rule evaluation.

pub mod chronicle;
pub mod entities;
pub mod error;
pub mod mechanics;
pub mod story_bible;

pub use chronicle::*;
pub use entities::*;
pub use error::*;
pub use mechanics::*;
pub use story_bible::*;
