//! # Narrative Core
//!
//! The stateful half of the narrative system. This crate consumes the story
//! definitions in `story_rules`, records what happened to each player, and
//! assembles narrative context for LLM-driven dialogue generation.
//!
//! ## Core Components
//!
//! - **memory_store**: Append-only, per-player log of story memories
//! - **story_arc**: Chapter progression driven by tagged memories
//! - **world_events**: One-shot events with compound trigger conditions
//! - **emotion**: Mood and relationship dimensions per character
//! - **context_builder**: Tension, pacing and prompt assembly
//! - **engine**: The facade that runs the analyses for every new memory
//!
//! ## Design Philosophy
//!
//! - **Memory-Driven**: Every change to the story follows from a recorded memory
//! - **Deterministic**: Given the same memories and timestamps, state is identical
//! - **Pluggable Storage**: Components talk to repository traits, not containers

pub mod context_builder;
pub mod emotion;
pub mod engine;
pub mod error;
pub mod events;
pub mod memory_store;
pub mod repository;
pub mod shared;
pub mod snapshot;
pub mod story_arc;
pub mod world_events;

pub use context_builder::*;
pub use emotion::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use memory_store::*;
pub use repository::*;
pub use shared::*;
pub use snapshot::*;
pub use story_arc::*;
pub use world_events::*;
