//! Shared type definitions for the Nature Engine simulation.
//!
//! This crate is the single source of truth for the values that cross
//! crate boundaries: identifiers, strategies, committed actions, and the
//! percepts delivered to players. Everything here is an immutable value;
//! the engine state that owns these values lives in `nature-core`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for community, generation, and
//!   player identifiers
//! - [`strategy`] -- Behavioral genotypes and population compositions
//! - [`actions`] -- The actions a player can commit to at a timepoint
//! - [`perception`] -- Percepts queued for delivery to a player's mind

pub mod actions;
pub mod ids;
pub mod perception;
pub mod strategy;

// Re-export all public types at crate root for convenience.
pub use actions::{Action, GossipContent, InteractionContent};
pub use ids::{CommunityId, GenerationId, PlayerId};
pub use perception::{Percept, PerceptContent};
pub use strategy::{Strategy, StrategyCount, total_population};
