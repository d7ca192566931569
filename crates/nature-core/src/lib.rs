//! Community, generation, and player orchestration for the Nature Engine.
//!
//! This crate owns the evolutionary loop: a [`Community`] runs a fixed
//! number of generations, each [`Generation`] plays a fixed population of
//! [`Player`]s for a span of timepoints, and the next population is drawn
//! by fitness-proportionate reproduction. Every strategic decision is
//! delegated to a [`MindService`](nature_mind::MindService).
//!
//! # Modules
//!
//! - [`community`] -- Parameter validation and the generation sequence.
//! - [`config`] -- Configuration loading from `nature-config.yaml`.
//! - [`error`] -- Error enums for every stage of a run.
//! - [`generation`] -- Building a population and playing its timepoints.
//! - [`player`] -- Registration, decisions, percept delivery, fitness.
//! - [`player_state`] -- The push-only observer channel on each player.
//! - [`policy`] -- [`RoundPolicy`] and the [`IndirectReciprocity`] game.
//! - [`report`] -- Serializable summaries of a finished run.
//! - [`reproduction`] -- The weighted pool and its sampling.
//!
//! [`Community`]: community::Community
//! [`Generation`]: generation::Generation
//! [`Player`]: player::Player
//! [`RoundPolicy`]: policy::RoundPolicy
//! [`IndirectReciprocity`]: policy::IndirectReciprocity

pub mod community;
pub mod config;
pub mod error;
pub mod generation;
pub mod player;
pub mod player_state;
pub mod policy;
pub mod report;
pub mod reproduction;

pub use community::{Community, CommunityParams};
pub use config::{ConfigError, LogFormat, NatureConfig};
pub use error::{
    CommunityCreationError, DecisionError, GenerationError, PerceptionError, PlayerCreationError,
    ReproductionError, SimulationError,
};
pub use generation::{Generation, GenerationSettings};
pub use player::Player;
pub use player_state::{ActionLog, PlayerObserver, PlayerState};
pub use policy::{Effect, IndirectReciprocity, Payoffs, RoundContext, RoundPolicy};
pub use report::{ActionCounts, CommunityReport, GenerationReport, PlayerReport};
pub use reproduction::reproduce;
