//! Error types for the nature-core crate.
//!
//! Every failure is raised synchronously at the call that detects it and
//! none are retried. Player-level errors bubble up through
//! [`GenerationError`] into [`SimulationError`], which tells the caller
//! which generation failed.

use nature_mind::MindError;
use nature_types::{GenerationId, PlayerId};

/// A community could not be created.
#[derive(Debug, thiserror::Error)]
pub enum CommunityCreationError {
    /// A simulation parameter is outside its allowed range.
    #[error("Error creating community: {reason}")]
    InvalidParameter {
        /// Which bound was violated.
        reason: String,
    },

    /// The mind service did not allocate a community id.
    #[error("Error creating community: registration failed: {source}")]
    Registration {
        /// The underlying mind error.
        #[from]
        source: MindError,
    },
}

/// A player could not be created.
#[derive(Debug, thiserror::Error)]
pub enum PlayerCreationError {
    /// The strategy is missing a field the mind needs.
    #[error("Error creating player {player}: incorrect strategy keys, {field} is missing")]
    IncompleteStrategy {
        /// The player being created.
        player: PlayerId,
        /// The missing field.
        field: &'static str,
    },

    /// The mind answered but refused the registration.
    #[error("Error creating player {player}: {message}")]
    Rejected {
        /// The player being created.
        player: PlayerId,
        /// The mind's explanation.
        message: String,
    },

    /// The registration request failed.
    #[error("Error creating player {player}: {source}")]
    Mind {
        /// The player being created.
        player: PlayerId,
        /// The underlying mind error.
        source: MindError,
    },
}

/// A player's decision could not be obtained.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    /// The mind reported that it could not decide.
    #[error("Error getting decision from player {player}: {message}")]
    Rejected {
        /// The deciding player.
        player: PlayerId,
        /// The mind's explanation.
        message: String,
    },

    /// The mind reported success but sent no action.
    #[error("Error getting decision from player {player}: no action in reply")]
    MissingAction {
        /// The deciding player.
        player: PlayerId,
    },

    /// The action type was not idle, action, or gossip.
    #[error("Error getting decision from player {player}: action did not match idle, gossip or action")]
    UnrecognizedAction {
        /// The deciding player.
        player: PlayerId,
    },

    /// The decision request failed.
    #[error("Error getting decision from player {player}: {source}")]
    Mind {
        /// The deciding player.
        player: PlayerId,
        /// The underlying mind error.
        source: MindError,
    },
}

/// Percepts could not be delivered to a player's mind.
#[derive(Debug, thiserror::Error)]
pub enum PerceptionError {
    /// The mind refused at least one percept in the batch.
    #[error("Error perceiving for player {player}: {message}")]
    Rejected {
        /// The perceiving player.
        player: PlayerId,
        /// The first refusal's explanation.
        message: String,
    },

    /// The mind acknowledged a different number of percepts than were sent.
    #[error("Error perceiving for player {player}: sent {expected} percepts, {received} acknowledged")]
    Incomplete {
        /// The perceiving player.
        player: PlayerId,
        /// Number of percepts sent.
        expected: usize,
        /// Number of acknowledgements received.
        received: usize,
    },

    /// The percept request failed.
    #[error("Error perceiving for player {player}: {source}")]
    Mind {
        /// The perceiving player.
        player: PlayerId,
        /// The underlying mind error.
        source: MindError,
    },
}

/// A generation could not be built or simulated.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// A player could not be created while building the population.
    #[error("player creation failed: {source}")]
    PlayerCreation {
        /// The underlying error.
        #[from]
        source: PlayerCreationError,
    },

    /// A player failed to decide.
    #[error("decision failed: {source}")]
    Decision {
        /// The underlying error.
        #[from]
        source: DecisionError,
    },

    /// A player failed to perceive.
    #[error("perception failed: {source}")]
    Perception {
        /// The underlying error.
        #[from]
        source: PerceptionError,
    },

    /// The generation has already run to completion.
    #[error("generation {0} has already been simulated")]
    AlreadySimulated(GenerationId),
}

/// The next generation's composition could not be derived.
#[derive(Debug, thiserror::Error)]
pub enum ReproductionError {
    /// There are no players to reproduce from.
    #[error("reproduction failed: previous generation has no players")]
    EmptyGeneration,

    /// Every player finished with zero fitness, so the pool is empty.
    #[error("reproduction failed: all {players} players have zero fitness")]
    NoFitness {
        /// Number of players in the previous generation.
        players: usize,
    },

    /// A drawn index did not land in any block of the pool.
    #[error("reproduction failed: index {index} is outside a pool of {size}")]
    IndexOutOfPool {
        /// The drawn index.
        index: u64,
        /// The pool size.
        size: u64,
    },
}

/// A community simulation stopped early.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// A generation failed to build or run.
    #[error("generation {index} failed: {source}")]
    Generation {
        /// The failing generation.
        index: GenerationId,
        /// The underlying error.
        source: GenerationError,
    },

    /// The population for a generation could not be reproduced.
    #[error("reproducing generation {index} failed: {source}")]
    Reproduction {
        /// The generation being built.
        index: GenerationId,
        /// The underlying error.
        source: ReproductionError,
    },
}
