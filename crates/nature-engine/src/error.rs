//! Error types for the runner binary.
//!
//! [`EngineError`] wraps every failure mode between startup and the
//! written report, so `main` can propagate with `?`.

/// Top-level error for the runner binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: nature_core::ConfigError,
    },

    /// The mind client could not be built.
    #[error("mind client error: {source}")]
    Mind {
        /// The underlying mind error.
        #[from]
        source: nature_mind::MindError,
    },

    /// The community could not be created.
    #[error("{source}")]
    Community {
        /// The underlying creation error.
        #[from]
        source: nature_core::CommunityCreationError,
    },

    /// The simulation stopped early.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: nature_core::SimulationError,
    },

    /// The report could not be serialized.
    #[error("report error: {source}")]
    Report {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// The report could not be written.
    #[error("failed to write report: {source}")]
    Output {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
