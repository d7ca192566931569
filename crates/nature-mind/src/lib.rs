//! The boundary between the simulation engine and the external mind service.
//!
//! Every strategic decision a player makes is delegated to a separate
//! service (the "mind"). The engine only ever refers to minds by
//! community, generation, and player id; no object reference crosses the
//! boundary.
//!
//! # Modules
//!
//! - [`config`] -- Mind service connection settings ([`MindConfig`])
//! - [`error`] -- Transport, status, and decode failures ([`MindError`])
//! - [`http`] -- The production client over HTTP ([`HttpMind`])
//! - [`protocol`] -- Request and reply payloads exchanged with the mind
//! - [`stub`] -- An in-memory scripted mind for tests ([`ScriptedMind`])
//!
//! The [`MindService`] trait is the seam the engine is generic over.
//!
//! [`MindConfig`]: config::MindConfig
//! [`MindError`]: error::MindError
//! [`HttpMind`]: http::HttpMind
//! [`ScriptedMind`]: stub::ScriptedMind

use std::future::Future;

use nature_types::{CommunityId, Percept};

pub mod config;
pub mod error;
pub mod http;
pub mod protocol;
pub mod stub;

pub use config::MindConfig;
pub use error::MindError;
pub use http::HttpMind;
pub use protocol::{
    Acknowledgement, ActionQuery, AgentRegistration, DecisionReply, MindAction, PerceptBatchReply,
};
pub use stub::ScriptedMind;

/// Endpoint paths, relative to the mind service base URL.
pub mod endpoints {
    /// `POST` -- allocate a community id.
    pub const COMMUNITY: &str = "community";
    /// `POST` -- register an agent for a player.
    pub const AGENT: &str = "agent";
    /// `GET` -- ask for a player's decision at a timepoint.
    pub const ACTION: &str = "action";
    /// `POST` -- deliver a batch of percepts.
    pub const PERCEPT_GROUP: &str = "percept/action/group";
}

/// A service that makes all strategic decisions for players.
///
/// Each method is a single request/response round-trip. Implementations
/// must not retry: a failure is reported once and the caller decides what
/// to do with it. Replies are returned as the mind sent them; interpreting
/// `success: false` flags is the caller's job.
///
/// Methods return `impl Future + Send` rather than using `async fn` so the
/// `Send` bound is part of the contract.
pub trait MindService {
    /// Allocate a new community and return its authoritative id.
    fn create_community(&self) -> impl Future<Output = Result<CommunityId, MindError>> + Send;

    /// Register the agent that will decide for one player.
    fn create_agent(
        &self,
        registration: &AgentRegistration,
    ) -> impl Future<Output = Result<Acknowledgement, MindError>> + Send;

    /// Ask for a player's decision at a timepoint.
    fn request_action(
        &self,
        query: &ActionQuery,
    ) -> impl Future<Output = Result<DecisionReply, MindError>> + Send;

    /// Deliver a batch of percepts; the reply carries one acknowledgement per
    /// percept, in submission order.
    fn submit_percepts(
        &self,
        percepts: &[Percept],
    ) -> impl Future<Output = Result<PerceptBatchReply, MindError>> + Send;
}
