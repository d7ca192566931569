//! A scripted, in-memory mind service.
//!
//! [`ScriptedMind`] answers every request without a network and records
//! what it was asked, so engine behavior can be asserted exactly. Decisions
//! come from, in order of precedence:
//!
//! 1. a per-player queue filled with [`ScriptedMind::script`],
//! 2. a responder closure installed with [`ScriptedMind::with_responder`],
//! 3. an idle decision.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use nature_types::{CommunityId, GenerationId, Percept, PlayerId};

use crate::MindService;
use crate::endpoints;
use crate::error::MindError;
use crate::protocol::{
    Acknowledgement, ActionQuery, AgentRegistration, DecisionReply, PerceptBatchReply,
};

type Responder = Box<dyn Fn(&ActionQuery) -> DecisionReply + Send + Sync>;

/// Recorded requests and scripted behavior.
#[derive(Default)]
struct StubState {
    next_community: u64,
    communities_created: u64,
    registrations: Vec<AgentRegistration>,
    action_queries: Vec<ActionQuery>,
    percept_batches: Vec<Vec<Percept>>,
    scripted: BTreeMap<(GenerationId, PlayerId), VecDeque<DecisionReply>>,
    failing_endpoints: BTreeMap<&'static str, u16>,
    registration_rejection: Option<String>,
    percept_rejection: Option<String>,
    percept_ack_shortfall: usize,
}

/// An in-memory [`MindService`] with scripted replies.
#[derive(Default)]
pub struct ScriptedMind {
    state: Mutex<StubState>,
    responder: Option<Responder>,
}

impl core::fmt::Debug for ScriptedMind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScriptedMind")
            .field("has_responder", &self.responder.is_some())
            .finish_non_exhaustive()
    }
}

impl ScriptedMind {
    /// Create a stub that registers everything and always idles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start allocating community ids at `first`.
    #[must_use]
    pub fn with_first_community_id(self, first: u64) -> Self {
        self.lock().next_community = first;
        self
    }

    /// Answer unscripted decisions with `responder`.
    #[must_use]
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&ActionQuery) -> DecisionReply + Send + Sync + 'static,
    {
        self.responder = Some(Box::new(responder));
        self
    }

    /// Queue a reply for the next decision of one player.
    pub fn script(&self, generation: GenerationId, player: PlayerId, reply: DecisionReply) {
        self.lock()
            .scripted
            .entry((generation, player))
            .or_default()
            .push_back(reply);
    }

    /// Make every call to `endpoint` fail with the given HTTP status.
    pub fn fail_endpoint(&self, endpoint: &'static str, status: u16) {
        self.lock().failing_endpoints.insert(endpoint, status);
    }

    /// Answer agent registrations with `success: false`.
    pub fn reject_registrations(&self, message: impl Into<String>) {
        self.lock().registration_rejection = Some(message.into());
    }

    /// Answer every percept with `success: false`.
    pub fn reject_percepts(&self, message: impl Into<String>) {
        self.lock().percept_rejection = Some(message.into());
    }

    /// Acknowledge `missing` fewer percepts than each batch carries.
    pub fn short_acknowledge_percepts(&self, missing: usize) {
        self.lock().percept_ack_shortfall = missing;
    }

    /// Every agent registration received, in order.
    pub fn registrations(&self) -> Vec<AgentRegistration> {
        self.lock().registrations.clone()
    }

    /// Every decision request received, in order.
    pub fn action_queries(&self) -> Vec<ActionQuery> {
        self.lock().action_queries.clone()
    }

    /// Every percept batch received, in order.
    pub fn percept_batches(&self) -> Vec<Vec<Percept>> {
        self.lock().percept_batches.clone()
    }

    /// Number of communities allocated so far.
    pub fn communities_created(&self) -> u64 {
        self.lock().communities_created
    }

    /// The id the next community will receive.
    pub fn next_community_id(&self) -> CommunityId {
        CommunityId::new(self.lock().next_community)
    }

    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StubState {
    fn check(&self, endpoint: &'static str) -> Result<(), MindError> {
        self.failing_endpoints
            .get(endpoint)
            .map_or(Ok(()), |&status| Err(MindError::Status { endpoint, status }))
    }
}

impl MindService for ScriptedMind {
    async fn create_community(&self) -> Result<CommunityId, MindError> {
        let mut state = self.lock();
        state.check(endpoints::COMMUNITY)?;
        let id = CommunityId::new(state.next_community);
        state.next_community = state.next_community.saturating_add(1);
        state.communities_created = state.communities_created.saturating_add(1);
        Ok(id)
    }

    async fn create_agent(
        &self,
        registration: &AgentRegistration,
    ) -> Result<Acknowledgement, MindError> {
        let mut state = self.lock();
        state.check(endpoints::AGENT)?;
        state.registrations.push(registration.clone());
        Ok(state
            .registration_rejection
            .as_ref()
            .map_or_else(Acknowledgement::ok, |message| {
                Acknowledgement::rejected(message.clone())
            }))
    }

    async fn request_action(&self, query: &ActionQuery) -> Result<DecisionReply, MindError> {
        let scripted = {
            let mut state = self.lock();
            state.check(endpoints::ACTION)?;
            state.action_queries.push(*query);
            state
                .scripted
                .get_mut(&(query.generation, query.player))
                .and_then(VecDeque::pop_front)
        };

        Ok(scripted.unwrap_or_else(|| {
            self.responder.as_ref().map_or_else(
                || DecisionReply::idle("scripted default"),
                |responder| responder(query),
            )
        }))
    }

    async fn submit_percepts(&self, percepts: &[Percept]) -> Result<PerceptBatchReply, MindError> {
        let mut state = self.lock();
        state.check(endpoints::PERCEPT_GROUP)?;
        state.percept_batches.push(percepts.to_vec());
        let acknowledged = percepts.len().saturating_sub(state.percept_ack_shortfall);
        Ok(state.percept_rejection.as_ref().map_or_else(
            || PerceptBatchReply::accepted(acknowledged),
            |message| PerceptBatchReply {
                success: percepts
                    .iter()
                    .map(|_| Acknowledgement::rejected(message.clone()))
                    .collect(),
            },
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nature_types::InteractionContent;

    use super::*;
    use crate::protocol::MindAction;

    fn query(player: u64) -> ActionQuery {
        ActionQuery {
            timepoint: 0,
            community: CommunityId::new(0),
            generation: GenerationId::new(0),
            player: PlayerId::new(player),
        }
    }

    #[tokio::test]
    async fn allocates_sequential_community_ids() {
        let mind = ScriptedMind::new().with_first_community_id(10);
        assert_eq!(mind.communities_created(), 0);
        assert_eq!(mind.next_community_id(), CommunityId::new(10));
        assert_eq!(mind.create_community().await.unwrap(), CommunityId::new(10));
        assert_eq!(mind.create_community().await.unwrap(), CommunityId::new(11));
        assert_eq!(mind.communities_created(), 2);
        assert_eq!(mind.next_community_id(), CommunityId::new(12));
    }

    #[tokio::test]
    async fn scripted_replies_take_precedence_over_responder() {
        let mind = ScriptedMind::new().with_responder(|q| {
            let next = PlayerId::new(q.player.0.saturating_add(1));
            DecisionReply::interaction(next, InteractionContent::Cooperate)
        });
        mind.script(
            GenerationId::new(0),
            PlayerId::new(0),
            DecisionReply::failure("scripted"),
        );

        let first = mind.request_action(&query(0)).await.unwrap();
        assert!(!first.success);

        let second = mind.request_action(&query(0)).await.unwrap();
        assert!(matches!(
            second.action,
            Some(MindAction::Action { recipient: PlayerId(1), .. })
        ));
        assert_eq!(mind.action_queries().len(), 2);
    }

    #[tokio::test]
    async fn failing_endpoint_reports_status() {
        let mind = ScriptedMind::new();
        mind.fail_endpoint(endpoints::ACTION, 503);
        let err = mind.request_action(&query(0)).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }
}
