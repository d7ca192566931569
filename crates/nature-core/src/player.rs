//! The simulation-side body of one agent.
//!
//! A [`Player`] owns its fitness, its percept inbox, and its observable
//! [`PlayerState`]. Everything strategic is delegated to the mind service:
//! the player registers its agent on creation, asks for a decision each
//! timepoint, and forwards the percepts queued for the previous timepoint
//! before deciding.

use std::collections::BTreeMap;
use std::sync::Arc;

use nature_mind::{ActionQuery, AgentRegistration, MindAction, MindService};
use nature_types::{Action, CommunityId, GenerationId, Percept, PlayerId, Strategy};
use tracing::debug;

use crate::error::{DecisionError, PerceptionError, PlayerCreationError};
use crate::player_state::{PlayerObserver, PlayerState};

/// One agent in a generation.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    strategy: Strategy,
    fitness: u64,
    community: CommunityId,
    generation: GenerationId,
    percepts: BTreeMap<u64, Vec<Percept>>,
    state: PlayerState,
}

impl Player {
    /// Create a player and register its agent with the mind.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerCreationError::IncompleteStrategy`] if a required
    /// strategy field is blank (nothing is sent to the mind),
    /// [`PlayerCreationError::Mind`] if the request fails or returns a bad
    /// status, and [`PlayerCreationError::Rejected`] if the mind refuses.
    pub async fn create<M: MindService>(
        mind: &M,
        id: PlayerId,
        strategy: Strategy,
        community: CommunityId,
        generation: GenerationId,
    ) -> Result<Self, PlayerCreationError> {
        if let Some(field) = strategy.missing_field() {
            return Err(PlayerCreationError::IncompleteStrategy { player: id, field });
        }

        let registration = AgentRegistration::new(&strategy, community, generation, id);
        let ack = mind
            .create_agent(&registration)
            .await
            .map_err(|source| PlayerCreationError::Mind { player: id, source })?;
        if !ack.success {
            return Err(PlayerCreationError::Rejected {
                player: id,
                message: ack.message,
            });
        }

        Ok(Self {
            id,
            strategy,
            fitness: 0,
            community,
            generation,
            percepts: BTreeMap::new(),
            state: PlayerState::new(generation, id),
        })
    }

    /// The player's id, unique within its generation.
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// The player's strategy.
    pub const fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// The player's current fitness.
    pub const fn fitness(&self) -> u64 {
        self.fitness
    }

    /// Community the player belongs to.
    pub const fn community(&self) -> CommunityId {
        self.community
    }

    /// Generation the player belongs to.
    pub const fn generation(&self) -> GenerationId {
        self.generation
    }

    /// The player's observable state.
    pub const fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Attach an observer to the player's state.
    pub fn attach(&mut self, observer: Arc<dyn PlayerObserver>) {
        self.state.attach(observer);
    }

    /// Detach an observer from the player's state.
    pub fn detach(&mut self, observer: &Arc<dyn PlayerObserver>) {
        self.state.detach(observer);
    }

    /// Apply a fitness change, flooring the result at zero.
    ///
    /// Publishes and returns the change that was actually applied, so a
    /// player at 20 asked to lose 100 ends at 0 and reports `-20`.
    pub fn update_fitness(&mut self, delta: i64) -> i64 {
        let before = self.fitness;
        self.fitness = before.saturating_add_signed(delta);

        let magnitude = i64::try_from(self.fitness.abs_diff(before)).unwrap_or(i64::MAX);
        let applied = if self.fitness >= before {
            magnitude
        } else {
            magnitude.saturating_neg()
        };

        self.state.publish_fitness_update(applied);
        applied
    }

    /// Ask the mind what this player does at `timepoint`.
    ///
    /// The resulting action is published through the player's state before
    /// it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Mind`] if the request fails or returns a bad
    /// status, [`DecisionError::Rejected`] if the mind reports failure,
    /// [`DecisionError::MissingAction`] if a successful reply has no action,
    /// and [`DecisionError::UnrecognizedAction`] for any action type other
    /// than idle, action, or gossip.
    pub async fn decide<M: MindService>(
        &mut self,
        timepoint: u64,
        mind: &M,
    ) -> Result<Action, DecisionError> {
        let query = ActionQuery {
            timepoint,
            community: self.community,
            generation: self.generation,
            player: self.id,
        };
        let reply = mind
            .request_action(&query)
            .await
            .map_err(|source| DecisionError::Mind {
                player: self.id,
                source,
            })?;

        if !reply.success {
            return Err(DecisionError::Rejected {
                player: self.id,
                message: reply.message,
            });
        }

        let decided = reply
            .action
            .ok_or(DecisionError::MissingAction { player: self.id })?;
        let action = self.translate(timepoint, decided)?;
        debug!(
            player = %self.id,
            generation = %self.generation,
            timepoint,
            action = ?action,
            "Player decided"
        );

        self.state.publish_action(action.clone());
        Ok(action)
    }

    /// Turn the mind's description of a decision into an [`Action`].
    fn translate(&self, timepoint: u64, decided: MindAction) -> Result<Action, DecisionError> {
        let actor = self.id;
        let generation = self.generation;
        match decided {
            MindAction::Idle { reason } => Ok(Action::Idle {
                timepoint,
                actor,
                generation,
                reason,
            }),
            MindAction::Action {
                reason,
                recipient,
                value,
            } => Ok(Action::Interaction {
                timepoint,
                actor,
                generation,
                reason,
                recipient,
                content: value,
            }),
            MindAction::Gossip {
                reason,
                about,
                recipient,
                value,
            } => Ok(Action::Gossip {
                timepoint,
                actor,
                generation,
                reason,
                about,
                recipient,
                content: value,
            }),
            MindAction::Unrecognized => Err(DecisionError::UnrecognizedAction { player: actor }),
        }
    }

    /// Queue a percept for delivery, keyed by the timepoint it describes.
    ///
    /// Percepts for the same timepoint accumulate in arrival order.
    pub fn set_perception(&mut self, percept: Percept) {
        self.percepts
            .entry(percept.timepoint)
            .or_default()
            .push(percept);
    }

    /// Number of percepts waiting for delivery about `timepoint`.
    pub fn queued_percepts(&self, timepoint: u64) -> usize {
        self.percepts.get(&timepoint).map_or(0, Vec::len)
    }

    /// Deliver the percepts queued for `timepoint - 1` in one batch.
    ///
    /// Does nothing at timepoint 0 or when nothing is queued. Delivered
    /// percepts are removed from the inbox and never sent again.
    ///
    /// # Errors
    ///
    /// Returns [`PerceptionError::Mind`] if the request fails or returns a
    /// bad status, [`PerceptionError::Rejected`] if any percept in the batch
    /// reports failure, and [`PerceptionError::Incomplete`] if the number of
    /// acknowledgements does not match the batch.
    pub async fn perceive<M: MindService>(
        &mut self,
        timepoint: u64,
        mind: &M,
    ) -> Result<(), PerceptionError> {
        let Some(previous) = timepoint.checked_sub(1) else {
            return Ok(());
        };
        let Some(batch) = self.percepts.remove(&previous) else {
            return Ok(());
        };

        let reply = mind
            .submit_percepts(&batch)
            .await
            .map_err(|source| PerceptionError::Mind {
                player: self.id,
                source,
            })?;

        if let Some(refusal) = reply.success.iter().find(|ack| !ack.success) {
            return Err(PerceptionError::Rejected {
                player: self.id,
                message: refusal.message.clone(),
            });
        }
        if reply.success.len() != batch.len() {
            return Err(PerceptionError::Incomplete {
                player: self.id,
                expected: batch.len(),
                received: reply.success.len(),
            });
        }

        debug!(
            player = %self.id,
            timepoint = previous,
            count = batch.len(),
            "Percepts delivered"
        );
        Ok(())
    }
}
