//! Serializable summaries of a finished run.
//!
//! A [`CommunityReport`] is what leaves the engine once a community has
//! been simulated: ids, parameters, and per generation the population,
//! fitness, and a tally of what was played.

use chrono::{DateTime, Utc};
use nature_types::{
    Action, CommunityId, GenerationId, InteractionContent, PlayerId, Strategy, StrategyCount,
};
use serde::{Deserialize, Serialize};

use crate::community::{Community, CommunityParams};
use crate::generation::Generation;
use crate::player::Player;

/// Summary of a whole community run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityReport {
    /// Community id allocated by the mind.
    pub community: CommunityId,
    /// Parameters the run used.
    pub params: CommunityParams,
    /// Completed generations in order.
    pub generations: Vec<GenerationReport>,
    /// When the report was taken.
    pub completed_at: DateTime<Utc>,
}

/// Summary of one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Position within the community.
    pub index: GenerationId,
    /// First timepoint played.
    pub start_time: u64,
    /// Exclusive end timepoint.
    pub end_time: u64,
    /// Strategy counts the population was built from.
    pub composition: Vec<StrategyCount>,
    /// Sum of final fitness.
    pub total_fitness: u64,
    /// Final state of every player.
    pub players: Vec<PlayerReport>,
    /// What was played.
    pub actions: ActionCounts,
}

/// Final state of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerReport {
    /// Player id within the generation.
    pub id: PlayerId,
    /// The player's strategy.
    pub strategy: Strategy,
    /// Final fitness.
    pub fitness: u64,
}

/// Tally of committed actions by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounts {
    /// Idle turns.
    pub idle: u64,
    /// Cooperating donations.
    pub cooperate: u64,
    /// Defecting donations.
    pub defect: u64,
    /// Gossip.
    pub gossip: u64,
}

impl ActionCounts {
    /// Count actions by kind.
    pub fn tally<'a>(actions: impl IntoIterator<Item = &'a Action>) -> Self {
        actions.into_iter().fold(Self::default(), |mut counts, action| {
            let slot = match action {
                Action::Idle { .. } => &mut counts.idle,
                Action::Interaction {
                    content: InteractionContent::Cooperate,
                    ..
                } => &mut counts.cooperate,
                Action::Interaction {
                    content: InteractionContent::Defect,
                    ..
                } => &mut counts.defect,
                Action::Gossip { .. } => &mut counts.gossip,
            };
            *slot = slot.saturating_add(1);
            counts
        })
    }

    /// Total number of actions counted.
    pub const fn total(&self) -> u64 {
        self.idle
            .saturating_add(self.cooperate)
            .saturating_add(self.defect)
            .saturating_add(self.gossip)
    }
}

impl CommunityReport {
    /// Summarise a community as it stands now.
    pub fn from_community(community: &Community) -> Self {
        Self {
            community: community.id(),
            params: community.params(),
            generations: community
                .generations()
                .iter()
                .map(GenerationReport::from_generation)
                .collect(),
            completed_at: Utc::now(),
        }
    }
}

impl GenerationReport {
    /// Summarise one generation.
    pub fn from_generation(generation: &Generation) -> Self {
        Self {
            index: generation.index(),
            start_time: generation.start_time(),
            end_time: generation.end_time(),
            composition: generation.composition().to_vec(),
            total_fitness: generation.total_fitness(),
            players: generation
                .players()
                .iter()
                .map(PlayerReport::from_player)
                .collect(),
            actions: ActionCounts::tally(&generation.actions()),
        }
    }
}

impl PlayerReport {
    /// Capture a player's final state.
    pub fn from_player(player: &Player) -> Self {
        Self {
            id: player.id(),
            strategy: player.strategy().clone(),
            fitness: player.fitness(),
        }
    }
}
