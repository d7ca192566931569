//! One generation: a fixed population playing for a span of timepoints.

use std::sync::Arc;

use futures::future::try_join_all;
use nature_mind::MindService;
use nature_types::{Action, CommunityId, GenerationId, PlayerId, StrategyCount};
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::error::GenerationError;
use crate::player::Player;
use crate::player_state::{ActionLog, PlayerObserver};
use crate::policy::{Effect, RoundContext, RoundPolicy};

/// Where a generation sits and how long it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSettings {
    /// Position of the generation within its community, from 0.
    pub index: GenerationId,
    /// Community the generation belongs to.
    pub community: CommunityId,
    /// First timepoint played.
    pub start_time: u64,
    /// Timepoint at which play stops (exclusive).
    pub end_time: u64,
    /// Maximum number of onlookers per interaction.
    pub num_onlookers: u32,
}

/// A population of players and the record of their play.
#[derive(Debug)]
pub struct Generation {
    settings: GenerationSettings,
    composition: Vec<StrategyCount>,
    players: Vec<Player>,
    roster: Vec<PlayerId>,
    log: Arc<ActionLog>,
    simulated: bool,
}

impl Generation {
    /// Create one player per unit of each strategy count.
    ///
    /// Players get ids `0..N` in composition order. Every player is
    /// observed by the generation's action log and by each of `observers`.
    pub async fn build<M: MindService>(
        mind: &M,
        settings: GenerationSettings,
        composition: Vec<StrategyCount>,
        observers: &[Arc<dyn PlayerObserver>],
    ) -> Result<Self, GenerationError> {
        let log = Arc::new(ActionLog::new());
        let mut players = Vec::new();
        let mut next_id: u64 = 0;

        for entry in &composition {
            for _ in 0..entry.count {
                let mut player = Player::create(
                    mind,
                    PlayerId::new(next_id),
                    entry.strategy.clone(),
                    settings.community,
                    settings.index,
                )
                .await?;
                player.attach(Arc::clone(&log) as Arc<dyn PlayerObserver>);
                for observer in observers {
                    player.attach(Arc::clone(observer));
                }
                players.push(player);
                next_id = next_id.saturating_add(1);
            }
        }

        let roster = players.iter().map(Player::id).collect();
        info!(
            community = %settings.community,
            generation = %settings.index,
            players = players.len(),
            strategies = composition.len(),
            "Generation built"
        );

        Ok(Self {
            settings,
            composition,
            players,
            roster,
            log,
            simulated: false,
        })
    }

    /// Play every timepoint from start to end.
    ///
    /// At each timepoint all players first deliver the previous timepoint's
    /// percepts, then all players decide, then every action is resolved
    /// through `policy` in player order and its effects applied. Calls for
    /// different players may be in flight together, but nobody decides
    /// until everybody has perceived.
    ///
    /// # Errors
    ///
    /// Any player's perception or decision failure aborts the run. Running
    /// a generation twice fails with [`GenerationError::AlreadySimulated`].
    pub async fn simulate<M, R>(
        &mut self,
        mind: &M,
        policy: &dyn RoundPolicy,
        rng: &mut R,
    ) -> Result<(), GenerationError>
    where
        M: MindService,
        R: RngCore + Send,
    {
        if self.simulated {
            return Err(GenerationError::AlreadySimulated(self.settings.index));
        }
        self.simulated = true;

        info!(
            community = %self.settings.community,
            generation = %self.settings.index,
            start_time = self.settings.start_time,
            end_time = self.settings.end_time,
            "Generation started"
        );

        for timepoint in self.settings.start_time..self.settings.end_time {
            try_join_all(self.players.iter_mut().map(|p| p.perceive(timepoint, mind))).await?;
            let actions =
                try_join_all(self.players.iter_mut().map(|p| p.decide(timepoint, mind))).await?;

            let ctx = RoundContext {
                community: self.settings.community,
                generation: self.settings.index,
                num_onlookers: self.settings.num_onlookers,
                roster: &self.roster,
            };
            for action in &actions {
                for effect in policy.resolve(action, &ctx, rng) {
                    apply(&mut self.players, effect);
                }
            }
            debug!(
                generation = %self.settings.index,
                timepoint,
                actions = actions.len(),
                "Timepoint complete"
            );
        }

        info!(
            community = %self.settings.community,
            generation = %self.settings.index,
            total_fitness = self.total_fitness(),
            "Generation finished"
        );
        Ok(())
    }

    /// Position within the community.
    pub const fn index(&self) -> GenerationId {
        self.settings.index
    }

    /// Owning community.
    pub const fn community_id(&self) -> CommunityId {
        self.settings.community
    }

    /// First timepoint played.
    pub const fn start_time(&self) -> u64 {
        self.settings.start_time
    }

    /// Timepoint at which play stops (exclusive).
    pub const fn end_time(&self) -> u64 {
        self.settings.end_time
    }

    /// Maximum onlookers per interaction.
    pub const fn num_onlookers(&self) -> u32 {
        self.settings.num_onlookers
    }

    /// Strategy counts the population was built from.
    pub fn composition(&self) -> &[StrategyCount] {
        &self.composition
    }

    /// Players in id order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Whether the generation has been run.
    pub const fn is_simulated(&self) -> bool {
        self.simulated
    }

    /// Every committed action, ordered by timepoint then actor.
    pub fn actions(&self) -> Vec<Action> {
        let mut actions = self.log.actions();
        actions.sort_by_key(|a| (a.timepoint(), a.actor()));
        actions
    }

    /// Sum of every player's fitness.
    pub fn total_fitness(&self) -> u64 {
        self.players
            .iter()
            .fold(0_u64, |acc, p| acc.saturating_add(p.fitness()))
    }
}

fn apply(players: &mut [Player], effect: Effect) {
    let target = match &effect {
        Effect::Fitness { player, .. } | Effect::Perceive { player, .. } => *player,
    };
    let Some(player) = players.iter_mut().find(|p| p.id() == target) else {
        warn!(player = %target, "Dropping effect for unknown player");
        return;
    };
    match effect {
        Effect::Fitness { delta, .. } => {
            player.update_fitness(delta);
        }
        Effect::Perceive { percept, .. } => player.set_perception(percept),
    }
}
