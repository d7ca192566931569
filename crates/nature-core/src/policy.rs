//! Round resolution: how one committed action changes the world.
//!
//! A [`RoundPolicy`] turns an [`Action`] into a list of [`Effect`]s that the
//! generation applies to its players. The engine does not care what the
//! policy does, only that it answers in effects; swapping the policy never
//! touches the simulation loop.

use nature_types::{
    Action, CommunityId, GenerationId, InteractionContent, Percept, PerceptContent, PlayerId,
};
use rand::RngCore;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What a policy sees besides the action itself.
#[derive(Debug, Clone, Copy)]
pub struct RoundContext<'a> {
    /// Community the generation belongs to.
    pub community: CommunityId,
    /// Generation being simulated.
    pub generation: GenerationId,
    /// Maximum number of third parties that witness an interaction.
    pub num_onlookers: u32,
    /// Every player in the generation, in id order.
    pub roster: &'a [PlayerId],
}

impl RoundContext<'_> {
    fn contains(&self, player: PlayerId) -> bool {
        self.roster.contains(&player)
    }

    fn percept(&self, timepoint: u64, perceiver: PlayerId, content: PerceptContent) -> Effect {
        Effect::Perceive {
            player: perceiver,
            percept: Percept {
                timepoint,
                community: self.community,
                generation: self.generation,
                perceiver,
                content,
            },
        }
    }
}

/// A change the generation applies to one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Adjust a player's fitness.
    Fitness {
        /// The affected player.
        player: PlayerId,
        /// Requested change; the player floors the result at zero.
        delta: i64,
    },
    /// Queue a percept for a player.
    Perceive {
        /// The perceiving player.
        player: PlayerId,
        /// What they perceive.
        percept: Percept,
    },
}

/// Decides the consequences of each committed action.
pub trait RoundPolicy: Send + Sync {
    /// Resolve one action into effects.
    fn resolve(&self, action: &Action, ctx: &RoundContext<'_>, rng: &mut dyn RngCore)
    -> Vec<Effect>;
}

fn default_cooperation_cost() -> u32 {
    1
}

fn default_cooperation_benefit() -> u32 {
    2
}

/// Fitness consequences of a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payoffs {
    /// What a cooperating donor pays.
    #[serde(default = "default_cooperation_cost")]
    pub cooperation_cost: u32,
    /// What the recipient of cooperation gains.
    #[serde(default = "default_cooperation_benefit")]
    pub cooperation_benefit: u32,
}

impl Default for Payoffs {
    fn default() -> Self {
        Self {
            cooperation_cost: default_cooperation_cost(),
            cooperation_benefit: default_cooperation_benefit(),
        }
    }
}

/// The donation game with witnessed interactions and directed gossip.
#[derive(Debug, Clone, Default)]
pub struct IndirectReciprocity {
    payoffs: Payoffs,
}

impl IndirectReciprocity {
    /// Create the policy with the given payoffs.
    pub const fn new(payoffs: Payoffs) -> Self {
        Self { payoffs }
    }

    /// The payoffs in use.
    pub const fn payoffs(&self) -> Payoffs {
        self.payoffs
    }

    fn interaction(
        &self,
        timepoint: u64,
        donor: PlayerId,
        recipient: PlayerId,
        content: InteractionContent,
        ctx: &RoundContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        if content == InteractionContent::Cooperate {
            effects.push(Effect::Fitness {
                player: donor,
                delta: i64::from(self.payoffs.cooperation_cost).saturating_neg(),
            });
            effects.push(Effect::Fitness {
                player: recipient,
                delta: i64::from(self.payoffs.cooperation_benefit),
            });
        }

        let witnessed = |onlooker| PerceptContent::Interaction {
            donor,
            recipient,
            action: content,
            onlooker,
        };
        effects.push(ctx.percept(timepoint, recipient, witnessed(false)));

        let bystanders: Vec<PlayerId> = ctx
            .roster
            .iter()
            .copied()
            .filter(|&p| p != donor && p != recipient)
            .collect();
        let amount = usize::try_from(ctx.num_onlookers).unwrap_or(usize::MAX);
        let mut onlookers: Vec<PlayerId> =
            bystanders.choose_multiple(rng, amount).copied().collect();
        onlookers.sort_unstable();
        effects.extend(
            onlookers
                .into_iter()
                .map(|onlooker| ctx.percept(timepoint, onlooker, witnessed(true))),
        );

        effects
    }
}

/// Why an action cannot take effect, if it cannot.
///
/// Donating to or gossiping with oneself is ignored, as is naming anyone
/// outside the generation. Gossip about oneself is allowed.
fn unresolvable(action: &Action, ctx: &RoundContext<'_>) -> Option<&'static str> {
    let recipient = action.recipient()?;
    if recipient == action.actor() {
        return Some("recipient is the actor");
    }
    if !ctx.contains(recipient) {
        return Some("recipient is outside the generation");
    }
    if matches!(action, Action::Gossip { about, .. } if !ctx.contains(*about)) {
        return Some("gossip subject is outside the generation");
    }
    None
}

impl RoundPolicy for IndirectReciprocity {
    fn resolve(
        &self,
        action: &Action,
        ctx: &RoundContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<Effect> {
        if let Some(problem) = unresolvable(action, ctx) {
            warn!(
                generation = %ctx.generation,
                actor = %action.actor(),
                recipient = ?action.recipient(),
                timepoint = action.timepoint(),
                problem,
                "Ignoring action"
            );
            return Vec::new();
        }

        let effects = match action {
            Action::Idle { .. } => Vec::new(),
            Action::Interaction {
                timepoint,
                actor,
                recipient,
                content,
                ..
            } => self.interaction(*timepoint, *actor, *recipient, *content, ctx, rng),
            Action::Gossip {
                timepoint,
                actor,
                about,
                recipient,
                content,
                ..
            } => vec![ctx.percept(
                *timepoint,
                *recipient,
                PerceptContent::Gossip {
                    gossiper: *actor,
                    about: *about,
                    recipient: *recipient,
                    gossip: *content,
                },
            )],
        };

        debug!(
            generation = %ctx.generation,
            actor = %action.actor(),
            timepoint = action.timepoint(),
            effects = effects.len(),
            "Action resolved"
        );
        effects
    }
}
