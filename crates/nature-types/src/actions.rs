//! Actions a player can commit to during a timepoint.
//!
//! An [`Action`] is created once, when the mind's decision is translated
//! into engine terms, and is never mutated afterwards. Each variant is
//! stamped with the timepoint and generation it was decided in.

use serde::{Deserialize, Serialize};

use crate::ids::{GenerationId, PlayerId};

/// What a donor does for its recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionContent {
    /// Pay a cost so the recipient gains a benefit.
    Cooperate,
    /// Refuse to help.
    Defect,
}

/// The valence of a piece of gossip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GossipContent {
    /// Speak well of the subject.
    Positive,
    /// Speak ill of the subject.
    Negative,
}

/// A decision committed by one player at one timepoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// The player does nothing this turn.
    Idle {
        /// Timepoint the action was decided at.
        timepoint: u64,
        /// The player who decided.
        actor: PlayerId,
        /// Generation the player belongs to.
        generation: GenerationId,
        /// The mind's stated reason.
        reason: String,
    },
    /// The player acts as donor towards a recipient.
    Interaction {
        /// Timepoint the action was decided at.
        timepoint: u64,
        /// The donor.
        actor: PlayerId,
        /// Generation the player belongs to.
        generation: GenerationId,
        /// The mind's stated reason.
        reason: String,
        /// The player receiving the donation (or the refusal).
        recipient: PlayerId,
        /// Whether the donor cooperated or defected.
        content: InteractionContent,
    },
    /// The player tells a recipient something about a third player.
    Gossip {
        /// Timepoint the action was decided at.
        timepoint: u64,
        /// The gossiper.
        actor: PlayerId,
        /// Generation the player belongs to.
        generation: GenerationId,
        /// The mind's stated reason.
        reason: String,
        /// The player being gossiped about.
        about: PlayerId,
        /// The player hearing the gossip.
        recipient: PlayerId,
        /// Whether the gossip is positive or negative.
        content: GossipContent,
    },
}

impl Action {
    /// Timepoint the action was decided at.
    pub const fn timepoint(&self) -> u64 {
        match self {
            Self::Idle { timepoint, .. }
            | Self::Interaction { timepoint, .. }
            | Self::Gossip { timepoint, .. } => *timepoint,
        }
    }

    /// The player who committed the action.
    pub const fn actor(&self) -> PlayerId {
        match self {
            Self::Idle { actor, .. }
            | Self::Interaction { actor, .. }
            | Self::Gossip { actor, .. } => *actor,
        }
    }

    /// Generation the action belongs to.
    pub const fn generation(&self) -> GenerationId {
        match self {
            Self::Idle { generation, .. }
            | Self::Interaction { generation, .. }
            | Self::Gossip { generation, .. } => *generation,
        }
    }

    /// The mind's stated reason for the action.
    pub fn reason(&self) -> &str {
        match self {
            Self::Idle { reason, .. }
            | Self::Interaction { reason, .. }
            | Self::Gossip { reason, .. } => reason,
        }
    }

    /// The player the action is directed at, if any.
    pub const fn recipient(&self) -> Option<PlayerId> {
        match self {
            Self::Idle { .. } => None,
            Self::Interaction { recipient, .. } | Self::Gossip { recipient, .. } => {
                Some(*recipient)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gossip() -> Action {
        Action::Gossip {
            timepoint: 4,
            actor: PlayerId::new(1),
            generation: GenerationId::new(2),
            reason: String::from("warn about a defector"),
            about: PlayerId::new(3),
            recipient: PlayerId::new(5),
            content: GossipContent::Negative,
        }
    }

    #[test]
    fn accessors_read_common_fields() {
        let action = gossip();
        assert_eq!(action.timepoint(), 4);
        assert_eq!(action.actor(), PlayerId::new(1));
        assert_eq!(action.generation(), GenerationId::new(2));
        assert_eq!(action.reason(), "warn about a defector");
        assert_eq!(action.recipient(), Some(PlayerId::new(5)));
    }

    #[test]
    fn idle_has_no_recipient() {
        let idle = Action::Idle {
            timepoint: 0,
            actor: PlayerId::new(0),
            generation: GenerationId::new(0),
            reason: String::new(),
        };
        assert_eq!(idle.recipient(), None);
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(gossip()).ok();
        let tag = json
            .as_ref()
            .and_then(|v| v.get("type"))
            .and_then(|t| t.as_str());
        assert_eq!(tag, Some("gossip"));
        let content = json
            .as_ref()
            .and_then(|v| v.get("content"))
            .and_then(|t| t.as_str());
        assert_eq!(content, Some("negative"));
    }
}
