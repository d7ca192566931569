//! Percepts: what a player's mind is told about past events.
//!
//! The engine queues percepts on the perceiving player keyed by the
//! timepoint of the event they describe, and flushes them to the mind
//! service in one batch just before the player's next decision.

use serde::{Deserialize, Serialize};

use crate::actions::{GossipContent, InteractionContent};
use crate::ids::{CommunityId, GenerationId, PlayerId};

/// A unit of sensory information about one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percept {
    /// Timepoint of the event being perceived.
    pub timepoint: u64,
    /// Community the perceiver belongs to.
    pub community: CommunityId,
    /// Generation the perceiver belongs to.
    pub generation: GenerationId,
    /// The player receiving the percept.
    pub perceiver: PlayerId,
    /// What was perceived.
    #[serde(flatten)]
    pub content: PerceptContent,
}

/// The event described by a [`Percept`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PerceptContent {
    /// A donor acted towards a recipient.
    #[serde(rename = "action/interaction")]
    Interaction {
        /// The donor.
        donor: PlayerId,
        /// The recipient.
        recipient: PlayerId,
        /// What the donor did.
        action: InteractionContent,
        /// Whether the perceiver only witnessed the interaction.
        onlooker: bool,
    },
    /// A gossiper told the perceiver about a third player.
    #[serde(rename = "action/gossip")]
    Gossip {
        /// The player who spoke.
        gossiper: PlayerId,
        /// The player spoken about.
        about: PlayerId,
        /// The player who heard it.
        recipient: PlayerId,
        /// What was said.
        gossip: GossipContent,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percept_flattens_content_next_to_header() {
        let percept = Percept {
            timepoint: 9,
            community: CommunityId::new(1),
            generation: GenerationId::new(0),
            perceiver: PlayerId::new(4),
            content: PerceptContent::Interaction {
                donor: PlayerId::new(2),
                recipient: PlayerId::new(3),
                action: InteractionContent::Cooperate,
                onlooker: true,
            },
        };
        let json = serde_json::to_value(&percept).unwrap_or_default();
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("action/interaction"));
        assert_eq!(json.get("timepoint").and_then(serde_json::Value::as_u64), Some(9));
        assert_eq!(json.get("action").and_then(|v| v.as_str()), Some("cooperate"));
        assert_eq!(json.get("onlooker").and_then(serde_json::Value::as_bool), Some(true));
    }
}
