//! Request and reply payloads exchanged with the mind service.
//!
//! Field names follow the mind service's JSON exactly. Replies are decoded
//! leniently where the service is known to omit fields (`message` on
//! success) and strictly everywhere else, except for decision `value`s:
//! anything other than `cooperate` reads as defection and anything other
//! than `positive` reads as negative gossip.

use nature_types::{
    CommunityId, GenerationId, GossipContent, InteractionContent, Percept, PlayerId, Strategy,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Reply to `POST community`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityCreated {
    /// The allocated community id.
    pub id: CommunityId,
}

/// Body of `POST agent`: the strategy fields plus the three identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRegistration {
    /// Donor policy from the player's strategy.
    pub donor_strategy: String,
    /// Non-donor policy from the player's strategy.
    pub non_donor_strategy: String,
    /// Trust model from the player's strategy.
    pub trust_model: String,
    /// Free-form strategy options.
    pub options: Vec<String>,
    /// Community the player belongs to.
    pub community: CommunityId,
    /// Generation the player belongs to.
    pub generation: GenerationId,
    /// The player.
    pub player: PlayerId,
}

impl AgentRegistration {
    /// Build a registration for one player.
    pub fn new(
        strategy: &Strategy,
        community: CommunityId,
        generation: GenerationId,
        player: PlayerId,
    ) -> Self {
        Self {
            donor_strategy: strategy.donor_strategy.clone(),
            non_donor_strategy: strategy.non_donor_strategy.clone(),
            trust_model: strategy.trust_model.clone(),
            options: strategy.options.clone(),
            community,
            generation,
            player,
        }
    }
}

/// Query string of `GET action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionQuery {
    /// Timepoint being decided.
    pub timepoint: u64,
    /// Community the player belongs to.
    pub community: CommunityId,
    /// Generation the player belongs to.
    pub generation: GenerationId,
    /// The deciding player.
    pub player: PlayerId,
}

/// A `{success, message}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Whether the mind accepted the request.
    pub success: bool,
    /// Explanation, usually only present on failure.
    #[serde(default)]
    pub message: String,
}

impl Acknowledgement {
    /// A successful acknowledgement.
    pub fn ok() -> Self {
        Self {
            success: true,
            message: String::new(),
        }
    }

    /// A failed acknowledgement carrying a reason.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Reply to `GET action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionReply {
    /// Whether the mind produced a decision.
    pub success: bool,
    /// Explanation, usually only present on failure.
    #[serde(default)]
    pub message: String,
    /// The decision, present on success.
    #[serde(default)]
    pub action: Option<MindAction>,
}

impl DecisionReply {
    fn decided(action: MindAction) -> Self {
        Self {
            success: true,
            message: String::new(),
            action: Some(action),
        }
    }

    /// A successful idle decision.
    pub fn idle(reason: impl Into<String>) -> Self {
        Self::decided(MindAction::Idle {
            reason: reason.into(),
        })
    }

    /// A successful donor decision.
    pub fn interaction(recipient: PlayerId, value: InteractionContent) -> Self {
        Self::decided(MindAction::Action {
            reason: String::new(),
            recipient,
            value,
        })
    }

    /// A successful gossip decision.
    pub fn gossip(about: PlayerId, recipient: PlayerId, value: GossipContent) -> Self {
        Self::decided(MindAction::Gossip {
            reason: String::new(),
            about,
            recipient,
            value,
        })
    }

    /// A reply reporting that no decision could be made.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            action: None,
        }
    }
}

/// The decision as the mind describes it, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MindAction {
    /// Do nothing.
    Idle {
        /// The mind's stated reason.
        #[serde(default)]
        reason: String,
    },
    /// Act as donor towards `recipient`.
    Action {
        /// The mind's stated reason.
        #[serde(default)]
        reason: String,
        /// The recipient.
        recipient: PlayerId,
        /// Cooperate or defect.
        #[serde(deserialize_with = "interaction_value")]
        value: InteractionContent,
    },
    /// Tell `recipient` something about `about`.
    Gossip {
        /// The mind's stated reason.
        #[serde(default)]
        reason: String,
        /// The subject of the gossip.
        about: PlayerId,
        /// The listener.
        recipient: PlayerId,
        /// Positive or negative.
        #[serde(deserialize_with = "gossip_value")]
        value: GossipContent,
    },
    /// Any `type` other than `idle`, `action`, or `gossip`.
    #[serde(other)]
    Unrecognized,
}

fn interaction_value<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<InteractionContent, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(if raw.as_str() == Some("cooperate") {
        InteractionContent::Cooperate
    } else {
        InteractionContent::Defect
    })
}

fn gossip_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<GossipContent, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(if raw.as_str() == Some("positive") {
        GossipContent::Positive
    } else {
        GossipContent::Negative
    })
}

/// Body of `POST percept/action/group`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PerceptBatch<'a> {
    /// Percepts for one player and one timepoint, in arrival order.
    pub percepts: &'a [Percept],
}

/// Reply to `POST percept/action/group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptBatchReply {
    /// One acknowledgement per submitted percept, in the same order.
    pub success: Vec<Acknowledgement>,
}

impl PerceptBatchReply {
    /// Acknowledge `count` percepts successfully.
    pub fn accepted(count: usize) -> Self {
        Self {
            success: vec![Acknowledgement::ok(); count],
        }
    }
}
