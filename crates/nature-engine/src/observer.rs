//! Player observer that mirrors every published event into the log.

use nature_core::{PlayerObserver, PlayerState};
use nature_types::Action;
use tracing::debug;

/// Logs each committed action and applied fitness change at debug level.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl TracingObserver {
    /// Create the observer.
    pub const fn new() -> Self {
        Self
    }
}

impl PlayerObserver for TracingObserver {
    fn update(&self, state: &PlayerState) {
        match state.new_action() {
            Some(Action::Idle {
                timepoint, reason, ..
            }) => debug!(
                generation = %state.generation(),
                player = %state.player(),
                timepoint,
                reason = %reason,
                "Player idled"
            ),
            Some(Action::Interaction {
                timepoint,
                recipient,
                content,
                ..
            }) => debug!(
                generation = %state.generation(),
                player = %state.player(),
                timepoint,
                recipient = %recipient,
                content = ?content,
                "Player interacted"
            ),
            Some(Action::Gossip {
                timepoint,
                about,
                recipient,
                content,
                ..
            }) => debug!(
                generation = %state.generation(),
                player = %state.player(),
                timepoint,
                about = %about,
                recipient = %recipient,
                content = ?content,
                "Player gossiped"
            ),
            None => {}
        }

        let delta = state.fitness_update();
        if delta != 0 {
            debug!(
                generation = %state.generation(),
                player = %state.player(),
                delta,
                "Fitness changed"
            );
        }
    }
}
