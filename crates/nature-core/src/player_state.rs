//! Observable player state: a push-only event channel.
//!
//! A [`PlayerState`] carries two edge-triggered fields. Publishing a new
//! action or a fitness change assigns the field, synchronously notifies
//! every attached [`PlayerObserver`] with the whole state, and then resets
//! the field to empty. Observers must capture what they need during
//! [`PlayerObserver::update`]; reading the field afterwards always yields
//! `None` / `0`.
//!
//! Observers only ever see `&PlayerState`, so an observer cannot publish
//! into the state that is notifying it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nature_types::{Action, GenerationId, PlayerId};

/// Something that wants to hear about a player's state changes.
pub trait PlayerObserver: Send + Sync {
    /// Called once per publish, while the published value is set.
    fn update(&self, state: &PlayerState);
}

/// The observable state of one player.
pub struct PlayerState {
    generation: GenerationId,
    player: PlayerId,
    observers: Vec<Arc<dyn PlayerObserver>>,
    new_action: Option<Action>,
    fitness_update: i64,
}

impl core::fmt::Debug for PlayerState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlayerState")
            .field("generation", &self.generation)
            .field("player", &self.player)
            .field("observers", &self.observers.len())
            .field("new_action", &self.new_action)
            .field("fitness_update", &self.fitness_update)
            .finish()
    }
}

impl PlayerState {
    /// Create a state with no observers and nothing published.
    pub const fn new(generation: GenerationId, player: PlayerId) -> Self {
        Self {
            generation,
            player,
            observers: Vec::new(),
            new_action: None,
            fitness_update: 0,
        }
    }

    /// Generation of the player this state belongs to.
    pub const fn generation(&self) -> GenerationId {
        self.generation
    }

    /// The player this state belongs to.
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// The action being published, during notification only.
    pub const fn new_action(&self) -> Option<&Action> {
        self.new_action.as_ref()
    }

    /// The fitness change being published, during notification only.
    pub const fn fitness_update(&self) -> i64 {
        self.fitness_update
    }

    /// Number of attached observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Attach an observer. Attaching one that is already attached does
    /// nothing.
    pub fn attach(&mut self, observer: Arc<dyn PlayerObserver>) {
        if !self.observers.iter().any(|o| same_observer(o, &observer)) {
            self.observers.push(observer);
        }
    }

    /// Detach an observer. Detaching one that is not attached does nothing.
    pub fn detach(&mut self, observer: &Arc<dyn PlayerObserver>) {
        self.observers.retain(|o| !same_observer(o, observer));
    }

    /// Publish a committed action: set, notify, clear.
    pub fn publish_action(&mut self, action: Action) {
        self.new_action = Some(action);
        self.notify();
        self.new_action = None;
    }

    /// Publish an applied fitness change: set, notify, clear.
    pub fn publish_fitness_update(&mut self, delta: i64) {
        self.fitness_update = delta;
        self.notify();
        self.fitness_update = 0;
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer.update(self);
        }
    }
}

/// Observers are identified by allocation, not by value.
fn same_observer(a: &Arc<dyn PlayerObserver>, b: &Arc<dyn PlayerObserver>) -> bool {
    core::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// An observer that records every published action and fitness change.
#[derive(Debug, Default)]
pub struct ActionLog {
    entries: Mutex<LogEntries>,
}

#[derive(Debug, Default)]
struct LogEntries {
    actions: Vec<Action>,
    fitness_changes: Vec<(PlayerId, i64)>,
}

impl ActionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every action recorded so far, in publish order.
    pub fn actions(&self) -> Vec<Action> {
        self.lock().actions.clone()
    }

    /// Every non-zero fitness change recorded so far, in publish order.
    pub fn fitness_changes(&self) -> Vec<(PlayerId, i64)> {
        self.lock().fitness_changes.clone()
    }

    fn lock(&self) -> MutexGuard<'_, LogEntries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlayerObserver for ActionLog {
    fn update(&self, state: &PlayerState) {
        let mut entries = self.lock();
        if let Some(action) = state.new_action() {
            entries.actions.push(action.clone());
        }
        if state.fitness_update() != 0 {
            entries
                .fitness_changes
                .push((state.player(), state.fitness_update()));
        }
    }
}
