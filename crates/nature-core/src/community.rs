//! A community: the evolutionary run over a sequence of generations.

use std::sync::Arc;

use nature_mind::MindService;
use nature_types::{CommunityId, GenerationId, StrategyCount};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CommunityCreationError, SimulationError};
use crate::generation::{Generation, GenerationSettings};
use crate::player::Player;
use crate::player_state::PlayerObserver;
use crate::policy::{IndirectReciprocity, RoundPolicy};
use crate::reproduction::reproduce;

/// Numeric parameters of a community run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityParams {
    /// Maximum onlookers per interaction. Must be above 0.
    pub num_onlookers: u32,
    /// Generations to run. Must be above 2.
    pub num_generations: u32,
    /// Timepoints per generation. Must be above 5.
    pub length_of_generations: u64,
}

impl Default for CommunityParams {
    fn default() -> Self {
        Self {
            num_onlookers: 5,
            num_generations: 10,
            length_of_generations: 30,
        }
    }
}

impl CommunityParams {
    /// Check every bound, reporting the first one violated.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityCreationError::InvalidParameter`] naming the
    /// violated bound.
    pub fn validate(&self) -> Result<(), CommunityCreationError> {
        if self.num_onlookers == 0 {
            return Err(invalid("number of onlookers <= 0"));
        }
        if self.length_of_generations <= 5 {
            return Err(invalid("length of generations <= 5"));
        }
        if self.num_generations <= 2 {
            return Err(invalid("number of generations <= 2"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> CommunityCreationError {
    CommunityCreationError::InvalidParameter {
        reason: reason.to_owned(),
    }
}

/// A registered community and the generations it has completed.
pub struct Community {
    id: CommunityId,
    params: CommunityParams,
    initial_strategies: Vec<StrategyCount>,
    generations: Vec<Generation>,
    rng: StdRng,
    policy: Box<dyn RoundPolicy>,
    observers: Vec<Arc<dyn PlayerObserver>>,
}

impl core::fmt::Debug for Community {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Community")
            .field("id", &self.id)
            .field("params", &self.params)
            .field("initial_strategies", &self.initial_strategies)
            .field("generations", &self.generations.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Community {
    /// Validate the parameters, then register a community with the mind.
    ///
    /// Nothing is registered when validation fails. The community starts
    /// with an OS-seeded RNG and the [`IndirectReciprocity`] policy.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityCreationError::InvalidParameter`] for a violated
    /// bound and [`CommunityCreationError::Registration`] if the mind does
    /// not allocate an id.
    pub async fn create<M: MindService>(
        mind: &M,
        initial_strategies: Vec<StrategyCount>,
        params: CommunityParams,
    ) -> Result<Self, CommunityCreationError> {
        params.validate()?;
        let id = mind.create_community().await?;

        info!(
            community = %id,
            num_onlookers = params.num_onlookers,
            num_generations = params.num_generations,
            length_of_generations = params.length_of_generations,
            "Community registered"
        );

        Ok(Self {
            id,
            params,
            initial_strategies,
            generations: Vec::new(),
            rng: StdRng::from_os_rng(),
            policy: Box::new(IndirectReciprocity::default()),
            observers: Vec::new(),
        })
    }

    /// Seed the community's random source.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Resolve rounds with `policy` instead of the default.
    #[must_use]
    pub fn with_policy(mut self, policy: impl RoundPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Attach `observer` to every player of every generation built from now on.
    pub fn observe(&mut self, observer: Arc<dyn PlayerObserver>) {
        if !self
            .observers
            .iter()
            .any(|o| core::ptr::addr_eq(Arc::as_ptr(o), Arc::as_ptr(&observer)))
        {
            self.observers.push(observer);
        }
    }

    /// Run generations until `num_generations` have completed.
    ///
    /// Generation 0 is built from the initial strategies; each later one is
    /// reproduced from the finished players of the one before it. Each
    /// generation runs timepoints `0..length_of_generations`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing generation. Generations completed before
    /// the failure remain available through [`generations`](Self::generations).
    pub async fn simulate<M: MindService>(&mut self, mind: &M) -> Result<(), SimulationError> {
        let target = usize::try_from(self.params.num_generations).unwrap_or(usize::MAX);

        while self.generations.len() < target {
            let index = GenerationId::new(u64::try_from(self.generations.len()).unwrap_or(u64::MAX));
            let composition = match self.generations.last() {
                None => self.initial_strategies.clone(),
                Some(previous) => reproduce(
                    previous.players().iter().map(|p| (p.strategy(), p.fitness())),
                    &mut self.rng,
                )
                .map_err(|source| SimulationError::Reproduction { index, source })?,
            };

            let settings = GenerationSettings {
                index,
                community: self.id,
                start_time: 0,
                end_time: self.params.length_of_generations,
                num_onlookers: self.params.num_onlookers,
            };
            let mut generation = Generation::build(mind, settings, composition, &self.observers)
                .await
                .map_err(|source| SimulationError::Generation { index, source })?;
            generation
                .simulate(mind, self.policy.as_ref(), &mut self.rng)
                .await
                .map_err(|source| SimulationError::Generation { index, source })?;

            self.generations.push(generation);
        }

        info!(
            community = %self.id,
            generations = self.generations.len(),
            "Community finished"
        );
        Ok(())
    }

    /// The id the mind allocated.
    pub const fn id(&self) -> CommunityId {
        self.id
    }

    /// The run's parameters.
    pub const fn params(&self) -> CommunityParams {
        self.params
    }

    /// Maximum onlookers per interaction.
    pub const fn num_onlookers(&self) -> u32 {
        self.params.num_onlookers
    }

    /// Generations the run aims for.
    pub const fn num_generations(&self) -> u32 {
        self.params.num_generations
    }

    /// Timepoints per generation.
    pub const fn length_of_generations(&self) -> u64 {
        self.params.length_of_generations
    }

    /// The composition generation 0 is built from.
    pub fn initial_strategies(&self) -> &[StrategyCount] {
        &self.initial_strategies
    }

    /// Completed generations in simulation order.
    pub fn generations(&self) -> &[Generation] {
        &self.generations
    }

    /// Players of the most recent completed generation.
    pub fn latest_players(&self) -> &[Player] {
        self.generations
            .last()
            .map(Generation::players)
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nature_mind::{ScriptedMind, endpoints};
    use nature_types::Strategy;

    use super::*;

    fn params(num_onlookers: u32, num_generations: u32, length_of_generations: u64) -> CommunityParams {
        CommunityParams {
            num_onlookers,
            num_generations,
            length_of_generations,
        }
    }

    fn strategies() -> Vec<StrategyCount> {
        vec![StrategyCount::new(
            Strategy::new("cooperator", "promote_self", "naive_trust"),
            4,
        )]
    }

    #[test]
    fn defaults_are_valid() {
        assert!(CommunityParams::default().validate().is_ok());
        assert_eq!(CommunityParams::default(), params(5, 10, 30));
    }

    #[test]
    fn boundary_values_are_rejected() {
        for (bad, reason) in [
            (params(0, 10, 30), "onlookers"),
            (params(5, 10, 5), "length of generations"),
            (params(5, 2, 30), "number of generations"),
        ] {
            let err = bad.validate().unwrap_err();
            assert!(err.to_string().contains(reason), "{err}");
        }
        assert!(params(1, 3, 6).validate().is_ok());
    }

    #[tokio::test]
    async fn invalid_parameters_register_nothing() {
        let mind = ScriptedMind::new();
        let result = Community::create(&mind, strategies(), params(0, 10, 30)).await;
        assert!(matches!(
            result,
            Err(CommunityCreationError::InvalidParameter { .. })
        ));
        assert_eq!(mind.communities_created(), 0);
    }

    #[tokio::test]
    async fn registration_failure_is_reported() {
        let mind = ScriptedMind::new();
        mind.fail_endpoint(endpoints::COMMUNITY, 500);
        let err = Community::create(&mind, strategies(), CommunityParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CommunityCreationError::Registration { .. }));
    }

    #[tokio::test]
    async fn id_comes_from_the_mind() {
        let mind = ScriptedMind::new().with_first_community_id(17);
        let community = Community::create(&mind, strategies(), CommunityParams::default())
            .await
            .unwrap();
        assert_eq!(community.id(), CommunityId::new(17));
        assert!(community.generations().is_empty());
        assert!(community.latest_players().is_empty());
    }

    #[tokio::test]
    async fn observers_are_deduplicated() {
        let mind = ScriptedMind::new();
        let mut community = Community::create(&mind, strategies(), CommunityParams::default())
            .await
            .unwrap();
        let log: Arc<dyn PlayerObserver> = Arc::new(crate::player_state::ActionLog::new());
        community.observe(Arc::clone(&log));
        community.observe(log);
        assert_eq!(community.observers.len(), 1);
    }
}
