//! Fitness-proportionate reproduction.
//!
//! The next generation's composition is drawn from a weighted pool in which
//! every distinct strategy owns a contiguous block as long as the summed
//! fitness of its holders. The pool is never materialised: blocks are kept
//! as cumulative end bounds and a draw is located by binary search.

use nature_types::{Strategy, StrategyCount};
use rand::Rng;
use tracing::debug;

use crate::error::ReproductionError;

/// Aggregate fitness of one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyWeight {
    /// The strategy.
    pub strategy: Strategy,
    /// Summed fitness of every player holding it.
    pub fitness: u64,
}

/// Sum fitness per distinct strategy, in first-encountered order.
pub fn fitness_by_strategy<'a, I>(entries: I) -> Vec<StrategyWeight>
where
    I: IntoIterator<Item = (&'a Strategy, u64)>,
{
    let mut weights: Vec<StrategyWeight> = Vec::new();
    for (strategy, fitness) in entries {
        match weights.iter_mut().find(|w| &w.strategy == strategy) {
            Some(weight) => weight.fitness = weight.fitness.saturating_add(fitness),
            None => weights.push(StrategyWeight {
                strategy: strategy.clone(),
                fitness,
            }),
        }
    }
    weights
}

/// The weighted pool as cumulative block bounds.
#[derive(Debug, Clone)]
pub struct WeightedPool {
    /// `(strategy, exclusive end)` per block, ends non-decreasing.
    blocks: Vec<(Strategy, u64)>,
    total: u64,
}

impl WeightedPool {
    /// Lay the weights out as consecutive blocks.
    pub fn new(weights: Vec<StrategyWeight>) -> Self {
        let mut total: u64 = 0;
        let blocks = weights
            .into_iter()
            .map(|w| {
                total = total.saturating_add(w.fitness);
                (w.strategy, total)
            })
            .collect();
        Self { blocks, total }
    }

    /// Length of the conceptual pool (the overall fitness).
    pub const fn len(&self) -> u64 {
        self.total
    }

    /// Whether the pool has no slots at all.
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// The strategy occupying `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ReproductionError::IndexOutOfPool`] if `index` is not
    /// below [`len`](Self::len).
    pub fn strategy_at(&self, index: u64) -> Result<&Strategy, ReproductionError> {
        // First block whose end lies past the index; empty blocks are skipped
        // because their end equals the previous block's.
        let position = self.blocks.partition_point(|(_, end)| *end <= index);
        self.blocks
            .get(position)
            .map(|(strategy, _)| strategy)
            .ok_or(ReproductionError::IndexOutOfPool {
                index,
                size: self.total,
            })
    }
}

/// Draw the next generation's composition from `(strategy, fitness)` pairs,
/// one pair per player of the previous generation.
///
/// The population size is preserved. Strategies are listed in the order
/// they were first drawn.
///
/// # Errors
///
/// Returns [`ReproductionError::EmptyGeneration`] when there are no players
/// and [`ReproductionError::NoFitness`] when every player has zero fitness.
pub fn reproduce<'a, I, R>(entries: I, rng: &mut R) -> Result<Vec<StrategyCount>, ReproductionError>
where
    I: IntoIterator<Item = (&'a Strategy, u64)>,
    R: Rng + ?Sized,
{
    let entries: Vec<(&Strategy, u64)> = entries.into_iter().collect();
    if entries.is_empty() {
        return Err(ReproductionError::EmptyGeneration);
    }
    let population = entries.len();

    let pool = WeightedPool::new(fitness_by_strategy(entries));
    if pool.is_empty() {
        return Err(ReproductionError::NoFitness {
            players: population,
        });
    }

    let mut composition: Vec<StrategyCount> = Vec::new();
    for _ in 0..population {
        let index = rng.random_range(0..pool.len());
        let strategy = pool.strategy_at(index)?;
        match composition.iter_mut().find(|c| &c.strategy == strategy) {
            Some(entry) => entry.count = entry.count.saturating_add(1),
            None => composition.push(StrategyCount::new(strategy.clone(), 1)),
        }
    }

    debug!(
        population,
        overall_fitness = pool.len(),
        strategies = composition.len(),
        "Reproduced population"
    );
    Ok(composition)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nature_types::total_population;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn named(name: &str) -> Strategy {
        Strategy::new(name, "promote_self", "naive_trust")
    }

    fn count_of(composition: &[StrategyCount], strategy: &Strategy) -> u64 {
        composition
            .iter()
            .filter(|c| &c.strategy == strategy)
            .map(|c| u64::from(c.count))
            .sum()
    }

    #[test]
    fn weights_are_summed_in_first_seen_order() {
        let a = named("a");
        let b = named("b");
        let weights = fitness_by_strategy([(&b, 4), (&a, 1), (&b, 6), (&a, 0)]);
        assert_eq!(
            weights,
            vec![
                StrategyWeight {
                    strategy: b.clone(),
                    fitness: 10
                },
                StrategyWeight {
                    strategy: a.clone(),
                    fitness: 1
                },
            ]
        );
    }

    #[test]
    fn pool_blocks_cover_every_index_once() {
        let a = named("a");
        let b = named("b");
        let c = named("c");
        let pool = WeightedPool::new(vec![
            StrategyWeight {
                strategy: a.clone(),
                fitness: 2,
            },
            StrategyWeight {
                strategy: b,
                fitness: 0,
            },
            StrategyWeight {
                strategy: c.clone(),
                fitness: 3,
            },
        ]);

        assert_eq!(pool.len(), 5);
        assert_eq!(pool.strategy_at(0).unwrap(), &a);
        assert_eq!(pool.strategy_at(1).unwrap(), &a);
        assert_eq!(pool.strategy_at(2).unwrap(), &c);
        assert_eq!(pool.strategy_at(4).unwrap(), &c);
        assert!(matches!(
            pool.strategy_at(5),
            Err(ReproductionError::IndexOutOfPool { index: 5, size: 5 })
        ));
    }

    #[test]
    fn population_size_is_preserved() {
        let a = named("a");
        let b = named("b");
        let mut entries = Vec::new();
        for fitness in [3_u64, 0, 9, 1, 4, 4, 0] {
            entries.push((&a, fitness));
            entries.push((&b, fitness.saturating_add(1)));
        }
        let mut rng = SmallRng::seed_from_u64(11);

        let next = reproduce(entries.iter().copied(), &mut rng).unwrap();
        assert_eq!(total_population(&next), 14);
    }

    #[test]
    fn selection_is_proportional_to_fitness() {
        let a = named("a");
        let b = named("b");
        // Four players: A holds 30 fitness in total, B holds 10.
        let entries = [(&a, 20), (&b, 10), (&a, 10), (&b, 0)];
        let mut rng = SmallRng::seed_from_u64(42);

        let mut draws_a = 0_u64;
        let mut draws_b = 0_u64;
        for _ in 0..2_000 {
            let next = reproduce(entries, &mut rng).unwrap();
            draws_a = draws_a.saturating_add(count_of(&next, &a));
            draws_b = draws_b.saturating_add(count_of(&next, &b));
        }

        assert_eq!(draws_a.saturating_add(draws_b), 8_000);
        // Expected ratio 3:1, allow generous slack.
        assert!(draws_a > draws_b.saturating_mul(5) / 2, "{draws_a} vs {draws_b}");
        assert!(draws_a < draws_b.saturating_mul(7) / 2, "{draws_a} vs {draws_b}");
    }

    #[test]
    fn zero_weight_strategies_die_out() {
        let a = named("a");
        let b = named("b");
        let entries = [(&a, 0), (&b, 5), (&a, 0)];
        let mut rng = SmallRng::seed_from_u64(7);

        let next = reproduce(entries, &mut rng).unwrap();
        assert_eq!(next, vec![StrategyCount::new(b, 3)]);
    }

    #[test]
    fn zero_total_fitness_is_an_error() {
        let a = named("a");
        let mut rng = SmallRng::seed_from_u64(1);
        let err = reproduce([(&a, 0), (&a, 0)], &mut rng).unwrap_err();
        assert!(matches!(err, ReproductionError::NoFitness { players: 2 }));
    }

    #[test]
    fn empty_generation_is_an_error() {
        let mut rng = SmallRng::seed_from_u64(1);
        let err = reproduce(std::iter::empty(), &mut rng).unwrap_err();
        assert!(matches!(err, ReproductionError::EmptyGeneration));
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let a = named("a");
        let b = named("b");
        let entries = [(&a, 3), (&b, 2), (&a, 1), (&b, 8)];

        let first = reproduce(entries, &mut SmallRng::seed_from_u64(99)).unwrap();
        let second = reproduce(entries, &mut SmallRng::seed_from_u64(99)).unwrap();
        assert_eq!(first, second);
    }
}
