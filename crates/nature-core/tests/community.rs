//! Integration tests for full community runs.
//!
//! Communities are driven against [`ScriptedMind`], so every run is
//! deterministic given a seed and every request the engine makes can be
//! inspected afterwards.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use nature_core::{
    ActionLog, Community, CommunityCreationError, CommunityParams, CommunityReport, Generation,
    Player, PlayerObserver, ReproductionError, SimulationError,
};
use nature_mind::{DecisionReply, ScriptedMind};
use nature_types::{GenerationId, InteractionContent, PlayerId, Strategy, StrategyCount, total_population};

fn s1() -> Strategy {
    Strategy::new("cooperator", "promote_self", "naive_trust_model")
}

fn s2() -> Strategy {
    Strategy::new("defector", "spread_negative_trust", "void_trust_model")
}

fn initial() -> Vec<StrategyCount> {
    vec![StrategyCount::new(s1(), 6), StrategyCount::new(s2(), 4)]
}

fn params() -> CommunityParams {
    CommunityParams {
        num_onlookers: 5,
        num_generations: 3,
        length_of_generations: 10,
    }
}

/// Every player donates to the next one around a ring of ten.
fn ring_mind() -> ScriptedMind {
    ScriptedMind::new().with_responder(|q| {
        let next = q.player.into_inner().saturating_add(1) % 10;
        DecisionReply::interaction(PlayerId::new(next), InteractionContent::Cooperate)
    })
}

fn count_of(composition: &[StrategyCount], strategy: &Strategy) -> u32 {
    composition
        .iter()
        .filter(|c| &c.strategy == strategy)
        .map(|c| c.count)
        .sum()
}

async fn run(seed: u64) -> (ScriptedMind, Community) {
    let mind = ring_mind();
    let mut community = Community::create(&mind, initial(), params())
        .await
        .unwrap()
        .with_seed(seed);
    community.simulate(&mind).await.unwrap();
    (mind, community)
}

#[tokio::test]
async fn each_boundary_value_fails_creation() {
    let mind = ScriptedMind::new();
    for bad in [
        CommunityParams {
            num_onlookers: 0,
            ..params()
        },
        CommunityParams {
            length_of_generations: 5,
            ..params()
        },
        CommunityParams {
            num_generations: 2,
            ..params()
        },
    ] {
        let result = Community::create(&mind, initial(), bad).await;
        assert!(matches!(
            result,
            Err(CommunityCreationError::InvalidParameter { .. })
        ));
    }
    assert_eq!(mind.communities_created(), 0);

    let smallest = CommunityParams {
        num_onlookers: 1,
        num_generations: 3,
        length_of_generations: 6,
    };
    assert!(Community::create(&mind, initial(), smallest).await.is_ok());
    assert_eq!(mind.communities_created(), 1);
}

#[tokio::test]
async fn three_generations_of_ten_players() {
    let (mind, community) = run(2024).await;

    let generations = community.generations();
    assert_eq!(generations.len(), 3);
    let indices: Vec<GenerationId> = generations.iter().map(Generation::index).collect();
    assert_eq!(
        indices,
        vec![GenerationId::new(0), GenerationId::new(1), GenerationId::new(2)]
    );

    for generation in generations {
        assert_eq!(generation.players().len(), 10);
        assert_eq!(total_population(generation.composition()), 10);
        assert_eq!(generation.community_id(), community.id());
        assert_eq!(generation.start_time(), 0);
        assert_eq!(generation.end_time(), 10);
        assert!(
            generation
                .players()
                .iter()
                .all(|p| p.strategy() == &s1() || p.strategy() == &s2())
        );
    }

    let first = generations.first().unwrap();
    assert_eq!(first.composition(), initial().as_slice());
    let s1_players = first.players().iter().filter(|p| p.strategy() == &s1()).count();
    assert_eq!(s1_players, 6);

    // Ten players register per generation and decide once per timepoint.
    assert_eq!(mind.registrations().len(), 30);
    assert_eq!(mind.action_queries().len(), 300);
}

#[tokio::test]
async fn later_generations_follow_realized_fitness() {
    let (_, community) = run(7).await;
    let generations = community.generations();

    for (previous, next) in generations.iter().zip(generations.iter().skip(1)) {
        // A strategy whose holders earned nothing cannot be drawn.
        for entry in previous.composition() {
            let earned: u64 = previous
                .players()
                .iter()
                .filter(|p| p.strategy() == &entry.strategy)
                .map(Player::fitness)
                .sum();
            if earned == 0 {
                assert_eq!(count_of(next.composition(), &entry.strategy), 0);
            }
        }
        assert_eq!(
            total_population(next.composition()),
            total_population(previous.composition())
        );
    }
}

#[tokio::test]
async fn seeded_runs_are_reproducible() {
    let (_, first) = run(99).await;
    let (_, second) = run(99).await;

    let compositions = |c: &Community| -> Vec<Vec<StrategyCount>> {
        c.generations()
            .iter()
            .map(|g| g.composition().to_vec())
            .collect()
    };
    assert_eq!(compositions(&first), compositions(&second));
}

#[tokio::test]
async fn all_idle_generation_cannot_reproduce() {
    let mind = ScriptedMind::new();
    let mut community = Community::create(&mind, initial(), params())
        .await
        .unwrap()
        .with_seed(1);

    let err = community.simulate(&mind).await.unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Reproduction {
            index: GenerationId(1),
            source: ReproductionError::NoFitness { players: 10 },
        }
    ));
    // The finished generation stays on record.
    assert_eq!(community.generations().len(), 1);
    assert_eq!(community.latest_players().len(), 10);
}

#[tokio::test]
async fn community_observers_see_every_generation() {
    let mind = ring_mind();
    let log = Arc::new(ActionLog::new());
    let mut community = Community::create(&mind, initial(), params())
        .await
        .unwrap()
        .with_seed(3);
    community.observe(Arc::clone(&log) as Arc<dyn PlayerObserver>);

    community.simulate(&mind).await.unwrap();
    assert_eq!(log.actions().len(), 300);
}

#[tokio::test]
async fn report_summarises_the_run() {
    let (_, community) = run(11).await;
    let report = CommunityReport::from_community(&community);

    assert_eq!(report.community, community.id());
    assert_eq!(report.params, params());
    assert_eq!(report.generations.len(), 3);
    for (summary, generation) in report.generations.iter().zip(community.generations()) {
        assert_eq!(summary.actions.cooperate, 100);
        assert_eq!(summary.actions.total(), 100);
        assert_eq!(summary.total_fitness, generation.total_fitness());
        assert_eq!(summary.players.len(), 10);
    }

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["generations"][0]["composition"][0]["count"], 6);
    assert!(json["completed_at"].is_string());
}
