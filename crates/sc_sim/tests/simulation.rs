//! Seeded simulation runs end to end.

use proptest::prelude::*;

use sc_core::{Ballot, BallotKind, CandidateId, SimConfig, SimRng};
use sc_sim::{generate_candidates, simulate, simulate_utility, ElectorateSpec, SimError, Tally, NO_VOTE};

fn spec(population_size: i64, mode: BallotKind) -> ElectorateSpec {
    ElectorateSpec {
        population_size,
        candidates: ["A", "B", "C"].iter().map(|s| s.parse().unwrap()).collect(),
        demographics: None,
        influence_weights: Default::default(),
        turnout_rate: 0.7,
        mode,
    }
}

#[test]
fn same_seed_same_outcome() {
    let cfg = SimConfig::default();
    for mode in [BallotKind::Categorical, BallotKind::Ranking, BallotKind::Score] {
        let a = simulate(&spec(200, mode), &cfg, &mut SimRng::from_seed_u64(42)).unwrap();
        let b = simulate(&spec(200, mode), &cfg, &mut SimRng::from_seed_u64(42)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn zero_population_is_a_configuration_error() {
    let cfg = SimConfig::default();
    let err = simulate(&spec(0, BallotKind::Ranking), &cfg, &mut SimRng::from_seed_u64(1)).unwrap_err();
    assert!(matches!(err, SimError::InvalidPopulation(0)));
}

#[test]
fn categorical_tally_covers_every_voter() {
    let cfg = SimConfig::default();
    let out = simulate(&spec(300, BallotKind::Categorical), &cfg, &mut SimRng::from_seed_u64(7)).unwrap();
    assert_eq!(out.ballots.len(), 300);
    match out.tally {
        Tally::Counts(c) => {
            assert_eq!(c.values().sum::<u64>(), 300);
            assert!(c.contains_key(NO_VOTE));
        }
        other => panic!("unexpected tally {other:?}"),
    }
}

#[test]
fn utility_model_produces_full_rankings() {
    let cfg = SimConfig::default();
    let mut rng = SimRng::from_seed_u64(11);
    let cands = generate_candidates(4, &cfg.parties, &cfg.issues, &cfg, &mut rng).unwrap();
    let out = simulate_utility(150, &cands, BallotKind::Ranking, &cfg, &mut rng).unwrap();
    assert_eq!(out.voters.len(), 150);
    for vb in &out.ballots {
        match &vb.ballot {
            Ballot::Ranking(r) => assert_eq!(r.len(), 4),
            other => panic!("unexpected ballot {other:?}"),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn rankings_are_permutations_of_candidates(seed in any::<u64>(), n in 1i64..60) {
        let cfg = SimConfig::default();
        let s = spec(n, BallotKind::Ranking);
        let out = simulate(&s, &cfg, &mut SimRng::from_seed_u64(seed)).unwrap();
        for vb in &out.ballots {
            if let Ballot::Ranking(r) = &vb.ballot {
                let mut sorted: Vec<CandidateId> = r.clone();
                sorted.sort();
                let mut expected = s.candidates.clone();
                expected.sort();
                prop_assert_eq!(sorted, expected);
            }
        }
    }

    #[test]
    fn scores_stay_on_scale(seed in any::<u64>()) {
        let cfg = SimConfig::default();
        let out = simulate(&spec(40, BallotKind::Score), &cfg, &mut SimRng::from_seed_u64(seed)).unwrap();
        for vb in &out.ballots {
            if let Ballot::Score(card) = &vb.ballot {
                prop_assert!(card.values().all(|s| (0.0..=5.0).contains(s)));
            }
        }
    }
}
