//! Request → simulate → evaluate_all, end to end.

use proptest::prelude::*;
use serde_json::json;

use sc_core::{BallotKind, SimConfig};
use sc_pipeline::{
    evaluate, evaluate_all, simulate, validate_ballots, Method, MethodParams, PipelineError, SimulationRequest,
};
use sc_sim::{SimError, Tally};

fn influence_request(mode: &str, population: i64) -> SimulationRequest {
    serde_json::from_value(json!({
        "model": "influence",
        "population_size": population,
        "candidates": ["A", "B", 3],
        "demographics": { "gender": { "male": 0.5, "female": 0.5 } },
        "influence_weights": { "gender": { "female": { "B": 2.0 } } },
        "turnout_rate": 0.8,
        "mode": mode
    }))
    .unwrap()
}

#[test]
fn influence_request_parses_integer_ids() {
    match influence_request("ranking", 10) {
        SimulationRequest::Influence(spec) => {
            assert_eq!(spec.candidates[2].as_str(), "3");
            assert_eq!(spec.mode, BallotKind::Ranking);
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[test]
fn simulated_ballots_validate_and_evaluate() {
    let cfg = SimConfig::default();
    let out = simulate(&influence_request("ranking", 120), &cfg, 2024).unwrap();
    let set = out.ballot_set().unwrap();
    assert!(validate_ballots(&set, &out.candidates).pass);

    let all = evaluate_all(&set, &out.candidates, &MethodParams::default()).unwrap();
    assert_eq!(all.len(), 12);
    assert!(all.values().all(|r| r.winner.as_ref().map_or(true, |w| out.candidates.contains(w))));
}

#[test]
fn score_run_tally_and_methods() {
    let cfg = SimConfig::default();
    let out = simulate(&influence_request("score", 80), &cfg, 5).unwrap();
    assert!(matches!(out.tally, Tally::Averages(_)));
    assert_eq!(out.voters_sample.len(), 80);
    assert_eq!(out.ballots.len(), out.voters_sample.iter().filter(|v| v.turnout).count());

    let set = out.ballot_set().unwrap();
    let all = evaluate_all(&set, &out.candidates, &MethodParams::default()).unwrap();
    assert_eq!(all.len(), 7);
    assert!(all["score_distribution"].winner.is_none());
    let err = evaluate(Method::Irv, &set, &out.candidates, &MethodParams::default()).unwrap_err();
    assert!(matches!(err, PipelineError::BallotMismatch { .. }));
}

#[test]
fn utility_request_generates_candidates() {
    let req: SimulationRequest = serde_json::from_value(json!({
        "model": "utility",
        "population_size": 60,
        "mode": "categorical",
        "num_candidates": 3,
        "parties": ["Green", "Conservative"]
    }))
    .unwrap();
    let out = simulate(&req, &SimConfig::default(), 9).unwrap();
    assert_eq!(out.candidates.len(), 3);
    assert_eq!(out.ballots.len(), 60);
    let all = evaluate_all(&out.ballot_set().unwrap(), &out.candidates, &MethodParams::default()).unwrap();
    assert_eq!(all.keys().collect::<Vec<_>>(), vec!["plurality"]);
}

#[test]
fn configuration_errors_surface() {
    let cfg = SimConfig::default();
    let err = simulate(&influence_request("ranking", -3), &cfg, 1).unwrap_err();
    assert!(matches!(err, PipelineError::Simulation(SimError::InvalidPopulation(-3))));

    let mut broken = SimConfig::default();
    broken.issues.clear();
    assert!(matches!(simulate(&influence_request("ranking", 3), &broken, 1), Err(PipelineError::Core(_))));
}

#[test]
fn output_serializes_with_stable_shape() {
    let out = simulate(&influence_request("categorical", 5), &SimConfig::default(), 3).unwrap();
    let v = serde_json::to_value(&out).unwrap();
    for key in ["seed", "mode", "candidates", "ballots", "voters_sample", "tally"] {
        assert!(v.get(key).is_some(), "missing {key}");
    }
    assert_eq!(v["mode"], "categorical");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn same_seed_same_output(seed in any::<u64>()) {
        let cfg = SimConfig::default();
        let req = influence_request("ranking", 40);
        let a = simulate(&req, &cfg, seed).unwrap();
        let b = simulate(&req, &cfg, seed).unwrap();
        prop_assert_eq!(&a, &b);
        let params = MethodParams::default();
        let ra = evaluate_all(&a.ballot_set().unwrap(), &a.candidates, &params).unwrap();
        let rb = evaluate_all(&b.ballot_set().unwrap(), &b.candidates, &params).unwrap();
        prop_assert_eq!(ra, rb);
    }
}
