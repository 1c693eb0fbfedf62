//! crates/sc_pipeline/src/dispatch.rs
//! Method-name dispatch over a single-variant ballot set.
//!
//! The ballot variant was fixed when the set was collected; here it only
//! selects the evaluator. A method paired with the wrong variant is a
//! configuration error, never a silent conversion.

use std::collections::BTreeMap;

use log::{debug, warn};
use rayon::prelude::*;

use sc_algo::tabulation::*;
use sc_algo::{candidate_order, MethodResult};
use sc_core::{BallotSet, CandidateId};

use crate::{Method, MethodParams, PipelineError, PipelineResult};

/// Run one evaluator.
pub fn evaluate(
    method: Method,
    ballots: &BallotSet,
    candidates: &[CandidateId],
    params: &MethodParams,
) -> PipelineResult<MethodResult> {
    use BallotSet as B;
    use Method as M;

    let result = match (method, ballots) {
        (M::Plurality, B::Categorical(c)) => tabulate_categorical(c, candidates),
        (M::Plurality, B::Ranking(b)) => tabulate_plurality(b, candidates),
        (M::TwoRound, B::Ranking(b)) => tabulate_two_round(b, candidates),
        (M::Borda, B::Ranking(b)) => tabulate_borda(b, candidates),
        (M::Approval, B::Ranking(b)) => tabulate_approval(b, candidates, params.approval_threshold),
        (M::Condorcet, B::Ranking(b)) => tabulate_condorcet(b, candidates),
        (M::Irv, B::Ranking(b)) => tabulate_irv(b, candidates),
        (M::Coombs, B::Ranking(b)) => tabulate_coombs(b, candidates),
        (M::RankedScore, B::Ranking(b)) => tabulate_ranked_score(b, candidates),
        (M::KemenyYoung, B::Ranking(b)) => tabulate_kemeny_young(b, candidates),
        (M::Bucklin, B::Ranking(b)) => tabulate_bucklin(b, candidates),
        (M::Minimax, B::Ranking(b)) => tabulate_minimax(b, candidates),
        (M::Schulze, B::Ranking(b)) => tabulate_schulze(b, candidates),
        (M::SimpleScore, B::Score(s)) => tabulate_simple_score(s, candidates),
        (M::MedianScore, B::Score(s)) => tabulate_median_score(s, candidates),
        (M::Star, B::Score(s)) => tabulate_star(s, candidates),
        (M::MeanMedianHybrid, B::Score(s)) => tabulate_mean_median(s, candidates),
        (M::VarianceBased, B::Score(s)) => tabulate_variance(s, candidates),
        (M::BayesianRegret, B::Score(s)) => tabulate_bayesian_regret(s, candidates),
        (M::ScoreDistribution, B::Score(s)) => tabulate_score_distribution(s, candidates),
        (m, set) => {
            return Err(PipelineError::BallotMismatch { method: m.as_str(), kind: set.kind().as_str() });
        }
    };
    Ok(result?)
}

/// Methods `evaluate_all` runs for this ballot set. Kemeny–Young is left out
/// above its candidate limit.
pub fn applicable_methods(ballots: &BallotSet, candidates: &[CandidateId]) -> Vec<Method> {
    Method::ALL
        .iter()
        .copied()
        .filter(|m| m.accepts(ballots.kind()))
        .filter(|&m| {
            let skip = m == Method::KemenyYoung && candidates.len() > KEMENY_MAX_CANDIDATES;
            if skip {
                warn!("kemeny_young skipped: {} candidates", candidates.len());
            }
            !skip
        })
        .collect()
}

/// Every applicable method, evaluated in parallel and keyed by method name.
/// The map is identical to evaluating the same methods one by one.
pub fn evaluate_all(
    ballots: &BallotSet,
    candidates: &[CandidateId],
    params: &MethodParams,
) -> PipelineResult<BTreeMap<String, MethodResult>> {
    // candidate-list errors are shared by every method; report them once
    candidate_order(candidates)?;
    let methods = applicable_methods(ballots, candidates);
    debug!("evaluating {} methods over {} ballots", methods.len(), ballots.len());
    methods
        .par_iter()
        .map(|&m| evaluate(m, ballots, candidates, params).map(|r| (m.as_str().to_string(), r)))
        .collect()
}
