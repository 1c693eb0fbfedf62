// crates/sc_algo/src/lib.rs
//! sc_algo: pairwise matrix and voting-method evaluators.
//!
//! Every evaluator is a pure function of `(ballots, candidates)`:
//! - no RNG, no I/O, no shared state; all evaluators may run concurrently
//! - ties resolve by the caller's candidate order, never by map iteration
//! - an empty ballot set yields `winner: None` with `Diagnostics::Empty`
//! - an empty or duplicated candidate list is a configuration error
#![forbid(unsafe_code)]

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use sc_core::ids::CandidateId;
use sc_core::determinism::CandidateOrder;

pub mod pairwise;
pub use pairwise::PairwiseMatrix;

// ----------------------------- Errors ------------------------------------------------

/// Configuration errors. Undecidable outcomes are never errors; they are
/// `MethodResult { winner: None, .. }`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TabError {
    #[error("candidate list is empty")]
    NoCandidates,

    #[error("candidate {0} listed more than once")]
    DuplicateCandidate(CandidateId),

    #[error("{method} supports at most {limit} candidates (got {count})")]
    TooManyCandidates {
        method: &'static str,
        count: usize,
        limit: usize,
    },

    #[error("approval threshold must be at least 1")]
    ZeroApprovalThreshold,
}

// ----------------------------- Results -----------------------------------------------

/// Winner plus method-specific diagnostics, serialized verbatim by callers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodResult {
    pub winner: Option<CandidateId>,
    pub diagnostics: Diagnostics,
}

impl MethodResult {
    /// Result for an empty ballot set.
    pub fn empty() -> Self {
        Self { winner: None, diagnostics: Diagnostics::Empty }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "data", rename_all = "snake_case"))]
pub enum Diagnostics {
    Empty,
    /// Integer tallies: first choices, approvals, Borda points.
    Counts(BTreeMap<CandidateId, u64>),
    /// Real-valued per-candidate figures: averages, medians.
    Scores(BTreeMap<CandidateId, f64>),
    TwoRound {
        first_round: BTreeMap<CandidateId, u64>,
        runoff: Option<BTreeMap<CandidateId, u64>>,
    },
    Pairwise(PairwiseMatrix),
    Minimax {
        max_opposition: BTreeMap<CandidateId, u64>,
        pairwise: PairwiseMatrix,
    },
    Schulze {
        strengths: PairwiseMatrix,
        path_wins: BTreeMap<CandidateId, u64>,
    },
    Rounds(Vec<tabulation::EliminationRound>),
    Bucklin(Vec<BTreeMap<CandidateId, u64>>),
    Kemeny {
        ranking: Vec<CandidateId>,
        distance: u64,
    },
    Star {
        first_round: BTreeMap<CandidateId, f64>,
        runoff: Option<tabulation::StarRunoff>,
    },
    MeanMedian(BTreeMap<CandidateId, tabulation::MeanMedian>),
    Variance(BTreeMap<CandidateId, tabulation::Spread>),
    Regret(BTreeMap<CandidateId, tabulation::Regret>),
    Distribution(Vec<tabulation::ScoreHistogram>),
}

// ----------------------------- Ballot preparation ------------------------------------

/// Validate the candidate list and build its tie-break order.
pub fn candidate_order(candidates: &[CandidateId]) -> Result<CandidateOrder<'_>, TabError> {
    if candidates.is_empty() {
        return Err(TabError::NoCandidates);
    }
    let order = CandidateOrder::new(candidates);
    for (i, id) in candidates.iter().enumerate() {
        if order.position(id) != Some(i) {
            return Err(TabError::DuplicateCandidate(id.clone()));
        }
    }
    Ok(order)
}

/// Rankings as candidate indices. Unknown ids and repeated entries are
/// dropped so every evaluator sees each candidate at most once per ballot.
pub(crate) fn index_rankings(ballots: &[Vec<CandidateId>], order: &CandidateOrder<'_>) -> Vec<Vec<usize>> {
    ballots
        .iter()
        .map(|b| {
            let mut seen = vec![false; order.len()];
            b.iter()
                .filter_map(|id| order.position(id))
                .filter(|&i| !std::mem::replace(&mut seen[i], true))
                .collect()
        })
        .collect()
}

/// True when no ballot names a known candidate: nothing was counted, so
/// there is no winner.
pub(crate) fn nothing_ranked(indexed: &[Vec<usize>]) -> bool {
    indexed.iter().all(Vec::is_empty)
}

/// Materialize per-index values as an id-keyed map.
pub(crate) fn keyed<V: Clone>(candidates: &[CandidateId], values: &[V]) -> BTreeMap<CandidateId, V> {
    candidates.iter().cloned().zip(values.iter().cloned()).collect()
}

// ----------------------------- Tabulation (public surface) ---------------------------

pub mod tabulation {
    pub mod approval;
    pub mod kemeny;
    pub mod plurality;
    pub mod positional;
    pub mod ranked_condorcet;
    pub mod ranked_irv;
    pub mod score;
    pub mod star;

    pub use approval::{tabulate_approval, DEFAULT_APPROVAL_THRESHOLD};
    pub use kemeny::{tabulate_kemeny_young, KEMENY_MAX_CANDIDATES};
    pub use plurality::{tabulate_categorical, tabulate_plurality, tabulate_two_round};
    pub use positional::{tabulate_borda, tabulate_bucklin, tabulate_ranked_score};
    pub use ranked_condorcet::{condorcet_winner, tabulate_condorcet, tabulate_minimax, tabulate_schulze};
    pub use ranked_irv::{tabulate_coombs, tabulate_irv, EliminationRound};
    pub use score::{
        tabulate_bayesian_regret, tabulate_mean_median, tabulate_median_score, tabulate_score_distribution,
        tabulate_simple_score, tabulate_variance, MeanMedian, Regret, ScoreHistogram, Spread,
    };
    pub use star::{tabulate_star, StarRunoff};
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::CandidateId;

    pub fn ids(names: &[&str]) -> Vec<CandidateId> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    pub fn id(name: &str) -> CandidateId {
        name.parse().unwrap()
    }

    /// `(count, ranking)` groups expanded into ballots.
    pub fn rankings(groups: &[(usize, &[&str])]) -> Vec<Vec<CandidateId>> {
        groups
            .iter()
            .flat_map(|(n, r)| std::iter::repeat(ids(r)).take(*n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;

    #[test]
    fn candidate_order_rejects_empty_and_duplicates() {
        assert_eq!(candidate_order(&[]).unwrap_err(), TabError::NoCandidates);
        let dup = ids(&["A", "B", "A"]);
        assert_eq!(candidate_order(&dup).unwrap_err(), TabError::DuplicateCandidate(id("A")));
    }

    #[test]
    fn index_rankings_drops_unknown_and_repeats() {
        let cands = ids(&["A", "B", "C"]);
        let order = candidate_order(&cands).unwrap();
        let out = index_rankings(&[ids(&["C", "X", "A", "C"])], &order);
        assert_eq!(out, vec![vec![2, 0]]);
    }
}
