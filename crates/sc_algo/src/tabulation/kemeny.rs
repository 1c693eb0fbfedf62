//! Kemeny–Young consensus ranking.
//!
//! Exhaustive search over every full ordering of the candidates, scoring
//! each by total Kendall-tau distance to the ballots:
//!
//! ```text
//! cost(π) = Σ over pairs a before b in π of wins[b][a]
//! ```
//!
//! which counts, ballot by ballot, the pairs the ballot orders the other way
//! (missing candidates rank last, as in the pairwise matrix). Permutations are
//! visited in lexicographic order of candidate index and only a strictly
//! smaller cost replaces the incumbent, so ties keep the earliest ordering.
//!
//! Cost is factorial; inputs above [`KEMENY_MAX_CANDIDATES`] are rejected.

use log::{debug, warn};

use sc_core::ids::CandidateId;

use crate::pairwise::PairwiseMatrix;
use crate::{candidate_order, index_rankings, nothing_ranked, Diagnostics, MethodResult, TabError};

/// 8! = 40 320 orderings.
pub const KEMENY_MAX_CANDIDATES: usize = 8;

fn cost(perm: &[usize], m: &PairwiseMatrix) -> u64 {
    let mut total = 0;
    for (i, &a) in perm.iter().enumerate() {
        for &b in &perm[i + 1..] {
            total += m.get(b, a);
        }
    }
    total
}

/// Advance to the next lexicographic permutation; false after the last one.
fn next_permutation(p: &mut [usize]) -> bool {
    let Some(i) = (1..p.len()).rev().find(|&i| p[i - 1] < p[i]) else {
        return false;
    };
    let pivot = i - 1;
    // rightmost element above the pivot; one exists since p[i] > p[pivot]
    let j = (i..p.len()).rev().find(|&j| p[j] > p[pivot]).unwrap_or(i);
    p.swap(pivot, j);
    p[i..].reverse();
    true
}

pub fn tabulate_kemeny_young(
    ballots: &[Vec<CandidateId>],
    candidates: &[CandidateId],
) -> Result<MethodResult, TabError> {
    let order = candidate_order(candidates)?;
    if candidates.len() > KEMENY_MAX_CANDIDATES {
        warn!("kemeny_young: {} candidates exceeds the limit of {}", candidates.len(), KEMENY_MAX_CANDIDATES);
        return Err(TabError::TooManyCandidates {
            method: "kemeny_young",
            count: candidates.len(),
            limit: KEMENY_MAX_CANDIDATES,
        });
    }
    if ballots.is_empty() {
        warn!("kemeny_young: empty ballot set");
        return Ok(MethodResult::empty());
    }

    let indexed = index_rankings(ballots, &order);
    if nothing_ranked(&indexed) {
        warn!("kemeny_young: no ballot ranks a known candidate");
        return Ok(MethodResult {
            winner: None,
            diagnostics: Diagnostics::Kemeny { ranking: candidates.to_vec(), distance: 0 },
        });
    }
    let m = PairwiseMatrix::from_indexed(candidates, &indexed);
    let mut perm: Vec<usize> = (0..candidates.len()).collect();
    let mut best = perm.clone();
    let mut best_cost = cost(&perm, &m);
    let mut visited = 1u64;
    while next_permutation(&mut perm) {
        visited += 1;
        let c = cost(&perm, &m);
        if c < best_cost {
            best_cost = c;
            best.clone_from(&perm);
        }
    }
    debug!("kemeny_young: {visited} orderings, best distance {best_cost}");

    let ranking: Vec<CandidateId> = best.iter().map(|&i| candidates[i].clone()).collect();
    Ok(MethodResult {
        winner: ranking.first().cloned(),
        diagnostics: Diagnostics::Kemeny { ranking, distance: best_cost },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[test]
    fn permutations_are_exhaustive_and_ordered() {
        let mut p = vec![0, 1, 2];
        let mut seen = vec![p.clone()];
        while next_permutation(&mut p) {
            seen.push(p.clone());
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[1], vec![0, 2, 1]);
        assert_eq!(seen[5], vec![2, 1, 0]);
    }

    #[test]
    fn consensus_ranking_and_distance() {
        let cands = ids(&["A", "B", "C"]);
        let ballots = rankings(&[(3, &["A", "B", "C"]), (1, &["B", "C", "A"]), (1, &["C", "B", "A"])]);
        let r = tabulate_kemeny_young(&ballots, &cands).unwrap();
        assert_eq!(r.winner, Some(id("A")));
        match r.diagnostics {
            // A>B costs 2, A>C costs 2, B>C costs 1
            Diagnostics::Kemeny { ranking, distance } => {
                assert_eq!(ranking, ids(&["A", "B", "C"]));
                assert_eq!(distance, 5);
            }
            other => panic!("unexpected diagnostics {other:?}"),
        }
    }

    #[test]
    fn guard_rejects_large_fields() {
        let names: Vec<String> = (0..9).map(|i| format!("C{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let cands = ids(&refs);
        let err = tabulate_kemeny_young(&[], &cands).unwrap_err();
        assert_eq!(err, TabError::TooManyCandidates { method: "kemeny_young", count: 9, limit: 8 });
    }

    #[test]
    fn abstaining_ballots_elect_nobody() {
        let cands = ids(&["A", "B", "C"]);
        let r = tabulate_kemeny_young(&[vec![], vec![], vec![]], &cands).unwrap();
        assert_eq!(r.winner, None);
        assert_eq!(r.diagnostics, Diagnostics::Kemeny { ranking: cands, distance: 0 });
    }

    #[test]
    fn all_equal_costs_keep_candidate_order() {
        let cands = ids(&["B", "A"]);
        let ballots = rankings(&[(1, &["A", "B"]), (1, &["B", "A"])]);
        assert_eq!(tabulate_kemeny_young(&ballots, &cands).unwrap().winner, Some(id("B")));
    }
}
