//! Pairwise-matrix methods: Condorcet, Minimax, Schulze.
//!
//! All three start from [`PairwiseMatrix`]:
//! - Condorcet elects the candidate beating every other by strict majority,
//!   or nobody.
//! - Minimax elects the smallest worst-case opposition.
//! - Schulze computes strongest paths (Floyd–Warshall order k → i → j) and
//!   elects the candidate winning the most strongest-path comparisons.
//!
//! Determinism: loops run by index over caller candidate order; ties fall to
//! the earliest candidate.

use log::warn;

use sc_core::determinism::{argmax_first, argmin_first};
use sc_core::ids::CandidateId;

use crate::pairwise::PairwiseMatrix;
use crate::{candidate_order, index_rankings, keyed, nothing_ranked, Diagnostics, MethodResult, TabError};

/// Pairwise matrix plus whether any ballot ranked a known candidate.
fn matrix(ballots: &[Vec<CandidateId>], candidates: &[CandidateId]) -> Result<(PairwiseMatrix, bool), TabError> {
    let order = candidate_order(candidates)?;
    let indexed = index_rankings(ballots, &order);
    Ok((PairwiseMatrix::from_indexed(candidates, &indexed), !nothing_ranked(&indexed)))
}

/// Index of the candidate beating every other by strict pairwise majority.
pub fn condorcet_winner(m: &PairwiseMatrix) -> Option<usize> {
    let n = m.len();
    (0..n).find(|&a| (0..n).all(|b| a == b || m.beats(a, b)))
}

pub fn tabulate_condorcet(ballots: &[Vec<CandidateId>], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    let (m, _) = matrix(ballots, candidates)?;
    if ballots.is_empty() {
        warn!("condorcet: empty ballot set");
        return Ok(MethodResult::empty());
    }
    Ok(MethodResult {
        winner: condorcet_winner(&m).map(|i| candidates[i].clone()),
        diagnostics: Diagnostics::Pairwise(m),
    })
}

/// Largest number of ballots preferring some rival over each candidate.
fn max_opposition(m: &PairwiseMatrix) -> Vec<u64> {
    let n = m.len();
    (0..n)
        .map(|a| (0..n).filter(|&b| b != a).map(|b| m.get(b, a)).max().unwrap_or(0))
        .collect()
}

pub fn tabulate_minimax(ballots: &[Vec<CandidateId>], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    let (m, counted) = matrix(ballots, candidates)?;
    if ballots.is_empty() {
        warn!("minimax: empty ballot set");
        return Ok(MethodResult::empty());
    }
    let opposition = max_opposition(&m);
    Ok(MethodResult {
        winner: argmin_first(&opposition).filter(|_| counted).map(|i| candidates[i].clone()),
        diagnostics: Diagnostics::Minimax { max_opposition: keyed(candidates, &opposition), pairwise: m },
    })
}

/// Strongest-path strengths.
///
/// - `P[a][b] = d[a][b]` if `d[a][b] > d[b][a]`, else 0; diagonal 0.
/// - For each intermediate `k`: `P[i][j] = max(P[i][j], min(P[i][k], P[k][j]))`
///   over `i != j`, `i != k`, `j != k`.
pub fn schulze_strongest_paths(m: &PairwiseMatrix) -> PairwiseMatrix {
    let n = m.len();
    let mut p = PairwiseMatrix::zeros(&m.candidates);
    for i in 0..n {
        for j in 0..n {
            if i != j && m.beats(i, j) {
                p.wins[i][j] = m.get(i, j);
            }
        }
    }
    for k in 0..n {
        for i in 0..n {
            if i == k {
                continue;
            }
            for j in 0..n {
                if j == i || j == k {
                    continue;
                }
                let via = p.wins[i][k].min(p.wins[k][j]);
                if via > p.wins[i][j] {
                    p.wins[i][j] = via;
                }
            }
        }
    }
    p
}

pub fn tabulate_schulze(ballots: &[Vec<CandidateId>], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    let (m, counted) = matrix(ballots, candidates)?;
    if ballots.is_empty() {
        warn!("schulze: empty ballot set");
        return Ok(MethodResult::empty());
    }
    let p = schulze_strongest_paths(&m);
    let n = p.len();
    let path_wins: Vec<u64> = (0..n)
        .map(|a| (0..n).filter(|&b| b != a && p.get(a, b) > p.get(b, a)).count() as u64)
        .collect();
    Ok(MethodResult {
        winner: argmax_first(&path_wins).filter(|_| counted).map(|i| candidates[i].clone()),
        diagnostics: Diagnostics::Schulze { path_wins: keyed(candidates, &path_wins), strengths: p },
    })
}
