//! Pairwise win matrix built from ranking ballots.
//!
//! `wins[a][b]` counts ballots ranking `a` strictly ahead of `b`. A candidate
//! missing from a ballot ranks below every candidate the ballot names, and two
//! missing candidates are not ordered against each other. The diagonal stays 0.
//!
//! Loops run by index over the caller's candidate order; lookups never depend
//! on map iteration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sc_core::ids::CandidateId;

use crate::{candidate_order, index_rankings, TabError};

/// Square matrix over the caller's candidate order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PairwiseMatrix {
    pub candidates: Vec<CandidateId>,
    pub wins: Vec<Vec<u64>>,
}

impl PairwiseMatrix {
    /// All-zero matrix for `candidates`.
    pub fn zeros(candidates: &[CandidateId]) -> Self {
        let n = candidates.len();
        Self { candidates: candidates.to_vec(), wins: vec![vec![0; n]; n] }
    }

    /// Count every ordered pair over index-form rankings.
    pub(crate) fn from_indexed(candidates: &[CandidateId], ballots: &[Vec<usize>]) -> Self {
        let n = candidates.len();
        let mut m = Self::zeros(candidates);
        let mut ranked = vec![false; n];
        for b in ballots {
            ranked.iter_mut().for_each(|r| *r = false);
            for (pos, &a) in b.iter().enumerate() {
                // a beats everything after it on the ballot
                for &c in &b[pos + 1..] {
                    m.wins[a][c] += 1;
                }
                ranked[a] = true;
            }
            // and everything the ballot leaves out
            for &a in b {
                for (c, &r) in ranked.iter().enumerate() {
                    if !r {
                        m.wins[a][c] += 1;
                    }
                }
            }
        }
        m
    }

    /// Build from ranking ballots over `candidates`.
    pub fn from_rankings(ballots: &[Vec<CandidateId>], candidates: &[CandidateId]) -> Result<Self, TabError> {
        let order = candidate_order(candidates)?;
        Ok(Self::from_indexed(candidates, &index_rankings(ballots, &order)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Ballots preferring candidate `a` over candidate `b` (by index).
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> u64 {
        self.wins[a][b]
    }

    /// `a` beats `b` by strict pairwise majority.
    #[inline]
    pub fn beats(&self, a: usize, b: usize) -> bool {
        self.wins[a][b] > self.wins[b][a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[test]
    fn counts_strict_preferences() {
        let cands = ids(&["A", "B", "C"]);
        let ballots = rankings(&[(3, &["A", "B", "C"]), (1, &["B", "C", "A"]), (1, &["C", "B", "A"])]);
        let m = PairwiseMatrix::from_rankings(&ballots, &cands).unwrap();
        assert_eq!(m.get(0, 1), 3);
        assert_eq!(m.get(1, 0), 2);
        assert_eq!(m.get(1, 2), 4);
        assert_eq!(m.get(2, 1), 1);
        assert_eq!(m.get(0, 0), 0);
        assert!(m.beats(1, 2));
    }

    #[test]
    fn absent_candidates_rank_last() {
        let cands = ids(&["A", "B", "C"]);
        let m = PairwiseMatrix::from_rankings(&[ids(&["B"])], &cands).unwrap();
        assert_eq!(m.get(1, 0), 1);
        assert_eq!(m.get(1, 2), 1);
        // A and C are both missing: no preference either way
        assert_eq!(m.get(0, 2), 0);
        assert_eq!(m.get(2, 0), 0);
    }

    #[test]
    fn empty_ballots_give_zero_matrix() {
        let cands = ids(&["A", "B"]);
        let m = PairwiseMatrix::from_rankings(&[vec![], vec![]], &cands).unwrap();
        assert_eq!(m, PairwiseMatrix::zeros(&cands));
    }
}
