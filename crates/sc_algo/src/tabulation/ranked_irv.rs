// crates/sc_algo/src/tabulation/ranked_irv.rs
//
// Elimination methods over rankings: IRV and Coombs.
//
// Both eliminate every candidate tied at the elimination extreme in one
// round. When a round would remove all remaining candidates the contest has
// no winner and the last logged round names the tied set.
//
// Determinism: rounds iterate candidates by index in caller order; the
// continuing set is a bool mask, never a hash set.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use log::{debug, warn};

use sc_core::ids::CandidateId;

use crate::{candidate_order, index_rankings, Diagnostics, MethodResult, TabError};

/// One counting round: tallies among continuing candidates and who left.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EliminationRound {
    pub tallies: std::collections::BTreeMap<CandidateId, u64>,
    pub eliminated: Vec<CandidateId>,
}

/// First continuing entry on a ballot.
#[inline]
fn top_active(ballot: &[usize], active: &[bool]) -> Option<usize> {
    ballot.iter().copied().find(|&c| active[c])
}

/// Last continuing entry on a ballot.
#[inline]
fn bottom_active(ballot: &[usize], active: &[bool]) -> Option<usize> {
    ballot.iter().rev().copied().find(|&c| active[c])
}

#[derive(Clone, Copy)]
enum Rule {
    /// Eliminate the fewest first choices; stop on a majority.
    Irv,
    /// Eliminate the most last choices.
    Coombs,
}

impl Rule {
    fn name(self) -> &'static str {
        match self {
            Rule::Irv => "irv",
            Rule::Coombs => "coombs",
        }
    }
}

fn run(rule: Rule, ballots: &[Vec<CandidateId>], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    let order = candidate_order(candidates)?;
    if ballots.is_empty() {
        warn!("{}: empty ballot set", rule.name());
        return Ok(MethodResult::empty());
    }
    let indexed = index_rankings(ballots, &order);
    let n = candidates.len();
    let mut active = vec![true; n];
    let mut rounds: Vec<EliminationRound> = Vec::new();

    loop {
        let remaining: Vec<usize> = (0..n).filter(|&c| active[c]).collect();
        if let [only] = remaining[..] {
            return Ok(MethodResult {
                winner: Some(candidates[only].clone()),
                diagnostics: Diagnostics::Rounds(rounds),
            });
        }

        let mut counts = vec![0u64; n];
        let mut continuing_ballots = 0u64;
        for b in &indexed {
            let pick = match rule {
                Rule::Irv => top_active(b, &active),
                Rule::Coombs => bottom_active(b, &active),
            };
            if let Some(c) = pick {
                counts[c] += 1;
                continuing_ballots += 1;
            }
        }
        let tallies = remaining.iter().map(|&c| (candidates[c].clone(), counts[c])).collect();

        if let Rule::Irv = rule {
            if let Some(&w) = remaining.iter().find(|&&c| 2 * counts[c] > continuing_ballots) {
                rounds.push(EliminationRound { tallies, eliminated: Vec::new() });
                return Ok(MethodResult {
                    winner: Some(candidates[w].clone()),
                    diagnostics: Diagnostics::Rounds(rounds),
                });
            }
        }

        let target = match rule {
            Rule::Irv => remaining.iter().map(|&c| counts[c]).min(),
            Rule::Coombs => remaining.iter().map(|&c| counts[c]).max(),
        };
        let out: Vec<usize> = remaining.iter().copied().filter(|&c| Some(counts[c]) == target).collect();
        let eliminated: Vec<CandidateId> = out.iter().map(|&c| candidates[c].clone()).collect();
        debug!("{}: round {} eliminates {:?}", rule.name(), rounds.len() + 1, eliminated);
        rounds.push(EliminationRound { tallies, eliminated });

        if out.len() == remaining.len() {
            debug!("{}: complete tie, no winner", rule.name());
            return Ok(MethodResult { winner: None, diagnostics: Diagnostics::Rounds(rounds) });
        }
        for c in out {
            active[c] = false;
        }
    }
}

/// Instant runoff. A candidate holding more than half of the ballots that
/// still name a continuing candidate wins; otherwise all candidates tied for
/// fewest first choices (zero included) are eliminated.
pub fn tabulate_irv(ballots: &[Vec<CandidateId>], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    run(Rule::Irv, ballots, candidates)
}

/// Coombs. No majority check: each round removes all candidates tied for
/// most last-place votes until one remains.
pub fn tabulate_coombs(ballots: &[Vec<CandidateId>], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    run(Rule::Coombs, ballots, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    fn rounds(r: &MethodResult) -> &[EliminationRound] {
        match &r.diagnostics {
            Diagnostics::Rounds(v) => v,
            other => panic!("unexpected diagnostics {other:?}"),
        }
    }

    #[test]
    fn irv_transfers_until_majority() {
        let cands = ids(&["A", "B", "C"]);
        let ballots = rankings(&[(4, &["A", "B", "C"]), (3, &["B", "C", "A"]), (2, &["C", "B", "A"])]);
        let r = tabulate_irv(&ballots, &cands).unwrap();
        assert_eq!(r.winner, Some(id("B")));
        let log = rounds(&r);
        assert_eq!(log[0].eliminated, ids(&["C"]));
        assert_eq!(log[1].tallies[&id("B")], 5);
    }

    #[test]
    fn irv_eliminates_all_tied_lowest_and_zero_counts() {
        let cands = ids(&["A", "B", "C", "D"]);
        let ballots = rankings(&[(2, &["A", "B"]), (1, &["B", "A"]), (1, &["C", "B"])]);
        let r = tabulate_irv(&ballots, &cands).unwrap();
        let log = rounds(&r);
        // D never appears and goes first
        assert_eq!(log[0].eliminated, ids(&["D"]));
        assert_eq!(log[1].eliminated, ids(&["B", "C"]));
        assert_eq!(r.winner, Some(id("A")));
    }

    #[test]
    fn irv_complete_tie_has_no_winner() {
        let cands = ids(&["A", "B"]);
        let ballots = rankings(&[(1, &["A", "B"]), (1, &["B", "A"])]);
        let r = tabulate_irv(&ballots, &cands).unwrap();
        assert_eq!(r.winner, None);
        assert_eq!(rounds(&r).last().unwrap().eliminated, ids(&["A", "B"]));
    }

    #[test]
    fn irv_single_candidate_wins_without_rounds() {
        let cands = ids(&["A"]);
        let r = tabulate_irv(&[vec![]], &cands).unwrap();
        assert_eq!(r.winner, Some(id("A")));
        assert!(rounds(&r).is_empty());
    }

    #[test]
    fn coombs_removes_most_disliked() {
        let cands = ids(&["A", "B", "C"]);
        // C is last on 5 ballots, A on 4
        let ballots = rankings(&[(4, &["A", "B", "C"]), (3, &["B", "C", "A"]), (1, &["C", "B", "A"]), (1, &["B", "A", "C"])]);
        let r = tabulate_coombs(&ballots, &cands).unwrap();
        let log = rounds(&r);
        assert_eq!(log[0].eliminated, ids(&["C"]));
        assert_eq!(r.winner, Some(id("B")));
    }

    #[test]
    fn coombs_complete_tie() {
        let cands = ids(&["A", "B"]);
        let ballots = rankings(&[(1, &["A", "B"]), (1, &["B", "A"])]);
        assert_eq!(tabulate_coombs(&ballots, &cands).unwrap().winner, None);
    }
}
