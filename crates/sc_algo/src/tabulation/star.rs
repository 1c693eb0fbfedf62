//! STAR: Score Then Automatic Runoff.
//!
//! The two highest averages (stable over candidate order) meet in a runoff
//! where each ballot backs whichever finalist it scores higher; a missing
//! score counts as 0. Equal runoff counts go to the first finalist.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use log::warn;

use sc_core::ballots::ScoreCard;
use sc_core::determinism::indices_by_desc;
use sc_core::ids::CandidateId;

use super::score::{average_table, averages};
use crate::{candidate_order, Diagnostics, MethodResult, TabError};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StarRunoff {
    pub first: CandidateId,
    pub second: CandidateId,
    pub first_votes: u64,
    pub second_votes: u64,
    /// Ballots scoring both finalists equally.
    pub tied: u64,
}

pub fn tabulate_star(cards: &[ScoreCard], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    let order = candidate_order(candidates)?;
    if cards.is_empty() {
        warn!("star: empty ballot set");
        return Ok(MethodResult::empty());
    }
    let avgs = averages(cards, &order);
    let first_round = average_table(candidates, &avgs);
    let keys: Vec<f64> = avgs.iter().map(|a| a.unwrap_or(f64::NEG_INFINITY)).collect();
    let finalists: Vec<usize> = indices_by_desc(&keys).into_iter().filter(|&i| avgs[i].is_some()).take(2).collect();

    let (a, b) = match finalists[..] {
        [] => return Ok(MethodResult { winner: None, diagnostics: Diagnostics::Star { first_round, runoff: None } }),
        [only] => {
            return Ok(MethodResult {
                winner: Some(candidates[only].clone()),
                diagnostics: Diagnostics::Star { first_round, runoff: None },
            })
        }
        [a, b, ..] => (a, b),
    };

    let (mut va, mut vb, mut tied) = (0u64, 0u64, 0u64);
    for card in cards {
        let sa = card.get(&candidates[a]).copied().unwrap_or(0.0);
        let sb = card.get(&candidates[b]).copied().unwrap_or(0.0);
        if sa > sb {
            va += 1;
        } else if sb > sa {
            vb += 1;
        } else {
            tied += 1;
        }
    }
    let winner = if vb > va { b } else { a };
    Ok(MethodResult {
        winner: Some(candidates[winner].clone()),
        diagnostics: Diagnostics::Star {
            first_round,
            runoff: Some(StarRunoff {
                first: candidates[a].clone(),
                second: candidates[b].clone(),
                first_votes: va,
                second_votes: vb,
                tied,
            }),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    fn card(entries: &[(&str, f64)]) -> ScoreCard {
        entries.iter().map(|(k, v)| (id(k), *v)).collect()
    }

    #[test]
    fn runoff_can_overturn_score_leader() {
        let cands = ids(&["A", "B", "C"]);
        // A has the higher average from one enthusiast; B is preferred on two of three ballots
        let cards = vec![
            card(&[("A", 5.0), ("B", 0.0), ("C", 0.0)]),
            card(&[("A", 2.0), ("B", 3.0), ("C", 0.0)]),
            card(&[("A", 2.0), ("B", 3.0), ("C", 1.0)]),
        ];
        let r = tabulate_star(&cards, &cands).unwrap();
        assert_eq!(r.winner, Some(id("B")));
        match r.diagnostics {
            Diagnostics::Star { runoff: Some(ro), .. } => {
                assert_eq!(ro.first, id("A"));
                assert_eq!(ro.second, id("B"));
                assert_eq!((ro.first_votes, ro.second_votes, ro.tied), (1, 2, 0));
            }
            other => panic!("unexpected diagnostics {other:?}"),
        }
    }

    #[test]
    fn runoff_tie_goes_to_first_finalist() {
        let cands = ids(&["A", "B"]);
        let cards = vec![card(&[("A", 4.0), ("B", 3.0)]), card(&[("A", 3.0), ("B", 4.0)])];
        assert_eq!(tabulate_star(&cards, &cands).unwrap().winner, Some(id("A")));
    }

    #[test]
    fn lone_scored_candidate_wins() {
        let cands = ids(&["A", "B"]);
        let r = tabulate_star(&[card(&[("B", 1.0)])], &cands).unwrap();
        assert_eq!(r.winner, Some(id("B")));
    }
}
