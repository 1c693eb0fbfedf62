// crates/sc_algo/src/tabulation/plurality.rs
//
// First-choice methods: plurality over rankings or categorical choices, and
// the two-round runoff.
//
// Contract:
// - Tallies carry every candidate, zero included, keyed by id.
// - Winner is the first maximum in caller candidate order.
// - Empty and abstaining ballots are ignored; if nothing is counted there is
//   no winner.

use log::warn;

use sc_core::determinism::{argmax_first, indices_by_desc};
use sc_core::ids::CandidateId;

use crate::{candidate_order, index_rankings, keyed, Diagnostics, MethodResult, TabError};

fn first_choice_counts(ballots: &[Vec<usize>], n: usize) -> Vec<u64> {
    let mut counts = vec![0u64; n];
    for b in ballots {
        if let Some(&first) = b.first() {
            counts[first] += 1;
        }
    }
    counts
}

fn leader(counts: &[u64], candidates: &[CandidateId]) -> Option<CandidateId> {
    if counts.iter().all(|&c| c == 0) {
        return None;
    }
    argmax_first(counts).map(|i| candidates[i].clone())
}

/// Most first-choice votes over ranking ballots.
pub fn tabulate_plurality(ballots: &[Vec<CandidateId>], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    let order = candidate_order(candidates)?;
    if ballots.is_empty() {
        warn!("plurality: empty ballot set");
        return Ok(MethodResult::empty());
    }
    let counts = first_choice_counts(&index_rankings(ballots, &order), candidates.len());
    Ok(MethodResult {
        winner: leader(&counts, candidates),
        diagnostics: Diagnostics::Counts(keyed(candidates, &counts)),
    })
}

/// Most votes over categorical choices; `None` (no vote) and unknown ids are
/// not counted.
pub fn tabulate_categorical(
    choices: &[Option<CandidateId>],
    candidates: &[CandidateId],
) -> Result<MethodResult, TabError> {
    let order = candidate_order(candidates)?;
    if choices.is_empty() {
        warn!("plurality: empty ballot set");
        return Ok(MethodResult::empty());
    }
    let mut counts = vec![0u64; candidates.len()];
    for i in choices.iter().flatten().filter_map(|c| order.position(c)) {
        counts[i] += 1;
    }
    Ok(MethodResult {
        winner: leader(&counts, candidates),
        diagnostics: Diagnostics::Counts(keyed(candidates, &counts)),
    })
}

/// Outright win when a first-choice count exceeds `floor(total / 2)`;
/// otherwise the top two meet in a runoff where each ballot backs whichever
/// finalist it ranks higher. Runoff ties go to the first finalist.
pub fn tabulate_two_round(ballots: &[Vec<CandidateId>], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    let order = candidate_order(candidates)?;
    if ballots.is_empty() {
        warn!("two_round: empty ballot set");
        return Ok(MethodResult::empty());
    }
    let indexed = index_rankings(ballots, &order);
    let counts = first_choice_counts(&indexed, candidates.len());
    let total: u64 = counts.iter().sum();
    let first_round = keyed(candidates, &counts);

    if total == 0 {
        return Ok(MethodResult {
            winner: None,
            diagnostics: Diagnostics::TwoRound { first_round, runoff: None },
        });
    }
    if let Some(i) = argmax_first(&counts).filter(|&i| counts[i] > total / 2) {
        return Ok(MethodResult {
            winner: Some(candidates[i].clone()),
            diagnostics: Diagnostics::TwoRound { first_round, runoff: None },
        });
    }

    // no majority implies at least two candidates hold votes
    let ranked = indices_by_desc(&counts);
    let (a, b) = (ranked[0], ranked[1]);
    let mut runoff = [0u64; 2];
    for ballot in &indexed {
        match ballot.iter().find(|&&c| c == a || c == b) {
            Some(&c) if c == a => runoff[0] += 1,
            Some(_) => runoff[1] += 1,
            None => {}
        }
    }
    let winner = if runoff[1] > runoff[0] { b } else { a };
    Ok(MethodResult {
        winner: Some(candidates[winner].clone()),
        diagnostics: Diagnostics::TwoRound {
            first_round,
            runoff: Some(
                [(candidates[a].clone(), runoff[0]), (candidates[b].clone(), runoff[1])]
                    .into_iter()
                    .collect(),
            ),
        },
    })
}
