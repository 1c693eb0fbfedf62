// crates/sc_algo/src/tabulation/positional.rs
//
// Rank-position methods: Borda, ranked score, Bucklin.
//
// Positions are relative to each ballot's own length, so a short ballot
// spreads fewer points. Ties resolve by caller candidate order.

use std::collections::BTreeMap;

use log::{debug, warn};

use sc_core::determinism::argmax_first;
use sc_core::ids::CandidateId;

use crate::{candidate_order, index_rankings, keyed, Diagnostics, MethodResult, TabError};

/// Borda: position `p` on a ballot of length `n` earns `n − 1 − p` points.
pub fn tabulate_borda(ballots: &[Vec<CandidateId>], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    let order = candidate_order(candidates)?;
    if ballots.is_empty() {
        warn!("borda: empty ballot set");
        return Ok(MethodResult::empty());
    }
    let mut points = vec![0u64; candidates.len()];
    let mut counted = false;
    for b in index_rankings(ballots, &order) {
        let n = b.len() as u64;
        for (p, &c) in b.iter().enumerate() {
            points[c] += n - 1 - p as u64;
            counted = true;
        }
    }
    Ok(MethodResult {
        winner: counted.then(|| argmax_first(&points)).flatten().map(|i| candidates[i].clone()),
        diagnostics: Diagnostics::Counts(keyed(candidates, &points)),
    })
}

/// Ranked score: position `p` on a ballot of length `n` scores
/// `1 − p / (n − 1)` (1 for a single entry); the average over all ballots is
/// reported and the highest wins.
pub fn tabulate_ranked_score(
    ballots: &[Vec<CandidateId>],
    candidates: &[CandidateId],
) -> Result<MethodResult, TabError> {
    let order = candidate_order(candidates)?;
    if ballots.is_empty() {
        warn!("ranked_score: empty ballot set");
        return Ok(MethodResult::empty());
    }
    let mut sums = vec![0.0f64; candidates.len()];
    let mut counted = false;
    for b in index_rankings(ballots, &order) {
        let n = b.len();
        for (p, &c) in b.iter().enumerate() {
            sums[c] += if n > 1 { 1.0 - p as f64 / (n - 1) as f64 } else { 1.0 };
            counted = true;
        }
    }
    let averages: Vec<f64> = sums.iter().map(|s| s / ballots.len() as f64).collect();
    Ok(MethodResult {
        winner: counted.then(|| argmax_first(&averages)).flatten().map(|i| candidates[i].clone()),
        diagnostics: Diagnostics::Scores(keyed(candidates, &averages)),
    })
}

/// Bucklin: at rank `r = 1, 2, …` add each ballot's `r`-th choice to the
/// running totals. The first rank at which some total exceeds half of the
/// non-empty ballots elects the largest such total. With no majority at any
/// rank, the leader of the final totals wins.
pub fn tabulate_bucklin(ballots: &[Vec<CandidateId>], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    let order = candidate_order(candidates)?;
    if ballots.is_empty() {
        warn!("bucklin: empty ballot set");
        return Ok(MethodResult::empty());
    }
    let indexed = index_rankings(ballots, &order);
    let voting = indexed.iter().filter(|b| !b.is_empty()).count() as u64;
    let max_rank = indexed.iter().map(Vec::len).max().unwrap_or(0);

    let mut totals = vec![0u64; candidates.len()];
    let mut rounds: Vec<BTreeMap<CandidateId, u64>> = Vec::with_capacity(max_rank);
    for r in 0..max_rank {
        for b in &indexed {
            if let Some(&c) = b.get(r) {
                totals[c] += 1;
            }
        }
        rounds.push(keyed(candidates, &totals));

        let majority: Vec<u64> = totals.iter().map(|&t| if 2 * t > voting { t } else { 0 }).collect();
        if majority.iter().any(|&t| t > 0) {
            let winner = argmax_first(&majority).map(|i| candidates[i].clone());
            debug!("bucklin: majority at rank {}", r + 1);
            return Ok(MethodResult { winner, diagnostics: Diagnostics::Bucklin(rounds) });
        }
    }

    let winner = if voting > 0 { argmax_first(&totals).map(|i| candidates[i].clone()) } else { None };
    Ok(MethodResult { winner, diagnostics: Diagnostics::Bucklin(rounds) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    fn scenario() -> Vec<Vec<CandidateId>> {
        rankings(&[(3, &["A", "B", "C"]), (1, &["B", "C", "A"]), (1, &["C", "B", "A"])])
    }

    #[test]
    fn borda_tie_between_a_and_b_goes_to_a() {
        let cands = ids(&["A", "B", "C"]);
        let r = tabulate_borda(&scenario(), &cands).unwrap();
        assert_eq!(r.diagnostics, Diagnostics::Counts(keyed(&cands, &[6, 6, 3])));
        assert_eq!(r.winner, Some(id("A")));
    }

    #[test]
    fn borda_uses_ballot_length() {
        let cands = ids(&["A", "B", "C"]);
        let r = tabulate_borda(&[ids(&["B", "A"]), ids(&["C"])], &cands).unwrap();
        assert_eq!(r.diagnostics, Diagnostics::Counts(keyed(&cands, &[0, 1, 0])));
        assert_eq!(r.winner, Some(id("B")));
    }

    #[test]
    fn ranked_score_averages_positions() {
        let cands = ids(&["A", "B", "C"]);
        let r = tabulate_ranked_score(&scenario(), &cands).unwrap();
        match r.diagnostics {
            Diagnostics::Scores(s) => {
                assert!((s[&id("A")] - 0.6).abs() < 1e-12);
                assert!((s[&id("B")] - 0.6).abs() < 1e-12);
                assert!((s[&id("C")] - 0.3).abs() < 1e-12);
            }
            other => panic!("unexpected diagnostics {other:?}"),
        }
        assert_eq!(r.winner, Some(id("A")));
    }

    #[test]
    fn bucklin_accumulates_ranks() {
        let cands = ids(&["A", "B", "C"]);
        // no first-round majority; B reaches 5 of 5 at rank 2
        let ballots = rankings(&[(2, &["A", "B", "C"]), (2, &["C", "B", "A"]), (1, &["B", "A", "C"])]);
        let r = tabulate_bucklin(&ballots, &cands).unwrap();
        assert_eq!(r.winner, Some(id("B")));
        match r.diagnostics {
            Diagnostics::Bucklin(rounds) => {
                assert_eq!(rounds.len(), 2);
                assert_eq!(rounds[1][&id("B")], 5);
                assert_eq!(rounds[1][&id("A")], 3);
            }
            other => panic!("unexpected diagnostics {other:?}"),
        }
    }

    #[test]
    fn bucklin_falls_back_to_final_leader() {
        let cands = ids(&["A", "B", "C", "D"]);
        // single-entry ballots never accumulate a majority
        let ballots = rankings(&[(2, &["B"]), (1, &["A"]), (1, &["C"])]);
        assert_eq!(tabulate_bucklin(&ballots, &cands).unwrap().winner, Some(id("B")));
    }
}
