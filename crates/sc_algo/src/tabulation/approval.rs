//! Approval over rankings: the top `threshold` entries of each ballot count
//! as approved; most approvals wins (candidate order on ties).

use log::warn;

use sc_core::determinism::argmax_first;
use sc_core::ids::CandidateId;

use crate::{candidate_order, index_rankings, keyed, Diagnostics, MethodResult, TabError};

/// Entries approved per ballot unless the caller says otherwise.
pub const DEFAULT_APPROVAL_THRESHOLD: usize = 2;

pub fn tabulate_approval(
    ballots: &[Vec<CandidateId>],
    candidates: &[CandidateId],
    threshold: usize,
) -> Result<MethodResult, TabError> {
    let order = candidate_order(candidates)?;
    if threshold == 0 {
        return Err(TabError::ZeroApprovalThreshold);
    }
    if ballots.is_empty() {
        warn!("approval: empty ballot set");
        return Ok(MethodResult::empty());
    }

    let mut approvals = vec![0u64; candidates.len()];
    for b in index_rankings(ballots, &order) {
        for &c in b.iter().take(threshold) {
            approvals[c] += 1;
        }
    }
    let winner = if approvals.iter().any(|&a| a > 0) {
        argmax_first(&approvals).map(|i| candidates[i].clone())
    } else {
        None
    };
    Ok(MethodResult { winner, diagnostics: Diagnostics::Counts(keyed(candidates, &approvals)) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[test]
    fn broad_support_beats_first_choices() {
        let cands = ids(&["A", "B", "C"]);
        let ballots = rankings(&[(3, &["A", "C", "B"]), (2, &["B", "C", "A"]), (2, &["C", "B", "A"])]);
        let r = tabulate_approval(&ballots, &cands, DEFAULT_APPROVAL_THRESHOLD).unwrap();
        // C is approved on every ballot
        assert_eq!(r.winner, Some(id("C")));
        let r1 = tabulate_approval(&ballots, &cands, 1).unwrap();
        assert_eq!(r1.winner, Some(id("A")));
    }

    #[test]
    fn threshold_must_be_positive() {
        let cands = ids(&["A"]);
        assert_eq!(tabulate_approval(&[], &cands, 0).unwrap_err(), TabError::ZeroApprovalThreshold);
    }

    #[test]
    fn short_ballots_approve_what_they_list() {
        let cands = ids(&["A", "B"]);
        let r = tabulate_approval(&[ids(&["B"]), vec![]], &cands, 3).unwrap();
        assert_eq!(r.winner, Some(id("B")));
        assert_eq!(r.diagnostics, Diagnostics::Counts(keyed(&cands, &[0, 1])));
    }
}
