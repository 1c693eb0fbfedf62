//! Voter/candidate affinity.
//!
//! ```text
//! issue_score     = Σ priority(i) · policy(i)   (+ gender bonus)
//! loyalty_bonus   = party_loyalty · (1 − |political_lean − party_lean|)
//! scandal_penalty = −0.3 · scandals             (×1.5 when charisma < 0.5)
//! mood_effect     = mood · 0.1 · (1 − scandals)
//! utility         = 0.6·issue + 0.2·loyalty + 0.15·charisma + scandal + mood
//! ```

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sc_core::entities::Gender;
use sc_core::{Candidate, CandidateId, Voter, VoterId};

pub const ISSUE_WEIGHT: f64 = 0.6;
pub const LOYALTY_WEIGHT: f64 = 0.2;
pub const CHARISMA_WEIGHT: f64 = 0.15;
pub const SCANDAL_PENALTY: f64 = -0.3;
pub const LOW_CHARISMA: f64 = 0.5;
pub const LOW_CHARISMA_AMPLIFIER: f64 = 1.5;
pub const MOOD_WEIGHT: f64 = 0.1;
pub const GENDER_BONUS_WEIGHT: f64 = 0.1;
/// Utility a candidate must exceed to attract a vote.
pub const VOTE_THRESHOLD: f64 = 0.3;

const GENDER_EQUALITY: &str = "gender_equality";

/// Additive components of one utility value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtilityBreakdown {
    /// Includes `gender_bonus`.
    pub issue_score: f64,
    pub loyalty_bonus: f64,
    pub charisma_effect: f64,
    pub scandal_penalty: f64,
    pub mood_effect: f64,
    pub gender_bonus: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtilityResult {
    pub voter_id: VoterId,
    pub candidate_id: CandidateId,
    pub utility: f64,
    pub will_vote: bool,
    pub breakdown: UtilityBreakdown,
}

/// Deterministic part of the utility. Issues missing from either side
/// contribute zero.
pub fn utility_score(voter: &Voter, candidate: &Candidate, issues: &[String]) -> (f64, UtilityBreakdown) {
    let mut issue_score: f64 = issues
        .iter()
        .map(|i| {
            let pri = voter.issue_priorities.get(i).copied().unwrap_or(0.0);
            let pol = candidate.policies.get(i).copied().unwrap_or(0.0);
            pri * pol
        })
        .sum();

    let gender_bonus = match (voter.demographics.gender, candidate.policies.get(GENDER_EQUALITY)) {
        (Gender::Female, Some(p)) => GENDER_BONUS_WEIGHT * p,
        _ => 0.0,
    };
    issue_score += gender_bonus;

    let party_match = 1.0 - (voter.political_lean - candidate.party_lean).abs();
    let loyalty_bonus = voter.party_loyalty * party_match;

    let charisma_effect = candidate.charisma;
    let scandals = candidate.scandals as f64;
    let mut scandal_penalty = SCANDAL_PENALTY * scandals;
    if candidate.charisma < LOW_CHARISMA {
        scandal_penalty *= LOW_CHARISMA_AMPLIFIER;
    }
    let mood_effect = voter.mood * MOOD_WEIGHT * (1.0 - scandals);

    let utility = ISSUE_WEIGHT * issue_score
        + LOYALTY_WEIGHT * loyalty_bonus
        + CHARISMA_WEIGHT * charisma_effect
        + scandal_penalty
        + mood_effect;

    (
        utility,
        UtilityBreakdown {
            issue_score,
            loyalty_bonus,
            charisma_effect,
            scandal_penalty,
            mood_effect,
            gender_bonus,
        },
    )
}

/// Utility plus the stochastic decision: `will_vote` holds when a uniform draw
/// falls below the voter's likelihood **and** utility exceeds 0.3. One draw is
/// consumed per call.
pub fn calculate_utility<R: Rng + ?Sized>(
    voter: &Voter,
    candidate: &Candidate,
    issues: &[String],
    rng: &mut R,
) -> UtilityResult {
    let (utility, breakdown) = utility_score(voter, candidate, issues);
    let turned_out = rng.gen::<f64>() < voter.likelihood_to_vote;
    UtilityResult {
        voter_id: voter.id.clone(),
        candidate_id: candidate.id.clone(),
        utility,
        will_vote: turned_out && utility > VOTE_THRESHOLD,
        breakdown,
    }
}
