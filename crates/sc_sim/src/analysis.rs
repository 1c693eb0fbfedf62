//! Utility analysis over a fixed voter/candidate pool: the full utility grid
//! and per-segment summaries of each voter's best candidate.

use std::collections::BTreeMap;

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sc_core::determinism::argmax_first;
use sc_core::entities::{Gender, Income, Region};
use sc_core::{Candidate, CandidateId, Voter, VoterId};

use crate::utility::{calculate_utility, utility_score};
use crate::{SimError, SimResult};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtilityMatrix {
    pub voter_ids: Vec<VoterId>,
    pub candidate_ids: Vec<CandidateId>,
    /// `values[v][c]`: utility of candidate `c` for voter `v`.
    pub values: Vec<Vec<f64>>,
    pub average_utility: f64,
    /// Fraction of voters whose `will_vote` holds for each candidate.
    pub vote_shares: BTreeMap<CandidateId, f64>,
}

fn check_pool(voters: &[Voter], candidates: &[Candidate]) -> SimResult<()> {
    if voters.is_empty() {
        return Err(SimError::InvalidPopulation(0));
    }
    if candidates.is_empty() {
        return Err(SimError::NoCandidates);
    }
    Ok(())
}

/// Utility of every voter/candidate pair. One turnout draw per pair.
pub fn utility_matrix<R: Rng + ?Sized>(
    voters: &[Voter],
    candidates: &[Candidate],
    issues: &[String],
    rng: &mut R,
) -> SimResult<UtilityMatrix> {
    check_pool(voters, candidates)?;
    let mut votes = vec![0u64; candidates.len()];
    let mut total = 0.0;
    let values: Vec<Vec<f64>> = voters
        .iter()
        .map(|v| {
            candidates
                .iter()
                .enumerate()
                .map(|(ci, c)| {
                    let r = calculate_utility(v, c, issues, rng);
                    total += r.utility;
                    if r.will_vote {
                        votes[ci] += 1;
                    }
                    r.utility
                })
                .collect()
        })
        .collect();

    let pairs = (voters.len() * candidates.len()) as f64;
    Ok(UtilityMatrix {
        voter_ids: voters.iter().map(|v| v.id.clone()).collect(),
        candidate_ids: candidates.iter().map(|c| c.id.clone()).collect(),
        values,
        average_utility: total / pairs,
        vote_shares: candidates
            .iter()
            .zip(&votes)
            .map(|(c, n)| (c.id.clone(), *n as f64 / voters.len() as f64))
            .collect(),
    })
}

/// Named demographic slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Segment {
    YoungFemale,
    OldMale,
    HighEdu,
    LowIncome,
    Urban,
    Rural,
}

impl Segment {
    pub const ALL: [Segment; 6] = [
        Segment::YoungFemale,
        Segment::OldMale,
        Segment::HighEdu,
        Segment::LowIncome,
        Segment::Urban,
        Segment::Rural,
    ];

    pub fn contains(self, v: &Voter) -> bool {
        let d = &v.demographics;
        match self {
            Segment::YoungFemale => d.age <= 30 && d.gender == Gender::Female,
            Segment::OldMale => d.age > 60 && d.gender == Gender::Male,
            Segment::HighEdu => d.education.is_advanced(),
            Segment::LowIncome => d.income == Income::Low,
            Segment::Urban => d.region == Region::Urban,
            Segment::Rural => d.region == Region::Rural,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentSummary {
    pub count: usize,
    /// Mean of each member's best utility.
    pub average_utility: f64,
    /// Most frequent best candidate; ties go to candidate order.
    pub top_candidate: CandidateId,
    /// Best utility of the first member whose best candidate is `top_candidate`.
    pub top_utility: f64,
    pub utility_distribution: Vec<f64>,
}

/// Summaries for the requested segments. Segments with no members are
/// omitted.
pub fn segment_analysis(
    voters: &[Voter],
    candidates: &[Candidate],
    issues: &[String],
    segments: &[Segment],
) -> SimResult<BTreeMap<Segment, SegmentSummary>> {
    check_pool(voters, candidates)?;

    // (best candidate index, best utility) per voter
    let best: Vec<(usize, f64)> = voters
        .iter()
        .map(|v| {
            let us: Vec<f64> = candidates.iter().map(|c| utility_score(v, c, issues).0).collect();
            let i = argmax_first(&us).unwrap_or(0);
            (i, us[i])
        })
        .collect();

    let mut out = BTreeMap::new();
    for &segment in segments {
        let members: Vec<(usize, f64)> = voters
            .iter()
            .zip(&best)
            .filter(|(v, _)| segment.contains(v))
            .map(|(_, b)| *b)
            .collect();
        if members.is_empty() {
            continue;
        }
        let mut wins = vec![0u64; candidates.len()];
        for (ci, _) in &members {
            wins[*ci] += 1;
        }
        let top = argmax_first(&wins).unwrap_or(0);
        let top_utility = members
            .iter()
            .find(|(ci, _)| *ci == top)
            .map(|(_, u)| *u)
            .unwrap_or(0.0);
        let distribution: Vec<f64> = members.iter().map(|(_, u)| *u).collect();
        out.insert(
            segment,
            SegmentSummary {
                count: members.len(),
                average_utility: distribution.iter().sum::<f64>() / members.len() as f64,
                top_candidate: candidates[top].id.clone(),
                top_utility,
                utility_distribution: distribution,
            },
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utility::fixtures::{candidate, voter};
    use sc_core::SimRng;

    #[test]
    fn matrix_shape_and_shares() {
        let mut a = voter(Gender::Female, &[], 0.0);
        a.party_loyalty = 1.0;
        let mut b = a.clone();
        b.id = VoterId::from(1);
        b.likelihood_to_vote = 0.0;
        let strong = candidate(1, &[], 0.0, 1.0, 0); // 0.35
        let weak = candidate(2, &[], 0.0, 0.6, 1); // negative
        let m = utility_matrix(&[a, b], &[strong, weak], &[], &mut SimRng::from_seed_u64(1)).unwrap();
        assert_eq!(m.values.len(), 2);
        assert_eq!(m.values[0].len(), 2);
        assert_eq!(m.vote_shares[&CandidateId::from(1)], 0.5);
        assert_eq!(m.vote_shares[&CandidateId::from(2)], 0.0);
        let mean = m.values.iter().flatten().sum::<f64>() / 4.0;
        assert!((m.average_utility - mean).abs() < 1e-12);
    }

    #[test]
    fn empty_pool_rejected() {
        let c = candidate(1, &[], 0.0, 1.0, 0);
        assert!(matches!(
            utility_matrix(&[], &[c], &[], &mut SimRng::from_seed_u64(1)),
            Err(SimError::InvalidPopulation(0))
        ));
        let v = voter(Gender::Male, &[], 0.0);
        assert!(matches!(segment_analysis(&[v], &[], &[], &Segment::ALL), Err(SimError::NoCandidates)));
    }

    #[test]
    fn segments_group_best_candidates() {
        let mut young = voter(Gender::Female, &[("environment", 1.0)], 0.0);
        young.demographics.age = 25;
        let mut old = voter(Gender::Male, &[("economy", 1.0)], 0.0);
        old.id = VoterId::from(1);
        old.demographics.age = 70;
        let green = candidate(1, &[("environment", 1.0)], 0.0, 0.8, 0);
        let blue = candidate(2, &[("economy", 1.0)], 0.0, 0.8, 0);
        let issues: Vec<String> = vec!["environment".into(), "economy".into()];

        let out = segment_analysis(&[young, old], &[green, blue], &issues, &Segment::ALL).unwrap();
        assert_eq!(out[&Segment::YoungFemale].top_candidate, CandidateId::from(1));
        assert_eq!(out[&Segment::OldMale].top_candidate, CandidateId::from(2));
        // both fixtures live in cities
        assert_eq!(out[&Segment::Urban].count, 2);
        assert!(!out.contains_key(&Segment::Rural));
        assert!(!out.contains_key(&Segment::HighEdu));
    }
}
