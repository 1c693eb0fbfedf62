//! Electorate simulator: builds a population and emits one ballot per voter
//! in the requested shape.
//!
//! Two population models share the ballot assembly:
//! - `simulate`: profiles drawn from a caller-supplied demographics spec (or
//!   the configured sampler), with candidate preference shaped by
//!   multiplicative influence weights;
//! - `simulate_utility`: full synthetic voters whose ballots follow the
//!   utility function.

use std::collections::BTreeMap;

use log::{debug, info};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sc_core::determinism::{argmax_first, indices_by_desc};
use sc_core::{
    Ballot, BallotKind, BallotSet, Candidate, CandidateId, CoreError, ScoreCard, SimConfig, SimRng,
    Voter, VoterBallot, VoterId,
};

use crate::population::create_voter;
use crate::sampler::{Compiled, DemographicSampler};
use crate::utility::{utility_score, VOTE_THRESHOLD};
use crate::{SimError, SimResult};

/// Label of the abstention option in categorical tallies and influence weights.
pub const NO_VOTE: &str = "No Vote";
/// Score given to every candidate when a voter's raw scores are all equal.
pub const SCORE_MIDPOINT: f64 = 2.5;
pub const SCORE_MAX: f64 = 5.0;

/// attribute → value → weight.
pub type DemographicsSpec = BTreeMap<String, BTreeMap<String, f64>>;
/// attribute → value → candidate (or `"No Vote"`) → multiplier.
pub type InfluenceWeights = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

/// Inputs of one influence-weighted simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElectorateSpec {
    pub population_size: i64,
    pub candidates: Vec<CandidateId>,
    /// When absent, profiles come from the configured demographic sampler.
    #[cfg_attr(feature = "serde", serde(default))]
    pub demographics: Option<DemographicsSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub influence_weights: InfluenceWeights,
    pub turnout_rate: f64,
    pub mode: BallotKind,
}

/// One voter as reported back to the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulatedVoter {
    pub id: VoterId,
    pub profile: BTreeMap<String, String>,
    pub turnout: bool,
    pub ballot: Ballot,
}

/// Summary counts: per-choice counts for categorical ballots, first-choice
/// counts for rankings, average score per candidate for score ballots.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Tally {
    Counts(BTreeMap<String, u64>),
    Averages(BTreeMap<CandidateId, f64>),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationOutcome {
    pub mode: BallotKind,
    /// Every voter, turnout or not.
    pub voters: Vec<SimulatedVoter>,
    /// Categorical: every voter (non-turnout voters abstain).
    /// Ranking and score: turnout voters only.
    pub ballots: Vec<VoterBallot>,
    pub tally: Tally,
}

impl SimulationOutcome {
    /// Ballots as a single-variant set for the evaluators.
    pub fn ballot_set(&self) -> Result<BallotSet, CoreError> {
        BallotSet::collect(self.mode, self.ballots.iter().map(|b| &b.ballot))
    }
}

/* ---------------------------------------------------------------------- */
/*                               Validation                               */
/* ---------------------------------------------------------------------- */

/// Positive population sizes only.
pub fn check_population(population_size: i64) -> SimResult<usize> {
    if population_size <= 0 {
        return Err(SimError::InvalidPopulation(population_size));
    }
    usize::try_from(population_size).map_err(|_| SimError::InvalidPopulation(population_size))
}

fn check_influence(weights: &InfluenceWeights) -> SimResult<()> {
    for (attribute, by_value) in weights {
        for (value, by_candidate) in by_value {
            for (candidate, w) in by_candidate {
                if !w.is_finite() || *w < 0.0 {
                    return Err(SimError::InvalidInfluence {
                        attribute: attribute.clone(),
                        value: value.clone(),
                        candidate: candidate.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/* ---------------------------------------------------------------------- */
/*                             Profile sources                             */
/* ---------------------------------------------------------------------- */

enum ProfileSource {
    Spec(Vec<(String, Compiled<String>)>),
    Sampler(DemographicSampler),
}

impl ProfileSource {
    fn new(spec: Option<&DemographicsSpec>, cfg: &SimConfig) -> SimResult<Self> {
        match spec {
            Some(spec) if !spec.is_empty() => {
                let mut attrs = Vec::with_capacity(spec.len());
                for (attribute, values) in spec {
                    let compiled = Compiled::new(attribute, values.iter().map(|(v, w)| (v, *w)))?;
                    attrs.push((attribute.clone(), compiled));
                }
                Ok(ProfileSource::Spec(attrs))
            }
            _ => Ok(ProfileSource::Sampler(DemographicSampler::new(cfg)?)),
        }
    }

    fn draw(&self, rng: &mut SimRng) -> BTreeMap<String, String> {
        match self {
            ProfileSource::Spec(attrs) => attrs
                .iter()
                .map(|(a, table)| (a.clone(), table.draw(rng)))
                .collect(),
            ProfileSource::Sampler(sampler) => sampler
                .sample(rng)
                .attributes()
                .into_iter()
                .map(|(a, v)| (a.to_string(), v))
                .collect(),
        }
    }
}

/// Multiply each option's base score of 1.0 by every influence weight that
/// matches the profile.
fn influence_scores(
    profile: &BTreeMap<String, String>,
    options: &[&str],
    weights: &InfluenceWeights,
) -> Vec<f64> {
    let mut scores = vec![1.0; options.len()];
    for (attribute, value) in profile {
        let Some(by_candidate) = weights.get(attribute).and_then(|m| m.get(value)) else {
            continue;
        };
        for (score, option) in scores.iter_mut().zip(options) {
            if let Some(w) = by_candidate.get(*option) {
                *score *= w;
            }
        }
    }
    scores
}

/// Linear rescale into [0, 5] by the voter's own min/max; all-equal scores
/// map to the midpoint.
fn rescale_scores(raw: &[f64]) -> Vec<f64> {
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    raw.iter()
        .map(|r| {
            let s = if max != min { SCORE_MAX * (r - min) / (max - min) } else { SCORE_MIDPOINT };
            s.clamp(0.0, SCORE_MAX)
        })
        .collect()
}

fn abstain_ballot(mode: BallotKind, candidates: &[CandidateId]) -> Ballot {
    match mode {
        BallotKind::Categorical => Ballot::Categorical(None),
        BallotKind::Ranking => Ballot::Ranking(Vec::new()),
        BallotKind::Score => Ballot::Score(candidates.iter().map(|c| (c.clone(), 0.0)).collect()),
    }
}

fn influence_ballot(
    mode: BallotKind,
    candidates: &[CandidateId],
    profile: &BTreeMap<String, String>,
    weights: &InfluenceWeights,
    rng: &mut SimRng,
) -> SimResult<Ballot> {
    let mut options: Vec<&str> = candidates.iter().map(|c| c.as_str()).collect();
    match mode {
        BallotKind::Categorical => {
            options.push(NO_VOTE);
            let scores = influence_scores(profile, &options, weights);
            let index = WeightedIndex::new(&scores).map_err(|e| SimError::Distribution {
                table: "influence_weights".to_string(),
                reason: e.to_string(),
            })?;
            let pick = index.sample(rng);
            Ok(Ballot::Categorical(candidates.get(pick).cloned()))
        }
        BallotKind::Ranking => {
            let scores = influence_scores(profile, &options, weights);
            Ok(Ballot::Ranking(
                indices_by_desc(&scores).into_iter().map(|i| candidates[i].clone()).collect(),
            ))
        }
        BallotKind::Score => {
            let scores = rescale_scores(&influence_scores(profile, &options, weights));
            Ok(Ballot::Score(candidates.iter().cloned().zip(scores).collect()))
        }
    }
}

/* ---------------------------------------------------------------------- */
/*                                  Tally                                  */
/* ---------------------------------------------------------------------- */

fn tally(mode: BallotKind, candidates: &[CandidateId], ballots: &[VoterBallot]) -> Tally {
    match mode {
        BallotKind::Categorical | BallotKind::Ranking => {
            let mut counts: BTreeMap<String, u64> =
                candidates.iter().map(|c| (c.to_string(), 0)).collect();
            for vb in ballots {
                let key = match &vb.ballot {
                    Ballot::Categorical(Some(c)) => c.to_string(),
                    Ballot::Categorical(None) => NO_VOTE.to_string(),
                    Ballot::Ranking(r) => match r.first() {
                        Some(c) => c.to_string(),
                        None => continue,
                    },
                    Ballot::Score(_) => continue,
                };
                *counts.entry(key).or_insert(0) += 1;
            }
            Tally::Counts(counts)
        }
        BallotKind::Score => {
            let mut sums: BTreeMap<CandidateId, f64> = BTreeMap::new();
            let mut n = 0usize;
            for vb in ballots {
                if let Ballot::Score(card) = &vb.ballot {
                    n += 1;
                    for c in candidates {
                        *sums.entry(c.clone()).or_insert(0.0) += card.get(c).copied().unwrap_or(0.0);
                    }
                }
            }
            if n > 0 {
                for v in sums.values_mut() {
                    *v /= n as f64;
                }
            }
            Tally::Averages(sums)
        }
    }
}

fn assemble(mode: BallotKind, candidates: &[CandidateId], voters: Vec<SimulatedVoter>) -> SimulationOutcome {
    let ballots: Vec<VoterBallot> = voters
        .iter()
        .filter(|v| v.turnout || mode == BallotKind::Categorical)
        .map(|v| VoterBallot { voter_id: v.id.clone(), ballot: v.ballot.clone() })
        .collect();
    let tally = tally(mode, candidates, &ballots);
    info!(
        "simulated {} voters, {} turned out, {} {} ballots",
        voters.len(),
        voters.iter().filter(|v| v.turnout).count(),
        ballots.len(),
        mode.as_str()
    );
    SimulationOutcome { mode, voters, ballots, tally }
}

/* ---------------------------------------------------------------------- */
/*                               Entry points                              */
/* ---------------------------------------------------------------------- */

/// Influence-weighted simulation. A non-positive population, an empty
/// candidate set, a turnout rate outside [0, 1], or an unusable distribution
/// is a configuration error.
pub fn simulate(spec: &ElectorateSpec, cfg: &SimConfig, rng: &mut SimRng) -> SimResult<SimulationOutcome> {
    let n = check_population(spec.population_size)?;
    if spec.candidates.is_empty() {
        return Err(SimError::NoCandidates);
    }
    if !(0.0..=1.0).contains(&spec.turnout_rate) {
        return Err(SimError::InvalidTurnout(spec.turnout_rate));
    }
    check_influence(&spec.influence_weights)?;
    let source = ProfileSource::new(spec.demographics.as_ref(), cfg)?;

    let mut voters = Vec::with_capacity(n);
    for i in 0..n {
        let profile = source.draw(rng);
        let turnout = rng.gen::<f64>() < spec.turnout_rate;
        let ballot = if turnout {
            influence_ballot(spec.mode, &spec.candidates, &profile, &spec.influence_weights, rng)?
        } else {
            abstain_ballot(spec.mode, &spec.candidates)
        };
        voters.push(SimulatedVoter { id: VoterId::from(i as u64), profile, turnout, ballot });
    }
    debug!("rng words consumed: {}", rng.words_consumed());
    Ok(assemble(spec.mode, &spec.candidates, voters))
}

/// Ballot derived from utilities. A turnout draw above the voter's
/// likelihood abstains; otherwise categorical picks the best candidate if its
/// utility exceeds 0.3, ranking orders by descending utility, and score is
/// `⌊5·utility⌋` clamped to [0, 5].
pub fn utility_ballot(
    voter: &Voter,
    candidates: &[Candidate],
    issues: &[String],
    mode: BallotKind,
    rng: &mut SimRng,
) -> (bool, Ballot) {
    let ids: Vec<CandidateId> = candidates.iter().map(|c| c.id.clone()).collect();
    if rng.gen::<f64>() > voter.likelihood_to_vote {
        return (false, abstain_ballot(mode, &ids));
    }
    let utilities: Vec<f64> = candidates
        .iter()
        .map(|c| utility_score(voter, c, issues).0)
        .collect();
    let ballot = match mode {
        BallotKind::Categorical => Ballot::Categorical(
            argmax_first(&utilities)
                .filter(|&i| utilities[i] > VOTE_THRESHOLD)
                .map(|i| ids[i].clone()),
        ),
        BallotKind::Ranking => {
            Ballot::Ranking(indices_by_desc(&utilities).into_iter().map(|i| ids[i].clone()).collect())
        }
        BallotKind::Score => {
            let card: ScoreCard = ids
                .iter()
                .cloned()
                .zip(utilities.iter().map(|u| (SCORE_MAX * u).trunc().clamp(0.0, SCORE_MAX)))
                .collect();
            Ballot::Score(card)
        }
    };
    (true, ballot)
}

/// Utility-driven simulation over fully generated voters.
pub fn simulate_utility(
    population_size: i64,
    candidates: &[Candidate],
    mode: BallotKind,
    cfg: &SimConfig,
    rng: &mut SimRng,
) -> SimResult<SimulationOutcome> {
    let n = check_population(population_size)?;
    if candidates.is_empty() {
        return Err(SimError::NoCandidates);
    }
    let sampler = DemographicSampler::new(cfg)?;
    let ids: Vec<CandidateId> = candidates.iter().map(|c| c.id.clone()).collect();

    let mut voters = Vec::with_capacity(n);
    for i in 0..n {
        let voter = create_voter(VoterId::from(i as u64), &sampler, cfg, rng)?;
        let (turnout, ballot) = utility_ballot(&voter, candidates, &cfg.issues, mode, rng);
        let profile = voter
            .demographics
            .attributes()
            .into_iter()
            .map(|(a, v)| (a.to_string(), v))
            .collect();
        voters.push(SimulatedVoter { id: voter.id, profile, turnout, ballot });
    }
    Ok(assemble(mode, &ids, voters))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(s: &str) -> CandidateId {
        CandidateId::new(s).unwrap()
    }

    fn spec(mode: BallotKind) -> ElectorateSpec {
        let mut demographics = DemographicsSpec::new();
        demographics.insert(
            "gender".into(),
            [("male".to_string(), 0.5), ("female".to_string(), 0.5)].into_iter().collect(),
        );
        let mut influence = InfluenceWeights::new();
        influence.insert(
            "gender".into(),
            [
                ("male".to_string(), [("A".to_string(), 4.0)].into_iter().collect()),
                ("female".to_string(), [("B".to_string(), 4.0)].into_iter().collect()),
            ]
            .into_iter()
            .collect(),
        );
        ElectorateSpec {
            population_size: 300,
            candidates: vec![cid("A"), cid("B"), cid("C")],
            demographics: Some(demographics),
            influence_weights: influence,
            turnout_rate: 0.8,
            mode,
        }
    }

    #[test]
    fn zero_population_is_configuration_error() {
        let mut s = spec(BallotKind::Ranking);
        s.population_size = 0;
        let err = simulate(&s, &SimConfig::default(), &mut SimRng::from_seed_u64(1)).unwrap_err();
        assert!(matches!(err, SimError::InvalidPopulation(0)));
        s.population_size = -4;
        assert!(simulate(&s, &SimConfig::default(), &mut SimRng::from_seed_u64(1)).is_err());
    }

    #[test]
    fn empty_candidates_rejected() {
        let mut s = spec(BallotKind::Score);
        s.candidates.clear();
        let err = simulate(&s, &SimConfig::default(), &mut SimRng::from_seed_u64(1)).unwrap_err();
        assert!(matches!(err, SimError::NoCandidates));
    }

    #[test]
    fn negative_influence_rejected() {
        let mut s = spec(BallotKind::Categorical);
        if let Some(m) = s.influence_weights.get_mut("gender").and_then(|m| m.get_mut("male")) {
            m.insert("A".into(), -1.0);
        }
        let err = simulate(&s, &SimConfig::default(), &mut SimRng::from_seed_u64(1)).unwrap_err();
        assert!(matches!(err, SimError::InvalidInfluence { .. }));
    }

    #[test]
    fn ranking_follows_influence_and_turnout() {
        let out = simulate(&spec(BallotKind::Ranking), &SimConfig::default(), &mut SimRng::from_seed_u64(7)).unwrap();
        assert_eq!(out.voters.len(), 300);
        for v in &out.voters {
            match (&v.ballot, v.turnout) {
                (Ballot::Ranking(r), false) => assert!(r.is_empty()),
                (Ballot::Ranking(r), true) => {
                    let expected = if v.profile["gender"] == "male" { "A" } else { "B" };
                    assert_eq!(r[0].as_str(), expected);
                    assert_eq!(r.len(), 3);
                    // ties keep candidate order: C is always last
                    assert_eq!(r[2].as_str(), "C");
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        let turned_out = out.voters.iter().filter(|v| v.turnout).count();
        assert_eq!(out.ballots.len(), turned_out);
        match &out.tally {
            Tally::Counts(c) => assert_eq!(c.values().sum::<u64>() as usize, turned_out),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn categorical_abstentions_counted() {
        let out = simulate(&spec(BallotKind::Categorical), &SimConfig::default(), &mut SimRng::from_seed_u64(3)).unwrap();
        assert_eq!(out.ballots.len(), 300);
        for v in out.voters.iter().filter(|v| !v.turnout) {
            assert_eq!(v.ballot, Ballot::Categorical(None));
        }
        match &out.tally {
            Tally::Counts(c) => {
                assert_eq!(c.values().sum::<u64>(), 300);
                assert!(c[NO_VOTE] >= out.voters.iter().filter(|v| !v.turnout).count() as u64);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn score_rescaling_and_midpoint() {
        assert_eq!(rescale_scores(&[1.0, 4.0, 2.0]), vec![0.0, 5.0, 5.0 / 3.0]);
        assert_eq!(rescale_scores(&[1.0, 1.0]), vec![SCORE_MIDPOINT, SCORE_MIDPOINT]);

        let mut s = spec(BallotKind::Score);
        s.influence_weights.clear();
        s.turnout_rate = 1.0;
        let out = simulate(&s, &SimConfig::default(), &mut SimRng::from_seed_u64(4)).unwrap();
        match &out.tally {
            Tally::Averages(avg) => assert!(avg.values().all(|v| *v == SCORE_MIDPOINT)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_turnout_scores_are_zero() {
        let mut s = spec(BallotKind::Score);
        s.turnout_rate = 0.0;
        let out = simulate(&s, &SimConfig::default(), &mut SimRng::from_seed_u64(4)).unwrap();
        assert!(out.ballots.is_empty());
        for v in &out.voters {
            match &v.ballot {
                Ballot::Score(card) => assert!(card.values().all(|x| *x == 0.0)),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn sampler_profiles_when_spec_absent() {
        let mut s = spec(BallotKind::Ranking);
        s.demographics = None;
        let out = simulate(&s, &SimConfig::default(), &mut SimRng::from_seed_u64(5)).unwrap();
        assert!(out.voters[0].profile.contains_key("education"));
        assert!(out.voters[0].profile.contains_key("religion"));
    }

    #[test]
    fn same_seed_same_outcome() {
        let s = spec(BallotKind::Categorical);
        let a = simulate(&s, &SimConfig::default(), &mut SimRng::from_seed_u64(99)).unwrap();
        let b = simulate(&s, &SimConfig::default(), &mut SimRng::from_seed_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn utility_simulation_produces_valid_ballots() {
        let cfg = SimConfig::default();
        let mut rng = SimRng::from_seed_u64(12);
        let cands = crate::generate_candidates(4, &cfg.parties, &cfg.issues, &cfg, &mut rng).unwrap();
        let out = simulate_utility(150, &cands, BallotKind::Score, &cfg, &mut rng).unwrap();
        let set = out.ballot_set().unwrap();
        assert_eq!(set.kind(), BallotKind::Score);
        if let BallotSet::Score(cards) = set {
            for card in cards {
                assert_eq!(card.len(), 4);
                assert!(card.values().all(|s| (0.0..=5.0).contains(s) && s.fract() == 0.0));
            }
        }
    }
}
