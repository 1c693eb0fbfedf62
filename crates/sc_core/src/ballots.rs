//! crates/sc_core/src/ballots.rs
//! Ballot shapes. The variant is decided once, when ballots are collected
//! into a `BallotSet`; evaluators never re-inspect ballot structure.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::{CandidateId, VoterId};

/// Candidate → score in [0, 5]. How a missing candidate counts is up to
/// each evaluator.
pub type ScoreCard = BTreeMap<CandidateId, f64>;

/// Ballot shape; also names the simulation mode that produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BallotKind {
    Categorical,
    Ranking,
    Score,
}

impl BallotKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BallotKind::Categorical => "categorical",
            BallotKind::Ranking => "ranking",
            BallotKind::Score => "score",
        }
    }
}

/// One voter's ballot. `Categorical(None)` is an explicit abstention
/// ("No Vote").
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "snake_case"))]
pub enum Ballot {
    Categorical(Option<CandidateId>),
    Ranking(Vec<CandidateId>),
    Score(ScoreCard),
}

impl Ballot {
    pub fn kind(&self) -> BallotKind {
        match self {
            Ballot::Categorical(_) => BallotKind::Categorical,
            Ballot::Ranking(_) => BallotKind::Ranking,
            Ballot::Score(_) => BallotKind::Score,
        }
    }
}

/// A ballot attributed to a voter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoterBallot {
    pub voter_id: VoterId,
    pub ballot: Ballot,
}

/// Ordered ballots of a single variant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "ballots", rename_all = "snake_case"))]
pub enum BallotSet {
    Categorical(Vec<Option<CandidateId>>),
    Ranking(Vec<Vec<CandidateId>>),
    Score(Vec<ScoreCard>),
}

impl BallotSet {
    pub fn kind(&self) -> BallotKind {
        match self {
            BallotSet::Categorical(_) => BallotKind::Categorical,
            BallotSet::Ranking(_) => BallotKind::Ranking,
            BallotSet::Score(_) => BallotKind::Score,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BallotSet::Categorical(v) => v.len(),
            BallotSet::Ranking(v) => v.len(),
            BallotSet::Score(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty set of the given kind.
    pub fn empty(kind: BallotKind) -> Self {
        match kind {
            BallotKind::Categorical => BallotSet::Categorical(Vec::new()),
            BallotKind::Ranking => BallotSet::Ranking(Vec::new()),
            BallotKind::Score => BallotSet::Score(Vec::new()),
        }
    }

    /// Collect ballots of one variant; a ballot of any other variant is a
    /// shape error.
    pub fn collect<'a, I>(kind: BallotKind, ballots: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = &'a Ballot>,
    {
        let mut set = Self::empty(kind);
        for b in ballots {
            match (&mut set, b) {
                (BallotSet::Categorical(v), Ballot::Categorical(c)) => v.push(c.clone()),
                (BallotSet::Ranking(v), Ballot::Ranking(r)) => v.push(r.clone()),
                (BallotSet::Score(v), Ballot::Score(s)) => v.push(s.clone()),
                _ => return Err(CoreError::MixedBallotKinds),
            }
        }
        Ok(set)
    }
}
