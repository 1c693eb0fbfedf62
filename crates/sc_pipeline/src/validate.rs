//! crates/sc_pipeline/src/validate.rs
//! Structural validation of caller-supplied ballots before evaluation.
//! Deterministic output; no RNG. Evaluators tolerate unknown ids and repeats
//! by dropping them, so this report is how a collaborator learns about them.

use serde::Serialize;

use sc_core::determinism::CandidateOrder;
use sc_core::{BallotSet, CandidateId, ScoreCard};

/// Lowest and highest legal score.
pub const SCORE_RANGE: (f64, f64) = (0.0, 5.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "at", content = "ref", rename_all = "snake_case")]
pub enum EntityRef {
    Root,
    Candidate(CandidateId),
    Ballot(usize),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    #[serde(rename = "where")]
    pub where_: EntityRef,
}

/// `pass` is true when no issue is an error. Issues are ordered by location,
/// then code.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }
}

fn issue(severity: Severity, code: &'static str, where_: EntityRef, message: String) -> ValidationIssue {
    ValidationIssue { severity, code, message, where_ }
}

pub fn validate_ballots(ballots: &BallotSet, candidates: &[CandidateId]) -> ValidationReport {
    let mut issues = check_candidates(candidates);
    let order = CandidateOrder::new(candidates);

    if ballots.is_empty() {
        issues.push(issue(Severity::Warning, "ballots.empty", EntityRef::Root, "no ballots to evaluate".into()));
    }
    match ballots {
        BallotSet::Categorical(choices) => {
            for (i, c) in choices.iter().enumerate() {
                if let Some(id) = c {
                    issues.extend(unknown(i, id, &order));
                }
            }
        }
        BallotSet::Ranking(rankings) => {
            for (i, r) in rankings.iter().enumerate() {
                issues.extend(check_ranking(i, r, &order));
            }
        }
        BallotSet::Score(cards) => {
            for (i, card) in cards.iter().enumerate() {
                issues.extend(check_card(i, card, &order));
            }
        }
    }

    issues.sort_by(|a, b| a.where_.cmp(&b.where_).then(a.code.cmp(b.code)));
    ValidationReport { pass: !issues.iter().any(|i| i.severity == Severity::Error), issues }
}

// ------------------------------------------------------------------------------------------------
// Checks
// ------------------------------------------------------------------------------------------------

fn check_candidates(candidates: &[CandidateId]) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    if candidates.is_empty() {
        out.push(issue(Severity::Error, "candidates.empty", EntityRef::Root, "candidate list is empty".into()));
    }
    for (i, id) in candidates.iter().enumerate() {
        if candidates[..i].contains(id) {
            out.push(issue(
                Severity::Error,
                "candidates.duplicate",
                EntityRef::Candidate(id.clone()),
                format!("candidate {id} listed more than once"),
            ));
        }
    }
    out
}

fn unknown(ballot: usize, id: &CandidateId, order: &CandidateOrder<'_>) -> Option<ValidationIssue> {
    order.position(id).is_none().then(|| {
        issue(
            Severity::Error,
            "ballot.unknown_candidate",
            EntityRef::Ballot(ballot),
            format!("unknown candidate {id}"),
        )
    })
}

fn check_ranking(ballot: usize, ranking: &[CandidateId], order: &CandidateOrder<'_>) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    if ranking.is_empty() {
        out.push(issue(Severity::Warning, "ballot.empty", EntityRef::Ballot(ballot), "empty ranking".into()));
    }
    for (pos, id) in ranking.iter().enumerate() {
        out.extend(unknown(ballot, id, order));
        if ranking[..pos].contains(id) {
            out.push(issue(
                Severity::Error,
                "ballot.duplicate_rank",
                EntityRef::Ballot(ballot),
                format!("candidate {id} ranked more than once"),
            ));
        }
    }
    out
}

fn check_card(ballot: usize, card: &ScoreCard, order: &CandidateOrder<'_>) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    if card.is_empty() {
        out.push(issue(Severity::Warning, "ballot.empty", EntityRef::Ballot(ballot), "empty score card".into()));
    }
    let (lo, hi) = SCORE_RANGE;
    for (id, score) in card {
        out.extend(unknown(ballot, id, order));
        if !(lo..=hi).contains(score) {
            out.push(issue(
                Severity::Error,
                "ballot.score_out_of_range",
                EntityRef::Ballot(ballot),
                format!("score {score} for {id} outside [{lo}, {hi}]"),
            ));
        }
    }
    out
}
