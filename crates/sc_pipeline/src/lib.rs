//! sc_pipeline: collaborator-facing surface (request → simulate → ballots → evaluate).
//! This crate stays I/O-free; JSON files and digests live in `sc_io`, the
//! electorate models in `sc_sim`, and the evaluators in `sc_algo`.
//!
//! - `simulate`: one seeded run of either population model
//! - `dispatch`: stable method names, single and parallel evaluation
//! - `validate`: structural ballot checks for untrusted input
//! - `analyze`: utility grid, segment summaries, and the spatial model
#![forbid(unsafe_code)]

use core::fmt;
use core::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sc_algo::TabError;
use sc_core::{BallotKind, BallotSet, Candidate, CandidateId, CoreError, SimConfig, SimRng, VoterBallot};
use sc_sim::{ElectorateSpec, SimError, SimulatedVoter, Tally};

pub mod analyze;
pub mod dispatch;
pub mod validate;

pub use analyze::{analyze, AnalysisOutput, AnalysisRequest, PoolRequest, SpatialRequest};
pub use dispatch::{evaluate, evaluate_all};
pub use sc_algo::{Diagnostics, MethodResult};
pub use validate::{validate_ballots, EntityRef, Severity, ValidationIssue, ValidationReport};

// ---------------------------------- Errors ----------------------------------

/// Single error surface for the pipeline. Every variant is a configuration
/// error: the caller fixes the input, nothing is retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unknown method `{0}`")]
    UnknownMethod(String),

    #[error("{method} does not accept {kind} ballots")]
    BallotMismatch { method: &'static str, kind: &'static str },

    #[error(transparent)]
    Tabulate(#[from] TabError),

    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

// ---------------------------------- Methods ---------------------------------

/// Every evaluator, under its stable wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Plurality,
    TwoRound,
    Borda,
    Approval,
    Condorcet,
    Irv,
    Coombs,
    RankedScore,
    KemenyYoung,
    Bucklin,
    Minimax,
    Schulze,
    SimpleScore,
    MedianScore,
    Star,
    MeanMedianHybrid,
    VarianceBased,
    BayesianRegret,
    ScoreDistribution,
}

impl Method {
    pub const ALL: [Method; 19] = [
        Method::Plurality,
        Method::TwoRound,
        Method::Borda,
        Method::Approval,
        Method::Condorcet,
        Method::Irv,
        Method::Coombs,
        Method::RankedScore,
        Method::KemenyYoung,
        Method::Bucklin,
        Method::Minimax,
        Method::Schulze,
        Method::SimpleScore,
        Method::MedianScore,
        Method::Star,
        Method::MeanMedianHybrid,
        Method::VarianceBased,
        Method::BayesianRegret,
        Method::ScoreDistribution,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Plurality => "plurality",
            Method::TwoRound => "two_round",
            Method::Borda => "borda",
            Method::Approval => "approval",
            Method::Condorcet => "condorcet",
            Method::Irv => "irv",
            Method::Coombs => "coombs",
            Method::RankedScore => "ranked_score",
            Method::KemenyYoung => "kemeny_young",
            Method::Bucklin => "bucklin",
            Method::Minimax => "minimax",
            Method::Schulze => "schulze",
            Method::SimpleScore => "simple_score",
            Method::MedianScore => "median_score",
            Method::Star => "star",
            Method::MeanMedianHybrid => "mean_median_hybrid",
            Method::VarianceBased => "variance_based",
            Method::BayesianRegret => "bayesian_regret",
            Method::ScoreDistribution => "score_distribution",
        }
    }

    /// Whether this method evaluates ballot sets of `kind`. Plurality is the
    /// only method taking categorical choices.
    pub fn accepts(self, kind: BallotKind) -> bool {
        match kind {
            BallotKind::Categorical => self == Method::Plurality,
            BallotKind::Ranking => self <= Method::Schulze,
            BallotKind::Score => self >= Method::SimpleScore,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| PipelineError::UnknownMethod(s.to_string()))
    }
}

/// Tunables for methods that take one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodParams {
    /// Leading entries of each ranking counted as approvals.
    pub approval_threshold: usize,
}

impl Default for MethodParams {
    fn default() -> Self {
        Self { approval_threshold: sc_algo::tabulation::DEFAULT_APPROVAL_THRESHOLD }
    }
}

// ---------------------------------- Simulation ------------------------------

/// Candidates generated when a utility request names none.
pub const DEFAULT_NUM_CANDIDATES: usize = 4;

/// Utility-model request: full synthetic voters whose ballots follow the
/// utility function. Candidates are either supplied or generated from
/// `parties` (default: the configured party rotation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilityRequest {
    pub population_size: i64,
    pub mode: BallotKind,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub num_candidates: Option<usize>,
    #[serde(default)]
    pub parties: Option<Vec<String>>,
}

impl UtilityRequest {
    fn resolve_candidates(&self, cfg: &SimConfig, rng: &mut SimRng) -> PipelineResult<Vec<Candidate>> {
        resolve_candidates(&self.candidates, self.num_candidates, self.parties.as_deref(), cfg, rng)
    }
}

/// Supplied candidates, or `num_candidates` generated over `parties`.
pub(crate) fn resolve_candidates(
    supplied: &[Candidate],
    num_candidates: Option<usize>,
    parties: Option<&[String]>,
    cfg: &SimConfig,
    rng: &mut SimRng,
) -> PipelineResult<Vec<Candidate>> {
    if !supplied.is_empty() {
        return Ok(supplied.to_vec());
    }
    let parties = parties.unwrap_or(cfg.parties.as_slice());
    let n = num_candidates.unwrap_or(DEFAULT_NUM_CANDIDATES);
    Ok(sc_sim::generate_candidates(n, parties, &cfg.issues, cfg, rng)?)
}

/// One simulation request, tagged by population model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum SimulationRequest {
    Influence(ElectorateSpec),
    Utility(UtilityRequest),
}

/// Result of `simulate`: ballots ready for the evaluators plus every voter's
/// profile and turnout flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub seed: u64,
    pub mode: BallotKind,
    /// Candidate ids in tie-break order.
    pub candidates: Vec<CandidateId>,
    pub ballots: Vec<VoterBallot>,
    pub voters_sample: Vec<SimulatedVoter>,
    pub tally: Tally,
}

impl SimulationOutput {
    pub fn ballot_set(&self) -> PipelineResult<BallotSet> {
        Ok(BallotSet::collect(self.mode, self.ballots.iter().map(|b| &b.ballot))?)
    }
}

/// Run one seeded simulation. The same request, configuration, and seed
/// always produce the same output.
pub fn simulate(req: &SimulationRequest, cfg: &SimConfig, seed: u64) -> PipelineResult<SimulationOutput> {
    cfg.validate()?;
    let mut rng = SimRng::from_seed_u64(seed);
    let (candidates, outcome) = match req {
        SimulationRequest::Influence(spec) => (spec.candidates.clone(), sc_sim::simulate(spec, cfg, &mut rng)?),
        SimulationRequest::Utility(u) => {
            let cands = u.resolve_candidates(cfg, &mut rng)?;
            let outcome = sc_sim::simulate_utility(u.population_size, &cands, u.mode, cfg, &mut rng)?;
            (cands.into_iter().map(|c| c.id).collect(), outcome)
        }
    };
    info!(
        "seed {seed}: {} voters, {} {} ballots",
        outcome.voters.len(),
        outcome.ballots.len(),
        outcome.mode.as_str()
    );
    Ok(SimulationOutput {
        seed,
        mode: outcome.mode,
        candidates,
        ballots: outcome.ballots,
        voters_sample: outcome.voters,
        tally: outcome.tally,
    })
}
