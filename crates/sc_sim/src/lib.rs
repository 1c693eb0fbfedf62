// crates/sc_sim/src/lib.rs
//! sc_sim: Synthetic electorate generation.
//!
//! Leaf-first:
//! - `sampler`: correlated demographic draws from injected tables
//! - `priorities`: issue priorities and political lean keyed by demographics
//! - `population`: full synthetic voters (priorities, loyalty, mood, turnout likelihood)
//! - `candidates`: party-correlated policy positions
//! - `utility`: voter/candidate affinity and the stochastic turnout decision
//! - `electorate`: population orchestration and the three ballot shapes
//! - `spatial`: two-dimensional age-driven positions and nearest-candidate assignment
//! - `analysis`: utility matrix and demographic segment summaries
//!
//! Every draw takes an explicit `&mut SimRng`; nothing reads global state.
#![forbid(unsafe_code)]

use sc_core::CoreError;
use thiserror::Error;

pub mod analysis;
pub mod candidates;
pub mod electorate;
pub mod population;
pub mod priorities;
pub mod sampler;
pub mod spatial;
pub mod utility;

pub use analysis::{segment_analysis, utility_matrix, Segment, SegmentSummary, UtilityMatrix};
pub use candidates::{create_candidate, generate_candidates};
pub use electorate::{
    check_population, simulate, simulate_utility, utility_ballot, DemographicsSpec, ElectorateSpec, InfluenceWeights,
    SimulatedVoter, SimulationOutcome, Tally, NO_VOTE,
};
pub use population::{create_voter, generate_voters};
pub use sampler::DemographicSampler;
pub use spatial::{candidate_points, nearest_candidate, simulate_population, Point};
pub use utility::{calculate_utility, utility_score, UtilityBreakdown, UtilityResult};

/// Errors raised by simulation entry points. All are configuration errors:
/// reported at once and never retried.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("population size must be positive (got {0})")]
    InvalidPopulation(i64),

    #[error("candidate set is empty")]
    NoCandidates,

    #[error("turnout rate must lie in [0, 1] (got {0})")]
    InvalidTurnout(f64),

    #[error("distribution `{table}` is unusable: {reason}")]
    Distribution { table: String, reason: String },

    #[error("influence weight {attribute}={value} -> {candidate} must be finite and non-negative")]
    InvalidInfluence {
        attribute: String,
        value: String,
        candidate: String,
    },

    #[error("age {0} outside [18, 85]")]
    AgeOutOfRange(f64),
}

pub type SimResult<T> = Result<T, SimError>;
