//! sc_core: Core types, configuration tables, ordering helpers, and seeded RNG.
//!
//! This crate is **I/O-free**. It defines the stable types shared across the
//! engine (`sc_sim`, `sc_algo`, `sc_pipeline`, `sc_io`, `sc_cli`).
//!
//! - Caller-supplied identifiers: `CandidateId`, `VoterId`
//! - Entities: `Candidate`, `Voter`, `Demographics` and its categorical domains
//! - Ballot shapes: one tagged `Ballot` variant per voter, one `BallotSet` per call
//! - Injected demographic tables: `SimConfig`
//! - Deterministic tie-break helpers (candidate insertion order)
//! - Seedable RNG (ChaCha20) with a word counter
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    /// Configuration and shape errors raised by core types.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidId,
        EmptyDistribution(&'static str),
        InvalidWeight(&'static str),
        DomainOutOfRange(&'static str),
        MixedBallotKinds,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidId => write!(f, "invalid id"),
                CoreError::EmptyDistribution(k) => write!(f, "empty distribution: {k}"),
                CoreError::InvalidWeight(k) => write!(f, "invalid weight in table: {k}"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
                CoreError::MixedBallotKinds => write!(f, "ballot set mixes ballot kinds"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod ballots;
pub mod config;
pub mod determinism;
pub mod entities;
pub mod ids;
pub mod rng;

pub use ballots::{Ballot, BallotKind, BallotSet, ScoreCard, VoterBallot};
pub use config::SimConfig;
pub use entities::{Candidate, Demographics, Voter};
pub use errors::CoreError;
pub use ids::{CandidateId, VoterId};
pub use rng::SimRng;
