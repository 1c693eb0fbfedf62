//! crates/sc_io/src/lib.rs
//! File-facing helpers for the `sc` harness.
//!
//! - `loader`: size-limited JSON reads into request, config, and ballot types
//! - `canonical_json`: sorted-key compact JSON and atomic writes
//! - `hasher`: SHA-256 over canonical bytes and `RES:` digests
//!
//! The engine crates never touch the filesystem; everything that does lives here.

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod canonical_json;
pub mod hasher;
pub mod loader;

/// Unified error for sc_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem errors (open, read, create_dir_all, rename).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON parse or shape errors, located by file.
    #[error("json error in {path}: {msg}")]
    Json { path: String, msg: String },

    /// Input larger than the read limit.
    #[error("limit exceeded: {0}")]
    Limit(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json { path: "<memory>".to_string(), msg: e.to_string() }
    }
}

pub mod prelude {
    pub use crate::canonical_json::{to_canonical_bytes, write_canonical_file};
    pub use crate::hasher::{res_id_from_canonical, sha256_canonical, sha256_hex};
    pub use crate::loader::{load_analysis, load_ballots, load_config, load_request, BallotFile};
    pub use crate::{IoError, IoResult};
}
