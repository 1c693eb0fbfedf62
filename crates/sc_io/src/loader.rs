//! Loader: read local JSON inputs (simulation request, configuration override,
//! ballot file) into typed values. Reads are size-limited; no network I/O.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use sc_core::{BallotSet, CandidateId, SimConfig};
use sc_pipeline::{AnalysisRequest, MethodParams, SimulationRequest};

use crate::{IoError, IoResult};

/// Inputs above this size are rejected before parsing.
pub const MAX_INPUT_BYTES: u64 = 64 * 1024 * 1024;

/// Ballots to evaluate, with the candidate list that fixes tie-break order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallotFile {
    pub candidates: Vec<CandidateId>,
    pub ballots: BallotSet,
    #[serde(default)]
    pub params: MethodParams,
}

pub fn load_request(path: &Path) -> IoResult<SimulationRequest> {
    read_json(path)
}

pub fn load_analysis(path: &Path) -> IoResult<AnalysisRequest> {
    read_json(path)
}

/// Configuration override. Missing fields keep their built-in tables.
pub fn load_config(path: &Path) -> IoResult<SimConfig> {
    read_json(path)
}

pub fn load_ballots(path: &Path) -> IoResult<BallotFile> {
    read_json(path)
}

/// Read and deserialize one JSON document, bounded by `MAX_INPUT_BYTES`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> IoResult<T> {
    let buf = read_limited(path)?;
    serde_json::from_slice(&buf).map_err(|e| IoError::Json { path: path.display().to_string(), msg: e.to_string() })
}

fn read_limited(path: &Path) -> IoResult<Vec<u8>> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("open {}: {e}", path.display())))?;
    let mut buf = Vec::new();
    f.take(MAX_INPUT_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Path(format!("read {}: {e}", path.display())))?;
    if buf.len() as u64 > MAX_INPUT_BYTES {
        return Err(IoError::Limit(format!("{} exceeds {MAX_INPUT_BYTES} bytes", path.display())));
    }
    Ok(buf)
}
