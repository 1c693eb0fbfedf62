//! crates/sc_pipeline/src/analyze.rs
//! Seeded analysis runs that produce no ballots: the voter/candidate utility
//! grid with segment summaries, and the two-dimensional spatial model.

use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

use sc_core::{Candidate, CandidateId, SimConfig, SimRng};
use sc_sim::{Point, Segment, SegmentSummary, UtilityMatrix};

use crate::{resolve_candidates, PipelineResult, DEFAULT_NUM_CANDIDATES};

fn all_segments() -> Vec<Segment> {
    Segment::ALL.to_vec()
}

fn default_num_candidates() -> usize {
    DEFAULT_NUM_CANDIDATES
}

/// Generated voters against supplied or generated candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRequest {
    pub population_size: i64,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub num_candidates: Option<usize>,
    #[serde(default)]
    pub parties: Option<Vec<String>>,
    #[serde(default = "all_segments")]
    pub segments: Vec<Segment>,
}

/// Age-driven voter positions and uniformly placed candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialRequest {
    pub population_size: i64,
    pub average_age: f64,
    #[serde(default = "default_num_candidates")]
    pub num_candidates: usize,
}

/// One analysis request, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum AnalysisRequest {
    Utility(PoolRequest),
    Spatial(SpatialRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum AnalysisOutput {
    Utility {
        seed: u64,
        candidates: Vec<CandidateId>,
        matrix: UtilityMatrix,
        segments: BTreeMap<Segment, SegmentSummary>,
    },
    Spatial {
        seed: u64,
        voters: Vec<Point>,
        candidates: Vec<Point>,
        /// Index into `candidates` of each voter's nearest candidate.
        assignment: Vec<usize>,
        /// Voters assigned to each candidate.
        counts: Vec<u64>,
    },
}

/// Run one seeded analysis. Deterministic in (request, configuration, seed).
pub fn analyze(req: &AnalysisRequest, cfg: &SimConfig, seed: u64) -> PipelineResult<AnalysisOutput> {
    cfg.validate()?;
    let mut rng = SimRng::from_seed_u64(seed);
    match req {
        AnalysisRequest::Utility(p) => {
            let n = sc_sim::check_population(p.population_size)?;
            let candidates = resolve_candidates(&p.candidates, p.num_candidates, p.parties.as_deref(), cfg, &mut rng)?;
            let voters = sc_sim::generate_voters(n, cfg, &mut rng)?;
            let matrix = sc_sim::utility_matrix(&voters, &candidates, &cfg.issues, &mut rng)?;
            let segments = sc_sim::segment_analysis(&voters, &candidates, &cfg.issues, &p.segments)?;
            info!("seed {seed}: utility grid {}x{}, {} segment(s)", voters.len(), candidates.len(), segments.len());
            Ok(AnalysisOutput::Utility {
                seed,
                candidates: candidates.into_iter().map(|c| c.id).collect(),
                matrix,
                segments,
            })
        }
        AnalysisRequest::Spatial(s) => {
            let n = sc_sim::check_population(s.population_size)?;
            let voters = sc_sim::simulate_population(n, s.average_age, &mut rng)?;
            let candidates = sc_sim::candidate_points(s.num_candidates, &mut rng);
            let assignment = sc_sim::nearest_candidate(&voters, &candidates)?;
            let mut counts = vec![0u64; candidates.len()];
            for &i in &assignment {
                counts[i] += 1;
            }
            info!("seed {seed}: {} spatial voters over {} candidates", voters.len(), candidates.len());
            Ok(AnalysisOutput::Spatial { seed, voters, candidates, assignment, counts })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineError;
    use sc_sim::SimError;

    fn spatial(n: i64, k: usize) -> AnalysisRequest {
        AnalysisRequest::Spatial(SpatialRequest { population_size: n, average_age: 45.0, num_candidates: k })
    }

    #[test]
    fn spatial_assigns_every_voter() {
        let out = analyze(&spatial(50, 3), &SimConfig::default(), 9).unwrap();
        match out {
            AnalysisOutput::Spatial { voters, candidates, assignment, counts, .. } => {
                assert_eq!(voters.len(), 50);
                assert_eq!(candidates.len(), 3);
                assert_eq!(assignment.len(), 50);
                assert!(assignment.iter().all(|&i| i < 3));
                assert_eq!(counts.iter().sum::<u64>(), 50);
            }
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn spatial_without_candidates_is_rejected() {
        let err = analyze(&spatial(10, 0), &SimConfig::default(), 1).unwrap_err();
        assert!(matches!(err, PipelineError::Simulation(SimError::NoCandidates)));
    }

    #[test]
    fn utility_grid_and_segments() {
        let req: AnalysisRequest =
            serde_json::from_str(r#"{ "analysis": "utility", "population_size": 40, "num_candidates": 3 }"#).unwrap();
        let cfg = SimConfig::default();
        let out = analyze(&req, &cfg, 5).unwrap();
        assert_eq!(out, analyze(&req, &cfg, 5).unwrap());
        match out {
            AnalysisOutput::Utility { candidates, matrix, segments, .. } => {
                assert_eq!(candidates.len(), 3);
                assert_eq!(matrix.values.len(), 40);
                assert!(matrix.values.iter().all(|row| row.len() == 3));
                assert!(segments.keys().all(|s| Segment::ALL.contains(s)));
                assert!(segments.values().all(|s| s.count > 0 && candidates.contains(&s.top_candidate)));
            }
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn non_positive_population_is_rejected() {
        let err = analyze(&spatial(0, 2), &SimConfig::default(), 1).unwrap_err();
        assert!(matches!(err, PipelineError::Simulation(SimError::InvalidPopulation(0))));
    }
}
