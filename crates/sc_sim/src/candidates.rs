//! Candidates with policy positions correlated to their party's lean.

use std::collections::BTreeMap;

use rand::Rng;

use sc_core::{Candidate, CandidateId, SimConfig, SimRng};

use crate::{SimError, SimResult};

/// Maximum deviation of any policy from the party line.
pub const POLICY_NOISE: f64 = 0.2;

/// Build one candidate. Each policy is `(lean + 1) / 2` plus uniform noise in
/// ±0.2, clamped to [0, 1].
pub fn create_candidate(
    id: CandidateId,
    name: String,
    party: &str,
    issues: &[String],
    cfg: &SimConfig,
    rng: &mut SimRng,
) -> Candidate {
    let party_lean = cfg.party_lean(party);
    let base = (party_lean + 1.0) / 2.0;
    let policies: BTreeMap<String, f64> = issues
        .iter()
        .map(|issue| {
            let noise = rng.gen_range(-POLICY_NOISE..=POLICY_NOISE);
            (issue.clone(), (base + noise).clamp(0.0, 1.0))
        })
        .collect();

    Candidate {
        id,
        name,
        party: party.to_string(),
        party_lean,
        policies,
        charisma: rng.gen_range(0.5..=1.0),
        scandals: rng.gen_range(0..=2),
        campaign_funds: rng.gen_range(100_000.0..=1_000_000.0),
        experience: rng.gen_range(1..=20),
        popularity: rng.gen_range(0.3..=0.9),
    }
}

/// `n` candidates cycling through `parties`; candidate `i` has id `i` and the
/// display name `Candidate {i+1} ({party})`.
pub fn generate_candidates(
    n: usize,
    parties: &[String],
    issues: &[String],
    cfg: &SimConfig,
    rng: &mut SimRng,
) -> SimResult<Vec<Candidate>> {
    if n > 0 && parties.is_empty() {
        return Err(SimError::Distribution {
            table: "parties".to_string(),
            reason: "no parties to assign".to_string(),
        });
    }
    Ok((0..n)
        .map(|i| {
            let party = &parties[i % parties.len()];
            create_candidate(
                CandidateId::from(i as u64),
                format!("Candidate {} ({})", i + 1, party),
                party,
                issues,
                cfg,
                rng,
            )
        })
        .collect())
}
