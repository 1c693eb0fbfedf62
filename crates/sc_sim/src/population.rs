//! Full synthetic voters: demographics, normalised priorities, loyalty, mood,
//! and the likelihood to turn out.

use rand::Rng;

use sc_core::entities::{Demographics, Education, Income};
use sc_core::{SimConfig, SimRng, Voter, VoterId};

use crate::priorities::{assign_issue_priorities, normalize_priorities};
use crate::sampler::DemographicSampler;
use crate::{SimError, SimResult};

/// Upper bound on any voter's turnout likelihood.
pub const MAX_LIKELIHOOD: f64 = 0.95;

fn education_vote_boost(d: &Demographics) -> f64 {
    let base = match d.education {
        Education::NoDiploma => 0.0,
        Education::HighSchool => 0.05,
        Education::Bachelor => 0.1,
        Education::Master => 0.15,
        Education::Phd => 0.2,
    };
    if d.age > 60 && d.education.is_advanced() {
        base + 0.1
    } else {
        base
    }
}

/// `min(0.95, 0.5 + min(age/100, 0.4) + high-income boost + education boost)`.
pub fn likelihood_to_vote(d: &Demographics) -> f64 {
    let age_effect = (d.age as f64 / 100.0).min(0.4);
    let income_effect = if d.income == Income::High { 0.1 } else { 0.0 };
    (0.5 + age_effect + income_effect + education_vote_boost(d)).min(MAX_LIKELIHOOD)
}

/// Build one voter from a fresh demographic draw.
pub fn create_voter(
    id: VoterId,
    sampler: &DemographicSampler,
    cfg: &SimConfig,
    rng: &mut SimRng,
) -> SimResult<Voter> {
    if cfg.parties.is_empty() {
        return Err(SimError::Distribution {
            table: "parties".to_string(),
            reason: "no parties to prefer".to_string(),
        });
    }
    let demographics = sampler.sample(rng);
    let (mut issue_priorities, political_lean) =
        assign_issue_priorities(&demographics, &cfg.issues, rng);
    normalize_priorities(&mut issue_priorities);

    let party_loyalty = rng.gen_range(0.0..=1.0);
    let preferred_party = cfg.parties[rng.gen_range(0..cfg.parties.len())].clone();
    let likelihood = likelihood_to_vote(&demographics);
    let mood = rng.gen_range(-1.0..=1.0);

    Ok(Voter {
        id,
        demographics,
        issue_priorities,
        political_lean,
        party_loyalty,
        preferred_party,
        mood,
        likelihood_to_vote: likelihood,
    })
}

/// `n` voters with ids `0..n`.
pub fn generate_voters(n: usize, cfg: &SimConfig, rng: &mut SimRng) -> SimResult<Vec<Voter>> {
    let sampler = DemographicSampler::new(cfg)?;
    (0..n)
        .map(|i| create_voter(VoterId::from(i as u64), &sampler, cfg, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::entities::{Employment, Ethnicity, FamilyStatus, Gender, Region, Religion};

    fn record(age: u32, income: Income, education: Education) -> Demographics {
        Demographics {
            age,
            gender: Gender::Male,
            region: Region::Urban,
            income,
            education,
            employment_status: Employment::Employed,
            family_status: FamilyStatus::Single,
            ethnicity_immigration: Ethnicity::Native,
            religion: Religion::Religious,
        }
    }

    #[test]
    fn likelihood_formula() {
        // 0.5 + 0.25 + 0 + 0.1
        let l = likelihood_to_vote(&record(25, Income::Middle, Education::Bachelor));
        assert!((l - 0.85).abs() < 1e-12);
        // 0.5 + 0.2 + 0 + 0
        let l = likelihood_to_vote(&record(20, Income::Low, Education::NoDiploma));
        assert!((l - 0.7).abs() < 1e-12);
        // capped
        let l = likelihood_to_vote(&record(70, Income::High, Education::Phd));
        assert_eq!(l, MAX_LIKELIHOOD);
    }

    #[test]
    fn generated_voters_are_well_formed() {
        let cfg = SimConfig::default();
        let mut rng = SimRng::from_seed_u64(77);
        let voters = generate_voters(200, &cfg, &mut rng).unwrap();
        assert_eq!(voters.len(), 200);
        for v in &voters {
            let total: f64 = v.issue_priorities.values().sum();
            assert!((total - 1.0).abs() < 1e-9);
            assert!((0.0..=1.0).contains(&v.party_loyalty));
            assert!((-1.0..=1.0).contains(&v.mood));
            assert!(v.likelihood_to_vote <= MAX_LIKELIHOOD);
            assert!(cfg.parties.contains(&v.preferred_party));
        }
        assert_eq!(voters[3].id, VoterId::from(3));
    }

    #[test]
    fn reproducible_under_seed() {
        let cfg = SimConfig::default();
        let a = generate_voters(20, &cfg, &mut SimRng::from_seed_u64(5)).unwrap();
        let b = generate_voters(20, &cfg, &mut SimRng::from_seed_u64(5)).unwrap();
        assert_eq!(a, b);
    }
}
