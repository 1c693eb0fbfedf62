//! Issue priorities and political lean derived from demographics.
//!
//! Every issue starts at a neutral 0.5 and lean starts at 1.0 (above 1.0 is
//! conservative, below is progressive). Each demographic value then applies
//! bounded-uniform adjustments: `set` replaces a priority, `scale` multiplies
//! it, `lean` multiplies the political lean. Issues outside the configured
//! vocabulary are left untouched.

use std::collections::BTreeMap;

use rand::Rng;

use sc_core::entities::{
    Demographics, Education, Employment, Ethnicity, FamilyStatus, Gender, Income, Region, Religion,
};

/// Neutral starting priority for every issue.
pub const NEUTRAL_PRIORITY: f64 = 0.5;

struct Stance<'r, R: Rng + ?Sized> {
    priorities: BTreeMap<String, f64>,
    lean: f64,
    rng: &'r mut R,
}

impl<'r, R: Rng + ?Sized> Stance<'r, R> {
    fn set(&mut self, issue: &str, lo: f64, hi: f64) {
        if let Some(p) = self.priorities.get_mut(issue) {
            *p = self.rng.gen_range(lo..=hi);
        }
    }

    fn scale(&mut self, issue: &str, lo: f64, hi: f64) {
        if let Some(p) = self.priorities.get_mut(issue) {
            *p *= self.rng.gen_range(lo..=hi);
        }
    }

    fn lean(&mut self, lo: f64, hi: f64) {
        self.lean *= self.rng.gen_range(lo..=hi);
    }
}

/// Raw (unnormalised) priorities and political lean for one voter.
pub fn assign_issue_priorities<R: Rng + ?Sized>(
    d: &Demographics,
    issues: &[String],
    rng: &mut R,
) -> (BTreeMap<String, f64>, f64) {
    let mut s = Stance {
        priorities: issues.iter().map(|i| (i.clone(), NEUTRAL_PRIORITY)).collect(),
        lean: 1.0,
        rng,
    };

    // Age band
    if d.age < 30 {
        s.set("environment", 0.7, 1.0);
        s.set("education", 0.6, 0.9);
        s.set("climate_change", 0.6, 0.9);
        s.set("gender_equality", 0.6, 0.9);
        s.set("public_transport", 0.5, 0.8);
        s.lean(0.8, 0.9);
    } else if d.age > 60 {
        s.set("healthcare", 0.7, 1.0);
        s.set("pensions", 0.6, 0.9);
        s.lean(1.1, 1.2);
    } else {
        s.set("economy", 0.6, 0.9);
        s.set("jobs", 0.5, 0.8);
    }

    match d.gender {
        Gender::Female => {
            s.scale("healthcare", 1.1, 1.3);
            s.scale("education", 1.1, 1.2);
            s.scale("gender_equality", 1.1, 1.3);
            s.scale("social_welfare", 1.0, 1.2);
            s.scale("crime_safety", 1.0, 1.2);
            s.lean(0.8, 0.95);
        }
        Gender::Male => {
            s.scale("economy", 1.1, 1.3);
            s.scale("defense", 1.1, 1.3);
            s.lean(1.05, 1.15);
        }
    }

    match d.region {
        Region::Urban => {
            s.set("public_transport", 0.7, 1.0);
            s.set("environment", 0.6, 0.9);
            s.set("housing", 0.6, 0.9);
            s.set("climate_change", 0.6, 0.9);
        }
        Region::Rural => {
            s.set("agriculture", 0.7, 1.0);
            s.set("infrastructure", 0.6, 0.9);
            s.set("defense", 0.6, 0.9);
        }
        Region::Suburban => {
            s.set("education", 0.7, 1.0);
            s.set("taxes", 0.5, 0.8);
            s.set("housing", 0.6, 0.9);
        }
    }

    match d.education {
        Education::NoDiploma | Education::HighSchool => {
            s.scale("social_welfare", 1.1, 1.4);
            s.scale("economy", 1.1, 1.3);
            if d.age > 50 {
                s.lean(1.05, 1.2);
            }
        }
        Education::Master | Education::Phd => {
            s.scale("environment", 1.1, 1.4);
            s.scale("education", 1.2, 1.5);
            s.set("technology_innovation", 0.7, 1.0);
            s.scale("climate_change", 1.1, 1.4);
            s.lean(0.8, 0.95);
        }
        Education::Bachelor => {}
    }

    match d.income {
        Income::Low => {
            s.set("social_welfare", 0.8, 1.0);
            s.set("minimum_wage", 0.7, 0.9);
            s.scale("healthcare", 1.1, 1.3);
            s.set("housing", 0.7, 1.0);
            s.lean(0.8, 0.95);
        }
        Income::High => {
            s.set("taxes", 0.7, 1.0);
            s.set("business_regulation", 0.5, 0.8);
            s.scale("economy", 1.1, 1.3);
            s.lean(1.05, 1.2);
        }
        Income::Middle => {}
    }

    match d.employment_status {
        Employment::Unemployed => {
            s.scale("social_welfare", 1.2, 1.5);
            s.set("jobs", 0.8, 1.0);
            s.set("minimum_wage", 0.8, 1.0);
            s.lean(0.8, 0.95);
        }
        Employment::Employed => {
            s.scale("economy", 1.1, 1.3);
            s.scale("taxes", 1.0, 1.2);
        }
        Employment::SelfEmployed | Employment::Retired => {}
    }

    match d.family_status {
        FamilyStatus::WithChildren => {
            s.scale("education", 1.2, 1.5);
            s.scale("healthcare", 1.1, 1.3);
            s.scale("housing", 1.1, 1.3);
        }
        FamilyStatus::Single => {
            s.scale("social_welfare", 1.0, 1.2);
            s.scale("taxes", 1.0, 1.2);
        }
        FamilyStatus::Retired => {}
    }

    match d.ethnicity_immigration {
        Ethnicity::Immigrant => {
            s.set("immigration", 0.8, 1.0);
            s.scale("social_welfare", 1.1, 1.3);
            s.scale("gender_equality", 1.1, 1.3);
            s.lean(0.8, 0.95);
        }
        Ethnicity::Native => {
            s.scale("defense", 1.0, 1.2);
            s.scale("immigration", 0.8, 1.0);
        }
    }

    match d.religion {
        Religion::Religious => {
            s.scale("gender_equality", 0.8, 1.0);
            s.scale("social_welfare", 1.0, 1.2);
            s.scale("education", 0.9, 1.1);
            s.lean(1.1, 1.2);
        }
        Religion::NonReligious => {
            s.scale("gender_equality", 1.1, 1.3);
            s.scale("climate_change", 1.0, 1.2);
            s.lean(0.8, 0.95);
        }
    }

    (s.priorities, s.lean)
}

/// Rescale priorities so they sum to 1. A zero total leaves the map as is.
pub fn normalize_priorities(priorities: &mut BTreeMap<String, f64>) {
    let total: f64 = priorities.values().sum();
    if total > 0.0 {
        for p in priorities.values_mut() {
            *p /= total;
        }
    }
}
