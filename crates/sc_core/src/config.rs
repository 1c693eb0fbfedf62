//! crates/sc_core/src/config.rs
//! Immutable demographic and party tables injected into the simulator.
//!
//! `SimConfig::default()` carries the built-in tables; tests and callers may
//! substitute any of them. Every table is checked by `validate()` before a
//! simulation draws from it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entities::{Education, Employment, Ethnicity, FamilyStatus, Gender, Income, Region, Religion};
use crate::errors::CoreError;

/// Weighted categories. Weights need not sum to 1.
pub type WeightTable<T> = Vec<(T, f64)>;

/// Empirical age-frequency table (ages 18..=85).
pub const AGE_FREQUENCIES: [(u32, u64); 68] = [
    (18, 416343 + 433377 + 395666 + 412560),
    (19, 395309 + 410714 + 375286 + 390002),
    (20, 385065 + 398993 + 370927 + 384532),
    (21, 372131 + 384384 + 357581 + 370258),
    (22, 370146 + 381869 + 362301 + 374177),
    (23, 360901 + 371731 + 356005 + 367951),
    (24, 347002 + 357849 + 346277 + 358614),
    (25, 345674 + 356195 + 345575 + 357966),
    (26, 362321 + 373660 + 363459 + 376224),
    (27, 366486 + 377772 + 372324 + 385366),
    (28, 373290 + 384835 + 383355 + 397080),
    (29, 374197 + 385034 + 391141 + 405038),
    (30, 379875 + 390899 + 395872 + 409842),
    (31, 381893 + 392786 + 399849 + 413955),
    (32, 387094 + 397979 + 407992 + 422167),
    (33, 387604 + 398786 + 406130 + 420790),
    (34, 385394 + 396435 + 403783 + 417815),
    (35, 380127 + 391214 + 400179 + 414133),
    (36, 405212 + 416777 + 423799 + 438390),
    (37, 409918 + 421707 + 427819 + 442482),
    (38, 415493 + 427643 + 433421 + 448307),
    (39, 393900 + 405581 + 409982 + 424441),
    (40, 387855 + 399149 + 400285 + 414208),
    (41, 392747 + 404816 + 399454 + 413671),
    (42, 378560 + 390441 + 389825 + 404350),
    (43, 391896 + 404346 + 398442 + 413722),
    (44, 413159 + 426173 + 419802 + 435157),
    (45, 435027 + 448213 + 444733 + 460384),
    (46, 445836 + 459886 + 453714 + 469527),
    (47, 443926 + 457822 + 450509 + 466462),
    (48, 435014 + 448697 + 442478 + 457896),
    (49, 427528 + 441572 + 437448 + 452879),
    (50, 420403 + 434971 + 434367 + 450472),
    (51, 418677 + 432749 + 431582 + 447421),
    (52, 427611 + 441979 + 441391 + 457665),
    (53, 428356 + 442828 + 443353 + 459310),
    (54, 430748 + 444960 + 448656 + 464153),
    (55, 424098 + 438142 + 444809 + 460412),
    (56, 408160 + 422099 + 429696 + 445047),
    (57, 408160 + 421161 + 430734 + 444896),
    (58, 403439 + 416331 + 430410 + 444709),
    (59, 398034 + 410415 + 429394 + 442263),
    (60, 388186 + 400042 + 420715 + 433635),
    (61, 384480 + 395817 + 418514 + 430912),
    (62, 379050 + 390345 + 415501 + 427893),
    (63, 371791 + 382395 + 412354 + 424094),
    (64, 370846 + 381146 + 410242 + 421875),
    (65, 361301 + 371165 + 402421 + 413428),
    (66, 365439 + 374781 + 407626 + 418007),
    (67, 356096 + 364694 + 398247 + 408050),
    (68, 366582 + 374817 + 412349 + 422019),
    (69, 356693 + 364312 + 404851 + 413673),
    (70, 354324 + 361485 + 400690 + 409072),
    (71, 343241 + 350179 + 393058 + 400876),
    (72, 320586 + 327085 + 371293 + 378561),
    (73, 236900 + 242793 + 279240 + 286325),
    (74, 228830 + 234112 + 272775 + 279055),
    (75, 219772 + 224687 + 263648 + 269401),
    (76, 199977 + 204674 + 242996 + 249057),
    (77, 173672 + 177799 + 216640 + 221914),
    (78, 175051 + 179151 + 225878 + 231318),
    (79, 178422 + 182015 + 234807 + 239598),
    (80, 168374 + 171854 + 227972 + 232663),
    (81, 157797 + 160969 + 221619 + 226088),
    (82, 150275 + 153145 + 218414 + 222853),
    (83, 136476 + 139041 + 209883 + 213902),
    (84, 129598 + 131872 + 207254 + 210980),
    (85, 114789 + 116712 + 192418 + 195596),
];

/// Default issue vocabulary, in canonical order.
pub const DEFAULT_ISSUES: [&str; 20] = [
    "economy",
    "environment",
    "healthcare",
    "education",
    "taxes",
    "social_welfare",
    "agriculture",
    "public_transport",
    "defense",
    "gender_equality",
    "pensions",
    "climate_change",
    "housing",
    "immigration",
    "crime_safety",
    "technology_innovation",
    "minimum_wage",
    "business_regulation",
    "jobs",
    "infrastructure",
];

/// Default party rotation for generated candidates.
pub const DEFAULT_PARTIES: [&str; 4] = ["Green", "Conservative", "Liberal", "Independent"];

/// How a voter's income bracket is drawn.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "model", rename_all = "snake_case"))]
pub enum IncomeModel {
    /// Right-skewed gamma score bucketed at two thresholds.
    Gamma { shape: f64, scale: f64, low_below: f64, middle_below: f64 },
    /// Plain weighted categories.
    Weighted { table: WeightTable<Income> },
}

impl IncomeModel {
    /// Bracket for a gamma score.
    pub fn bracket(low_below: f64, middle_below: f64, score: f64) -> Income {
        if score < low_below {
            Income::Low
        } else if score < middle_below {
            Income::Middle
        } else {
            Income::High
        }
    }
}

/// Education tables conditioned on age band.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EducationBands {
    pub under_22: WeightTable<Education>,
    pub under_25: WeightTable<Education>,
    pub under_30: WeightTable<Education>,
    pub under_40: WeightTable<Education>,
    pub under_60: WeightTable<Education>,
    pub senior: WeightTable<Education>,
}

impl EducationBands {
    pub fn for_age(&self, age: u32) -> &WeightTable<Education> {
        match age {
            0..=21 => &self.under_22,
            22..=24 => &self.under_25,
            25..=29 => &self.under_30,
            30..=39 => &self.under_40,
            40..=59 => &self.under_60,
            _ => &self.senior,
        }
    }

    fn tables(&self) -> [(&'static str, &WeightTable<Education>); 6] {
        [
            ("education.under_22", &self.under_22),
            ("education.under_25", &self.under_25),
            ("education.under_30", &self.under_30),
            ("education.under_40", &self.under_40),
            ("education.under_60", &self.under_60),
            ("education.senior", &self.senior),
        ]
    }
}

/// Base education mix reweighted per band and renormalised.
fn reweighted(mult: [f64; 5]) -> WeightTable<Education> {
    let base = [0.1, 0.4, 0.3, 0.15, 0.05];
    let raw: Vec<f64> = base.iter().zip(mult).map(|(b, m)| b * m).collect();
    let total: f64 = raw.iter().sum();
    Education::ALL.iter().copied().zip(raw.into_iter().map(|w| w / total)).collect()
}

impl Default for EducationBands {
    fn default() -> Self {
        use Education::*;
        Self {
            under_22: vec![(HighSchool, 0.7), (Bachelor, 0.3)],
            under_25: vec![(HighSchool, 0.3), (Bachelor, 0.6), (Master, 0.1)],
            under_30: vec![(HighSchool, 0.2), (Bachelor, 0.4), (Master, 0.35), (Phd, 0.05)],
            under_40: vec![(HighSchool, 0.2), (Bachelor, 0.4), (Master, 0.3), (Phd, 0.1)],
            under_60: reweighted([0.7, 0.9, 1.1, 1.2, 1.3]),
            senior: reweighted([2.0, 1.3, 0.7, 0.5, 0.3]),
        }
    }
}

/// All tables the sampler and generators read.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    pub age_table: Vec<(u32, u64)>,
    pub gender: WeightTable<Gender>,
    pub region: WeightTable<Region>,
    pub income: IncomeModel,
    pub education: EducationBands,
    pub employment: WeightTable<Employment>,
    pub family_status: WeightTable<FamilyStatus>,
    pub ethnicity: WeightTable<Ethnicity>,
    pub religion: WeightTable<Religion>,
    pub issues: Vec<String>,
    pub party_leans: Vec<(String, f64)>,
    pub parties: Vec<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            age_table: AGE_FREQUENCIES.to_vec(),
            gender: vec![(Gender::Male, 0.49), (Gender::Female, 0.51)],
            region: vec![(Region::Urban, 0.8), (Region::Suburban, 0.15), (Region::Rural, 0.05)],
            income: IncomeModel::Gamma { shape: 2.0, scale: 0.2, low_below: 0.3, middle_below: 0.7 },
            education: EducationBands::default(),
            employment: vec![
                (Employment::Employed, 0.6),
                (Employment::Unemployed, 0.1),
                (Employment::SelfEmployed, 0.1),
                (Employment::Retired, 0.2),
            ],
            family_status: vec![
                (FamilyStatus::Single, 0.3),
                (FamilyStatus::WithChildren, 0.4),
                (FamilyStatus::Retired, 0.3),
            ],
            ethnicity: vec![(Ethnicity::Native, 0.8), (Ethnicity::Immigrant, 0.2)],
            religion: vec![(Religion::Religious, 0.6), (Religion::NonReligious, 0.4)],
            issues: DEFAULT_ISSUES.iter().map(|s| s.to_string()).collect(),
            party_leans: vec![
                ("Green".to_string(), -0.8),
                ("Liberal".to_string(), -0.3),
                ("Conservative".to_string(), 0.7),
                ("Independent".to_string(), 0.0),
            ],
            parties: DEFAULT_PARTIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Weights must be finite, non-negative, and sum to a positive total.
fn check_weights<I: IntoIterator<Item = f64>>(name: &'static str, weights: I) -> Result<(), CoreError> {
    let mut total = 0.0;
    let mut any = false;
    for w in weights {
        if !w.is_finite() || w < 0.0 {
            return Err(CoreError::InvalidWeight(name));
        }
        total += w;
        any = true;
    }
    if !any || total <= 0.0 {
        return Err(CoreError::EmptyDistribution(name));
    }
    Ok(())
}

fn check_table<T>(name: &'static str, table: &WeightTable<T>) -> Result<(), CoreError> {
    check_weights(name, table.iter().map(|(_, w)| *w))
}

impl SimConfig {
    /// Reject empty or degenerate tables before any draw is made.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_weights("age_table", self.age_table.iter().map(|(_, n)| *n as f64))?;
        check_table("gender", &self.gender)?;
        check_table("region", &self.region)?;
        match &self.income {
            IncomeModel::Gamma { shape, scale, low_below, middle_below } => {
                let ok = [*shape, *scale].iter().all(|v| v.is_finite() && *v > 0.0)
                    && low_below.is_finite()
                    && middle_below.is_finite()
                    && low_below <= middle_below;
                if !ok {
                    return Err(CoreError::InvalidWeight("income"));
                }
            }
            IncomeModel::Weighted { table } => check_table("income", table)?,
        }
        for (name, table) in self.education.tables() {
            check_table(name, table)?;
        }
        check_table("employment", &self.employment)?;
        check_table("family_status", &self.family_status)?;
        check_table("ethnicity", &self.ethnicity)?;
        check_table("religion", &self.religion)?;
        if self.issues.is_empty() {
            return Err(CoreError::EmptyDistribution("issues"));
        }
        if self.parties.is_empty() {
            return Err(CoreError::EmptyDistribution("parties"));
        }
        Ok(())
    }

    /// Declared lean for a party label; unknown parties are centrist (0.0).
    pub fn party_lean(&self, party: &str) -> f64 {
        self.party_leans
            .iter()
            .find(|(p, _)| p == party)
            .map(|(_, lean)| *lean)
            .unwrap_or(0.0)
    }
}
