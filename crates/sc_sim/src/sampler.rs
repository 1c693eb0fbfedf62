//! Demographic sampler: one fully populated `Demographics` per draw.
//!
//! Tables are validated and compiled into `WeightedIndex` samplers once, at
//! construction; drawing afterwards cannot fail.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use statrs::distribution::Gamma;

use sc_core::config::{IncomeModel, WeightTable};
use sc_core::entities::{
    Demographics, Education, Employment, Ethnicity, FamilyStatus, Gender, Income, Region, Religion,
};
use sc_core::SimConfig;

use crate::{SimError, SimResult};

/// A weighted categorical table ready for sampling.
#[derive(Debug, Clone)]
pub(crate) struct Compiled<T> {
    values: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Clone> Compiled<T> {
    pub(crate) fn new<'a, I>(table: &str, entries: I) -> SimResult<Self>
    where
        T: 'a,
        I: IntoIterator<Item = (&'a T, f64)>,
    {
        let (values, weights): (Vec<T>, Vec<f64>) =
            entries.into_iter().map(|(v, w)| (v.clone(), w)).unzip();
        let index = WeightedIndex::new(&weights).map_err(|e| SimError::Distribution {
            table: table.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { values, index })
    }

    pub(crate) fn from_table(table: &str, entries: &WeightTable<T>) -> SimResult<Self> {
        Self::new(table, entries.iter().map(|(v, w)| (v, *w)))
    }

    #[inline]
    pub(crate) fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.values[self.index.sample(rng)].clone()
    }
}

#[derive(Debug, Clone)]
enum IncomeDraw {
    Gamma { dist: Gamma, low_below: f64, middle_below: f64 },
    Table(Compiled<Income>),
}

/// Compiled sampler over a validated `SimConfig`.
#[derive(Debug, Clone)]
pub struct DemographicSampler {
    age: Compiled<u32>,
    gender: Compiled<Gender>,
    region: Compiled<Region>,
    income: IncomeDraw,
    education: [Compiled<Education>; 6],
    employment: Compiled<Employment>,
    family_status: Compiled<FamilyStatus>,
    ethnicity: Compiled<Ethnicity>,
    religion: Compiled<Religion>,
}

impl DemographicSampler {
    /// Validate and compile every table. An empty or degenerate table is a
    /// configuration error.
    pub fn new(cfg: &SimConfig) -> SimResult<Self> {
        cfg.validate()?;
        let ages: Vec<(u32, f64)> = cfg.age_table.iter().map(|&(a, n)| (a, n as f64)).collect();

        let income = match &cfg.income {
            IncomeModel::Gamma { shape, scale, low_below, middle_below } => IncomeDraw::Gamma {
                dist: Gamma::new(*shape, 1.0 / *scale).map_err(|e| SimError::Distribution {
                    table: "income".to_string(),
                    reason: e.to_string(),
                })?,
                low_below: *low_below,
                middle_below: *middle_below,
            },
            IncomeModel::Weighted { table } => IncomeDraw::Table(Compiled::from_table("income", table)?),
        };

        let bands = &cfg.education;
        Ok(Self {
            age: Compiled::from_table("age_table", &ages)?,
            gender: Compiled::from_table("gender", &cfg.gender)?,
            region: Compiled::from_table("region", &cfg.region)?,
            income,
            education: [
                Compiled::from_table("education.under_22", &bands.under_22)?,
                Compiled::from_table("education.under_25", &bands.under_25)?,
                Compiled::from_table("education.under_30", &bands.under_30)?,
                Compiled::from_table("education.under_40", &bands.under_40)?,
                Compiled::from_table("education.under_60", &bands.under_60)?,
                Compiled::from_table("education.senior", &bands.senior)?,
            ],
            employment: Compiled::from_table("employment", &cfg.employment)?,
            family_status: Compiled::from_table("family_status", &cfg.family_status)?,
            ethnicity: Compiled::from_table("ethnicity", &cfg.ethnicity)?,
            religion: Compiled::from_table("religion", &cfg.religion)?,
        })
    }

    pub fn sample_age<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.age.draw(rng)
    }

    pub fn sample_income<R: Rng + ?Sized>(&self, rng: &mut R) -> Income {
        match &self.income {
            IncomeDraw::Gamma { dist, low_below, middle_below } => {
                IncomeModel::bracket(*low_below, *middle_below, dist.sample(rng))
            }
            IncomeDraw::Table(t) => t.draw(rng),
        }
    }

    /// Education conditioned on the age band.
    pub fn sample_education<R: Rng + ?Sized>(&self, age: u32, rng: &mut R) -> Education {
        let band = match age {
            0..=21 => 0,
            22..=24 => 1,
            25..=29 => 2,
            30..=39 => 3,
            40..=59 => 4,
            _ => 5,
        };
        self.education[band].draw(rng)
    }

    /// Draw one demographic record. Attributes are independent except
    /// education, which depends on age.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Demographics {
        let age = self.sample_age(rng);
        let gender = self.gender.draw(rng);
        let region = self.region.draw(rng);
        let income = self.sample_income(rng);
        let education = self.sample_education(age, rng);
        Demographics {
            age,
            gender,
            region,
            income,
            education,
            employment_status: self.employment.draw(rng),
            family_status: self.family_status.draw(rng),
            religion: self.religion.draw(rng),
            ethnicity_immigration: self.ethnicity.draw(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::{CoreError, SimRng};

    #[test]
    fn same_seed_same_record() {
        let sampler = DemographicSampler::new(&SimConfig::default()).unwrap();
        let mut a = SimRng::from_seed_u64(9);
        let mut b = SimRng::from_seed_u64(9);
        for _ in 0..50 {
            assert_eq!(sampler.sample(&mut a), sampler.sample(&mut b));
        }
    }

    #[test]
    fn ages_stay_in_table() {
        let sampler = DemographicSampler::new(&SimConfig::default()).unwrap();
        let mut rng = SimRng::from_seed_u64(1);
        for _ in 0..500 {
            let d = sampler.sample(&mut rng);
            assert!((18..=85).contains(&d.age));
        }
    }

    #[test]
    fn young_voters_have_no_advanced_degree() {
        let sampler = DemographicSampler::new(&SimConfig::default()).unwrap();
        let mut rng = SimRng::from_seed_u64(3);
        for _ in 0..500 {
            let e = sampler.sample_education(19, &mut rng);
            assert!(matches!(e, Education::HighSchool | Education::Bachelor));
        }
    }

    #[test]
    fn substituted_table_is_honoured() {
        let mut cfg = SimConfig::default();
        cfg.region = vec![(Region::Rural, 1.0)];
        cfg.income = IncomeModel::Weighted { table: vec![(Income::High, 1.0)] };
        let sampler = DemographicSampler::new(&cfg).unwrap();
        let mut rng = SimRng::from_seed_u64(5);
        for _ in 0..100 {
            let d = sampler.sample(&mut rng);
            assert_eq!(d.region, Region::Rural);
            assert_eq!(d.income, Income::High);
        }
    }

    #[test]
    fn gamma_income_mix_is_plausible() {
        let sampler = DemographicSampler::new(&SimConfig::default()).unwrap();
        let mut rng = SimRng::from_seed_u64(11);
        let n = 20_000;
        let low = (0..n)
            .filter(|_| sampler.sample_income(&mut rng) == Income::Low)
            .count() as f64
            / n as f64;
        // P(Gamma(2, 0.2) < 0.3) ≈ 0.442
        assert!((low - 0.442).abs() < 0.03, "low share {low}");
    }

    #[test]
    fn empty_table_rejected() {
        let mut cfg = SimConfig::default();
        cfg.employment.clear();
        match DemographicSampler::new(&cfg) {
            Err(SimError::Config(CoreError::EmptyDistribution("employment"))) => {}
            other => panic!("unexpected {other:?}"),
        }
    }
}
