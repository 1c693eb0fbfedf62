//! Two-dimensional spatial electorate.
//!
//! Voter positions drift with age along the diagonal of a [-5, 5]² plane;
//! candidates are placed uniformly and each voter is assigned to the nearest
//! one.

use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{SimError, SimResult};

pub const AGE_MIN: f64 = 18.0;
pub const AGE_MAX: f64 = 85.0;
pub const AGE_SD: f64 = 15.0;
pub const BOUND: f64 = 5.0;
const JITTER: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

fn normal(mean: f64, sd: f64) -> SimResult<Normal> {
    Normal::new(mean, sd).map_err(|e| SimError::Distribution {
        table: "normal".to_string(),
        reason: e.to_string(),
    })
}

/// `n` ages from a normal around `avg_age` (sd 15) truncated to [18, 85],
/// drawn by inverse CDF so the cost does not depend on how much mass the
/// window holds.
pub fn sample_ages<R: Rng + ?Sized>(avg_age: f64, n: usize, rng: &mut R) -> SimResult<Vec<f64>> {
    let std = normal(0.0, 1.0)?;
    let lo = std.cdf((AGE_MIN - avg_age) / AGE_SD);
    let hi = std.cdf((AGE_MAX - avg_age) / AGE_SD);
    if !(hi > lo) {
        return Err(SimError::Distribution {
            table: "ages".to_string(),
            reason: format!("average age {avg_age} leaves no mass in [{AGE_MIN}, {AGE_MAX}]"),
        });
    }
    Ok((0..n)
        .map(|_| {
            let u = rng.gen_range(lo..hi);
            (avg_age + AGE_SD * std.inverse_cdf(u)).clamp(AGE_MIN, AGE_MAX)
        })
        .collect())
}

/// Position for one voter: both axes `N(−4 + 8·t, 1) + U(−0.5, 0.5)` with
/// `t = (age − 18) / 67`, clamped to [-5, 5].
pub fn coordinates<R: Rng + ?Sized>(age: f64, rng: &mut R) -> SimResult<Point> {
    if !(AGE_MIN..=AGE_MAX).contains(&age) {
        return Err(SimError::AgeOutOfRange(age));
    }
    let t = (age - AGE_MIN) / (AGE_MAX - AGE_MIN);
    let dist = normal(-4.0 + 8.0 * t, 1.0)?;
    let mut x = dist.sample(rng);
    let mut y = dist.sample(rng);
    x += rng.gen_range(-JITTER..JITTER);
    y += rng.gen_range(-JITTER..JITTER);
    Ok(Point { x: x.clamp(-BOUND, BOUND), y: y.clamp(-BOUND, BOUND) })
}

/// `n` voter positions around an average age.
pub fn simulate_population<R: Rng + ?Sized>(n: usize, avg_age: f64, rng: &mut R) -> SimResult<Vec<Point>> {
    sample_ages(avg_age, n, rng)?
        .into_iter()
        .map(|age| coordinates(age, rng))
        .collect()
}

/// `n` candidate positions, uniform over the plane.
pub fn candidate_points<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Point> {
    (0..n)
        .map(|_| Point { x: rng.gen_range(-BOUND..BOUND), y: rng.gen_range(-BOUND..BOUND) })
        .collect()
}

/// Index of the nearest candidate for each voter (first on equal distance).
pub fn nearest_candidate(voters: &[Point], candidates: &[Point]) -> SimResult<Vec<usize>> {
    if candidates.is_empty() {
        return Err(SimError::NoCandidates);
    }
    Ok(voters
        .iter()
        .map(|v| {
            let dists: Vec<f64> = candidates.iter().map(|c| v.distance(c)).collect();
            sc_core::determinism::argmin_first(&dists).unwrap_or(0)
        })
        .collect())
}
