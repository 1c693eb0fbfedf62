// --------------------------------------------------------------------------------
// FILE: crates/sc_algo/src/tabulation/score.rs
// --------------------------------------------------------------------------------
//! Score-ballot evaluators (scale 0–5).
//!
//! Per-candidate statistics use only the ballots that score that candidate;
//! a candidate nobody scored cannot win and is left out of the diagnostics.
//! Bayesian regret is the exception: a missing score counts as 0 there, and
//! empty score cards are skipped.
//!
//! Winners are the first extreme in caller candidate order.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use log::warn;

use sc_core::ballots::ScoreCard;
use sc_core::determinism::{argmax_first, argmin_first, CandidateOrder};
use sc_core::ids::CandidateId;

use crate::{candidate_order, Diagnostics, MethodResult, TabError};

pub const MAX_SCORE: f64 = 5.0;
const BIN_WIDTH: f64 = 0.5;
const BINS: usize = 10;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeanMedian {
    pub mean: f64,
    pub median: f64,
    pub combined: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spread {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub weighted_score: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Regret {
    pub avg_utility: f64,
    pub avg_regret: f64,
}

/// Half-point histogram of one candidate's scores.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreHistogram {
    pub candidate: CandidateId,
    pub distribution: Vec<u64>,
    pub fractions: Vec<f64>,
    pub total: u64,
    /// Modal bin as `"lo-hi"`, e.g. `"4.5-5.0"`.
    pub mode_range: String,
}

/// Scores received by each candidate, in caller order.
fn per_candidate(cards: &[ScoreCard], order: &CandidateOrder<'_>) -> Vec<Vec<f64>> {
    let mut out = vec![Vec::new(); order.len()];
    for card in cards {
        for (id, &s) in card {
            if let Some(i) = order.position(id) {
                out[i].push(s);
            }
        }
    }
    out
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn median(xs: &[f64]) -> f64 {
    let mut v = xs.to_vec();
    v.sort_by(f64::total_cmp);
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        (v[mid - 1] + v[mid]) / 2.0
    } else {
        v[mid]
    }
}

/// Shared shape of the "statistic per scored candidate, max wins" methods.
fn by_statistic<T, F, K>(
    name: &str,
    cards: &[ScoreCard],
    candidates: &[CandidateId],
    stat: F,
    key: K,
    wrap: fn(BTreeMap<CandidateId, T>) -> Diagnostics,
) -> Result<MethodResult, TabError>
where
    F: Fn(&[f64]) -> T,
    K: Fn(&T) -> f64,
{
    let order = candidate_order(candidates)?;
    if cards.is_empty() {
        warn!("{name}: empty ballot set");
        return Ok(MethodResult::empty());
    }
    let scores = per_candidate(cards, &order);
    let stats: Vec<Option<T>> = scores.iter().map(|s| (!s.is_empty()).then(|| stat(s))).collect();
    let keys: Vec<f64> = stats.iter().map(|t| t.as_ref().map_or(f64::NAN, &key)).collect();
    let winner = argmax_first(&keys).map(|i| candidates[i].clone());
    let table = candidates
        .iter()
        .zip(stats)
        .filter_map(|(id, t)| t.map(|t| (id.clone(), t)))
        .collect();
    Ok(MethodResult { winner, diagnostics: wrap(table) })
}

/// Highest average score.
pub fn tabulate_simple_score(cards: &[ScoreCard], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    by_statistic("simple_score", cards, candidates, mean, |m: &f64| *m, Diagnostics::Scores)
}

/// Highest median score (mean of the middle pair on even counts).
pub fn tabulate_median_score(cards: &[ScoreCard], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    by_statistic("median_score", cards, candidates, median, |m: &f64| *m, Diagnostics::Scores)
}

/// Highest `0.5·mean + 0.5·median`.
pub fn tabulate_mean_median(cards: &[ScoreCard], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    by_statistic(
        "mean_median_hybrid",
        cards,
        candidates,
        |s| {
            let (mean, median) = (mean(s), median(s));
            MeanMedian { mean, median, combined: 0.5 * mean + 0.5 * median }
        },
        |m: &MeanMedian| m.combined,
        Diagnostics::MeanMedian,
    )
}

/// Highest `mean − 0.5·σ` with the population standard deviation.
pub fn tabulate_variance(cards: &[ScoreCard], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    by_statistic(
        "variance_based",
        cards,
        candidates,
        |s| {
            let m = mean(s);
            let variance = (s.iter().map(|x| x * x).sum::<f64>() / s.len() as f64 - m * m).max(0.0);
            let std_dev = variance.sqrt();
            Spread { mean: m, variance, std_dev, weighted_score: m - 0.5 * std_dev }
        },
        |s: &Spread| s.weighted_score,
        Diagnostics::Variance,
    )
}

/// Lowest average regret, where a ballot's regret for a candidate is
/// `(best score on the ballot − candidate's score) / 5`.
pub fn tabulate_bayesian_regret(cards: &[ScoreCard], candidates: &[CandidateId]) -> Result<MethodResult, TabError> {
    let order = candidate_order(candidates)?;
    if cards.is_empty() {
        warn!("bayesian_regret: empty ballot set");
        return Ok(MethodResult::empty());
    }
    let voting: Vec<&ScoreCard> = cards.iter().filter(|c| !c.is_empty()).collect();
    if voting.is_empty() {
        return Ok(MethodResult { winner: None, diagnostics: Diagnostics::Regret(BTreeMap::new()) });
    }

    let mut regret = vec![0.0f64; candidates.len()];
    for card in &voting {
        let best = card.values().copied().fold(f64::NEG_INFINITY, f64::max) / MAX_SCORE;
        for (i, id) in candidates.iter().enumerate() {
            regret[i] += best - card.get(id).copied().unwrap_or(0.0) / MAX_SCORE;
        }
    }
    let avg_regret: Vec<f64> = regret.iter().map(|r| r / voting.len() as f64).collect();
    let scores = per_candidate(cards, &order);
    let table = candidates
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let avg_utility = if scores[i].is_empty() { 0.0 } else { mean(&scores[i]) / MAX_SCORE };
            (id.clone(), Regret { avg_utility, avg_regret: avg_regret[i] })
        })
        .collect();
    Ok(MethodResult {
        winner: argmin_first(&avg_regret).map(|i| candidates[i].clone()),
        diagnostics: Diagnostics::Regret(table),
    })
}

/// Half-point bin of a score; 5.0 lands in the last bin, anything outside
/// [0, 5] in none.
fn bin(score: f64) -> Option<usize> {
    if !(0.0..=MAX_SCORE).contains(&score) {
        return None;
    }
    Some(((score / BIN_WIDTH) as usize).min(BINS - 1))
}

/// Histogram per scored candidate, sorted by descending total (stable over
/// candidate order). Diagnostics only: never names a winner.
pub fn tabulate_score_distribution(
    cards: &[ScoreCard],
    candidates: &[CandidateId],
) -> Result<MethodResult, TabError> {
    let order = candidate_order(candidates)?;
    if cards.is_empty() {
        warn!("score_distribution: empty ballot set");
        return Ok(MethodResult::empty());
    }
    let mut out: Vec<ScoreHistogram> = per_candidate(cards, &order)
        .into_iter()
        .zip(candidates)
        .filter(|(s, _)| !s.is_empty())
        .map(|(s, id)| {
            let mut distribution = vec![0u64; BINS];
            for b in s.into_iter().filter_map(bin) {
                distribution[b] += 1;
            }
            let total: u64 = distribution.iter().sum();
            let fractions = distribution
                .iter()
                .map(|&c| if total > 0 { c as f64 / total as f64 } else { 0.0 })
                .collect();
            let m = argmax_first(&distribution).unwrap_or(0);
            let lo = m as f64 * BIN_WIDTH;
            ScoreHistogram {
                candidate: id.clone(),
                distribution,
                fractions,
                total,
                mode_range: format!("{:.1}-{:.1}", lo, lo + BIN_WIDTH),
            }
        })
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total));
    Ok(MethodResult { winner: None, diagnostics: Diagnostics::Distribution(out) })
}

/// Averages per scored candidate; shared with STAR's first round.
pub(crate) fn averages(cards: &[ScoreCard], order: &CandidateOrder<'_>) -> Vec<Option<f64>> {
    per_candidate(cards, order)
        .iter()
        .map(|s| (!s.is_empty()).then(|| mean(s)))
        .collect()
}

/// Id-keyed averages, scored candidates only.
pub(crate) fn average_table(candidates: &[CandidateId], avgs: &[Option<f64>]) -> BTreeMap<CandidateId, f64> {
    candidates
        .iter()
        .zip(avgs)
        .filter_map(|(id, a)| a.map(|a| (id.clone(), a)))
        .collect()
}
