//! Determinism utilities: explicit tie-break order and order-stable selection.
//!
//! Every "max wins" / "min wins" rule in the engine resolves ties by the
//! candidate order supplied by the caller (insertion order). Nothing here
//! depends on hash-map iteration order.

use core::cmp::Ordering;
use std::collections::BTreeMap;

use crate::ids::CandidateId;

/* -------------------------------------------------------------------------- */
/*                               Stable Ordering                              */
/* -------------------------------------------------------------------------- */

/// Provide a **total**, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

impl StableOrd for CandidateId {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

/// Position lookup over the caller's candidate list.
#[derive(Debug, Clone)]
pub struct CandidateOrder<'a> {
    ids: &'a [CandidateId],
    index: BTreeMap<&'a CandidateId, usize>,
}

impl<'a> CandidateOrder<'a> {
    /// Build from the caller's candidate list. Duplicate ids keep their first
    /// position.
    pub fn new(ids: &'a [CandidateId]) -> Self {
        let mut index = BTreeMap::new();
        for (i, id) in ids.iter().enumerate() {
            index.entry(id).or_insert(i);
        }
        Self { ids, index }
    }

    #[inline]
    pub fn position(&self, id: &CandidateId) -> Option<usize> {
        self.index.get(id).copied()
    }

    #[inline]
    pub fn ids(&self) -> &'a [CandidateId] {
        self.ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Compare two candidates by caller order; unknown ids sort last, then by id.
    pub fn cmp(&self, a: &CandidateId, b: &CandidateId) -> Ordering {
        match (self.position(a), self.position(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.stable_cmp(b),
        }
    }
}

/* -------------------------------------------------------------------------- */
/*                          First-seen argmax / argmin                         */
/* -------------------------------------------------------------------------- */

/// Index of the first maximal key. A later key replaces the incumbent only if
/// strictly greater, so ties resolve to the earliest position. `NaN` never wins.
pub fn argmax_first<K: PartialOrd + Copy>(keys: &[K]) -> Option<usize> {
    let mut best: Option<(usize, K)> = None;
    for (i, &k) in keys.iter().enumerate() {
        if k.partial_cmp(&k).is_none() {
            continue;
        }
        match best {
            Some((_, b)) if k <= b => {}
            _ => best = Some((i, k)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the first minimal key (earliest position on ties).
pub fn argmin_first<K: PartialOrd + Copy>(keys: &[K]) -> Option<usize> {
    let mut best: Option<(usize, K)> = None;
    for (i, &k) in keys.iter().enumerate() {
        if k.partial_cmp(&k).is_none() {
            continue;
        }
        match best {
            Some((_, b)) if k >= b => {}
            _ => best = Some((i, k)),
        }
    }
    best.map(|(i, _)| i)
}

/// Stable ranking of indices by descending key; equal keys keep input order.
pub fn indices_by_desc<K: PartialOrd + Copy>(keys: &[K]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..keys.len()).collect();
    idx.sort_by(|&a, &b| keys[b].partial_cmp(&keys[a]).unwrap_or(Ordering::Equal));
    idx
}

/* -------------------------------------------------------------------------- */
/*                          Canonical map materialization                      */
/* -------------------------------------------------------------------------- */

/// Build a key-ordered `BTreeMap` from an iterator of `(K, V)`.
#[inline]
pub fn btreemap_from_iter_kv<K: Ord, V, I: IntoIterator<Item = (K, V)>>(it: I) -> BTreeMap<K, V> {
    it.into_iter().collect()
}
