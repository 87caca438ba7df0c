//! Epsilon-greedy heuristic selection.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Picks a heuristic index from `scores`.
///
/// With probability `epsilon` the index is uniform over all heuristics.
/// Otherwise it is the arg-max of `scores`, with ties broken uniformly at
/// random so equally good heuristics later in the list are not starved.
///
/// # Panics
///
/// Panics if `scores` is empty.
pub fn select<R: Rng>(scores: &[f64], epsilon: f64, rng: &mut R) -> usize {
    assert!(!scores.is_empty(), "at least one heuristic score required");

    if rng.random_range(0.0..1.0) < epsilon {
        return rng.random_range(0..scores.len());
    }

    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let best: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|&(_, &s)| s == max)
        .map(|(i, _)| i)
        .collect();
    best.choose(rng).copied().unwrap_or(0)
}

/// Per-heuristic credit.
///
/// `restart` drives selection and is zeroed at every restart; `total`
/// accumulates across restarts for reporting only.
#[derive(Debug, Clone)]
pub struct HeuristicScores {
    restart: Vec<f64>,
    total: Vec<f64>,
}

impl HeuristicScores {
    /// All-zero scores for `count` heuristics.
    pub fn new(count: usize) -> Self {
        Self {
            restart: vec![0.0; count],
            total: vec![0.0; count],
        }
    }

    /// Zeroes the per-restart scores. Totals are kept.
    pub fn reset(&mut self) {
        self.restart.fill(0.0);
    }

    /// Adds a non-negative `amount` to heuristic `index`.
    pub fn credit(&mut self, index: usize, amount: f64) {
        let amount = amount.max(0.0);
        self.restart[index] += amount;
        self.total[index] += amount;
    }

    /// Epsilon-greedy choice over the per-restart scores.
    pub fn choose<R: Rng>(&self, epsilon: f64, rng: &mut R) -> usize {
        select(&self.restart, epsilon, rng)
    }

    pub fn restart_scores(&self) -> &[f64] {
        &self.restart
    }

    pub fn totals(&self) -> &[f64] {
        &self.total
    }

    /// Adds another accumulator's totals into this one.
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub(crate) fn merge_totals(&mut self, other: &HeuristicScores) {
        for (t, o) in self.total.iter_mut().zip(&other.total) {
            *t += o;
        }
    }
}
