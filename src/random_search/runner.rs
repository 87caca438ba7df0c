//! Random-restart sampling loop.

use super::config::RandomSearchConfig;
use crate::error::{check_feasible, PackingError};
use crate::packing::{decode_unchecked, improve, Packing};
use crate::random::create_rng;
use rand::seq::SliceRandom;
use std::time::{Duration, Instant};

/// Result of a random-restart run.
#[derive(Debug, Clone)]
pub struct RandomSearchResult {
    /// The best packing sampled.
    pub best: Packing,

    /// Bins used by `best`.
    pub bin_count: usize,

    /// Samples taken.
    pub iterations: usize,

    /// Sample index at which `best` was found.
    pub best_iteration: usize,

    /// Whether the time limit cut the run short.
    pub time_limited: bool,

    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Shuffles, packs with one fixed heuristic, optionally merges, and keeps
/// the best packing over all samples.
pub struct RandomSearchRunner;

impl RandomSearchRunner {
    /// Runs the baseline.
    ///
    /// The first sample always runs, so a non-empty instance always yields
    /// a packing.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_binpack::random_search::{RandomSearchConfig, RandomSearchRunner};
    ///
    /// let config = RandomSearchConfig::default().with_iterations(50).with_seed(0);
    /// let result = RandomSearchRunner::run(&[4, 8, 1, 4, 2, 1], 10, &config).unwrap();
    /// assert!(result.bin_count <= 3);
    /// ```
    pub fn run(
        items: &[u64],
        capacity: u64,
        config: &RandomSearchConfig,
    ) -> Result<RandomSearchResult, PackingError> {
        config.validate().map_err(PackingError::InvalidConfig)?;
        check_feasible(items, capacity)?;

        let start = Instant::now();
        let mut rng = create_rng(config.seed);
        let mut order = items.to_vec();
        let mut best: Option<Packing> = None;
        let mut best_iteration = 0;
        let mut iterations = 0;
        let mut time_limited = false;

        while iterations < config.iterations {
            if iterations > 0 && config.time_limit.is_some_and(|limit| start.elapsed() > limit) {
                log::warn!(
                    "random search hit its {:?} time limit after {} samples",
                    config.time_limit.unwrap_or_default(),
                    iterations
                );
                time_limited = true;
                break;
            }

            order.shuffle(&mut rng);
            let mut packing = decode_unchecked(&order, capacity, config.decoder);
            if config.local_search_max_rounds > 0 {
                packing = improve(packing, capacity, config.local_search_max_rounds);
            }

            if best
                .as_ref()
                .is_none_or(|b| packing.bin_count() < b.bin_count())
            {
                best = Some(packing);
                best_iteration = iterations;
            }
            iterations += 1;
        }

        let best = best.unwrap_or_default();
        Ok(RandomSearchResult {
            bin_count: best.bin_count(),
            best,
            iterations,
            best_iteration,
            time_limited,
            elapsed: start.elapsed(),
        })
    }
}
