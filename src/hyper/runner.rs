//! Hyper-heuristic restart loop.
//!
//! # Algorithm
//!
//! 1. **Restart**: zero the per-restart heuristic scores; the restart's
//!    running best starts at the global best.
//! 2. **Search**: shuffle the item order, pick a heuristic
//!    (epsilon-greedy), decode, merge bins by local search.
//! 3. **Improved** (strictly fewer bins than the running best): adopt the
//!    packing, credit the heuristic with the bins it saved, go to 2.
//! 4. **Stalled**: end the restart and commit its best if it beats the
//!    global best.
//! 5. Repeat from 1 until the restart cap, the time budget, the lower
//!    bound or cancellation stops the search.

use super::config::HyperConfig;
use super::selector::HeuristicScores;
use crate::error::{check_feasible, PackingError};
use crate::packing::{decode_unchecked, improve, lower_bound, Packing};
use crate::random::create_rng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why the restart loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// `restart_cap` restarts ran.
    RestartCap,
    /// The wall-clock budget elapsed.
    TimeBudget,
    /// The best packing matches the L1 lower bound.
    LowerBound,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Result of a hyper-heuristic run.
#[derive(Debug, Clone)]
pub struct HyperResult {
    /// The best packing found across all restarts.
    pub best: Packing,

    /// Bins used by `best`.
    pub bin_count: usize,

    /// L1 lower bound of the instance.
    pub lower_bound: usize,

    /// Restarts executed.
    pub restarts: usize,

    /// Decode-and-improve cycles executed over all restarts.
    pub cycles: usize,

    /// Cycles that improved a restart's running best.
    pub improvements: usize,

    /// Why the search stopped.
    pub stop_reason: StopReason,

    /// Wall-clock time spent in the search.
    pub elapsed: Duration,

    /// Credit accumulated per heuristic over the whole run, in
    /// `decoder_variants` order. Diagnostic only.
    pub heuristic_scores: Vec<f64>,

    /// Global best bin count after each restart.
    pub best_history: Vec<usize>,
}

/// Best packing seen so far. The bin count only ever decreases.
#[derive(Debug, Default)]
struct SearchState {
    best: Option<Packing>,
}

impl SearchState {
    fn best_count(&self) -> Option<usize> {
        self.best.as_ref().map(Packing::bin_count)
    }

    /// Replaces the incumbent if `candidate` uses strictly fewer bins.
    fn offer(&mut self, candidate: Packing) -> bool {
        if self
            .best_count()
            .is_none_or(|count| candidate.bin_count() < count)
        {
            self.best = Some(candidate);
            true
        } else {
            false
        }
    }
}

/// Outcome of one restart.
struct RestartOutcome {
    best: Option<Packing>,
    cycles: usize,
    improvements: usize,
}

/// Read-only inputs shared by every restart of one search.
struct SearchContext<'a> {
    items: &'a [u64],
    sorted_items: Vec<u64>,
    capacity: u64,
    lower_bound: usize,
    config: &'a HyperConfig,
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl SearchContext<'_> {
    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn at_lower_bound(&self, count: Option<usize>) -> bool {
        self.config.stop_at_lower_bound && count.is_some_and(|c| c <= self.lower_bound)
    }

    /// Stop test run between restarts.
    fn stop_condition(&self, restarts: usize, best_count: Option<usize>) -> Option<StopReason> {
        if self.cancelled() {
            Some(StopReason::Cancelled)
        } else if self.at_lower_bound(best_count) {
            Some(StopReason::LowerBound)
        } else if restarts >= self.config.restart_cap {
            Some(StopReason::RestartCap)
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Some(StopReason::TimeBudget)
        } else {
            None
        }
    }

    /// Runs one restart against `comparator`, the global best bin count
    /// when the restart began.
    fn run_restart<R: Rng>(
        &self,
        comparator: Option<usize>,
        scores: &mut HeuristicScores,
        rng: &mut R,
    ) -> Result<RestartOutcome, PackingError> {
        let config = self.config;
        scores.reset();

        let mut running = comparator;
        let mut best = None;
        let mut cycles = 0usize;
        let mut improvements = 0usize;
        let mut order = self.items.to_vec();

        loop {
            // Only bail out once some packing exists for this search.
            if running.is_some() && self.cancelled() {
                break;
            }

            let index = scores.choose(config.epsilon, rng);
            let kind = config.decoder_variants[index];
            order.shuffle(rng);

            let packing = decode_unchecked(&order, self.capacity, kind);
            let packing = improve(packing, self.capacity, config.local_search_max_rounds);
            if config.verify_invariants {
                packing.verify_sorted(&self.sorted_items, self.capacity)?;
            }
            cycles += 1;

            let count = packing.bin_count();
            if running.is_some_and(|r| count >= r) {
                break;
            }

            // One bin per item bounds every packing from above.
            let baseline = running.unwrap_or(self.items.len());
            scores.credit(index, baseline.saturating_sub(count) as f64);
            running = Some(count);
            best = Some(packing);
            improvements += 1;

            if self.at_lower_bound(running) {
                break;
            }
        }

        Ok(RestartOutcome {
            best,
            cycles,
            improvements,
        })
    }
}

/// Executes the adaptive hyper-heuristic.
///
/// # Usage
///
/// ```
/// use u_binpack::hyper::{HyperConfig, HyperRunner};
///
/// let items = [4, 8, 1, 4, 2, 1];
/// let config = HyperConfig::default().with_seed(42);
/// let result = HyperRunner::run(&items, 10, &config).unwrap();
/// assert_eq!(result.bin_count, 2);
/// ```
pub struct HyperRunner;

impl HyperRunner {
    /// Runs the search.
    ///
    /// # Errors
    ///
    /// - [`PackingError::InvalidConfig`] if `config.validate()` fails.
    /// - [`PackingError::InfeasibleInstance`] if an item exceeds capacity.
    /// - [`PackingError::InvalidCapacity`] if capacity is zero.
    /// - [`PackingError::ConservationViolation`] or
    ///   [`PackingError::CapacityViolation`] if a produced packing breaks an
    ///   invariant (only when `verify_invariants` is set).
    pub fn run(
        items: &[u64],
        capacity: u64,
        config: &HyperConfig,
    ) -> Result<HyperResult, PackingError> {
        Self::run_with_cancel(items, capacity, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// Cancellation is polled between cycles once a first packing exists,
    /// and between restarts. The best packing found so far is returned.
    pub fn run_with_cancel(
        items: &[u64],
        capacity: u64,
        config: &HyperConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<HyperResult, PackingError> {
        config.validate().map_err(PackingError::InvalidConfig)?;
        check_feasible(items, capacity)?;

        let start = Instant::now();
        let mut sorted_items = items.to_vec();
        sorted_items.sort_unstable();

        let ctx = SearchContext {
            items,
            sorted_items,
            capacity,
            lower_bound: lower_bound(items, capacity),
            config,
            deadline: config.time_budget.map(|budget| start + budget),
            cancel,
        };

        if items.is_empty() {
            return Ok(HyperResult {
                best: Packing::new(),
                bin_count: 0,
                lower_bound: 0,
                restarts: 0,
                cycles: 0,
                improvements: 0,
                stop_reason: StopReason::LowerBound,
                elapsed: start.elapsed(),
                heuristic_scores: vec![0.0; config.decoder_variants.len()],
                best_history: Vec::new(),
            });
        }

        #[cfg(feature = "parallel")]
        {
            if config.parallel {
                return parallel::run(&ctx, start);
            }
        }

        Self::run_sequential(&ctx, start)
    }

    fn run_sequential(ctx: &SearchContext<'_>, start: Instant) -> Result<HyperResult, PackingError> {
        let mut rng = create_rng(ctx.config.seed);
        let mut state = SearchState::default();
        let mut scores = HeuristicScores::new(ctx.config.decoder_variants.len());
        let mut best_history = Vec::new();
        let mut restarts = 0usize;
        let mut cycles = 0usize;
        let mut improvements = 0usize;

        let stop_reason = loop {
            let before = state.best_count();
            let outcome = ctx.run_restart(before, &mut scores, &mut rng)?;
            restarts += 1;
            cycles += outcome.cycles;
            improvements += outcome.improvements;

            if let Some(candidate) = outcome.best {
                if state.offer(candidate) {
                    log::debug!(
                        "restart {}: {} -> {} bins",
                        restarts,
                        before.map_or_else(|| "-".to_string(), |c| c.to_string()),
                        state.best_count().unwrap_or(0)
                    );
                }
            }
            best_history.push(state.best_count().unwrap_or(0));

            if let Some(reason) = ctx.stop_condition(restarts, state.best_count()) {
                break reason;
            }
        };

        if stop_reason == StopReason::Cancelled {
            log::warn!("search cancelled after {} restarts", restarts);
        }

        let best = state.best.unwrap_or_default();
        Ok(HyperResult {
            bin_count: best.bin_count(),
            best,
            lower_bound: ctx.lower_bound,
            restarts,
            cycles,
            improvements,
            stop_reason,
            elapsed: start.elapsed(),
            heuristic_scores: scores.totals().to_vec(),
            best_history,
        })
    }
}

#[cfg(feature = "parallel")]
mod parallel {
    //! Restarts on the rayon pool.
    //!
    //! Each restart compares against a snapshot of the global best taken
    //! when it starts and commits under a lock only on strict improvement.
    //! The first stop condition seen ends the iteration; restarts already
    //! running finish and still commit.

    use super::*;
    use crate::random::stream_seed;
    use rayon::prelude::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Mutex, PoisonError};

    struct Shared {
        state: SearchState,
        scores: HeuristicScores,
        best_history: Vec<usize>,
    }

    /// Ends the parallel iteration early.
    enum Halt {
        Stopped(StopReason),
        Failed(PackingError),
    }

    impl From<PackingError> for Halt {
        fn from(err: PackingError) -> Self {
            Halt::Failed(err)
        }
    }

    pub(super) fn run(ctx: &SearchContext<'_>, start: Instant) -> Result<HyperResult, PackingError> {
        let base_seed = ctx.config.seed.unwrap_or_else(rand::random);
        let heuristics = ctx.config.decoder_variants.len();
        let shared = Mutex::new(Shared {
            state: SearchState::default(),
            scores: HeuristicScores::new(heuristics),
            best_history: Vec::new(),
        });
        let restarts = AtomicUsize::new(0);
        let cycles = AtomicUsize::new(0);
        let improvements = AtomicUsize::new(0);

        let halted = (0..ctx.config.restart_cap)
            .into_par_iter()
            .try_for_each(|index| -> Result<(), Halt> {
                let comparator = {
                    let guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
                    let best_count = guard.state.best_count();
                    if index > 0 {
                        let done = restarts.load(Ordering::Relaxed);
                        if let Some(reason) = ctx.stop_condition(done, best_count) {
                            return Err(Halt::Stopped(reason));
                        }
                    }
                    best_count
                };

                let mut rng = create_rng(Some(stream_seed(base_seed, index as u64)));
                let mut scores = HeuristicScores::new(heuristics);
                let outcome = ctx.run_restart(comparator, &mut scores, &mut rng)?;

                restarts.fetch_add(1, Ordering::Relaxed);
                cycles.fetch_add(outcome.cycles, Ordering::Relaxed);
                improvements.fetch_add(outcome.improvements, Ordering::Relaxed);

                let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
                guard.scores.merge_totals(&scores);
                if let Some(candidate) = outcome.best {
                    if guard.state.offer(candidate) {
                        log::debug!(
                            "restart #{}: best now {} bins",
                            index,
                            guard.state.best_count().unwrap_or(0)
                        );
                    }
                }
                let count = guard.state.best_count().unwrap_or(0);
                guard.best_history.push(count);
                Ok(())
            });

        let halted_by = match halted {
            Ok(()) => None,
            Err(Halt::Stopped(reason)) => Some(reason),
            Err(Halt::Failed(err)) => return Err(err),
        };

        let shared = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
        let restarts = restarts.into_inner();
        let best_count = shared.state.best_count();
        let stop_reason = halted_by
            .or_else(|| ctx.stop_condition(restarts, best_count))
            .unwrap_or(StopReason::RestartCap);

        if stop_reason == StopReason::Cancelled {
            log::warn!("search cancelled after {} restarts", restarts);
        }

        let best = shared.state.best.unwrap_or_default();
        Ok(HyperResult {
            bin_count: best.bin_count(),
            best,
            lower_bound: ctx.lower_bound,
            restarts,
            cycles: cycles.into_inner(),
            improvements: improvements.into_inner(),
            stop_reason,
            elapsed: start.elapsed(),
            heuristic_scores: shared.scores.totals().to_vec(),
            best_history: shared.best_history,
        })
    }
}
