//! Hyper-heuristic configuration.

use crate::packing::DecoderKind;
use std::time::Duration;

/// Configuration for the adaptive hyper-heuristic search.
///
/// # Stopping
///
/// The outer restart loop stops at whichever comes first:
/// - `restart_cap` restarts have run,
/// - `time_budget` has elapsed (checked before each restart, so the last
///   restart may overrun it),
/// - the L1 lower bound is reached (when `stop_at_lower_bound` is set),
/// - an external cancellation flag is raised.
///
/// The first restart always runs.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_binpack::hyper::HyperConfig;
/// use u_binpack::packing::DecoderKind;
///
/// let config = HyperConfig::default()
///     .with_decoders(vec![DecoderKind::BestFit, DecoderKind::FirstFit])
///     .with_epsilon(0.2)
///     .with_restart_cap(50)
///     .with_time_budget(Duration::from_secs(5))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HyperConfig {
    /// Heuristics exposed to the selector. Index order is selection order.
    pub decoder_variants: Vec<DecoderKind>,

    /// Exploration probability in [0, 1].
    pub epsilon: f64,

    /// Maximum number of restarts.
    pub restart_cap: usize,

    /// Wall-clock budget for the whole search. `None` means unbounded.
    pub time_budget: Option<Duration>,

    /// Maximum merges per local search call.
    pub local_search_max_rounds: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Run restarts on the rayon pool (requires the `parallel` feature;
    /// ignored otherwise).
    pub parallel: bool,

    /// Stop once a packing reaches `ceil(sum / capacity)` bins.
    pub stop_at_lower_bound: bool,

    /// Verify capacity and item conservation after every cycle.
    pub verify_invariants: bool,
}

impl Default for HyperConfig {
    fn default() -> Self {
        Self {
            decoder_variants: DecoderKind::ALL.to_vec(),
            epsilon: 0.15,
            restart_cap: 100,
            time_budget: None,
            local_search_max_rounds: 100,
            seed: None,
            parallel: false,
            stop_at_lower_bound: true,
            verify_invariants: true,
        }
    }
}

impl HyperConfig {
    /// Sets the heuristic portfolio.
    pub fn with_decoders(mut self, decoders: Vec<DecoderKind>) -> Self {
        self.decoder_variants = decoders;
        self
    }

    /// Sets the exploration probability.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_restart_cap(mut self, n: usize) -> Self {
        self.restart_cap = n;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn with_local_search_max_rounds(mut self, n: usize) -> Self {
        self.local_search_max_rounds = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_stop_at_lower_bound(mut self, stop: bool) -> Self {
        self.stop_at_lower_bound = stop;
        self
    }

    pub fn with_verify_invariants(mut self, verify: bool) -> Self {
        self.verify_invariants = verify;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.decoder_variants.is_empty() {
            return Err("decoder_variants must not be empty".into());
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(format!("epsilon must be in [0, 1], got {}", self.epsilon));
        }
        if self.restart_cap == 0 {
            return Err("restart_cap must be positive".into());
        }
        Ok(())
    }
}
