//! Random-restart baseline configuration.

use crate::packing::DecoderKind;
use std::time::Duration;

/// Configuration for the single-heuristic random-restart baseline.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_binpack::packing::DecoderKind;
/// use u_binpack::random_search::RandomSearchConfig;
///
/// let config = RandomSearchConfig::default()
///     .with_decoder(DecoderKind::NextFit)
///     .with_iterations(500)
///     .with_time_limit(Duration::from_secs(10))
///     .without_local_search();
/// assert_eq!(config.local_search_max_rounds, 0);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomSearchConfig {
    /// Heuristic used for every sample.
    pub decoder: DecoderKind,

    /// Number of shuffled orders to try.
    pub iterations: usize,

    /// Wall-clock limit, checked before each sample. `None` means unbounded.
    pub time_limit: Option<Duration>,

    /// Maximum merges per sample. 0 disables local search.
    pub local_search_max_rounds: usize,

    /// Random seed (None for a random seed).
    pub seed: Option<u64>,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            decoder: DecoderKind::BestFit,
            iterations: 1000,
            time_limit: Some(Duration::from_secs(30)),
            local_search_max_rounds: 100,
            seed: None,
        }
    }
}

impl RandomSearchConfig {
    pub fn with_decoder(mut self, decoder: DecoderKind) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Removes the time limit.
    pub fn without_time_limit(mut self) -> Self {
        self.time_limit = None;
        self
    }

    pub fn with_local_search_max_rounds(mut self, n: usize) -> Self {
        self.local_search_max_rounds = n;
        self
    }

    /// Samples are decoded only, never merged.
    pub fn without_local_search(self) -> Self {
        self.with_local_search_max_rounds(0)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.iterations == 0 {
            return Err("iterations must be positive".into());
        }
        Ok(())
    }
}
