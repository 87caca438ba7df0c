//! One-dimensional bin packing.
//!
//! Partitions a multiset of item sizes into as few bins of a fixed
//! capacity as possible:
//!
//! - **Packing**: bins, packings and invariant checks, the construction
//!   heuristics Next-Fit, First-Fit, Best-Fit and Best-Fit-Decreasing,
//!   and a first-improvement bin-merging local search.
//! - **Hyper-heuristic**: epsilon-greedy selection among the construction
//!   heuristics over shuffled item orders, with restarts, a time budget
//!   and cooperative cancellation.
//! - **Random search**: single-heuristic random-restart baseline.
//! - **Instances**: problem and report types for external loaders,
//!   serializers and validators, plus a batch driver.
//!
//! # Example
//!
//! ```
//! use u_binpack::hyper::{HyperConfig, HyperRunner};
//!
//! let items = [30, 70, 45, 55, 20, 80, 50, 50];
//! let config = HyperConfig::default().with_seed(7);
//! let result = HyperRunner::run(&items, 100, &config).unwrap();
//! assert!(result.best.verify(&items, 100).is_ok());
//! assert!(result.bin_count >= result.lower_bound);
//! ```

pub mod error;
pub mod hyper;
pub mod instance;
pub mod packing;
pub mod random_search;

mod random;

pub use error::PackingError;
