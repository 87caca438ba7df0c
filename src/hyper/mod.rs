//! Adaptive hyper-heuristic for bin packing.
//!
//! Instead of packing with one fixed rule, the search keeps a score per
//! construction heuristic and picks one per cycle epsilon-greedily. Each
//! cycle packs a freshly shuffled item order, merges bins by local search
//! and credits the heuristic with the bins it saved. A restart ends at the
//! first cycle that does not improve; the best packing over all restarts
//! is returned.
//!
//! # References
//!
//! - Burke et al. (2013), "Hyper-heuristics: a survey of the state of the
//!   art", *Journal of the Operational Research Society* 64(12).
//! - Sutton & Barto (2018), "Reinforcement Learning: An Introduction",
//!   Section 2.2 (epsilon-greedy action selection).

mod config;
mod runner;
mod selector;

pub use config::HyperConfig;
pub use runner::{HyperResult, HyperRunner, StopReason};
pub use selector::{select, HeuristicScores};
