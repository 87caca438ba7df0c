//! Single-heuristic random-restart baseline.
//!
//! Samples random item orders, packs each with one fixed heuristic and
//! keeps the best. Useful as a reference point for the hyper-heuristic
//! in [`crate::hyper`].

mod config;
mod runner;

pub use config::RandomSearchConfig;
pub use runner::{RandomSearchResult, RandomSearchRunner};
