//! Problem instances and the result report handed to external tooling.
//!
//! Loading instances from storage and writing the report are done by the
//! caller. With the `serde` feature the types here (de)serialize as
//! `{name, capacity, items}` and `{name, capacity, solution}`, the shape
//! the result validator expects. The timestamp of a persisted report is
//! added by whoever writes it.

use crate::error::PackingError;
use crate::hyper::{HyperConfig, HyperRunner};
use crate::packing::Packing;
use std::time::{Duration, Instant};

/// One bin-packing problem.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    /// Unique label.
    pub name: String,
    /// Capacity shared by every bin.
    pub capacity: u64,
    /// Item sizes.
    pub items: Vec<u64>,
}

impl Instance {
    pub fn new(name: impl Into<String>, capacity: u64, items: Vec<u64>) -> Self {
        Self {
            name: name.into(),
            capacity,
            items,
        }
    }

    /// Solves this instance with the hyper-heuristic.
    pub fn solve(&self, config: &HyperConfig) -> Result<InstanceResult, PackingError> {
        let start = Instant::now();
        let result = HyperRunner::run(&self.items, self.capacity, config)?;
        Ok(InstanceResult {
            name: self.name.clone(),
            capacity: self.capacity,
            solution: result.best,
            elapsed: start.elapsed(),
        })
    }
}

/// Packing found for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceResult {
    pub name: String,
    pub capacity: u64,
    /// Bins as nested item lists.
    pub solution: Packing,
    /// Search time for this instance. Not part of the persisted record.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub elapsed: Duration,
}

impl InstanceResult {
    pub fn bins_used(&self) -> usize {
        self.solution.bin_count()
    }
}

/// Results for a batch of instances, in input order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchReport {
    /// Wall-clock seconds for the whole batch.
    pub total_time: f64,
    pub results: Vec<InstanceResult>,
}

impl BatchReport {
    /// Bins used over all instances.
    pub fn total_bins(&self) -> usize {
        self.results.iter().map(InstanceResult::bins_used).sum()
    }
}

/// Solves every instance in order.
///
/// Stops at the first instance that cannot be packed and returns its
/// error; nothing partial is reported.
pub fn solve_batch(instances: &[Instance], config: &HyperConfig) -> Result<BatchReport, PackingError> {
    let start = Instant::now();
    let mut results = Vec::with_capacity(instances.len());

    for instance in instances {
        let result = instance.solve(config).inspect_err(|err| {
            log::error!("instance {}: {}", instance.name, err);
        })?;
        log::info!(
            "instance {}: {} bins ({:.4}s)",
            result.name,
            result.bins_used(),
            result.elapsed.as_secs_f64()
        );
        results.push(result);
    }

    let report = BatchReport {
        total_time: start.elapsed().as_secs_f64(),
        results,
    };
    log::info!(
        "solved {} instances: {} bins in {:.4}s",
        report.results.len(),
        report.total_bins(),
        report.total_time
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instances() -> Vec<Instance> {
        vec![
            Instance::new("tiny", 10, vec![4, 8, 1, 4, 2, 1]),
            Instance::new("pairs", 100, vec![30, 70, 45, 55, 20, 80, 50, 50]),
            Instance::new("empty", 5, Vec::new()),
        ]
    }

    #[test]
    fn test_solve_batch_in_order() {
        let config = HyperConfig::default().with_restart_cap(50).with_seed(42);
        let report = solve_batch(&instances(), &config).unwrap();

        let names: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["tiny", "pairs", "empty"]);

        for (instance, result) in instances().iter().zip(&report.results) {
            assert_eq!(result.capacity, instance.capacity);
            assert!(result
                .solution
                .verify(&instance.items, instance.capacity)
                .is_ok());
        }
        assert_eq!(report.results[0].bins_used(), 2);
        assert_eq!(report.results[1].bins_used(), 4);
        assert_eq!(report.results[2].bins_used(), 0);
        assert_eq!(report.total_bins(), 6);
        assert!(report.total_time >= 0.0);
    }

    #[test]
    fn test_solve_batch_propagates_infeasible() {
        let mut batch = instances();
        batch.insert(1, Instance::new("bad", 10, vec![5, 11]));
        let err = solve_batch(&batch, &HyperConfig::default().with_seed(1)).unwrap_err();
        assert_eq!(
            err,
            PackingError::InfeasibleInstance {
                item: 11,
                capacity: 10
            }
        );
    }

    #[test]
    fn test_instance_solve() {
        let instance = Instance::new("one", 10, vec![10]);
        let result = instance.solve(&HyperConfig::default()).unwrap();
        assert_eq!(result.name, "one");
        assert_eq!(result.solution.to_vecs(), vec![vec![10]]);
    }
}
