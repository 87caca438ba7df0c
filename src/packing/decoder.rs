//! Construction heuristics (low-level heuristics).
//!
//! Each heuristic reads the items left to right and places every item
//! into a bin according to its own rule. All of them are deterministic
//! given the input order, so the caller diversifies by reordering.

use super::types::{Bin, Packing};
use crate::error::{check_feasible, PackingError};
use std::fmt;

/// Closed set of construction heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecoderKind {
    /// Keep one open bin; open a new one when the item does not fit.
    NextFit,
    /// First bin in creation order with enough room.
    FirstFit,
    /// Bin with the least remaining room that still fits the item.
    BestFit,
    /// Best-Fit over the items sorted by decreasing size.
    BestFitDecreasing,
}

impl DecoderKind {
    /// The default portfolio, in selection-index order.
    pub const ALL: [DecoderKind; 4] = [
        DecoderKind::BestFit,
        DecoderKind::BestFitDecreasing,
        DecoderKind::FirstFit,
        DecoderKind::NextFit,
    ];

    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            DecoderKind::NextFit => "NF",
            DecoderKind::FirstFit => "FF",
            DecoderKind::BestFit => "BF",
            DecoderKind::BestFitDecreasing => "BFD",
        }
    }
}

impl fmt::Display for DecoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Packs `items` with the heuristic `kind`.
///
/// The input slice is never modified.
///
/// # Errors
///
/// [`PackingError::InfeasibleInstance`] if any item exceeds `capacity`,
/// [`PackingError::InvalidCapacity`] if `capacity` is zero. Both are
/// reported before any bin is built.
///
/// # Examples
///
/// ```
/// use u_binpack::packing::{decode, DecoderKind};
///
/// let packing = decode(&[4, 8, 1, 4, 2, 1], 10, DecoderKind::NextFit).unwrap();
/// assert_eq!(packing.to_vecs(), vec![vec![4], vec![8, 1], vec![4, 2, 1]]);
/// ```
pub fn decode(items: &[u64], capacity: u64, kind: DecoderKind) -> Result<Packing, PackingError> {
    check_feasible(items, capacity)?;
    Ok(decode_unchecked(items, capacity, kind))
}

/// [`decode`] without the feasibility scan, for callers that validated
/// the instance once up front.
pub(crate) fn decode_unchecked(items: &[u64], capacity: u64, kind: DecoderKind) -> Packing {
    match kind {
        DecoderKind::NextFit => next_fit(items, capacity),
        DecoderKind::FirstFit => first_fit(items, capacity),
        DecoderKind::BestFit => best_fit(items, capacity),
        DecoderKind::BestFitDecreasing => {
            let mut sorted = items.to_vec();
            // Stable: equal sizes keep their relative input order.
            sorted.sort_by(|a, b| b.cmp(a));
            best_fit(&sorted, capacity)
        }
    }
}

fn next_fit(items: &[u64], capacity: u64) -> Packing {
    let mut bins = Vec::new();
    let mut current: Option<Bin> = None;

    for &item in items {
        if let Some(bin) = current.as_mut() {
            if bin.fits(item, capacity) {
                bin.push(item);
                continue;
            }
        }
        if let Some(full) = current.replace(Bin::with_item(item)) {
            bins.push(full);
        }
    }
    bins.extend(current);

    Packing::from_bins(bins)
}

fn first_fit(items: &[u64], capacity: u64) -> Packing {
    let mut bins: Vec<Bin> = Vec::new();

    for &item in items {
        match bins.iter_mut().find(|b| b.fits(item, capacity)) {
            Some(bin) => bin.push(item),
            None => bins.push(Bin::with_item(item)),
        }
    }

    Packing::from_bins(bins)
}

fn best_fit(items: &[u64], capacity: u64) -> Packing {
    let mut bins: Vec<Bin> = Vec::new();

    for &item in items {
        let mut best: Option<(usize, u64)> = None;
        for (i, bin) in bins.iter().enumerate() {
            let slack = bin.slack(capacity);
            // Strict `<` keeps the first index on ties.
            if slack >= item && best.is_none_or(|(_, s)| slack < s) {
                best = Some((i, slack));
            }
        }

        match best {
            Some((i, _)) => bins[i].push(item),
            None => bins.push(Bin::with_item(item)),
        }
    }

    Packing::from_bins(bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_next_fit_scenario() {
        let packing = decode(&[4, 8, 1, 4, 2, 1], 10, DecoderKind::NextFit).unwrap();
        assert_eq!(packing.to_vecs(), vec![vec![4], vec![8, 1], vec![4, 2, 1]]);
    }

    #[test]
    fn test_first_fit_scenario() {
        // 4 -> b0; 8 -> b1; 1 -> b0 (5); 4 -> b0 (9); 2 -> b1 (10); 1 -> b0 (10)
        let packing = decode(&[4, 8, 1, 4, 2, 1], 10, DecoderKind::FirstFit).unwrap();
        assert_eq!(packing.to_vecs(), vec![vec![4, 1, 4, 1], vec![8, 2]]);
    }

    #[test]
    fn test_best_fit_prefers_tightest_bin() {
        // After 5 and 7: slacks 5 and 3. Item 3 goes to the 7-bin (slack 3).
        let packing = decode(&[5, 7, 3], 10, DecoderKind::BestFit).unwrap();
        assert_eq!(packing.to_vecs(), vec![vec![5], vec![7, 3]]);

        // First Fit would take the first bin instead.
        let packing = decode(&[5, 7, 3], 10, DecoderKind::FirstFit).unwrap();
        assert_eq!(packing.to_vecs(), vec![vec![5, 3], vec![7]]);
    }

    #[test]
    fn test_best_fit_tie_takes_first_index() {
        let packing = decode(&[6, 6, 4], 10, DecoderKind::BestFit).unwrap();
        assert_eq!(packing.to_vecs(), vec![vec![6, 4], vec![6]]);
    }

    #[test]
    fn test_best_fit_decreasing_sorts_first() {
        let packing = decode(&[2, 5, 4, 7, 1, 3, 8], 10, DecoderKind::BestFitDecreasing).unwrap();
        // 8,7,5,4,3,2,1: 8|7|5 ; 4->5 (9) ; 3->7 (10) ; 2->8 (10) ; 1->9 (10)
        assert_eq!(
            packing.to_vecs(),
            vec![vec![8, 2], vec![7, 3], vec![5, 4, 1]]
        );
    }

    #[test]
    fn test_input_not_mutated() {
        let items = vec![1, 9, 3, 7];
        let before = items.clone();
        for kind in DecoderKind::ALL {
            decode(&items, 10, kind).unwrap();
        }
        assert_eq!(items, before);
    }

    #[test]
    fn test_empty_input() {
        for kind in DecoderKind::ALL {
            let packing = decode(&[], 10, kind).unwrap();
            assert!(packing.is_empty(), "{kind} produced bins for no items");
        }
    }

    #[test]
    fn test_single_item_equal_to_capacity() {
        for kind in DecoderKind::ALL {
            let packing = decode(&[10], 10, kind).unwrap();
            assert_eq!(packing.to_vecs(), vec![vec![10]], "variant {kind}");
        }
    }

    #[test]
    fn test_oversized_item_is_infeasible() {
        for kind in DecoderKind::ALL {
            assert_eq!(
                decode(&[3, 11, 2], 10, kind).unwrap_err(),
                PackingError::InfeasibleInstance {
                    item: 11,
                    capacity: 10
                }
            );
        }
    }

    #[test]
    fn test_zero_sized_items() {
        let packing = decode(&[0, 10, 0], 10, DecoderKind::FirstFit).unwrap();
        assert_eq!(packing.to_vecs(), vec![vec![0, 10, 0]]);
    }

    proptest! {
        #[test]
        fn prop_decoders_conserve_items_and_respect_capacity(
            capacity in 1u64..100,
            raw in proptest::collection::vec(0u64..1000, 0..60),
        ) {
            let items: Vec<u64> = raw.iter().map(|x| x % (capacity + 1)).collect();
            for kind in DecoderKind::ALL {
                let packing = decode(&items, capacity, kind).unwrap();
                prop_assert!(packing.verify(&items, capacity).is_ok());
            }
        }

        #[test]
        fn prop_first_fit_never_leaves_two_mergeable_bins_half_empty(
            capacity in 2u64..50,
            raw in proptest::collection::vec(1u64..50, 1..40),
        ) {
            // Any-fit heuristics never leave two bins each at most half full.
            let items: Vec<u64> = raw.iter().map(|x| 1 + x % capacity).collect();
            for kind in [DecoderKind::FirstFit, DecoderKind::BestFit, DecoderKind::BestFitDecreasing] {
                let packing = decode(&items, capacity, kind).unwrap();
                let half_or_less = packing
                    .bins()
                    .iter()
                    .filter(|b| b.load() * 2 <= capacity)
                    .count();
                prop_assert!(half_or_less <= 1, "{} left {} light bins", kind, half_or_less);
            }
        }
    }
}
