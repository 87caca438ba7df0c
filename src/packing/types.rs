//! Bins, packings and invariant checks.

use crate::error::PackingError;

/// An ordered group of items packed together.
///
/// The load is cached and kept in sync with the items; every mutation goes
/// through methods of this crate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<u64>", into = "Vec<u64>")
)]
pub struct Bin {
    items: Vec<u64>,
    load: u64,
}

impl Bin {
    /// Creates a bin holding a single item.
    pub fn with_item(item: u64) -> Self {
        Self {
            items: vec![item],
            load: item,
        }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[u64] {
        &self.items
    }

    /// Sum of all item sizes.
    pub fn load(&self) -> u64 {
        self.load
    }

    /// Remaining room under `capacity`.
    pub fn slack(&self, capacity: u64) -> u64 {
        capacity.saturating_sub(self.load)
    }

    /// Whether `item` fits without exceeding `capacity`.
    pub fn fits(&self, item: u64, capacity: u64) -> bool {
        item <= self.slack(capacity)
    }

    /// Number of items in the bin.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn push(&mut self, item: u64) {
        self.items.push(item);
        self.load += item;
    }

    /// Moves every item of `other` to the end of this bin.
    pub(crate) fn absorb(&mut self, other: Bin) {
        self.load += other.load;
        self.items.extend(other.items);
    }
}

impl From<Vec<u64>> for Bin {
    fn from(items: Vec<u64>) -> Self {
        let load = items.iter().sum();
        Self { items, load }
    }
}

impl From<Bin> for Vec<u64> {
    fn from(bin: Bin) -> Self {
        bin.items
    }
}

/// An ordered sequence of bins.
///
/// Decoders and the improver produce packings that hold exactly the input
/// items with every load at or under capacity; [`Packing::verify`] checks
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Packing {
    bins: Vec<Bin>,
}

impl Packing {
    /// Creates an empty packing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `bins` as they are. Nothing is checked; see [`Packing::verify`].
    pub fn from_bins(bins: Vec<Bin>) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Number of bins used. This is the objective.
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Total number of items across all bins.
    pub fn item_count(&self) -> usize {
        self.bins.iter().map(Bin::len).sum()
    }

    /// Sum of all bin loads.
    pub fn total_load(&self) -> u64 {
        self.bins.iter().map(Bin::load).sum()
    }

    /// All item sizes, bin by bin.
    pub fn items(&self) -> impl Iterator<Item = u64> + '_ {
        self.bins.iter().flat_map(|b| b.items().iter().copied())
    }

    /// Nested item lists, the shape the result report stores.
    pub fn to_vecs(&self) -> Vec<Vec<u64>> {
        self.bins.iter().map(|b| b.items().to_vec()).collect()
    }

    /// Consumes the packing, yielding its bins in order.
    pub fn into_bins(self) -> Vec<Bin> {
        self.bins
    }

    pub(crate) fn bins_mut(&mut self) -> &mut Vec<Bin> {
        &mut self.bins
    }

    /// Checks that every load fits `capacity` and that the packing holds
    /// exactly the multiset `items`.
    pub fn verify(&self, items: &[u64], capacity: u64) -> Result<(), PackingError> {
        let mut expected = items.to_vec();
        expected.sort_unstable();
        self.verify_sorted(&expected, capacity)
    }

    /// Same as [`Packing::verify`] with `sorted_items` already ascending.
    pub(crate) fn verify_sorted(
        &self,
        sorted_items: &[u64],
        capacity: u64,
    ) -> Result<(), PackingError> {
        for (index, bin) in self.bins.iter().enumerate() {
            let load: u64 = bin.items().iter().sum();
            if load > capacity || load != bin.load() {
                return Err(PackingError::CapacityViolation {
                    bin: index,
                    load,
                    capacity,
                });
            }
        }

        let mut found: Vec<u64> = self.items().collect();
        found.sort_unstable();
        if found != sorted_items {
            return Err(PackingError::ConservationViolation {
                expected: sorted_items.len(),
                expected_size: sorted_items.iter().sum(),
                found: found.len(),
                found_size: found.iter().sum(),
            });
        }
        Ok(())
    }
}

impl From<Vec<Vec<u64>>> for Packing {
    fn from(bins: Vec<Vec<u64>>) -> Self {
        Self {
            bins: bins.into_iter().map(Bin::from).collect(),
        }
    }
}

/// L1 lower bound: `ceil(sum(items) / capacity)`.
///
/// No packing can use fewer bins. Returns 0 for empty input or zero
/// capacity.
pub fn lower_bound(items: &[u64], capacity: u64) -> usize {
    if capacity == 0 {
        return 0;
    }
    let total: u128 = items.iter().map(|&x| x as u128).sum();
    total.div_ceil(capacity as u128) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_load_tracks_items() {
        let mut bin = Bin::with_item(4);
        bin.push(3);
        assert_eq!(bin.load(), 7);
        assert_eq!(bin.items(), &[4, 3]);
        assert_eq!(bin.slack(10), 3);
        assert!(bin.fits(3, 10));
        assert!(!bin.fits(4, 10));

        bin.absorb(Bin::from(vec![1, 2]));
        assert_eq!(bin.load(), 10);
        assert_eq!(bin.items(), &[4, 3, 1, 2]);
    }

    #[test]
    fn test_verify_ok() {
        let packing = Packing::from(vec![vec![4], vec![8, 1], vec![4, 2, 1]]);
        assert!(packing.verify(&[4, 8, 1, 4, 2, 1], 10).is_ok());
        assert_eq!(packing.bin_count(), 3);
        assert_eq!(packing.item_count(), 6);
        assert_eq!(packing.total_load(), 20);
    }

    #[test]
    fn test_verify_detects_lost_item() {
        let packing = Packing::from(vec![vec![4], vec![8, 1]]);
        let err = packing.verify(&[4, 8, 1, 1], 10).unwrap_err();
        assert!(matches!(
            err,
            PackingError::ConservationViolation {
                expected: 4,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_verify_detects_swapped_sizes() {
        // Same count, same total, different multiset.
        let packing = Packing::from(vec![vec![2, 2]]);
        assert!(matches!(
            packing.verify(&[1, 3], 10),
            Err(PackingError::ConservationViolation { .. })
        ));
    }

    #[test]
    fn test_verify_detects_overfull_bin() {
        let packing = Packing::from(vec![vec![1], vec![8, 4]]);
        assert_eq!(
            packing.verify(&[1, 8, 4], 10).unwrap_err(),
            PackingError::CapacityViolation {
                bin: 1,
                load: 12,
                capacity: 10
            }
        );
    }

    #[test]
    fn test_lower_bound() {
        assert_eq!(lower_bound(&[], 10), 0);
        assert_eq!(lower_bound(&[4, 8, 1, 4, 2, 1], 10), 2);
        assert_eq!(lower_bound(&[10, 10], 10), 2);
        assert_eq!(lower_bound(&[10, 10, 1], 10), 3);
        assert_eq!(lower_bound(&[u64::MAX, u64::MAX], u64::MAX), 2);
    }

    #[test]
    fn test_to_vecs() {
        let packing = Packing::from(vec![vec![3, 2], vec![5]]);
        assert_eq!(packing.to_vecs(), vec![vec![3, 2], vec![5]]);
    }

    #[test]
    fn test_bins_round_trip_through_from_bins() {
        let packing = Packing::from(vec![vec![3, 2], vec![5]]);
        let bins = packing.clone().into_bins();
        assert_eq!(bins.iter().map(Bin::len).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(Packing::from_bins(bins), packing);
    }
}
