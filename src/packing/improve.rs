//! Bin-merging local search.
//!
//! Repeatedly merges the first pair of bins whose combined load fits into
//! one bin. Each merge removes exactly one bin and moves items without
//! copying or dropping any of them.

use super::types::Packing;

/// Merges bin pairs under a first-improvement policy.
///
/// Pairs `(i, j)` are scanned in index order. The first pair whose
/// combined load is at most `capacity` is merged: bin `i` absorbs the
/// items of bin `j`, bin `j` is removed and the scan restarts from the
/// beginning. Stops after a full pass without a merge or after
/// `max_rounds` merges.
///
/// # Examples
///
/// ```
/// use u_binpack::packing::{improve, Packing};
///
/// let packing = Packing::from(vec![vec![4], vec![8, 1], vec![4, 2]]);
/// let improved = improve(packing, 10, 100);
/// assert_eq!(improved.to_vecs(), vec![vec![4, 4, 2], vec![8, 1]]);
/// ```
pub fn improve(mut packing: Packing, capacity: u64, max_rounds: usize) -> Packing {
    let mut rounds = 0;
    while rounds < max_rounds {
        match first_mergeable_pair(&packing, capacity) {
            Some((i, j)) => {
                let bins = packing.bins_mut();
                let absorbed = bins.remove(j);
                bins[i].absorb(absorbed);
                rounds += 1;
            }
            None => break,
        }
    }
    packing
}

/// First `(i, j)` in scan order whose loads fit together.
///
/// Fit is symmetric and `(j, i)` with `j < i` is visited before `(i, j)`,
/// so the first hit always has `i < j`. Only the upper triangle is scanned.
fn first_mergeable_pair(packing: &Packing, capacity: u64) -> Option<(usize, usize)> {
    let bins = packing.bins();
    for i in 0..bins.len() {
        let room = bins[i].slack(capacity);
        for j in (i + 1)..bins.len() {
            if bins[j].load() <= room {
                return Some((i, j));
            }
        }
    }
    None
}
