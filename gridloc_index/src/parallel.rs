// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data-parallel primitives the bucket sort is written against.
//!
//! With the `rayon` feature these dispatch to the global rayon pool once the
//! work size reaches a threshold; otherwise they run in place. Results never
//! depend on which path ran, except for slot order inside a bucket.

use alloc::vec::Vec;

/// How one batch of work is executed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Exec {
    Sequential,
    Parallel,
}

impl Exec {
    /// Parallel when rayon is available and `n` reaches `threshold`.
    pub(crate) fn for_len(n: usize, threshold: usize) -> Self {
        if cfg!(feature = "rayon") && n >= threshold {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }
}

/// Map every index in `0..n` and fold the results with an associative `combine`.
#[cfg(feature = "rayon")]
pub(crate) fn reduce<T, M, C>(exec: Exec, n: usize, identity: T, map: M, combine: C) -> T
where
    T: Copy + Send + Sync,
    M: Fn(usize) -> T + Sync + Send,
    C: Fn(T, T) -> T + Sync + Send,
{
    use rayon::prelude::*;
    match exec {
        Exec::Parallel => (0..n)
            .into_par_iter()
            .map(map)
            .reduce(move || identity, combine),
        Exec::Sequential => (0..n).map(map).fold(identity, combine),
    }
}

#[cfg(not(feature = "rayon"))]
pub(crate) fn reduce<T, M, C>(_exec: Exec, n: usize, identity: T, map: M, combine: C) -> T
where
    T: Copy,
    M: Fn(usize) -> T,
    C: Fn(T, T) -> T,
{
    (0..n).map(map).fold(identity, combine)
}

/// Run `f` once for every index in `0..n`, in no particular order.
#[cfg(feature = "rayon")]
pub(crate) fn for_each<F>(exec: Exec, n: usize, f: F)
where
    F: Fn(usize) + Sync + Send,
{
    use rayon::prelude::*;
    match exec {
        Exec::Parallel => (0..n).into_par_iter().for_each(f),
        Exec::Sequential => (0..n).for_each(f),
    }
}

#[cfg(not(feature = "rayon"))]
pub(crate) fn for_each<F>(_exec: Exec, n: usize, f: F)
where
    F: Fn(usize),
{
    (0..n).for_each(f);
}

/// Collect `f(i)` for every index in `0..n`, preserving index order.
#[cfg(feature = "rayon")]
pub(crate) fn map_collect<T, F>(exec: Exec, n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    use rayon::prelude::*;
    match exec {
        Exec::Parallel => (0..n).into_par_iter().map(f).collect(),
        Exec::Sequential => (0..n).map(f).collect(),
    }
}

#[cfg(not(feature = "rayon"))]
pub(crate) fn map_collect<T, F>(_exec: Exec, n: usize, f: F) -> Vec<T>
where
    F: Fn(usize) -> T,
{
    (0..n).map(f).collect()
}

/// Exclusive prefix sum with a trailing total: `out.len() == counts.len() + 1`.
pub(crate) fn exclusive_scan(counts: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(counts.len() + 1);
    let mut running = 0_u32;
    for &c in counts {
        out.push(running);
        running += c;
    }
    out.push(running);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn threshold_selects_execution() {
        assert_eq!(Exec::for_len(3, 4), Exec::Sequential);
        let expected = if cfg!(feature = "rayon") {
            Exec::Parallel
        } else {
            Exec::Sequential
        };
        assert_eq!(Exec::for_len(4, 4), expected);
        assert_eq!(Exec::for_len(0, 0), expected);
    }

    #[test]
    fn paths_agree() {
        for exec in [Exec::Sequential, Exec::Parallel] {
            let sum = reduce(exec, 1000, 0_u64, |i| i as u64, |a, b| a + b);
            assert_eq!(sum, 999 * 1000 / 2);

            let squares = map_collect(exec, 50, |i| i * i);
            assert!(squares.iter().enumerate().all(|(i, &s)| s == i * i));

            let hits = AtomicUsize::new(0);
            for_each(exec, 777, |_| {
                hits.fetch_add(1, Ordering::Relaxed);
            });
            assert_eq!(hits.into_inner(), 777);
        }
    }

    #[test]
    fn scan_is_exclusive_with_total() {
        assert_eq!(exclusive_scan(&[]), [0]);
        assert_eq!(exclusive_scan(&[2, 0, 3, 1]), [0, 2, 2, 5, 6]);
    }
}
