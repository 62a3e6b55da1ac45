// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The uniform bucket grid laid over one level's boxes.

use gridloc_mesh::{IndexBox, IntVect};
use smallvec::SmallVec;

/// Per-axis lower bound, upper bound, and largest box length over a set of boxes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Bounds<const D: usize> {
    lo: IntVect<D>,
    hi: IntVect<D>,
    max_len: IntVect<D>,
}

impl<const D: usize> Bounds<D> {
    /// Identity of [`Bounds::merge`].
    pub(crate) const EMPTY: Self = Self {
        lo: IntVect::splat(i32::MAX),
        hi: IntVect::splat(i32::MIN),
        max_len: IntVect::splat(0),
    };

    pub(crate) fn of(b: &IndexBox<D>) -> Self {
        Self {
            lo: b.lower_corner(),
            hi: b.upper_corner(),
            max_len: b.length(),
        }
    }

    pub(crate) fn merge(a: Self, b: Self) -> Self {
        Self {
            lo: a.lo.min(b.lo),
            hi: a.hi.max(b.hi),
            max_len: a.max_len.max(b.max_len),
        }
    }

    fn is_empty(&self) -> bool {
        !self.lo.all_le(&self.hi)
    }
}

/// Uniform partition of index space into equal-size bins.
///
/// The bin size on each axis equals the largest box length on that axis, so a
/// box whose lower corner lies in bin `b` never reaches past bin `b + 1`. A cell
/// can therefore only be covered by boxes filed under its own bin or the bin
/// just below it, on every axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BinGrid<const D: usize> {
    bins_lo: IntVect<D>,
    bins_hi: IntVect<D>,
    bin_size: IntVect<D>,
    num_bins: IntVect<D>,
}

impl<const D: usize> BinGrid<D> {
    /// A single bin at the origin, used for an empty box array.
    pub(crate) const DEGENERATE: Self = Self {
        bins_lo: IntVect::zero(),
        bins_hi: IntVect::zero(),
        bin_size: IntVect::splat(1),
        num_bins: IntVect::splat(1),
    };

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Bin counts never exceed the i32 span they are derived from."
    )]
    pub(crate) fn from_bounds(bounds: Bounds<D>) -> Self {
        if bounds.is_empty() {
            return Self::DEGENERATE;
        }
        let bin_size = bounds.max_len.max(IntVect::splat(1));
        let num_bins = IntVect::new(core::array::from_fn(|d| {
            let span = i64::from(bounds.hi[d]) - i64::from(bounds.lo[d]);
            let size = i64::from(bin_size[d]);
            ((span + size) / size).clamp(1, i64::from(i32::MAX)) as i32
        }));
        Self {
            bins_lo: bounds.lo,
            bins_hi: bounds.hi,
            bin_size,
            num_bins,
        }
    }

    /// Lowest cell covered by any box.
    pub const fn bins_lo(&self) -> IntVect<D> {
        self.bins_lo
    }

    /// Highest cell covered by any box.
    pub const fn bins_hi(&self) -> IntVect<D> {
        self.bins_hi
    }

    /// Bin edge length along each axis, in cells.
    pub const fn bin_size(&self) -> IntVect<D> {
        self.bin_size
    }

    /// Number of bins along each axis (at least 1).
    pub const fn num_bins(&self) -> IntVect<D> {
        self.num_bins
    }

    /// Total number of bins.
    pub fn total_bins(&self) -> usize {
        self.num_bins
            .as_array()
            .iter()
            .map(|&n| n.unsigned_abs() as usize)
            .product()
    }

    /// Unclamped bin coordinate of a cell. May be negative or past the last bin.
    #[inline]
    pub fn bin_coord(&self, cell: IntVect<D>) -> [i64; D] {
        core::array::from_fn(|d| {
            (i64::from(cell[d]) - i64::from(self.bins_lo[d])).div_euclid(i64::from(self.bin_size[d]))
        })
    }

    /// Row-major flat index of an in-range bin coordinate; the last axis varies fastest.
    #[inline]
    pub fn flat_index(&self, coord: [usize; D]) -> usize {
        let mut index = 0;
        for d in 0..D {
            debug_assert!(
                coord[d] < self.num_bins[d].unsigned_abs() as usize,
                "bin coordinate {coord:?} out of range on axis {d}"
            );
            index = index * self.num_bins[d].unsigned_abs() as usize + coord[d];
        }
        index
    }

    /// The bin a box is filed under: the bin of its lower corner, clamped into range.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Clamped into [0, num_bins), which fits in usize."
    )]
    pub(crate) fn bin_of_box(&self, b: &IndexBox<D>) -> usize {
        let coord = self.bin_coord(b.lower_corner());
        self.flat_index(core::array::from_fn(|d| {
            coord[d].clamp(0, i64::from(self.num_bins[d]) - 1) as usize
        }))
    }

    /// Flat indices of every bin that may hold a box containing `cell`.
    ///
    /// This is the `[bin - 1, bin]` neighborhood on each axis, clipped to the grid:
    /// at most `2^D` bins, visited with the last axis varying fastest. Empty when
    /// the cell lies entirely outside the grid.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Both ends are clipped into [0, num_bins), which fits in usize."
    )]
    pub fn neighborhood(&self, cell: IntVect<D>) -> SmallVec<[usize; 8]> {
        let coord = self.bin_coord(cell);
        let mut start = [0_usize; D];
        let mut end = [0_usize; D];
        for d in 0..D {
            let first = (coord[d] - 1).max(0);
            let last = coord[d].min(i64::from(self.num_bins[d]) - 1);
            if first > last {
                return SmallVec::new();
            }
            start[d] = first as usize;
            end[d] = last as usize;
        }

        let mut out = SmallVec::new();
        let mut cur = start;
        loop {
            out.push(self.flat_index(cur));
            let mut d = D;
            loop {
                if d == 0 {
                    return out;
                }
                d -= 1;
                if cur[d] < end[d] {
                    cur[d] += 1;
                    break;
                }
                cur[d] = start[d];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn bx<const D: usize>(lo: [i32; D], hi: [i32; D]) -> IndexBox<D> {
        IndexBox::from_half_open(IntVect::new(lo), IntVect::new(hi))
    }

    fn grid_of<const D: usize>(boxes: &[IndexBox<D>]) -> BinGrid<D> {
        let bounds = boxes
            .iter()
            .map(Bounds::of)
            .fold(Bounds::EMPTY, Bounds::merge);
        BinGrid::from_bounds(bounds)
    }

    #[test]
    fn sizing_follows_largest_box() {
        let g = grid_of(&[
            bx([0, 0], [8, 8]),
            bx([8, 0], [16, 8]),
            bx([0, 8], [16, 16]),
        ]);
        assert_eq!(g.bins_lo(), IntVect::new([0, 0]));
        assert_eq!(g.bins_hi(), IntVect::new([15, 15]));
        assert_eq!(g.bin_size(), IntVect::new([16, 8]));
        // (15 - 0 + 16) / 16 = 1, (15 - 0 + 8) / 8 = 2
        assert_eq!(g.num_bins(), IntVect::new([1, 2]));
        assert_eq!(g.total_bins(), 2);
    }

    #[test]
    fn empty_bounds_are_degenerate() {
        let g = grid_of::<3>(&[]);
        assert_eq!(g, BinGrid::DEGENERATE);
        assert_eq!(g.total_bins(), 1);
    }

    #[test]
    fn flat_index_is_row_major() {
        let g = grid_of(&[bx([0, 0, 0], [2, 2, 2]), bx([4, 6, 8], [6, 8, 10])]);
        assert_eq!(g.num_bins(), IntVect::new([3, 4, 5]));
        assert_eq!(g.flat_index([0, 0, 1]), 1);
        assert_eq!(g.flat_index([0, 1, 0]), 5);
        assert_eq!(g.flat_index([1, 0, 0]), 20);
        assert_eq!(g.flat_index([2, 3, 4]), g.total_bins() - 1);
    }

    #[test]
    fn box_bins_clamp_into_range() {
        let g = grid_of(&[bx([0], [4]), bx([4], [8]), bx([10], [12])]);
        assert_eq!(g.num_bins(), IntVect::new([3]));
        assert_eq!(g.bin_of_box(&bx([0], [4])), 0);
        assert_eq!(g.bin_of_box(&bx([4], [8])), 1);
        assert_eq!(g.bin_of_box(&bx([10], [12])), 2);
        assert_eq!(g.bin_of_box(&bx([-40], [-30])), 0);
        assert_eq!(g.bin_of_box(&bx([400], [401])), 2);
    }

    #[test]
    fn neighborhood_is_clipped_pair_per_axis() {
        let g = grid_of(&[bx([0, 0], [4, 4]), bx([12, 12], [16, 16])]);
        assert_eq!(g.num_bins(), IntVect::new([4, 4]));

        // Interior: 2 x 2 bins, last axis fastest.
        let n: Vec<usize> = g.neighborhood(IntVect::new([9, 5])).into_vec();
        assert_eq!(
            n,
            [
                g.flat_index([1, 0]),
                g.flat_index([1, 1]),
                g.flat_index([2, 0]),
                g.flat_index([2, 1]),
            ]
        );

        // Lower edge clips to a single bin on that axis.
        let n: Vec<usize> = g.neighborhood(IntVect::new([1, 6])).into_vec();
        assert_eq!(n, [g.flat_index([0, 0]), g.flat_index([0, 1])]);

        // Just past the top: only the last bin remains.
        let n: Vec<usize> = g.neighborhood(IntVect::new([16, 16])).into_vec();
        assert_eq!(n, [g.flat_index([3, 3])]);

        // Far outside: nothing to scan.
        assert!(g.neighborhood(IntVect::new([40, 2])).is_empty());
        assert!(g.neighborhood(IntVect::new([2, -1])).is_empty());
    }
}
