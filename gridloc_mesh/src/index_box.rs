// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned boxes of cells.

use crate::IntVect;

/// An axis-aligned box of cells in index space.
///
/// Bounds are inclusive on both ends: the box covers every cell `c` with
/// `small_end[d] <= c[d] <= big_end[d]` on each axis. Use
/// [`IndexBox::from_half_open`] to build one from a `[lo, hi)` range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexBox<const D: usize> {
    small_end: IntVect<D>,
    big_end: IntVect<D>,
}

impl<const D: usize> IndexBox<D> {
    /// Create a box from its inclusive lower and upper corners.
    pub const fn new(small_end: IntVect<D>, big_end: IntVect<D>) -> Self {
        Self { small_end, big_end }
    }

    /// Create a box covering the half-open range `[lo, hi)` on each axis.
    ///
    /// `hi` equal to `i32::MIN` saturates and yields an empty box.
    pub fn from_half_open(lo: IntVect<D>, hi: IntVect<D>) -> Self {
        Self {
            small_end: lo,
            big_end: IntVect::new(hi.into_array().map(|h| h.saturating_sub(1))),
        }
    }

    /// Inclusive lower corner.
    pub const fn lower_corner(&self) -> IntVect<D> {
        self.small_end
    }

    /// Inclusive upper corner.
    pub const fn upper_corner(&self) -> IntVect<D> {
        self.big_end
    }

    /// Number of cells along each axis.
    ///
    /// Empty (inverted) boxes report zero on the inverted axes. Extents wider
    /// than `i32::MAX` cells saturate.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Clamped into the i32 range first."
    )]
    pub fn length(&self) -> IntVect<D> {
        IntVect::new(core::array::from_fn(|d| {
            let len = i64::from(self.big_end[d]) - i64::from(self.small_end[d]) + 1;
            len.clamp(0, i64::from(i32::MAX)) as i32
        }))
    }

    /// Total number of cells covered.
    pub fn num_cells(&self) -> u64 {
        self.length()
            .as_array()
            .iter()
            .map(|&n| u64::from(n.unsigned_abs()))
            .product()
    }

    /// Whether the box covers no cells.
    pub fn is_empty(&self) -> bool {
        !self.small_end.all_le(&self.big_end)
    }

    /// Whether the cell lies inside the box.
    #[inline]
    pub fn contains(&self, cell: IntVect<D>) -> bool {
        self.small_end.all_le(&cell) && cell.all_le(&self.big_end)
    }

    /// Whether the two boxes share at least one cell.
    pub fn intersects(&self, other: &Self) -> bool {
        let lo = self.small_end.max(other.small_end);
        let hi = self.big_end.min(other.big_end);
        !self.is_empty() && !other.is_empty() && lo.all_le(&hi)
    }

    /// Whether every cell of `other` lies inside `self`.
    pub fn contains_box(&self, other: &Self) -> bool {
        !other.is_empty() && self.contains(other.small_end) && self.contains(other.big_end)
    }
}
