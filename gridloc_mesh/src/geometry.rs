// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping between physical coordinates and index-space cells.

use crate::{IndexBox, IntVect};

/// Physical geometry of one refinement level.
///
/// Cell `c` of the domain covers the physical interval
/// `[prob_lo + (c - domain.lo) * dx, prob_lo + (c - domain.lo + 1) * dx)` on each axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry<const D: usize> {
    domain: IndexBox<D>,
    prob_lo: [f64; D],
    cell_size: [f64; D],
    inv_cell_size: [f64; D],
    periodic: [bool; D],
}

impl<const D: usize> Geometry<D> {
    /// Create a non-periodic geometry from the index-space domain, the physical
    /// position of the domain's lower corner, and the cell size on each axis.
    pub fn new(domain: IndexBox<D>, prob_lo: [f64; D], cell_size: [f64; D]) -> Self {
        debug_assert!(
            cell_size.iter().all(|&dx| dx > 0.0),
            "cell sizes must be strictly positive; got {cell_size:?}"
        );
        Self {
            domain,
            prob_lo,
            cell_size,
            inv_cell_size: core::array::from_fn(|d| 1.0 / cell_size[d]),
            periodic: [false; D],
        }
    }

    /// Create a geometry whose domain spans the physical box `[prob_lo, prob_hi]`.
    pub fn from_bounds(domain: IndexBox<D>, prob_lo: [f64; D], prob_hi: [f64; D]) -> Self {
        let len = domain.length();
        let cell_size = core::array::from_fn(|d| (prob_hi[d] - prob_lo[d]) / f64::from(len[d]));
        Self::new(domain, prob_lo, cell_size)
    }

    /// Set which axes wrap around.
    #[must_use]
    pub fn with_periodicity(mut self, periodic: [bool; D]) -> Self {
        self.periodic = periodic;
        self
    }

    /// Index-space extent of the level.
    pub const fn domain(&self) -> IndexBox<D> {
        self.domain
    }

    /// Physical position of the domain's lower corner.
    pub const fn origin(&self) -> [f64; D] {
        self.prob_lo
    }

    /// Physical position of the domain's upper corner.
    pub fn prob_hi(&self) -> [f64; D] {
        let len = self.domain.length();
        core::array::from_fn(|d| self.prob_lo[d] + self.cell_size[d] * f64::from(len[d]))
    }

    /// Cell size along each axis.
    pub const fn cell_size(&self) -> [f64; D] {
        self.cell_size
    }

    /// Reciprocal cell size along each axis.
    pub const fn inv_cell_size(&self) -> [f64; D] {
        self.inv_cell_size
    }

    /// Whether axis `d` is periodic.
    pub fn is_periodic(&self, d: usize) -> bool {
        self.periodic[d]
    }

    /// Periodicity flags for all axes.
    pub const fn periodicity(&self) -> [bool; D] {
        self.periodic
    }

    /// Whether any axis is periodic.
    pub fn is_any_periodic(&self) -> bool {
        self.periodic.iter().any(|&p| p)
    }

    /// The index-space cell containing a physical point.
    ///
    /// Points outside the domain map to cells outside the domain; nothing is clamped.
    #[inline]
    pub fn cell_of(&self, point: [f64; D]) -> IntVect<D> {
        let lo = self.domain.lower_corner();
        IntVect::new(core::array::from_fn(|d| {
            let t = (point[d] - self.prob_lo[d]) * self.inv_cell_size[d];
            floor_to_i32(t).saturating_add(lo[d])
        }))
    }

    /// Fold a point back into `[prob_lo, prob_hi)` along periodic axes.
    ///
    /// Non-periodic axes and non-finite coordinates are returned unchanged.
    pub fn wrap_periodic(&self, point: [f64; D]) -> [f64; D] {
        let hi = self.prob_hi();
        core::array::from_fn(|d| {
            let p = point[d];
            if !self.periodic[d] || !p.is_finite() {
                return p;
            }
            let lo = self.prob_lo[d];
            let len = hi[d] - lo;
            if (lo..hi[d]).contains(&p) || len <= 0.0 {
                return p;
            }
            let k = floor_to_i64((p - lo) / len);
            #[allow(
                clippy::cast_precision_loss,
                reason = "Wrap counts are small; exact for anything a simulation produces."
            )]
            let wrapped = p - (k as f64) * len;
            // Rounding can land exactly on the upper face.
            if wrapped >= hi[d] { lo } else { wrapped.max(lo) }
        })
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Cell indices are intentionally i32; out-of-range values are saturated."
)]
#[inline]
fn floor_to_i32(t: f64) -> i32 {
    let coord = t as i32;

    // Round towards -∞ (the cast above has already truncated).
    if t < 0.0 && f64::from(coord) > t {
        coord.saturating_sub(1)
    } else {
        coord
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "Saturating float to integer conversion followed by floor correction."
)]
#[inline]
fn floor_to_i64(t: f64) -> i64 {
    let k = t as i64;
    if t < 0.0 && (k as f64) > t {
        k.saturating_sub(1)
    } else {
        k
    }
}
