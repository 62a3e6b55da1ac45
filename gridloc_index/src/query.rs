// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only point lookups against one built level.

use alloc::vec::Vec;

use gridloc_mesh::{Geometry, IndexBox, IntVect};

use crate::bins::BinGrid;
use crate::parallel::{self, Exec};
use crate::position::ParticlePosition;

/// A copyable lookup handle borrowed from a built [`SpatialIndex`][crate::SpatialIndex].
///
/// Queries never write, so one handle can be shared by any number of threads.
#[derive(Copy, Clone, Debug)]
pub struct PointQuery<'a, const D: usize> {
    boxes: &'a [IndexBox<D>],
    offsets: &'a [u32],
    permutation: &'a [u32],
    bins: BinGrid<D>,
    geom: Geometry<D>,
    parallel_threshold: usize,
}

impl<'a, const D: usize> PointQuery<'a, D> {
    pub(crate) fn new(
        boxes: &'a [IndexBox<D>],
        offsets: &'a [u32],
        permutation: &'a [u32],
        bins: BinGrid<D>,
        geom: Geometry<D>,
        parallel_threshold: usize,
    ) -> Self {
        debug_assert_eq!(
            offsets.len(),
            bins.total_bins() + 1,
            "offsets must hold one entry per bin plus the total"
        );
        Self {
            boxes,
            offsets,
            permutation,
            bins,
            geom,
            parallel_threshold,
        }
    }

    /// Id of a box containing `cell`, or `None` if no box does.
    ///
    /// When boxes overlap, which of the containing boxes is returned depends on
    /// bucket order and is not specified.
    #[inline]
    pub fn locate_cell(&self, cell: IntVect<D>) -> Option<usize> {
        for bin in self.bins.neighborhood(cell) {
            let range = self.offsets[bin] as usize..self.offsets[bin + 1] as usize;
            for &id in &self.permutation[range] {
                if self.boxes[id as usize].contains(cell) {
                    return Some(id as usize);
                }
            }
        }
        None
    }

    /// Id of a box containing the cell under a physical point.
    ///
    /// Points with a NaN or infinite coordinate are never located.
    #[inline]
    pub fn locate<P: ParticlePosition<D>>(&self, p: &P) -> Option<usize> {
        self.locate_point(p.position())
    }

    /// Like [`PointQuery::locate`], after folding the point back into the domain
    /// along periodic axes.
    pub fn locate_wrapped<P: ParticlePosition<D>>(&self, p: &P) -> Option<usize> {
        let x = p.position();
        if !is_finite(&x) {
            return None;
        }
        self.locate_cell(self.geom.cell_of(self.geom.wrap_periodic(x)))
    }

    #[inline]
    pub(crate) fn locate_point(&self, x: [f64; D]) -> Option<usize> {
        if !is_finite(&x) {
            return None;
        }
        self.locate_cell(self.geom.cell_of(x))
    }

    /// Locate every point; entry `i` answers `points[i]`.
    pub fn assign_all<P: ParticlePosition<D> + Sync>(&self, points: &[P]) -> Vec<Option<usize>> {
        let exec = Exec::for_len(points.len(), self.parallel_threshold);
        parallel::map_collect(exec, points.len(), |i| self.locate(&points[i]))
    }

    /// The geometry used to convert points into cells.
    pub fn geometry(&self) -> &Geometry<D> {
        &self.geom
    }

    /// The bin grid this query scans.
    pub fn bins(&self) -> &BinGrid<D> {
        &self.bins
    }

    /// Number of boxes in the indexed level.
    pub fn num_boxes(&self) -> usize {
        self.boxes.len()
    }
}

/// Whether every coordinate is a finite number.
#[inline]
pub(crate) fn is_finite<const D: usize>(x: &[f64; D]) -> bool {
    x.iter().all(|c| c.is_finite())
}
