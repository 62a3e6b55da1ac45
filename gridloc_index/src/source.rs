// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Where a hierarchy's per-level boxes and geometries come from.

use alloc::vec::Vec;

use gridloc_mesh::{BoxArray, Geometry};

/// A source of per-level box arrays and geometries, coarsest level first.
///
/// Simulation drivers that already own their grid hierarchy implement this so
/// a [`HierarchicalIndex`][crate::HierarchicalIndex] can be built, validated,
/// and re-geometried straight from it.
pub trait LevelSource<const D: usize> {
    /// Number of levels, including level 0.
    fn num_levels(&self) -> usize;

    /// Boxes of level `lev`.
    fn box_array(&self, lev: usize) -> &BoxArray<D>;

    /// Geometry of level `lev`.
    fn geometry(&self, lev: usize) -> &Geometry<D>;
}

/// A plain, owned [`LevelSource`].
#[derive(Clone, Debug, Default)]
pub struct SimpleHierarchy<const D: usize> {
    levels: Vec<(BoxArray<D>, Geometry<D>)>,
}

impl<const D: usize> SimpleHierarchy<D> {
    /// An empty hierarchy.
    pub fn new() -> Self {
        Self { levels: Vec::new() }
    }

    /// Append a finer level.
    pub fn push_level(&mut self, boxes: BoxArray<D>, geom: Geometry<D>) {
        self.levels.push((boxes, geom));
    }

    /// Replace the boxes of an existing level, as after a regrid.
    ///
    /// # Panics
    ///
    /// Panics if `lev` is not an existing level.
    pub fn set_box_array(&mut self, lev: usize, boxes: BoxArray<D>) {
        self.levels[lev].0 = boxes;
    }

    /// Replace the geometry of an existing level.
    ///
    /// # Panics
    ///
    /// Panics if `lev` is not an existing level.
    pub fn set_geometry(&mut self, lev: usize, geom: Geometry<D>) {
        self.levels[lev].1 = geom;
    }

    /// Drop every level finer than `finest`.
    pub fn truncate(&mut self, finest: usize) {
        self.levels.truncate(finest + 1);
    }
}

impl<const D: usize> LevelSource<D> for SimpleHierarchy<D> {
    fn num_levels(&self) -> usize {
        self.levels.len()
    }

    fn box_array(&self, lev: usize) -> &BoxArray<D> {
        &self.levels[lev].0
    }

    fn geometry(&self, lev: usize) -> &Geometry<D> {
        &self.levels[lev].1
    }
}
