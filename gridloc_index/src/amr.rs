// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point location across a refinement hierarchy, finest level first.

use alloc::vec::Vec;

use gridloc_mesh::{BoxArray, Geometry};
use smallvec::SmallVec;

use crate::assign::GridAssignment;
use crate::config::BuildConfig;
use crate::error::HierarchyError;
use crate::locator::SpatialIndex;
use crate::parallel::{self, Exec};
use crate::position::ParticlePosition;
use crate::query::{PointQuery, is_finite};
use crate::source::LevelSource;

/// The grid that owns a point: a box on a level.
///
/// Orders by level, then box id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridLocation {
    /// Refinement level, 0 being the coarsest.
    pub level: usize,
    /// Box id within that level's [`BoxArray`].
    pub box_id: usize,
}

impl GridLocation {
    /// Flat encoding of a failed lookup, for both fields.
    pub const NOT_FOUND_RAW: i64 = -1;

    /// Encode a lookup result as `(box_id, level)`, with `(-1, -1)` for `None`.
    #[allow(
        clippy::cast_possible_wrap,
        reason = "Box ids are bounded by u32::MAX and levels are few."
    )]
    pub fn to_raw(loc: Option<Self>) -> (i64, i64) {
        match loc {
            Some(l) => (l.box_id as i64, l.level as i64),
            None => (Self::NOT_FOUND_RAW, Self::NOT_FOUND_RAW),
        }
    }

    /// Decode `(box_id, level)`; any negative component means not found.
    pub fn from_raw(box_id: i64, level: i64) -> Option<Self> {
        Some(Self {
            level: usize::try_from(level).ok()?,
            box_id: usize::try_from(box_id).ok()?,
        })
    }
}

/// Per-level [`PointQuery`] handles, coarsest first, queried finest first.
///
/// Finer levels overlay the coarser ones, so the first level that claims a
/// point owns it.
#[derive(Clone, Debug)]
pub struct LevelCompositeQuery<'a, const D: usize> {
    levels: SmallVec<[PointQuery<'a, D>; 4]>,
    parallel_threshold: usize,
}

impl<'a, const D: usize> LevelCompositeQuery<'a, D> {
    /// Compose per-level handles, index 0 being the coarsest level.
    pub fn new(levels: impl IntoIterator<Item = PointQuery<'a, D>>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
            parallel_threshold: BuildConfig::DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Override when batch lookups go parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Owner of `p` on the finest level that has one.
    ///
    /// Points with a NaN or infinite coordinate are never located.
    pub fn locate<P: ParticlePosition<D>>(&self, p: &P) -> Option<GridLocation> {
        let x = p.position();
        if !is_finite(&x) {
            return None;
        }
        self.levels.iter().enumerate().rev().find_map(|(level, q)| {
            q.locate_point(x).map(|box_id| GridLocation { level, box_id })
        })
    }

    /// Like [`LevelCompositeQuery::locate`], folding `p` into each level's
    /// domain along its periodic axes first.
    pub fn locate_wrapped<P: ParticlePosition<D>>(&self, p: &P) -> Option<GridLocation> {
        if !is_finite(&p.position()) {
            return None;
        }
        self.levels.iter().enumerate().rev().find_map(|(level, q)| {
            q.locate_wrapped(p).map(|box_id| GridLocation { level, box_id })
        })
    }

    /// Number of levels.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// The single-level handle for `lev`, if that level exists.
    pub fn level(&self, lev: usize) -> Option<&PointQuery<'a, D>> {
        self.levels.get(lev)
    }

    /// Locate every point; entry `i` answers `points[i]`.
    pub fn assign_all<P: ParticlePosition<D> + Sync>(
        &self,
        points: &[P],
    ) -> Vec<Option<GridLocation>> {
        let exec = Exec::for_len(points.len(), self.parallel_threshold);
        parallel::map_collect(exec, points.len(), |i| self.locate(&points[i]))
    }

    /// Locate every point and group the indices by owning grid.
    pub fn group_by_grid<P: ParticlePosition<D> + Sync>(&self, points: &[P]) -> GridAssignment {
        GridAssignment::from_locations(&self.assign_all(points))
    }
}

/// One [`SpatialIndex`] per refinement level.
///
/// Build it from the current box arrays, check [`HierarchicalIndex::is_valid`]
/// after every regrid, and rebuild when that turns false.
#[derive(Debug, Default)]
pub struct HierarchicalIndex<const D: usize> {
    locators: Vec<SpatialIndex<D>>,
    config: BuildConfig,
    defined: bool,
}

impl<const D: usize> HierarchicalIndex<D> {
    /// An undefined index with the default [`BuildConfig`].
    pub fn new() -> Self {
        Self::with_config(BuildConfig::default())
    }

    /// An undefined index whose levels use `config`.
    pub fn with_config(config: BuildConfig) -> Self {
        Self {
            locators: Vec::new(),
            config,
            defined: false,
        }
    }

    /// Whether [`HierarchicalIndex::build`] has succeeded.
    pub fn is_defined(&self) -> bool {
        self.defined
    }

    /// Build every level, coarsest first, replacing any previous build.
    ///
    /// Nothing changes if the slices disagree on the level count. Zero levels
    /// is accepted and gives an index that locates nothing.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "HierarchicalIndex::build", fields(levels = box_arrays.len()))
    )]
    pub fn build(
        &mut self,
        box_arrays: &[BoxArray<D>],
        geoms: &[Geometry<D>],
    ) -> Result<(), HierarchyError> {
        if box_arrays.len() != geoms.len() {
            return Err(HierarchyError::LevelCountMismatch {
                expected: box_arrays.len(),
                found: geoms.len(),
            });
        }
        self.build_levels(box_arrays.iter().zip(geoms));
        Ok(())
    }

    /// Build from a [`LevelSource`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "HierarchicalIndex::build_from", fields(levels = source.num_levels()))
    )]
    pub fn build_from<S: LevelSource<D> + ?Sized>(&mut self, source: &S) {
        let levels = (0..source.num_levels()).map(|lev| (source.box_array(lev), source.geometry(lev)));
        self.build_levels(levels);
    }

    /// Rebuild one locator per `(boxes, geometry)` pair, dropping any extra levels.
    fn build_levels<'s>(
        &mut self,
        levels: impl ExactSizeIterator<Item = (&'s BoxArray<D>, &'s Geometry<D>)>,
    ) {
        let config = self.config;
        let n = levels.len();
        self.locators.truncate(n);
        self.locators.resize_with(n, || SpatialIndex::with_config(config));
        for (locator, (ba, geom)) in self.locators.iter_mut().zip(levels) {
            locator.build(ba, geom);
        }
        self.defined = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            levels = n,
            boxes = self
                .locators
                .iter()
                .filter_map(SpatialIndex::boxes)
                .map(BoxArray::len)
                .sum::<usize>(),
            "hierarchy built"
        );
    }

    /// Whether every level was built from exactly the given box arrays.
    ///
    /// False before the first build, for a zero-level build, and when the
    /// number of levels differs.
    pub fn is_valid(&self, box_arrays: &[BoxArray<D>]) -> bool {
        self.defined
            && !self.locators.is_empty()
            && self.locators.len() == box_arrays.len()
            && self
                .locators
                .iter()
                .zip(box_arrays)
                .all(|(locator, ba)| locator.is_valid(ba))
    }

    /// [`HierarchicalIndex::is_valid`] against a [`LevelSource`].
    pub fn is_valid_for<S: LevelSource<D> + ?Sized>(&self, source: &S) -> bool {
        self.defined
            && self.locators.len() == source.num_levels()
            && !self.locators.is_empty()
            && self
                .locators
                .iter()
                .enumerate()
                .all(|(lev, locator)| locator.is_valid(source.box_array(lev)))
    }

    /// Swap in new geometries without re-sorting any boxes.
    pub fn set_geometry(&mut self, geoms: &[Geometry<D>]) -> Result<(), HierarchyError> {
        if geoms.len() != self.locators.len() {
            return Err(HierarchyError::LevelCountMismatch {
                expected: self.locators.len(),
                found: geoms.len(),
            });
        }
        for (locator, geom) in self.locators.iter_mut().zip(geoms) {
            locator.set_geometry(geom);
        }
        Ok(())
    }

    /// [`HierarchicalIndex::set_geometry`] from a [`LevelSource`].
    pub fn set_geometry_from<S: LevelSource<D> + ?Sized>(
        &mut self,
        source: &S,
    ) -> Result<(), HierarchyError> {
        if source.num_levels() != self.locators.len() {
            return Err(HierarchyError::LevelCountMismatch {
                expected: self.locators.len(),
                found: source.num_levels(),
            });
        }
        for (lev, locator) in self.locators.iter_mut().enumerate() {
            locator.set_geometry(source.geometry(lev));
        }
        Ok(())
    }

    /// A finest-first lookup handle over the current build.
    ///
    /// Must not be called before [`HierarchicalIndex::build`]; in release builds
    /// an undefined index yields a handle that locates nothing.
    pub fn query(&self) -> LevelCompositeQuery<'_, D> {
        debug_assert!(self.defined, "HierarchicalIndex::query called before build");
        LevelCompositeQuery::new(self.locators.iter().filter_map(SpatialIndex::try_query))
            .with_parallel_threshold(self.config.parallel_threshold)
    }

    /// Number of built levels.
    pub fn num_levels(&self) -> usize {
        self.locators.len()
    }

    /// The index of level `lev`.
    pub fn level(&self, lev: usize) -> Option<&SpatialIndex<D>> {
        self.locators.get(lev)
    }
}
