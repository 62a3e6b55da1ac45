// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build tuning and declarative hierarchy descriptions.

use alloc::vec::Vec;

use gridloc_mesh::{BoxArray, Geometry, IndexBox, IntVect};

use crate::error::ConfigError;
use crate::source::SimpleHierarchy;

/// Tuning knobs for [`SpatialIndex::build`][crate::SpatialIndex::build].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuildConfig {
    /// Work items (boxes during a build, points during batch assignment) below
    /// which everything runs on the calling thread.
    ///
    /// Has no effect without the `rayon` feature.
    pub parallel_threshold: usize,
}

impl BuildConfig {
    /// Default for [`BuildConfig::parallel_threshold`].
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

    /// Always run on the calling thread.
    pub const SEQUENTIAL: Self = Self {
        parallel_threshold: usize::MAX,
    };
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: Self::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// A box as a half-open range `[lo, hi)` of cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxConfig {
    /// First cell on each axis.
    pub lo: Vec<i32>,
    /// One past the last cell on each axis.
    pub hi: Vec<i32>,
}

/// One refinement level: its geometry and its boxes.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelConfig {
    /// Index-space domain of the level.
    pub domain: BoxConfig,
    /// Physical position of the domain's lower corner.
    pub prob_lo: Vec<f64>,
    /// Cell size on each axis.
    pub cell_size: Vec<f64>,
    /// Periodic axes. Empty means no periodic axes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub periodic: Vec<bool>,
    /// The level's boxes; box ids follow this order.
    pub boxes: Vec<BoxConfig>,
}

/// A whole hierarchy, coarsest level first.
///
/// With the `serde` feature this deserializes from documents such as:
///
/// ```json
/// {
///   "build": { "parallel_threshold": 4096 },
///   "levels": [
///     {
///       "domain": { "lo": [0, 0], "hi": [16, 16] },
///       "prob_lo": [0.0, 0.0],
///       "cell_size": [1.0, 1.0],
///       "boxes": [{ "lo": [0, 0], "hi": [16, 16] }]
///     }
///   ]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HierarchyConfig {
    /// Build tuning shared by all levels.
    #[cfg_attr(feature = "serde", serde(default))]
    pub build: BuildConfig,
    /// Levels, coarsest first.
    pub levels: Vec<LevelConfig>,
}

impl HierarchyConfig {
    /// Check the description and return its dimension.
    ///
    /// The dimension is taken from the coarsest level's domain; every vector on
    /// every level must agree with it.
    pub fn validate(&self) -> Result<usize, ConfigError> {
        let dim = self
            .levels
            .first()
            .map(|l| l.domain.lo.len())
            .ok_or(ConfigError::NoLevels)?;
        if !(1..=3).contains(&dim) {
            return Err(ConfigError::UnsupportedDimension(dim));
        }
        for (level, l) in self.levels.iter().enumerate() {
            l.validate(level, dim)?;
        }
        Ok(dim)
    }

    /// Validate and convert into per-level box arrays and geometries.
    ///
    /// Every call creates fresh [`BoxArray`]s, so an index built from one
    /// conversion is not valid for another.
    pub fn to_levels<const D: usize>(
        &self,
    ) -> Result<(Vec<BoxArray<D>>, Vec<Geometry<D>>), ConfigError> {
        let dim = self.validate()?;
        if dim != D {
            return Err(ConfigError::DimensionMismatch {
                level: 0,
                field: "domain.lo",
                expected: D,
                found: dim,
            });
        }
        Ok(self
            .levels
            .iter()
            .map(|l| (l.box_array(), l.geometry()))
            .unzip())
    }

    /// Validate and convert into a [`SimpleHierarchy`].
    pub fn to_hierarchy<const D: usize>(&self) -> Result<SimpleHierarchy<D>, ConfigError> {
        let (box_arrays, geoms) = self.to_levels::<D>()?;
        let mut h = SimpleHierarchy::new();
        for (ba, geom) in box_arrays.into_iter().zip(geoms) {
            h.push_level(ba, geom);
        }
        Ok(h)
    }
}

impl LevelConfig {
    fn validate(&self, level: usize, dim: usize) -> Result<(), ConfigError> {
        let check = |field: &'static str, found: usize| {
            if found == dim {
                Ok(())
            } else {
                Err(ConfigError::DimensionMismatch {
                    level,
                    field,
                    expected: dim,
                    found,
                })
            }
        };
        check("domain.lo", self.domain.lo.len())?;
        check("domain.hi", self.domain.hi.len())?;
        check("prob_lo", self.prob_lo.len())?;
        check("cell_size", self.cell_size.len())?;
        if !self.periodic.is_empty() {
            check("periodic", self.periodic.len())?;
        }
        if let Some(axis) = self
            .cell_size
            .iter()
            .position(|&dx| !(dx.is_finite() && dx > 0.0))
        {
            return Err(ConfigError::InvalidCellSize { level, axis });
        }
        if self.domain.is_empty() {
            return Err(ConfigError::EmptyBox { level, index: None });
        }
        for (i, b) in self.boxes.iter().enumerate() {
            check("boxes.lo", b.lo.len())?;
            check("boxes.hi", b.hi.len())?;
            if b.is_empty() {
                return Err(ConfigError::EmptyBox {
                    level,
                    index: Some(i),
                });
            }
        }
        Ok(())
    }

    fn geometry<const D: usize>(&self) -> Geometry<D> {
        let periodic = if self.periodic.is_empty() {
            [false; D]
        } else {
            core::array::from_fn(|d| self.periodic[d])
        };
        Geometry::new(
            self.domain.to_box(),
            core::array::from_fn(|d| self.prob_lo[d]),
            core::array::from_fn(|d| self.cell_size[d]),
        )
        .with_periodicity(periodic)
    }

    fn box_array<const D: usize>(&self) -> BoxArray<D> {
        BoxArray::from_boxes(self.boxes.iter().map(BoxConfig::to_box))
    }
}

impl BoxConfig {
    fn is_empty(&self) -> bool {
        self.lo.iter().zip(&self.hi).any(|(lo, hi)| lo >= hi)
    }

    fn to_box<const D: usize>(&self) -> IndexBox<D> {
        IndexBox::from_half_open(
            IntVect::new(core::array::from_fn(|d| self.lo[d])),
            IntVect::new(core::array::from_fn(|d| self.hi[d])),
        )
    }
}
