// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=gridloc_index --heading-base-level=0

//! Gridloc Index: find the box, and the refinement level, that owns a point.
//!
//! Particle codes on block-structured meshes constantly need to know which grid
//! a particle lives in: after every push, and after every re-partition of the
//! mesh. This crate answers that with a bucket-sorted index over each level's
//! boxes.
//!
//! - [`SpatialIndex`]: one level. A uniform bin grid, with bins as large as the
//!   largest box, is laid over the boxes, and each box is filed under the bin of
//!   its lower corner. Building is a counting sort driven by atomic increments
//!   and runs on the rayon pool for large box counts.
//! - [`PointQuery`]: a `Copy` lookup handle borrowed from a built index. Each
//!   lookup inspects the boxes of at most `2^D` bins.
//! - [`HierarchicalIndex`] and [`LevelCompositeQuery`]: one index per level,
//!   queried from the finest level down, so finer levels win where they overlay
//!   coarser ones.
//! - [`HierarchicalIndex::is_valid`] compares box arrays by identity, so a caller
//!   learns after a regrid whether a rebuild is due without diffing any boxes.
//!
//! Failed lookups are `None`. Single-point lookups never allocate or log.
//!
//! ## Features
//!
//! - `rayon` *(default)*: build bucket arrays and batch-assign points in parallel.
//!   Results are the same without it, apart from the order of ids inside a bin.
//! - `tracing`: spans and events from the build entry points.
//! - `serde`: `Serialize`/`Deserialize` for [`HierarchyConfig`] and friends.
//!
//! # Example
//!
//! ```rust
//! use gridloc_index::{GridLocation, HierarchicalIndex, SpatialIndex};
//! use gridloc_mesh::{BoxArray, Geometry, IndexBox, IntVect};
//!
//! let bx = |lo: [i32; 2], hi: [i32; 2]| IndexBox::from_half_open(IntVect::new(lo), IntVect::new(hi));
//!
//! // One level: three boxes tiling [0, 16)^2 with unit cells.
//! let coarse = BoxArray::from_boxes([bx([0, 0], [8, 8]), bx([8, 0], [16, 8]), bx([0, 8], [16, 16])]);
//! let g0 = Geometry::new(bx([0, 0], [16, 16]), [0.0, 0.0], [1.0, 1.0]);
//!
//! let index = SpatialIndex::from_boxes(&coarse, &g0);
//! let q = index.query();
//! assert_eq!(q.locate_cell(IntVect::new([3, 3])), Some(0));
//! assert_eq!(q.locate_cell(IntVect::new([10, 3])), Some(1));
//! assert_eq!(q.locate(&[5.5, 12.0]), Some(2));
//! assert_eq!(q.locate_cell(IntVect::new([20, 20])), None);
//!
//! // Add a finer level at half spacing over physical [4, 8)^2.
//! let fine = BoxArray::from_boxes([bx([8, 8], [16, 16])]);
//! let g1 = Geometry::new(bx([0, 0], [32, 32]), [0.0, 0.0], [0.5, 0.5]);
//! let levels = [coarse, fine];
//!
//! let mut amr = HierarchicalIndex::new();
//! amr.build(&levels, &[g0, g1]).unwrap();
//! let q = amr.query();
//! assert_eq!(q.locate(&[5.0, 5.0]), Some(GridLocation { level: 1, box_id: 0 }));
//! assert_eq!(q.locate(&[2.0, 5.0]), Some(GridLocation { level: 0, box_id: 0 }));
//! assert!(amr.is_valid(&levels));
//! ```

#![no_std]

extern crate alloc;

mod amr;
mod assign;
mod bins;
mod config;
mod error;
mod locator;
mod parallel;
mod position;
mod query;
mod source;

pub use amr::{GridLocation, HierarchicalIndex, LevelCompositeQuery};
pub use assign::GridAssignment;
pub use bins::BinGrid;
pub use config::{BoxConfig, BuildConfig, HierarchyConfig, LevelConfig};
pub use error::{ConfigError, HierarchyError};
pub use locator::SpatialIndex;
pub use position::ParticlePosition;
pub use query::PointQuery;
pub use source::{LevelSource, SimpleHierarchy};
