// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=gridloc_mesh --heading-base-level=0

//! Gridloc Mesh: index-space primitives for block-structured AMR meshes.
//!
//! This crate holds the small value types that the point-location index in
//! `gridloc_index` is built on:
//!
//! - [`IntVect`]: a `D`-dimensional integer cell coordinate.
//! - [`IndexBox`]: an axis-aligned box of cells with inclusive bounds.
//! - [`BoxArray`]: one level's immutable, shared list of boxes. Clones share identity,
//!   which lets callers detect a re-partition by reference comparison alone.
//! - [`Geometry`]: the affine mapping between physical space and index space, plus
//!   periodicity.
//!
//! The dimension is a const generic. Only `D` in `1..=3` is supported; other values
//! fail to compile as soon as a vector is constructed.
//!
//! # Example
//!
//! ```rust
//! use gridloc_mesh::{BoxArray, Geometry, IndexBox, IntVect};
//!
//! let domain = IndexBox::from_half_open(IntVect::new([0, 0]), IntVect::new([16, 16]));
//! let geom = Geometry::new(domain, [0.0, 0.0], [1.0, 1.0]);
//!
//! let boxes = BoxArray::from_boxes([
//!     IndexBox::from_half_open(IntVect::new([0, 0]), IntVect::new([8, 16])),
//!     IndexBox::from_half_open(IntVect::new([8, 0]), IntVect::new([16, 16])),
//! ]);
//!
//! let cell = geom.cell_of([9.5, 3.25]);
//! assert_eq!(cell, IntVect::new([9, 3]));
//! assert!(boxes[1].contains(cell));
//!
//! // Clones share identity; a rebuilt array with equal boxes does not.
//! let same = boxes.clone();
//! let rebuilt = BoxArray::from_boxes(boxes.iter().copied());
//! assert!(BoxArray::same_refs(&boxes, &same));
//! assert!(!BoxArray::same_refs(&boxes, &rebuilt));
//! ```

#![no_std]

extern crate alloc;

mod box_array;
mod geometry;
mod index_box;
mod int_vect;

pub use box_array::BoxArray;
pub use geometry::Geometry;
pub use index_box::IndexBox;
pub use int_vect::IntVect;
