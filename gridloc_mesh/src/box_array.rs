// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared, immutable per-level box lists.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Index;

use crate::IndexBox;

/// One level's domain decomposition: an ordered list of boxes.
///
/// The list is immutable once created and cheap to clone. Clones share the
/// same backing storage, so [`BoxArray::same_refs`] can tell "this is still
/// the partition I indexed" apart from "the grids were regenerated" without
/// comparing boxes.
#[derive(Clone, Debug)]
pub struct BoxArray<const D: usize> {
    boxes: Arc<[IndexBox<D>]>,
}

impl<const D: usize> BoxArray<D> {
    /// An array with no boxes.
    pub fn new() -> Self {
        Self {
            boxes: Arc::from(Vec::new()),
        }
    }

    /// Collect boxes into a new array with its own identity.
    pub fn from_boxes<I: IntoIterator<Item = IndexBox<D>>>(boxes: I) -> Self {
        Self {
            boxes: boxes.into_iter().collect(),
        }
    }

    /// Number of boxes.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether the array holds no boxes.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// The box with id `i`, if any.
    pub fn get(&self, i: usize) -> Option<&IndexBox<D>> {
        self.boxes.get(i)
    }

    /// Iterate boxes in id order.
    pub fn iter(&self) -> core::slice::Iter<'_, IndexBox<D>> {
        self.boxes.iter()
    }

    /// The boxes as a slice; box ids are slice indices.
    pub fn as_slice(&self) -> &[IndexBox<D>] {
        &self.boxes
    }

    /// Whether `a` and `b` are the same array (not merely equal contents).
    pub fn same_refs(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.boxes, &b.boxes)
    }
}

impl<const D: usize> Default for BoxArray<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize> Index<usize> for BoxArray<D> {
    type Output = IndexBox<D>;

    fn index(&self, i: usize) -> &IndexBox<D> {
        &self.boxes[i]
    }
}

impl<const D: usize> From<Vec<IndexBox<D>>> for BoxArray<D> {
    fn from(boxes: Vec<IndexBox<D>>) -> Self {
        Self {
            boxes: Arc::from(boxes),
        }
    }
}

impl<'a, const D: usize> IntoIterator for &'a BoxArray<D> {
    type Item = &'a IndexBox<D>;
    type IntoIter = core::slice::Iter<'a, IndexBox<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}
