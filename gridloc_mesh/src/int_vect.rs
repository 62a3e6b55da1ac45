// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer cell coordinates.

use core::ops::{Add, Index, IndexMut, Sub};

/// A `D`-dimensional integer coordinate in index space.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntVect<const D: usize>([i32; D]);

impl<const D: usize> IntVect<D> {
    /// Create a vector from its components.
    pub const fn new(v: [i32; D]) -> Self {
        const { assert!(D >= 1 && D <= 3, "only 1, 2 and 3 dimensions are supported") };
        Self(v)
    }

    /// A vector with every component set to `v`.
    pub const fn splat(v: i32) -> Self {
        Self::new([v; D])
    }

    /// The origin.
    pub const fn zero() -> Self {
        Self::splat(0)
    }

    /// Components as an array.
    pub const fn as_array(&self) -> &[i32; D] {
        &self.0
    }

    /// Consume into the component array.
    pub const fn into_array(self) -> [i32; D] {
        self.0
    }

    /// Componentwise minimum.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self(core::array::from_fn(|d| self.0[d].min(other.0[d])))
    }

    /// Componentwise maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self(core::array::from_fn(|d| self.0[d].max(other.0[d])))
    }

    /// Whether every component of `self` is `<=` the matching component of `other`.
    pub fn all_le(&self, other: &Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }
}

impl<const D: usize> Default for IntVect<D> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const D: usize> From<[i32; D]> for IntVect<D> {
    fn from(v: [i32; D]) -> Self {
        Self::new(v)
    }
}

impl<const D: usize> Index<usize> for IntVect<D> {
    type Output = i32;

    fn index(&self, d: usize) -> &i32 {
        &self.0[d]
    }
}

impl<const D: usize> IndexMut<usize> for IntVect<D> {
    fn index_mut(&mut self, d: usize) -> &mut i32 {
        &mut self.0[d]
    }
}

impl<const D: usize> Add for IntVect<D> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|d| self.0[d] + rhs.0[d]))
    }
}

impl<const D: usize> Sub for IntVect<D> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|d| self.0[d] - rhs.0[d]))
    }
}
