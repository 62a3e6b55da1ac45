// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for hierarchy construction and configuration.

use core::fmt;

/// Errors from [`HierarchicalIndex`][crate::HierarchicalIndex] operations that take per-level slices.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum HierarchyError {
    /// Two per-level inputs disagree on the number of levels.
    LevelCountMismatch {
        /// Levels implied by the box arrays (or by the existing build).
        expected: usize,
        /// Levels supplied by the other input.
        found: usize,
    },
}

impl fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LevelCountMismatch { expected, found } => {
                write!(f, "expected {expected} levels, found {found}")
            }
        }
    }
}

impl core::error::Error for HierarchyError {}

/// Errors from validating a [`HierarchyConfig`][crate::HierarchyConfig].
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration lists no levels.
    NoLevels,
    /// The dimension is not 1, 2, or 3.
    UnsupportedDimension(usize),
    /// A vector on some level has the wrong number of components.
    DimensionMismatch {
        /// Level index.
        level: usize,
        /// Which field was malformed.
        field: &'static str,
        /// Required number of components.
        expected: usize,
        /// Supplied number of components.
        found: usize,
    },
    /// A cell size is zero, negative, or not finite.
    InvalidCellSize {
        /// Level index.
        level: usize,
        /// Offending axis.
        axis: usize,
    },
    /// A box (or the domain, when `index` is `None`) covers no cells.
    EmptyBox {
        /// Level index.
        level: usize,
        /// Box index within the level, or `None` for the domain.
        index: Option<usize>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLevels => f.write_str("hierarchy has no levels"),
            Self::UnsupportedDimension(dim) => {
                write!(f, "unsupported dimension {dim}; expected 1, 2, or 3")
            }
            Self::DimensionMismatch {
                level,
                field,
                expected,
                found,
            } => write!(
                f,
                "level {level}: `{field}` has {found} components, expected {expected}"
            ),
            Self::InvalidCellSize { level, axis } => {
                write!(f, "level {level}: cell size on axis {axis} must be positive and finite")
            }
            Self::EmptyBox { level, index: None } => write!(f, "level {level}: domain is empty"),
            Self::EmptyBox {
                level,
                index: Some(i),
            } => write!(f, "level {level}: box {i} is empty"),
        }
    }
}

impl core::error::Error for ConfigError {}
