// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extracting physical positions from caller-owned point types.

/// Anything with a physical position in `D` dimensions.
///
/// Implement this for particle structs (or views into structure-of-arrays
/// storage) so queries can locate them directly.
///
/// ```rust
/// use gridloc_index::ParticlePosition;
///
/// struct Tracer {
///     pos: [f32; 3],
///     _weight: f32,
/// }
///
/// impl ParticlePosition<3> for Tracer {
///     fn position(&self) -> [f64; 3] {
///         self.pos.map(f64::from)
///     }
/// }
/// ```
pub trait ParticlePosition<const D: usize> {
    /// Physical coordinates of the point.
    fn position(&self) -> [f64; D];
}

impl<const D: usize> ParticlePosition<D> for [f64; D] {
    #[inline]
    fn position(&self) -> [f64; D] {
        *self
    }
}

impl<const D: usize> ParticlePosition<D> for [f32; D] {
    #[inline]
    fn position(&self) -> [f64; D] {
        self.map(f64::from)
    }
}

impl<const D: usize, P: ParticlePosition<D>> ParticlePosition<D> for &P {
    #[inline]
    fn position(&self) -> [f64; D] {
        (**self).position()
    }
}
