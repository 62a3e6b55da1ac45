// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-level bucket-sorted box index.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::sync::atomic::{AtomicU32, Ordering};

use gridloc_mesh::{BoxArray, Geometry, IndexBox};

use crate::bins::{BinGrid, Bounds};
use crate::config::BuildConfig;
use crate::parallel::{self, Exec};
use crate::query::PointQuery;

/// Bucket arrays for one build, in CSR layout.
struct Buckets<const D: usize> {
    boxes: BoxArray<D>,
    geom: Geometry<D>,
    bins: BinGrid<D>,
    // Bin each box is filed under.
    cell_of_box: Vec<u32>,
    // Boxes per bin.
    counts: Vec<u32>,
    // Exclusive prefix sum of `counts`, plus the total.
    offsets: Vec<u32>,
    // Box ids grouped by bin: bin `b` owns `offsets[b]..offsets[b + 1]`.
    permutation: Vec<u32>,
}

/// Point-to-box index over one level's [`BoxArray`].
///
/// A uniform bin grid is laid over the boxes, with bins as large as the largest
/// box, and each box is filed under the bin holding its lower corner. Lookups
/// then only inspect the boxes of at most `2^D` bins.
///
/// The index is undefined until [`SpatialIndex::build`] runs. Building again
/// replaces every array; the borrow checker keeps outstanding [`PointQuery`]
/// values from surviving that.
pub struct SpatialIndex<const D: usize> {
    config: BuildConfig,
    buckets: Option<Buckets<D>>,
}

impl<const D: usize> Debug for SpatialIndex<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut s = f.debug_struct("SpatialIndex");
        s.field("config", &self.config);
        match &self.buckets {
            Some(b) => s
                .field("boxes", &b.boxes.len())
                .field("bins", &b.bins)
                .field("geometry", &b.geom),
            None => s.field("defined", &false),
        };
        s.finish_non_exhaustive()
    }
}

impl<const D: usize> Default for SpatialIndex<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize> SpatialIndex<D> {
    /// Create an undefined index with the default [`BuildConfig`].
    pub fn new() -> Self {
        Self::with_config(BuildConfig::default())
    }

    /// Create an undefined index with explicit build tuning.
    pub fn with_config(config: BuildConfig) -> Self {
        Self {
            config,
            buckets: None,
        }
    }

    /// Create and build an index in one step.
    pub fn from_boxes(boxes: &BoxArray<D>, geom: &Geometry<D>) -> Self {
        let mut index = Self::new();
        index.build(boxes, geom);
        index
    }

    /// Build tuning used by [`SpatialIndex::build`].
    pub fn config(&self) -> BuildConfig {
        self.config
    }

    /// Whether [`SpatialIndex::build`] has run.
    pub fn is_defined(&self) -> bool {
        self.buckets.is_some()
    }

    /// Bucket-sort `boxes` and keep a reference to them for later validity checks.
    ///
    /// Discards any previous build. An empty array is valid and yields an index
    /// that never matches.
    ///
    /// # Panics
    ///
    /// Panics if `boxes` holds more than `u32::MAX` boxes, or if the bin grid
    /// would need more than `u32::MAX` bins (a few small boxes spread very far
    /// apart).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "SpatialIndex::build", fields(boxes = boxes.len()))
    )]
    pub fn build(&mut self, boxes: &BoxArray<D>, geom: &Geometry<D>) {
        let n = boxes.len();
        assert!(
            u32::try_from(n).is_ok(),
            "SpatialIndex supports at most u32::MAX boxes, got {n}"
        );
        let exec = Exec::for_len(n, self.config.parallel_threshold);
        let list = boxes.as_slice();

        let bounds = parallel::reduce(
            exec,
            n,
            Bounds::EMPTY,
            |i| Bounds::of(&list[i]),
            Bounds::merge,
        );
        let bins = BinGrid::from_bounds(bounds);
        let bin_count = bins
            .num_bins()
            .as_array()
            .iter()
            .try_fold(1_u32, |acc, &b| acc.checked_mul(b.unsigned_abs()));
        assert!(
            bin_count.is_some(),
            "SpatialIndex supports at most u32::MAX bins, got {:?} per axis",
            bins.num_bins()
        );
        let (cell_of_box, counts, offsets, permutation) = bucket_sort(exec, list, &bins);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            bins_lo = ?bins.bins_lo(),
            bins_hi = ?bins.bins_hi(),
            bin_size = ?bins.bin_size(),
            num_bins = ?bins.num_bins(),
            parallel = exec == Exec::Parallel,
            "bucket arrays built"
        );

        self.buckets = Some(Buckets {
            boxes: boxes.clone(),
            geom: *geom,
            bins,
            cell_of_box,
            counts,
            offsets,
            permutation,
        });
    }

    /// Replace the geometry used to turn points into cells, keeping the bucket arrays.
    pub fn set_geometry(&mut self, geom: &Geometry<D>) {
        debug_assert!(self.is_defined(), "set_geometry called before build");
        if let Some(b) = &mut self.buckets {
            b.geom = *geom;
        }
    }

    /// Whether this index was built from `boxes` itself (not merely equal boxes).
    pub fn is_valid(&self, boxes: &BoxArray<D>) -> bool {
        self.buckets
            .as_ref()
            .is_some_and(|b| BoxArray::same_refs(&b.boxes, boxes))
    }

    /// A lookup handle bound to the current build.
    ///
    /// # Panics
    ///
    /// Panics if the index has not been built.
    pub fn query(&self) -> PointQuery<'_, D> {
        self.try_query()
            .expect("SpatialIndex::query called before build")
    }

    /// A lookup handle bound to the current build, or `None` before the first build.
    pub fn try_query(&self) -> Option<PointQuery<'_, D>> {
        let b = self.buckets.as_ref()?;
        Some(PointQuery::new(
            b.boxes.as_slice(),
            &b.offsets,
            &b.permutation,
            b.bins,
            b.geom,
            self.config.parallel_threshold,
        ))
    }

    /// The indexed boxes.
    pub fn boxes(&self) -> Option<&BoxArray<D>> {
        self.buckets.as_ref().map(|b| &b.boxes)
    }

    /// The geometry used for point conversion.
    pub fn geometry(&self) -> Option<&Geometry<D>> {
        self.buckets.as_ref().map(|b| &b.geom)
    }

    /// The bin grid of the current build.
    pub fn bins(&self) -> Option<&BinGrid<D>> {
        self.buckets.as_ref().map(|b| &b.bins)
    }

    /// Bin each box is filed under, indexed by box id.
    pub fn cell_of_box(&self) -> &[u32] {
        self.buckets.as_ref().map_or(&[], |b| &b.cell_of_box)
    }

    /// Number of boxes per bin.
    pub fn counts(&self) -> &[u32] {
        self.buckets.as_ref().map_or(&[], |b| &b.counts)
    }

    /// Start of each bin in [`SpatialIndex::permutation`], followed by the box count.
    pub fn offsets(&self) -> &[u32] {
        self.buckets.as_ref().map_or(&[], |b| &b.offsets)
    }

    /// Box ids grouped by bin. Order within a bin is unspecified.
    pub fn permutation(&self) -> &[u32] {
        self.buckets.as_ref().map_or(&[], |b| &b.permutation)
    }
}

/// Counting sort of box ids by bin: histogram, exclusive scan, scatter.
///
/// Both the histogram and the scatter claim their slot with an atomic
/// increment, so boxes can be processed in any order on any thread; the only
/// order-dependent output is the position of ids within a bin.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Box ids and bin ids fit in u32; the caller checks both counts."
)]
fn bucket_sort<const D: usize>(
    exec: Exec,
    boxes: &[IndexBox<D>],
    bins: &BinGrid<D>,
) -> (Vec<u32>, Vec<u32>, Vec<u32>, Vec<u32>) {
    let n = boxes.len();
    let total = bins.total_bins();

    let cell_of_box: Vec<u32> =
        parallel::map_collect(exec, n, |i| bins.bin_of_box(&boxes[i]) as u32);

    let counts: Vec<AtomicU32> = (0..total).map(|_| AtomicU32::new(0)).collect();
    parallel::for_each(exec, n, |i| {
        counts[cell_of_box[i] as usize].fetch_add(1, Ordering::Relaxed);
    });
    let counts: Vec<u32> = counts.into_iter().map(AtomicU32::into_inner).collect();

    let offsets = parallel::exclusive_scan(&counts);

    let cursors: Vec<AtomicU32> = offsets[..total]
        .iter()
        .map(|&o| AtomicU32::new(o))
        .collect();
    let permutation: Vec<AtomicU32> = (0..n).map(|_| AtomicU32::new(0)).collect();
    parallel::for_each(exec, n, |i| {
        let slot = cursors[cell_of_box[i] as usize].fetch_add(1, Ordering::Relaxed);
        permutation[slot as usize].store(i as u32, Ordering::Relaxed);
    });
    let permutation = permutation
        .into_iter()
        .map(AtomicU32::into_inner)
        .collect();

    (cell_of_box, counts, offsets, permutation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use gridloc_mesh::IntVect;

    fn bx<const D: usize>(lo: [i32; D], hi: [i32; D]) -> IndexBox<D> {
        IndexBox::from_half_open(IntVect::new(lo), IntVect::new(hi))
    }

    fn geom<const D: usize>(n: i32) -> Geometry<D> {
        Geometry::new(bx([0; D], [n; D]), [0.0; D], [1.0; D])
    }

    /// Tiles `[0, n*size)^2` with `size`-wide squares, in row-major order.
    fn tiles(n: i32, size: i32) -> BoxArray<2> {
        BoxArray::from_boxes((0..n).flat_map(|i| {
            (0..n).map(move |j| bx([i * size, j * size], [(i + 1) * size, (j + 1) * size]))
        }))
    }

    fn check_bucket_invariants<const D: usize>(index: &SpatialIndex<D>) {
        let n = index.boxes().unwrap().len();
        let offsets = index.offsets();
        let counts = index.counts();
        let perm = index.permutation();
        assert_eq!(offsets.len(), counts.len() + 1);
        assert_eq!(offsets[0], 0);
        assert_eq!(*offsets.last().unwrap() as usize, n);
        for b in 0..counts.len() {
            assert!(offsets[b] <= offsets[b + 1], "offsets must be monotone");
            assert_eq!(offsets[b + 1] - offsets[b], counts[b]);
        }
        assert_eq!(perm.len(), n);
        for (i, &cell) in index.cell_of_box().iter().enumerate() {
            let range = offsets[cell as usize] as usize..offsets[cell as usize + 1] as usize;
            let hits = perm[range].iter().filter(|&&p| p as usize == i).count();
            assert_eq!(hits, 1, "box {i} must appear exactly once in bin {cell}");
        }
    }

    #[test]
    fn undefined_until_built() {
        let ba = tiles(2, 4);
        let mut index = SpatialIndex::<2>::new();
        assert!(!index.is_defined());
        assert!(index.try_query().is_none());
        assert!(!index.is_valid(&ba));
        assert!(index.offsets().is_empty());

        index.build(&ba, &geom(8));
        assert!(index.is_defined());
        assert!(index.is_valid(&ba));
        assert!(!index.is_valid(&tiles(2, 4)));
    }

    #[test]
    #[should_panic(expected = "called before build")]
    fn query_before_build_panics() {
        let index = SpatialIndex::<3>::new();
        let _ = index.query();
    }

    #[test]
    #[should_panic(expected = "at most u32::MAX bins")]
    fn too_many_bins_panics() {
        // Unit boxes 100000 cells apart need 100001^2 bins.
        let ba = BoxArray::from(vec![
            bx([0, 0], [1, 1]),
            bx([100_000, 100_000], [100_001, 100_001]),
        ]);
        let _ = SpatialIndex::from_boxes(&ba, &geom(8));
    }

    #[test]
    fn sparse_boxes_build_a_wide_grid() {
        // 65536 bins: unit boxes spread over a long 1D range.
        let ba = BoxArray::from(vec![bx([0], [1]), bx([65_535], [65_536])]);
        let index = SpatialIndex::from_boxes(&ba, &geom(8));
        assert_eq!(index.counts().len(), 65_536);
        check_bucket_invariants(&index);
        assert_eq!(index.query().locate_cell(IntVect::new([65_535])), Some(1));
    }

    #[test]
    fn bucket_arrays_are_consistent() {
        let index = SpatialIndex::from_boxes(&tiles(7, 3), &geom(21));
        check_bucket_invariants(&index);
        let bins = index.bins().unwrap();
        assert_eq!(bins.bin_size(), IntVect::new([3, 3]));
        assert_eq!(bins.num_bins(), IntVect::new([7, 7]));
        // One box per bin for a regular tiling.
        assert!(index.counts().iter().all(|&c| c == 1));
    }

    #[test]
    fn sequential_and_parallel_builds_agree() {
        // Mixed sizes so several boxes share bins.
        let ba = BoxArray::from_boxes((0..300).map(|i| {
            let x = (i * 7) % 97;
            let y = (i * 13) % 89;
            let w = 1 + i % 5;
            bx([x, y, 0], [x + w, y + 2, 1 + i % 3])
        }));
        let g = geom(128);

        let mut seq = SpatialIndex::with_config(BuildConfig::SEQUENTIAL);
        seq.build(&ba, &g);
        let mut par = SpatialIndex::with_config(BuildConfig {
            parallel_threshold: 0,
        });
        par.build(&ba, &g);

        check_bucket_invariants(&seq);
        check_bucket_invariants(&par);
        assert_eq!(seq.bins(), par.bins());
        assert_eq!(seq.cell_of_box(), par.cell_of_box());
        assert_eq!(seq.counts(), par.counts());
        assert_eq!(seq.offsets(), par.offsets());

        // Same multiset of ids per bin; order inside a bin is free.
        let offsets = seq.offsets();
        for b in 0..seq.counts().len() {
            let range = offsets[b] as usize..offsets[b + 1] as usize;
            let mut a = seq.permutation()[range.clone()].to_vec();
            let mut p = par.permutation()[range].to_vec();
            a.sort_unstable();
            p.sort_unstable();
            assert_eq!(a, p);
        }
    }

    #[test]
    fn empty_box_array_builds_degenerate_index() {
        let index = SpatialIndex::from_boxes(&BoxArray::<3>::new(), &geom(8));
        assert!(index.is_defined());
        assert_eq!(index.bins().unwrap().num_bins(), IntVect::splat(1));
        assert_eq!(index.counts(), [0]);
        assert_eq!(index.offsets(), [0, 0]);
        assert!(index.permutation().is_empty());
        assert_eq!(index.query().locate_cell(IntVect::zero()), None);
    }

    #[test]
    fn rebuild_replaces_previous_arrays() {
        let first = tiles(2, 8);
        let second = BoxArray::from(vec![bx([0, 0], [4, 4])]);
        let mut index = SpatialIndex::new();
        index.build(&first, &geom(16));
        assert_eq!(index.permutation().len(), 4);

        index.build(&second, &geom(16));
        assert_eq!(index.permutation(), [0]);
        assert!(index.is_valid(&second));
        assert!(!index.is_valid(&first));
        assert_eq!(index.query().locate_cell(IntVect::new([12, 12])), None);
    }

    #[test]
    fn set_geometry_keeps_buckets() {
        let ba = tiles(2, 8);
        let mut index = SpatialIndex::from_boxes(&ba, &geom(16));
        let before = (index.offsets().to_vec(), index.permutation().to_vec());
        assert_eq!(index.query().locate(&[9.5, 1.0]), Some(2));

        // Shift the physical origin by one box width.
        let shifted = Geometry::new(bx([0, 0], [16, 16]), [8.0, 0.0], [1.0, 1.0]);
        index.set_geometry(&shifted);
        assert_eq!(index.geometry(), Some(&shifted));
        assert_eq!(index.query().locate(&[9.5, 1.0]), Some(0));
        assert_eq!(before, (index.offsets().to_vec(), index.permutation().to_vec()));
        assert!(index.is_valid(&ba));
    }
}
