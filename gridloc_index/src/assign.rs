// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouping located points by the grid that owns them.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::amr::GridLocation;

/// Point indices bucketed by owning `(level, box)`.
///
/// Every input index lands in exactly one place: the list of its grid, or
/// [`GridAssignment::unassigned`]. Indices within each list are ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridAssignment {
    by_grid: HashMap<GridLocation, Vec<usize>>,
    unassigned: Vec<usize>,
}

impl GridAssignment {
    /// Group the answers of a batch lookup; entry `i` of `locations` answers point `i`.
    pub fn from_locations(locations: &[Option<GridLocation>]) -> Self {
        let mut out = Self::default();
        for (i, loc) in locations.iter().enumerate() {
            match loc {
                Some(loc) => out.by_grid.entry(*loc).or_default().push(i),
                None => out.unassigned.push(i),
            }
        }
        out
    }

    /// Points owned by `loc`, empty if none.
    pub fn get(&self, loc: GridLocation) -> &[usize] {
        self.by_grid.get(&loc).map_or(&[], Vec::as_slice)
    }

    /// Points no level claimed.
    pub fn unassigned(&self) -> &[usize] {
        &self.unassigned
    }

    /// Number of grids that received at least one point.
    pub fn num_grids(&self) -> usize {
        self.by_grid.len()
    }

    /// Number of points that were assigned to some grid.
    pub fn num_assigned(&self) -> usize {
        self.by_grid.values().map(Vec::len).sum()
    }

    /// Iterate `(grid, points)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (GridLocation, &[usize])> + '_ {
        self.by_grid.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Occupied grids sorted by level, then box id.
    pub fn sorted_grids(&self) -> Vec<GridLocation> {
        let mut grids: Vec<_> = self.by_grid.keys().copied().collect();
        grids.sort_unstable();
        grids
    }

    /// Split into the per-grid map and the unassigned list.
    pub fn into_parts(self) -> (HashMap<GridLocation, Vec<usize>>, Vec<usize>) {
        (self.by_grid, self.unassigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn at(level: usize, box_id: usize) -> Option<GridLocation> {
        Some(GridLocation { box_id, level })
    }

    #[test]
    fn each_index_lands_once() {
        let locs = vec![at(0, 1), None, at(1, 0), at(0, 1), None, at(1, 0), at(0, 0)];
        let g = GridAssignment::from_locations(&locs);
        assert_eq!(g.num_grids(), 3);
        assert_eq!(g.num_assigned() + g.unassigned().len(), locs.len());
        assert_eq!(g.get(GridLocation { box_id: 1, level: 0 }), [0, 3]);
        assert_eq!(g.get(GridLocation { box_id: 0, level: 1 }), [2, 5]);
        assert_eq!(g.unassigned(), [1, 4]);
        assert!(g.get(GridLocation { box_id: 9, level: 0 }).is_empty());

        let mut seen = vec![0_u32; locs.len()];
        for (_, pts) in g.iter() {
            for &i in pts {
                seen[i] += 1;
            }
        }
        for &i in g.unassigned() {
            seen[i] += 1;
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn grids_sort_coarse_first() {
        let g = GridAssignment::from_locations(&[at(1, 0), at(0, 2), at(0, 1)]);
        assert_eq!(
            g.sorted_grids(),
            [
                GridLocation { box_id: 1, level: 0 },
                GridLocation { box_id: 2, level: 0 },
                GridLocation { box_id: 0, level: 1 },
            ]
        );
    }

    #[test]
    fn empty_input() {
        let g = GridAssignment::from_locations(&[]);
        assert_eq!(g.num_grids(), 0);
        assert!(g.unassigned().is_empty());
        let (map, rest) = g.into_parts();
        assert!(map.is_empty() && rest.is_empty());
    }
}
