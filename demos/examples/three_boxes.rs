// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-level lookups over three boxes tiling a 16x16 domain.
//!
//! Run:
//! - `cargo run -p gridloc_demos --example three_boxes`

use gridloc_index::SpatialIndex;
use gridloc_mesh::{BoxArray, Geometry, IndexBox, IntVect};

fn bx(lo: [i32; 2], hi: [i32; 2]) -> IndexBox<2> {
    IndexBox::from_half_open(IntVect::new(lo), IntVect::new(hi))
}

fn main() {
    let boxes = BoxArray::from_boxes([
        bx([0, 0], [8, 8]),
        bx([8, 0], [16, 8]),
        bx([0, 8], [16, 16]),
    ]);
    let geom = Geometry::new(bx([0, 0], [16, 16]), [0.0, 0.0], [1.0, 1.0]);

    let index = SpatialIndex::from_boxes(&boxes, &geom);
    let bins = index.bins().expect("built above");
    println!(
        "bins: lo {:?}, size {:?}, count {:?}",
        bins.bins_lo(),
        bins.bin_size(),
        bins.num_bins()
    );
    println!("offsets:     {:?}", index.offsets());
    println!("permutation: {:?}", index.permutation());

    let q = index.query();
    for cell in [[3, 3], [10, 3], [5, 12], [20, 20]] {
        match q.locate_cell(IntVect::new(cell)) {
            Some(id) => println!("cell {cell:?} -> box {id} {:?}", boxes[id]),
            None => println!("cell {cell:?} -> not found"),
        }
    }

    // With periodic x, a point past the upper face lands back in box 0.
    let mut index = index;
    index.set_geometry(&geom.with_periodicity([true, false]));
    let q = index.query();
    println!(
        "point [17.5, 2.0]: locate {:?}, locate_wrapped {:?}",
        q.locate(&[17.5, 2.0]),
        q.locate_wrapped(&[17.5, 2.0])
    );
}
