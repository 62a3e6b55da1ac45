// Copyright 2025 the Gridloc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locate random particles in a three-level hierarchy loaded from JSON.
//!
//! Run:
//! - `cargo run -p gridloc_demos --example amr_hierarchy`
//! - `RUST_LOG=gridloc_index=debug cargo run -p gridloc_demos --example amr_hierarchy -- path/to/hierarchy.json`

use std::error::Error;

use gridloc_index::{GridLocation, HierarchicalIndex, HierarchyConfig, LevelSource};
use gridloc_mesh::{BoxArray, IndexBox, IntVect};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_HIERARCHY: &str = include_str!("../data/hierarchy.json");

/// Particle with a position and some payload the index never looks at.
#[derive(Clone, Debug)]
struct Particle {
    pos: [f64; 3],
    #[allow(dead_code, reason = "Carried along to show the index only reads positions.")]
    mass: f64,
}

impl gridloc_index::ParticlePosition<3> for Particle {
    fn position(&self) -> [f64; 3] {
        self.pos
    }
}

struct Rng(u64);

impl Rng {
    fn next_f64(&mut self) -> f64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        ((x >> 11) as f64) / ((1_u64 << 53) as f64)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amr_hierarchy=info,gridloc_index=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_HIERARCHY.to_owned(),
    };
    let config: HierarchyConfig = serde_json::from_str(&text)?;
    let mut hierarchy = config.to_hierarchy::<3>()?;
    tracing::info!(levels = hierarchy.num_levels(), "hierarchy loaded");

    let mut index = HierarchicalIndex::with_config(config.build);
    index.build_from(&hierarchy);

    let extent = hierarchy.geometry(0).prob_hi();
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    let particles: Vec<Particle> = (0..200_000)
        .map(|_| Particle {
            // Overshoot each axis by 10% so some particles leave the domain.
            pos: extent.map(|hi| (rng.next_f64() * 1.2 - 0.1) * hi),
            mass: rng.next_f64(),
        })
        .collect();

    report(&index, &particles);

    // Periodic axes fold back in; only particles outside in z stay unassigned.
    let q = index.query();
    let wrapped = particles
        .iter()
        .filter(|p| q.locate_wrapped(*p).is_some())
        .count();
    drop(q);
    tracing::info!(wrapped, "assigned after periodic wrap");

    // Regrid: the finest level moves. The old index is now stale.
    hierarchy.set_box_array(
        2,
        BoxArray::from_boxes([IndexBox::from_half_open(
            IntVect::new([144, 144, 144]),
            IntVect::new([176, 176, 176]),
        )]),
    );
    tracing::info!(valid = index.is_valid_for(&hierarchy), "after regrid");
    index.build_from(&hierarchy);
    tracing::info!(valid = index.is_valid_for(&hierarchy), "after rebuild");
    report(&index, &particles);

    Ok(())
}

fn report(index: &HierarchicalIndex<3>, particles: &[Particle]) {
    let groups = index.query().group_by_grid(particles);
    for GridLocation { level, box_id } in groups.sorted_grids() {
        let n = groups.get(GridLocation { level, box_id }).len();
        tracing::info!(lev = level, box_id, particles = n, "grid");
    }
    tracing::info!(
        assigned = groups.num_assigned(),
        unassigned = groups.unassigned().len(),
        "particles grouped"
    );
}
