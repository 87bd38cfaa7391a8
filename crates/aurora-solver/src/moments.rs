//! Velocity-moment integration.

use aurora_core::{CellStore, MomentSlot, Moments, SpatialCell, VelocityGrid, BLOCK_VOLUME, BLOCK_WIDTH};

/// Integrate density and momentum over all blocks of a cell.
///
/// Idempotent: the result depends only on the current distribution.
pub fn compute(cell: &SpatialCell, grid: &VelocityGrid) -> Moments {
    let mut m = Moments::zero();
    for (&id, block) in &cell.blocks {
        let bc = grid.block_coords(id);
        for index in 0..BLOCK_VOLUME {
            let value = block.values[index];
            if value == 0.0 {
                continue;
            }
            let off = [
                index % BLOCK_WIDTH,
                (index / BLOCK_WIDTH) % BLOCK_WIDTH,
                index / (BLOCK_WIDTH * BLOCK_WIDTH),
            ];
            m.rho += value;
            for axis in 0..3 {
                let g = bc[axis] * BLOCK_WIDTH as u32 + off[axis] as u32;
                m.rho_v[axis] += value * grid.cell_center(axis, g);
            }
        }
    }
    let dvol = grid.cell_volume();
    m.rho *= dvol;
    for v in &mut m.rho_v {
        *v *= dvol;
    }
    m
}

/// Integrate one cell into the designated moment slot, ignoring any
/// skip policy.
pub fn integrate_cell(cell: &mut SpatialCell, grid: &VelocityGrid, slot: MomentSlot) {
    *cell.params.slot_mut(slot) = compute(cell, grid);
}

/// Integrate every locally-owned cell, boundary cells included.
pub fn integrate_all(store: &mut CellStore, grid: &VelocityGrid, slot: MomentSlot) {
    for cell in store.map_mut().values_mut() {
        if cell.is_halo {
            continue;
        }
        integrate_cell(cell, grid, slot);
    }
}

/// Integrate locally-owned cells under the default skip policy
/// (ordinary and first-layer boundary cells only).
pub fn integrate_default(store: &mut CellStore, grid: &VelocityGrid, slot: MomentSlot) {
    for cell in store.map_mut().values_mut() {
        if cell.is_halo || !cell.is_flux_eligible() {
            continue;
        }
        integrate_cell(cell, grid, slot);
    }
}

/// Write time-centered moments: the mean of the post-acceleration and
/// post-translation slots, into `raw`, for ordinary cells.
pub fn interpolated(store: &mut CellStore) {
    for cell in store.map_mut().values_mut() {
        if cell.is_halo || !cell.boundary.is_ordinary() {
            continue;
        }
        cell.params.moments =
            Moments::mean(&cell.params.moments_v, &cell.params.moments_r);
    }
}

/// Total density over locally-owned cells. Used by conservation checks.
pub fn total_density(store: &CellStore, grid: &VelocityGrid) -> f64 {
    store
        .map()
        .values()
        .filter(|c| !c.is_halo)
        .map(|c| compute(c, grid).rho)
        .sum()
}
