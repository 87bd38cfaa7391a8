//! Spatial flux computation.
//!
//! Each eligible cell computes the flux through its *lower* face per
//! spatial axis and velocity cell, with a donor-cell upwind term plus a
//! van-Leer-limited correction, and scatters `±F·dt/dx` into the flux
//! accumulators of itself and its lower neighbor. The upper face is
//! someone else's lower face, except when the upper neighbor is
//! replicated; then the cell closes its own upper face against a ghost
//! copy of itself. A uniform distribution therefore accumulates exactly
//! zero net flux.
//!
//! Computation is split into a read-only phase producing
//! [`PendingContribution`]s and a write phase applying them, so the
//! store is never aliased mutably while neighbor values are being read.

use aurora_core::{
    BlockId, CellId, CellStore, NeighborRef, SpatialCell, VelocityBlock, VelocityGrid,
    BLOCK_VOLUME, BLOCK_WIDTH,
};
use indexmap::IndexSet;

use crate::limiter::van_leer;

/// One deferred addition to a flux accumulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingContribution {
    /// Receiving cell (local or halo).
    pub cell: CellId,
    /// Receiving block.
    pub block: BlockId,
    /// Velocity cell within the block.
    pub index: usize,
    /// Signed `F · dt / dx` increment.
    pub delta: f64,
}

/// Read the value of `block[index]` in the cell a neighbor reference
/// resolves to. Replicated neighbors read the cell's own value; absent
/// cells and absent blocks read zero.
fn neighbor_value(
    store: &CellStore,
    me: &SpatialCell,
    nref: Option<&NeighborRef>,
    block: BlockId,
    index: usize,
) -> f64 {
    let id = match nref {
        Some(NeighborRef::Replicated) | None => {
            return me.blocks.get(&block).map_or(0.0, |b| b.values[index]);
        }
        Some(r) => r.cell_id(me.id),
    };
    store
        .get(id)
        .and_then(|c| c.blocks.get(&block))
        .map_or(0.0, |b| b.values[index])
}

/// Limited upwind flux through a lower face.
///
/// `f_m2, f_m1, f_c, f_p1` are the distribution values at offsets
/// −2, −1, 0, +1 along the axis; `w` is the advecting velocity and
/// `courant` is `w·dt/dx`.
#[inline]
fn face_flux(w: f64, courant: f64, f_m2: f64, f_m1: f64, f_c: f64, f_p1: f64) -> f64 {
    let delta = f_c - f_m1;
    let (upwind, r) = if w >= 0.0 {
        (f_m1, (f_m1 - f_m2) / delta)
    } else {
        (f_c, (f_p1 - f_c) / delta)
    };
    let correction = if delta != 0.0 {
        0.5 * w.abs() * (1.0 - courant.abs()) * van_leer(r) * delta
    } else {
        0.0
    };
    w * upwind + correction
}

/// Compute the flux contributions of `cells` for a step of length `dt`.
///
/// Pure read phase: the store is untouched. Ineligible cells in the
/// list are skipped.
pub fn compute_flux_contributions(
    store: &CellStore,
    grid: &VelocityGrid,
    cells: &[CellId],
    dt: f64,
) -> Vec<PendingContribution> {
    let mut pending = Vec::new();
    for &id in cells {
        let cell = match store.get(id) {
            Some(c) if c.is_flux_eligible() => c,
            _ => continue,
        };
        for axis in 0..3 {
            let dx = cell.params.dx[axis];
            let lower = cell.face_neighbor(axis, -1);
            let upper = cell.face_neighbor(axis, 1);
            let second = cell.second_lower(axis);
            let lower_replicated = matches!(lower, Some(NeighborRef::Replicated) | None);
            let upper_replicated = matches!(upper, Some(NeighborRef::Replicated) | None);

            // The lower face carries flux wherever the cell *or* its
            // lower neighbor has content, so walk the union of both
            // block sets; absent blocks read zero.
            let mut block_ids: IndexSet<BlockId> = cell.blocks.keys().copied().collect();
            if !lower_replicated {
                let lower_id = lower.map_or(id, |r| r.cell_id(id));
                if let Some(n) = store.get(lower_id) {
                    block_ids.extend(n.blocks.keys().copied());
                }
            }

            for &block_id in &block_ids {
                let own = cell.blocks.get(&block_id);
                let bc = grid.block_coords(block_id);
                for index in 0..BLOCK_VOLUME {
                    let f_c = own.map_or(0.0, |b| b.values[index]);
                    let off = [
                        index % BLOCK_WIDTH,
                        (index / BLOCK_WIDTH) % BLOCK_WIDTH,
                        index / (BLOCK_WIDTH * BLOCK_WIDTH),
                    ];
                    let g = bc[axis] * BLOCK_WIDTH as u32 + off[axis] as u32;
                    let w = grid.cell_center(axis, g);
                    if w == 0.0 {
                        continue;
                    }
                    let courant = w * dt / dx;

                    let f_m1 = neighbor_value(store, cell, lower, block_id, index);
                    let f_m2 = neighbor_value(store, cell, second, block_id, index);
                    let f_p1 = neighbor_value(store, cell, upper, block_id, index);

                    let flux = face_flux(w, courant, f_m2, f_m1, f_c, f_p1);
                    if flux != 0.0 {
                        pending.push(PendingContribution {
                            cell: id,
                            block: block_id,
                            index,
                            delta: flux * dt / dx,
                        });
                        if !lower_replicated {
                            // lower is Local or Remote when !lower_replicated
                            let target = lower.map_or(id, |r| r.cell_id(id));
                            pending.push(PendingContribution {
                                cell: target,
                                block: block_id,
                                index,
                                delta: -flux * dt / dx,
                            });
                        }
                    }

                    // Nobody owns our upper face when the neighbor is
                    // replicated; close it against a ghost of ourselves.
                    // With equal values the limited flux reduces to w·f.
                    if upper_replicated && f_c != 0.0 {
                        pending.push(PendingContribution {
                            cell: id,
                            block: block_id,
                            index,
                            delta: -w * f_c * dt / dx,
                        });
                    }
                }
            }
        }
    }
    pending
}

/// Apply deferred contributions to the flux accumulators.
///
/// Blocks the scatter reaches but the target cell lacks are allocated,
/// up to `max_blocks` per cell; past the budget the contribution is
/// dropped (the conservation check reports the loss).
pub fn apply_contributions(
    store: &mut CellStore,
    pending: &[PendingContribution],
    max_blocks: usize,
) {
    for p in pending {
        let Some(cell) = store.get_mut(p.cell) else {
            continue;
        };
        match cell.blocks.get_mut(&p.block) {
            Some(block) => block.flux[p.index] += p.delta,
            None => {
                if cell.blocks.len() < max_blocks {
                    let mut block = VelocityBlock::new();
                    block.flux[p.index] = p.delta;
                    cell.blocks.insert(p.block, block);
                }
            }
        }
    }
}

/// Update a cell's spatial CFL bound: the tightest `dx_a / |v_a|` over
/// all allocated block corner velocities and axes.
pub fn update_spatial_cfl(cell: &mut SpatialCell, grid: &VelocityGrid) {
    let mut bound = f64::INFINITY;
    for &block_id in cell.blocks.keys() {
        let bc = grid.block_coords(block_id);
        for axis in 0..3 {
            let lo = grid.cell_lower(axis, bc[axis] * BLOCK_WIDTH as u32);
            let hi = grid.cell_lower(axis, (bc[axis] + 1) * BLOCK_WIDTH as u32);
            let vmax = lo.abs().max(hi.abs());
            if vmax > 0.0 {
                bound = bound.min(cell.params.dx[axis] / vmax);
            }
        }
    }
    cell.params.max_spatial_dt = bound;
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_core::{CellId, NEIGHBORHOOD_SIZE};

    fn grid() -> VelocityGrid {
        VelocityGrid::new([-2.0; 3], [0.25; 3], [4, 4, 4]).unwrap()
    }

    fn isolated_cell(id: u64) -> SpatialCell {
        let mut cell = SpatialCell::new(CellId(id));
        cell.neighbors = (0..NEIGHBORHOOD_SIZE)
            .map(|_| NeighborRef::Replicated)
            .collect();
        cell
    }

    /// Two cells adjacent along x, periodic: each is the other's lower
    /// and upper x neighbor.
    fn periodic_pair(g: &VelocityGrid, va: f64, vb: f64) -> CellStore {
        let mut store = CellStore::new();
        for (id, v) in [(0u64, va), (1u64, vb)] {
            let mut cell = isolated_cell(id);
            let other = CellId(1 - id);
            let slot_lo = aurora_core::neighbor_slot(-1, 0, 0);
            let slot_hi = aurora_core::neighbor_slot(1, 0, 0);
            cell.neighbors[slot_lo] = NeighborRef::Local(other);
            cell.neighbors[slot_hi] = NeighborRef::Local(other);
            // Second-lower along x wraps back to the cell itself.
            cell.neighbors[27] = NeighborRef::Local(CellId(id));
            let bid = g.block_id([3, 1, 1]).unwrap();
            let mut block = VelocityBlock::new();
            block.values = [v; BLOCK_VOLUME];
            cell.blocks.insert(bid, block);
            store.insert(cell);
        }
        store
    }

    fn net_flux(store: &CellStore, id: u64) -> f64 {
        store
            .get(CellId(id))
            .unwrap()
            .blocks
            .values()
            .map(|b| b.flux.iter().sum::<f64>())
            .sum()
    }

    #[test]
    fn uniform_state_has_exactly_zero_net_flux() {
        let g = grid();
        let mut store = periodic_pair(&g, 2.0, 2.0);
        let pending =
            compute_flux_contributions(&store, &g, &[CellId(0), CellId(1)], 0.01);
        apply_contributions(&mut store, &pending, usize::MAX);
        for id in [0, 1] {
            let cell = store.get(CellId(id)).unwrap();
            for block in cell.blocks.values() {
                assert!(block.flux_is_zero(), "cell {id} accumulated flux");
            }
        }
    }

    #[test]
    fn isolated_uniform_cell_is_a_fixed_point() {
        let g = grid();
        let mut store = CellStore::new();
        let mut cell = isolated_cell(0);
        let bid = g.block_id([0, 0, 0]).unwrap();
        let mut block = VelocityBlock::new();
        block.values = [3.0; BLOCK_VOLUME];
        cell.blocks.insert(bid, block);
        store.insert(cell);

        let pending = compute_flux_contributions(&store, &g, &[CellId(0)], 0.01);
        apply_contributions(&mut store, &pending, usize::MAX);
        assert_eq!(net_flux(&store, 0), 0.0);
    }

    #[test]
    fn mass_moves_downstream_and_totals_balance() {
        let g = grid();
        // Block [3,1,1]: vx strictly positive, so mass flows from the
        // loaded cell into its upper x neighbor.
        let mut store = periodic_pair(&g, 5.0, 0.0);
        let pending =
            compute_flux_contributions(&store, &g, &[CellId(0), CellId(1)], 0.001);
        apply_contributions(&mut store, &pending, usize::MAX);
        let gain = net_flux(&store, 1);
        let loss = net_flux(&store, 0);
        assert!(gain > 0.0, "downstream cell should gain mass");
        assert!((gain + loss).abs() < 1e-12, "scatter must balance");
    }

    #[test]
    fn do_not_compute_cells_are_skipped() {
        let g = grid();
        let mut store = periodic_pair(&g, 5.0, 0.0);
        store.get_mut(CellId(0)).unwrap().boundary = aurora_core::BoundaryTag::DoNotCompute;
        store.get_mut(CellId(1)).unwrap().boundary = aurora_core::BoundaryTag::DoNotCompute;
        let pending =
            compute_flux_contributions(&store, &g, &[CellId(0), CellId(1)], 0.001);
        assert!(pending.is_empty());
    }

    #[test]
    fn scatter_allocates_missing_downstream_blocks() {
        let g = grid();
        let mut store = periodic_pair(&g, 5.0, 0.0);
        // Downstream cell starts with the block; remove it.
        store.get_mut(CellId(1)).unwrap().blocks.clear();
        let pending =
            compute_flux_contributions(&store, &g, &[CellId(0), CellId(1)], 0.001);
        apply_contributions(&mut store, &pending, usize::MAX);
        assert!(store.get(CellId(1)).unwrap().block_count() > 0);
        assert!(net_flux(&store, 1) > 0.0);
    }

    #[test]
    fn scatter_past_the_block_budget_is_dropped() {
        let g = grid();
        let mut store = periodic_pair(&g, 5.0, 0.0);
        store.get_mut(CellId(1)).unwrap().blocks.clear();
        let pending =
            compute_flux_contributions(&store, &g, &[CellId(0), CellId(1)], 0.001);
        // Budget of zero: existing blocks still accumulate, nothing new
        // is allocated.
        apply_contributions(&mut store, &pending, 0);
        assert_eq!(store.get(CellId(1)).unwrap().block_count(), 0);
        assert!(net_flux(&store, 0) != 0.0);
    }

    #[test]
    fn spatial_cfl_uses_fastest_block_corner() {
        let g = grid();
        let mut cell = isolated_cell(0);
        cell.params.dx = [0.5; 3];
        // Block [0,0,0]: corners at v = -2.0.
        cell.blocks
            .insert(g.block_id([0, 0, 0]).unwrap(), VelocityBlock::new());
        update_spatial_cfl(&mut cell, &g);
        assert!((cell.params.max_spatial_dt - 0.25).abs() < 1e-12);

        let mut empty = isolated_cell(1);
        update_spatial_cfl(&mut empty, &g);
        assert_eq!(empty.params.max_spatial_dt, f64::INFINITY);
    }
}
