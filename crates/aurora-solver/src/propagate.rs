//! Application of accumulated spatial flux.

use aurora_core::{Moments, SpatialCell, VelocityGrid, BLOCK_VOLUME, BLOCK_WIDTH};

/// Advance a cell's distribution by its accumulated flux plus an
/// optional summed remote contribution, folding the post-translation
/// moments in the same sweep.
///
/// `remote` holds `block_count × 64` values in the cell's block order
/// (the update-buffer reduction for this cell). The provisional
/// `post_translation` slot is zeroed first; boundary-governed cells get
/// the zeroed slot but no advance, their state belongs to the
/// boundary-condition subsystem.
pub fn apply_translation(cell: &mut SpatialCell, grid: &VelocityGrid, remote: Option<&[f64]>) {
    cell.params.moments_r = Moments::zero();
    if cell.is_boundary_governed() {
        return;
    }
    let mut m = Moments::zero();
    for (slot, (&id, block)) in cell.blocks.iter_mut().enumerate() {
        let bc = grid.block_coords(id);
        for index in 0..BLOCK_VOLUME {
            let mut delta = block.flux[index];
            if let Some(r) = remote {
                delta += r.get(slot * BLOCK_VOLUME + index).copied().unwrap_or(0.0);
            }
            block.values[index] += delta;
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
    cell.params.moments_r = m;
}
