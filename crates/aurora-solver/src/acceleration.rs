//! Velocity-space acceleration by composed remap passes.

use aurora_core::{SolverError, SpatialCell, VelocityGrid};

use crate::remap::{map_1d, RemapGeometry, RemapStats};

/// One dimensional pass of an operator-split acceleration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccelPass {
    /// Velocity axis the pass remaps along.
    pub dim: usize,
    /// Departure geometry for the pass.
    pub geometry: RemapGeometry,
}

impl AccelPass {
    /// The identity pass along `dim`.
    pub fn identity(dim: usize) -> Self {
        Self {
            dim,
            geometry: RemapGeometry::identity(),
        }
    }
}

/// Accelerate one cell by running `passes` in order.
///
/// The caller decomposes the velocity-space transform of the step into
/// (typically three) shear/translation passes. Boundary-governed and
/// empty cells are skipped. After the last pass the total distribution
/// mass is checked against the pre-acceleration total; relative drift
/// beyond `tolerance` (block-budget overflow included) is a
/// [`SolverError::ConservationViolation`]. The per-cell velocity CFL
/// bound is updated from the largest displacement any pass applies at
/// timestep `dt`.
pub fn accelerate_cell(
    cell: &mut SpatialCell,
    grid: &VelocityGrid,
    passes: &[AccelPass],
    dt: f64,
    max_blocks: usize,
    tolerance: f64,
) -> Result<RemapStats, SolverError> {
    if cell.is_boundary_governed() || cell.blocks.is_empty() {
        return Ok(RemapStats::default());
    }

    let before = mass(cell);
    let mut stats = RemapStats::default();
    let mut max_shift = 0.0f64;
    for pass in passes {
        let s = map_1d(cell, grid, &pass.geometry, pass.dim, max_blocks);
        stats.columns += s.columns;
        stats.clipped_mass += s.clipped_mass;
        max_shift = max_shift.max(pass.geometry.max_displacement(grid, pass.dim));
    }

    cell.params.max_acceleration_dt = if max_shift > 0.0 {
        dt / max_shift
    } else {
        f64::INFINITY
    };

    let after = mass(cell);
    let scale = if before != 0.0 { before.abs() } else { 1.0 };
    if (after - before).abs() > tolerance * scale {
        return Err(SolverError::ConservationViolation {
            cell: cell.id,
            before,
            after,
            tolerance,
        });
    }
    Ok(stats)
}

fn mass(cell: &SpatialCell) -> f64 {
    cell.blocks.values().map(|b| b.value_sum()).sum()
}
