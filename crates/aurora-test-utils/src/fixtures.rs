//! Cell, grid, and mesh builders used across the workspace's tests.

use aurora_core::{
    CellId, SpatialCell, VelocityBlock, VelocityGrid, BLOCK_VOLUME, BLOCK_WIDTH,
};
use aurora_mesh::CartesianMesh;
use aurora_solver::AccelPass;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Distribution values below this threshold are not allocated.
const SPARSE_FLOOR: f64 = 1e-12;

/// The 4³-block grid most tests run on: v in [-2, 2] per axis,
/// 16 cells per axis.
pub fn standard_grid() -> VelocityGrid {
    // Valid by construction.
    match VelocityGrid::new([-2.0; 3], [0.25; 3], [4, 4, 4]) {
        Ok(g) => g,
        Err(_) => unreachable!(),
    }
}

/// A cell holding an isotropic Maxwellian `n · exp(−|v|² / vt²)`,
/// sparsely allocated (blocks with no value above the floor stay out).
pub fn maxwellian_cell(id: CellId, grid: &VelocityGrid, density: f64, vt: f64) -> SpatialCell {
    let mut cell = SpatialCell::new(id);
    let blocks = grid.blocks();
    for bk in 0..blocks[2] {
        for bj in 0..blocks[1] {
            for bi in 0..blocks[0] {
                let Some(block_id) = grid.block_id([bi, bj, bk]) else {
                    continue;
                };
                let mut block = VelocityBlock::new();
                let mut any = false;
                for index in 0..BLOCK_VOLUME {
                    let off = [
                        index % BLOCK_WIDTH,
                        (index / BLOCK_WIDTH) % BLOCK_WIDTH,
                        index / (BLOCK_WIDTH * BLOCK_WIDTH),
                    ];
                    let mut v2 = 0.0;
                    for (axis, (b, o)) in [(bi, off[0]), (bj, off[1]), (bk, off[2])]
                        .into_iter()
                        .enumerate()
                    {
                        let g = b * BLOCK_WIDTH as u32 + o as u32;
                        let v = grid.cell_center(axis, g);
                        v2 += v * v;
                    }
                    let f = density * (-v2 / (vt * vt)).exp();
                    if f > SPARSE_FLOOR {
                        block.values[index] = f;
                        any = true;
                    }
                }
                if any {
                    cell.blocks.insert(block_id, block);
                }
            }
        }
    }
    cell
}

/// A Maxwellian cell with seeded multiplicative noise, for tests that
/// need structure the limiter actually has to work on.
pub fn perturbed_maxwellian_cell(
    id: CellId,
    grid: &VelocityGrid,
    density: f64,
    vt: f64,
    seed: u64,
) -> SpatialCell {
    let mut cell = maxwellian_cell(id, grid, density, vt);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for block in cell.blocks.values_mut() {
        for v in &mut block.values {
            if *v > 0.0 {
                let unit = rng.next_u64() as f64 / u64::MAX as f64;
                *v *= 0.8 + 0.4 * unit;
            }
        }
    }
    cell
}

/// A 1×1×1 fully periodic single-rank mesh: every neighbor of the one
/// cell is the cell itself.
pub fn single_cell_periodic_mesh() -> CartesianMesh {
    // Valid by construction.
    match CartesianMesh::new([1, 1, 1], [1.0; 3], [true; 3], 1) {
        Ok(m) => m,
        Err(_) => unreachable!(),
    }
}

/// The three identity acceleration passes, in the z, x, y order the
/// mover composes them.
pub fn identity_passes() -> [AccelPass; 3] {
    [
        AccelPass::identity(2),
        AccelPass::identity(0),
        AccelPass::identity(1),
    ]
}

/// Total distribution mass (plain value sum) of one cell.
pub fn cell_mass(cell: &SpatialCell) -> f64 {
    cell.blocks.values().map(|b| b.value_sum()).sum()
}
