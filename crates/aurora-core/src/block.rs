//! Velocity blocks and the global velocity-space lattice.
//!
//! The distribution function is stored per spatial cell as a sparse set
//! of fixed-size velocity blocks. A [`VelocityGrid`] describes the
//! global block lattice; [`BlockId`]s are linear indices into it, so a
//! given ID names the same velocity sub-volume in every spatial cell.

use crate::error::GridError;
use crate::id::BlockId;

/// Velocity cells per block edge.
pub const BLOCK_WIDTH: usize = 4;

/// Velocity cells per block (`BLOCK_WIDTH`³).
pub const BLOCK_VOLUME: usize = BLOCK_WIDTH * BLOCK_WIDTH * BLOCK_WIDTH;

/// A 4×4×4 sub-volume of velocity space.
///
/// Holds the distribution-function values and the per-block flux
/// accumulator written by the spatial flux calculator. Values are
/// indexed x-fastest via [`VelocityBlock::index`].
#[derive(Clone, Debug)]
pub struct VelocityBlock {
    /// Distribution-function values, one per velocity cell.
    pub values: [f64; BLOCK_VOLUME],
    /// Accumulated spatial-transport contribution (Δf) per velocity cell.
    ///
    /// Invariant: zeroed at the start of every flux pass; a block the
    /// flux calculator never touches therefore reads all-zero.
    pub flux: [f64; BLOCK_VOLUME],
}

impl VelocityBlock {
    /// Create an empty block (all values and fluxes zero).
    pub fn new() -> Self {
        Self {
            values: [0.0; BLOCK_VOLUME],
            flux: [0.0; BLOCK_VOLUME],
        }
    }

    /// Flat index of velocity cell `(i, j, k)` within the block.
    #[inline]
    pub fn index(i: usize, j: usize, k: usize) -> usize {
        i + BLOCK_WIDTH * (j + BLOCK_WIDTH * k)
    }

    /// Total of all distribution values in this block.
    pub fn value_sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// True if every flux slot is exactly zero.
    pub fn flux_is_zero(&self) -> bool {
        self.flux.iter().all(|&v| v == 0.0)
    }
}

impl Default for VelocityBlock {
    fn default() -> Self {
        Self::new()
    }
}

/// Geometry of the global velocity-space block lattice.
///
/// Shared by every spatial cell of a species. Immutable for the
/// lifetime of a run; adaptive refinement swaps the whole grid out.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocityGrid {
    v_min: [f64; 3],
    dv: [f64; 3],
    blocks: [u32; 3],
}

impl VelocityGrid {
    /// Create a grid with the given v-space origin, velocity-cell width
    /// per axis, and number of blocks per axis.
    pub fn new(v_min: [f64; 3], dv: [f64; 3], blocks: [u32; 3]) -> Result<Self, GridError> {
        for axis in 0..3 {
            if !(dv[axis] > 0.0) {
                return Err(GridError::NonPositiveSpacing { axis });
            }
            if blocks[axis] == 0 {
                return Err(GridError::ZeroExtent { axis });
            }
        }
        Ok(Self { v_min, dv, blocks })
    }

    /// Lower corner of velocity space.
    pub fn v_min(&self) -> [f64; 3] {
        self.v_min
    }

    /// Velocity-cell width per axis.
    pub fn dv(&self) -> [f64; 3] {
        self.dv
    }

    /// Blocks per axis.
    pub fn blocks(&self) -> [u32; 3] {
        self.blocks
    }

    /// Total number of blocks in the lattice.
    pub fn block_count(&self) -> usize {
        self.blocks[0] as usize * self.blocks[1] as usize * self.blocks[2] as usize
    }

    /// Velocity cells along `axis`.
    pub fn cells(&self, axis: usize) -> u32 {
        self.blocks[axis] * BLOCK_WIDTH as u32
    }

    /// Volume of one velocity cell (dvx·dvy·dvz).
    pub fn cell_volume(&self) -> f64 {
        self.dv[0] * self.dv[1] * self.dv[2]
    }

    /// Linear block ID for lattice coordinates, or `None` outside the grid.
    pub fn block_id(&self, coords: [u32; 3]) -> Option<BlockId> {
        if coords[0] >= self.blocks[0]
            || coords[1] >= self.blocks[1]
            || coords[2] >= self.blocks[2]
        {
            return None;
        }
        Some(BlockId(
            coords[0] + self.blocks[0] * (coords[1] + self.blocks[1] * coords[2]),
        ))
    }

    /// Lattice coordinates of a block ID.
    pub fn block_coords(&self, id: BlockId) -> [u32; 3] {
        let bi = id.0 % self.blocks[0];
        let rest = id.0 / self.blocks[0];
        let bj = rest % self.blocks[1];
        let bk = rest / self.blocks[1];
        [bi, bj, bk]
    }

    /// Lower edge of global velocity cell `g` along `axis`.
    pub fn cell_lower(&self, axis: usize, g: u32) -> f64 {
        self.v_min[axis] + g as f64 * self.dv[axis]
    }

    /// Center of global velocity cell `g` along `axis`.
    pub fn cell_center(&self, axis: usize, g: u32) -> f64 {
        self.v_min[axis] + (g as f64 + 0.5) * self.dv[axis]
    }

    /// Split a global velocity-cell index into (block index, offset in block).
    #[inline]
    pub fn split_cell(&self, g: u32) -> (u32, usize) {
        (g / BLOCK_WIDTH as u32, (g % BLOCK_WIDTH as u32) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> VelocityGrid {
        VelocityGrid::new([-2.0, -2.0, -2.0], [0.25, 0.25, 0.25], [4, 4, 4]).unwrap()
    }

    #[test]
    fn block_index_roundtrip() {
        let g = grid();
        for bk in 0..4 {
            for bj in 0..4 {
                for bi in 0..4 {
                    let id = g.block_id([bi, bj, bk]).unwrap();
                    assert_eq!(g.block_coords(id), [bi, bj, bk]);
                }
            }
        }
    }

    #[test]
    fn block_id_out_of_range_is_none() {
        let g = grid();
        assert!(g.block_id([4, 0, 0]).is_none());
        assert!(g.block_id([0, 0, 4]).is_none());
    }

    #[test]
    fn cell_geometry() {
        let g = grid();
        assert_eq!(g.cells(0), 16);
        assert!((g.cell_lower(0, 0) - (-2.0)).abs() < 1e-15);
        assert!((g.cell_center(0, 0) - (-1.875)).abs() < 1e-15);
        assert!((g.cell_volume() - 0.25f64.powi(3)).abs() < 1e-15);
    }

    #[test]
    fn rejects_degenerate_grids() {
        assert!(matches!(
            VelocityGrid::new([0.0; 3], [0.0, 1.0, 1.0], [1; 3]),
            Err(GridError::NonPositiveSpacing { axis: 0 })
        ));
        assert!(matches!(
            VelocityGrid::new([0.0; 3], [1.0; 3], [1, 0, 1]),
            Err(GridError::ZeroExtent { axis: 1 })
        ));
    }

    #[test]
    fn block_cell_index_is_x_fastest() {
        assert_eq!(VelocityBlock::index(0, 0, 0), 0);
        assert_eq!(VelocityBlock::index(3, 0, 0), 3);
        assert_eq!(VelocityBlock::index(0, 1, 0), 4);
        assert_eq!(VelocityBlock::index(0, 0, 1), 16);
        assert_eq!(VelocityBlock::index(3, 3, 3), 63);
    }

    #[test]
    fn new_block_is_empty() {
        let b = VelocityBlock::new();
        assert_eq!(b.value_sum(), 0.0);
        assert!(b.flux_is_zero());
    }
}
