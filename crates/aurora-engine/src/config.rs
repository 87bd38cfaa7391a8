//! Mover configuration.

use aurora_core::VelocityGrid;

/// Default sparse-block budget per spatial cell.
pub const DEFAULT_MAX_BLOCKS_PER_CELL: usize = 50_000;

/// Default relative tolerance of the conservation check.
pub const DEFAULT_CONSERVATION_TOLERANCE: f64 = 1e-10;

/// Static configuration of a [`crate::VlasovMover`].
#[derive(Clone, Debug, PartialEq)]
pub struct MoverConfig {
    /// The global velocity-space lattice shared by all cells.
    pub velocity_grid: VelocityGrid,
    /// Sparse-block budget per cell; remap growth past this drops mass
    /// (surfaced by the conservation check).
    pub max_blocks_per_cell: usize,
    /// Relative tolerance of the per-cell conservation check.
    pub conservation_tolerance: f64,
}

impl MoverConfig {
    /// Configuration with default budget and tolerance.
    pub fn new(velocity_grid: VelocityGrid) -> Self {
        Self {
            velocity_grid,
            max_blocks_per_cell: DEFAULT_MAX_BLOCKS_PER_CELL,
            conservation_tolerance: DEFAULT_CONSERVATION_TOLERANCE,
        }
    }

    /// Override the per-cell block budget.
    pub fn with_max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks_per_cell = max_blocks;
        self
    }

    /// Override the conservation tolerance.
    pub fn with_conservation_tolerance(mut self, tolerance: f64) -> Self {
        self.conservation_tolerance = tolerance;
        self
    }
}
