//! The mesh topology abstraction.

use aurora_core::{CellId, Rank};

use crate::error::TopologyError;
use crate::offset::Offset;

/// Global view of the spatial mesh and its rank partitioning.
///
/// Every rank holds the same topology object and answers the same
/// queries identically; stencil construction relies on that to produce
/// matching send and receive lists without negotiation.
pub trait MeshTopology: Send + Sync {
    /// Total number of ranks in the partition.
    fn rank_count(&self) -> u32;

    /// Rank that owns a cell.
    fn owner(&self, cell: CellId) -> Result<Rank, TopologyError>;

    /// Cells owned by a rank, in a deterministic canonical order.
    fn cells_of(&self, rank: Rank) -> Vec<CellId>;

    /// Cell at `offset` from `cell`, or `None` past a non-periodic edge.
    fn neighbor(&self, cell: CellId, offset: Offset) -> Result<Option<CellId>, TopologyError>;

    /// Spatial spacing per axis.
    fn spacing(&self) -> [f64; 3];

    /// Lower-corner position of a cell.
    fn position(&self, cell: CellId) -> Result<[f64; 3], TopologyError>;
}
