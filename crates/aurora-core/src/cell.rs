//! Spatial cells, neighbor references, and the cell store.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::block::{VelocityBlock, BLOCK_VOLUME};
use crate::boundary::BoundaryTag;
use crate::id::{BlockId, CellId, Rank};
use crate::params::CellParams;

/// Entries in a cell's resolved neighbor list: the 3×3×3 box (self
/// included) plus one second-lower neighbor per spatial axis, needed by
/// the flux limiter's upstream stencil.
pub const NEIGHBORHOOD_SIZE: usize = 30;

/// A cell's resolved neighbor list, inline-allocated at full size.
pub type NeighborList = SmallVec<[NeighborRef; NEIGHBORHOOD_SIZE]>;

/// Slot of offset `(dx, dy, dz)` (each in −1..=1) in a neighbor list.
///
/// Slot 13 is the cell itself. Slots 27..30 hold the second-lower
/// neighbors `(-2,0,0)`, `(0,-2,0)`, `(0,0,-2)`; use
/// [`SpatialCell::second_lower`] for those.
#[inline]
pub fn neighbor_slot(dx: i32, dy: i32, dz: i32) -> usize {
    debug_assert!(dx.abs() <= 1 && dy.abs() <= 1 && dz.abs() <= 1);
    ((dz + 1) * 9 + (dy + 1) * 3 + (dx + 1)) as usize
}

/// How a required neighbor of a cell resolves.
///
/// `Replicated` is the explicit form of the classic missing-neighbor
/// trick: a cell at the domain edge (or next to an excluded boundary
/// cell) stands in for its own neighbor, so edge cells replicate their
/// state instead of faulting. It is deliberately distinct from a
/// genuine remote dependency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighborRef {
    /// A locally-owned cell.
    Local(CellId),
    /// A cell owned by another rank; its halo copy lives in the store.
    Remote {
        /// The remote cell.
        cell: CellId,
        /// The owning rank.
        rank: Rank,
    },
    /// No usable neighbor; the cell replicates its own state.
    Replicated,
}

impl NeighborRef {
    /// The cell a read should resolve to, given the owning cell's ID.
    pub fn cell_id(&self, own: CellId) -> CellId {
        match self {
            Self::Local(id) => *id,
            Self::Remote { cell, .. } => *cell,
            Self::Replicated => own,
        }
    }

    /// True for a genuine remote dependency.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

/// A node of the distributed spatial mesh.
///
/// Owns a sparse set of velocity blocks, the macroscopic parameter
/// block, the boundary classification (read-only to the mover), and a
/// resolved neighbor list rebuilt on every mesh update.
#[derive(Clone, Debug)]
pub struct SpatialCell {
    /// Globally unique cell ID.
    pub id: CellId,
    /// Boundary classification, set by the boundary-condition subsystem.
    pub boundary: BoundaryTag,
    /// Depth within the boundary layer (1 = touches ordinary cells).
    pub boundary_layer: u8,
    /// True for halo copies of remotely-owned cells.
    pub is_halo: bool,
    /// Macroscopic parameters and moment slots.
    pub params: CellParams,
    /// Sparse velocity-block set, insertion-ordered.
    pub blocks: IndexMap<BlockId, VelocityBlock>,
    /// Resolved neighbor list ([`NEIGHBORHOOD_SIZE`] entries once built).
    pub neighbors: NeighborList,
}

impl SpatialCell {
    /// Create an empty, ordinary, locally-owned cell.
    pub fn new(id: CellId) -> Self {
        Self {
            id,
            boundary: BoundaryTag::Ordinary,
            boundary_layer: 0,
            is_halo: false,
            params: CellParams::default(),
            blocks: IndexMap::new(),
            neighbors: SmallVec::new(),
        }
    }

    /// Create an empty halo copy of a remotely-owned cell.
    pub fn new_halo(id: CellId) -> Self {
        let mut cell = Self::new(id);
        cell.is_halo = true;
        cell
    }

    /// Number of allocated velocity blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Size of this cell's flat block payload in `f64` elements.
    pub fn payload_len(&self) -> usize {
        self.block_count() * BLOCK_VOLUME
    }

    /// Face neighbor along `axis` in direction `dir` (−1 or +1).
    ///
    /// Returns `None` until the neighbor list has been built.
    pub fn face_neighbor(&self, axis: usize, dir: i32) -> Option<&NeighborRef> {
        let mut d = [0i32; 3];
        d[axis] = dir;
        self.neighbors.get(neighbor_slot(d[0], d[1], d[2]))
    }

    /// Second-lower neighbor (offset −2) along `axis`.
    pub fn second_lower(&self, axis: usize) -> Option<&NeighborRef> {
        self.neighbors.get(27 + axis)
    }

    /// Eligibility for flux computation and default-policy moments:
    /// ordinary cells and first-layer boundary cells only.
    pub fn is_flux_eligible(&self) -> bool {
        match self.boundary {
            BoundaryTag::Ordinary => true,
            BoundaryTag::DoNotCompute => false,
            BoundaryTag::Boundary(_) => self.boundary_layer == 1,
        }
    }

    /// True when the cell's state is imposed by the boundary-condition
    /// subsystem and must not be advected.
    pub fn is_boundary_governed(&self) -> bool {
        !self.boundary.is_ordinary()
    }

    /// Zero the flux accumulator of every allocated block.
    pub fn zero_flux_buffers(&mut self) {
        for block in self.blocks.values_mut() {
            block.flux = [0.0; BLOCK_VOLUME];
        }
    }
}

/// All spatial cells visible to this rank: locally-owned cells plus
/// halo copies of remote neighbors.
///
/// Insertion-ordered so that iteration (and thus floating-point
/// accumulation order) is deterministic for a fixed partitioning.
#[derive(Clone, Debug, Default)]
pub struct CellStore {
    cells: IndexMap<CellId, SpatialCell>,
}

impl CellStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell, replacing any previous cell with the same ID.
    pub fn insert(&mut self, cell: SpatialCell) {
        self.cells.insert(cell.id, cell);
    }

    /// Look up a cell.
    pub fn get(&self, id: CellId) -> Option<&SpatialCell> {
        self.cells.get(&id)
    }

    /// Look up a cell mutably.
    pub fn get_mut(&mut self, id: CellId) -> Option<&mut SpatialCell> {
        self.cells.get_mut(&id)
    }

    /// Number of cells (local + halo).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the store holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Underlying map, for iteration.
    pub fn map(&self) -> &IndexMap<CellId, SpatialCell> {
        &self.cells
    }

    /// Underlying map, for mutable (and parallel) iteration.
    pub fn map_mut(&mut self) -> &mut IndexMap<CellId, SpatialCell> {
        &mut self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryKind;

    #[test]
    fn neighbor_slot_layout() {
        assert_eq!(neighbor_slot(0, 0, 0), 13);
        assert_eq!(neighbor_slot(-1, -1, -1), 0);
        assert_eq!(neighbor_slot(1, 1, 1), 26);
        assert_eq!(neighbor_slot(-1, 0, 0), 12);
        assert_eq!(neighbor_slot(1, 0, 0), 14);
    }

    #[test]
    fn flux_eligibility_policy() {
        let mut cell = SpatialCell::new(CellId(1));
        assert!(cell.is_flux_eligible());

        cell.boundary = BoundaryTag::DoNotCompute;
        assert!(!cell.is_flux_eligible());

        cell.boundary = BoundaryTag::Boundary(BoundaryKind::Outflow);
        cell.boundary_layer = 1;
        assert!(cell.is_flux_eligible());
        cell.boundary_layer = 2;
        assert!(!cell.is_flux_eligible());
    }

    #[test]
    fn boundary_governed_excludes_only_ordinary() {
        let mut cell = SpatialCell::new(CellId(1));
        assert!(!cell.is_boundary_governed());
        cell.boundary = BoundaryTag::Boundary(BoundaryKind::SolarWind);
        assert!(cell.is_boundary_governed());
        cell.boundary = BoundaryTag::DoNotCompute;
        assert!(cell.is_boundary_governed());
    }

    #[test]
    fn zero_flux_buffers_clears_every_block() {
        let mut cell = SpatialCell::new(CellId(1));
        let mut block = VelocityBlock::new();
        block.flux[17] = 3.5;
        cell.blocks.insert(BlockId(0), block);
        cell.zero_flux_buffers();
        assert!(cell.blocks[&BlockId(0)].flux_is_zero());
    }

    #[test]
    fn replicated_neighbor_resolves_to_self() {
        let n = NeighborRef::Replicated;
        assert_eq!(n.cell_id(CellId(7)), CellId(7));
        assert!(!n.is_remote());
        let r = NeighborRef::Remote {
            cell: CellId(3),
            rank: Rank(1),
        };
        assert_eq!(r.cell_id(CellId(7)), CellId(3));
        assert!(r.is_remote());
    }
}
