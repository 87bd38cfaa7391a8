//! The explicitly constructed mover context.
//!
//! Everything derived from the mesh partition lives here: per-cell
//! neighbor lists, the two transfer stencils, and the update buffers.
//! The context is built once, rebuilt wholesale after repartitioning,
//! and torn down by drop.

use aurora_comm::{TransferStencil, UpdateBuffers};
use aurora_core::{neighbor_slot, CellId, CellStore, NeighborList, NeighborRef, Rank, SpatialCell};
use aurora_mesh::{MeshTopology, Offset, TopologyError};
use indexmap::IndexSet;

/// Communication plans and buffers of one rank's mover.
pub struct MoverContext {
    rank: Rank,
    averages: TransferStencil,
    updates: TransferStencil,
    buffers: UpdateBuffers,
}

impl MoverContext {
    /// Build the context for `rank`: resolve every local cell's
    /// neighbor list, create halo copies for remote neighbors, and
    /// derive both stencils plus the update buffers.
    ///
    /// Local cells missing from the store are created empty and
    /// ordinary; callers that classify boundaries must do so first,
    /// since ineligible neighbors are filtered to `Replicated` here.
    pub fn build(
        topo: &dyn MeshTopology,
        store: &mut CellStore,
        rank: Rank,
    ) -> Result<Self, TopologyError> {
        let locals = topo.cells_of(rank);
        for &cell in &locals {
            if store.get(cell).is_none() {
                store.insert(SpatialCell::new(cell));
            }
        }

        let mut lists: Vec<(CellId, NeighborList)> = Vec::with_capacity(locals.len());
        let mut halos: IndexSet<CellId> = IndexSet::new();
        for &cell in &locals {
            let mut list = NeighborList::new();
            for dz in -1..=1 {
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        debug_assert_eq!(list.len(), neighbor_slot(dx, dy, dz));
                        let r = if dx == 0 && dy == 0 && dz == 0 {
                            NeighborRef::Local(cell)
                        } else {
                            resolve(topo, store, rank, cell, [dx, dy, dz])?
                        };
                        if let NeighborRef::Remote { cell: h, .. } = r {
                            halos.insert(h);
                        }
                        list.push(r);
                    }
                }
            }
            for axis in 0..3 {
                let mut off = [0i32; 3];
                off[axis] = -2;
                let r = match resolve(topo, store, rank, cell, off)? {
                    // No valid cell two steps down: fall back to the
                    // face neighbor, the closest valid substitute.
                    NeighborRef::Replicated => {
                        let mut face = [0i32; 3];
                        face[axis] = -1;
                        list[neighbor_slot(face[0], face[1], face[2])]
                    }
                    r => r,
                };
                if let NeighborRef::Remote { cell: h, .. } = r {
                    halos.insert(h);
                }
                list.push(r);
            }
            lists.push((cell, list));
        }

        for h in halos {
            if store.get(h).is_none() {
                store.insert(SpatialCell::new_halo(h));
            }
        }
        for (cell, list) in lists {
            if let Some(c) = store.get_mut(cell) {
                c.neighbors = list;
            }
        }

        let averages = TransferStencil::averages(topo, rank)?;
        let updates = TransferStencil::updates(topo, rank)?;
        let buffers = UpdateBuffers::from_stencil(&updates);
        Ok(Self {
            rank,
            averages,
            updates,
            buffers,
        })
    }

    /// Replace the whole context after a repartition.
    pub fn rebuild(
        &mut self,
        topo: &dyn MeshTopology,
        store: &mut CellStore,
    ) -> Result<(), TopologyError> {
        *self = Self::build(topo, store, self.rank)?;
        Ok(())
    }

    /// The rank this context was built for.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// The distribution-value exchange plan.
    pub fn averages(&self) -> &TransferStencil {
        &self.averages
    }

    /// The flux-update exchange plan.
    pub fn updates(&self) -> &TransferStencil {
        &self.updates
    }

    /// The per-sender flux receive buffers.
    pub fn buffers_mut(&mut self) -> &mut UpdateBuffers {
        &mut self.buffers
    }

    /// The updates plan together with its buffers, split-borrowed so
    /// the propagation stage can read one while filling the other.
    pub fn updates_and_buffers(&mut self) -> (&TransferStencil, &mut UpdateBuffers) {
        (&self.updates, &mut self.buffers)
    }
}

/// Resolve one offset of one cell to local, remote, or replicated.
///
/// Missing cells past a bounded edge replicate, as do neighbors the
/// compute policy excludes (do-not-compute, deep boundary layers).
fn resolve(
    topo: &dyn MeshTopology,
    store: &CellStore,
    rank: Rank,
    cell: CellId,
    offset: Offset,
) -> Result<NeighborRef, TopologyError> {
    match topo.neighbor(cell, offset)? {
        None => Ok(NeighborRef::Replicated),
        Some(n) => {
            if let Some(c) = store.get(n) {
                if !c.is_flux_eligible() {
                    return Ok(NeighborRef::Replicated);
                }
            }
            let owner = topo.owner(n)?;
            if owner == rank {
                Ok(NeighborRef::Local(n))
            } else {
                Ok(NeighborRef::Remote { cell: n, rank: owner })
            }
        }
    }
}
