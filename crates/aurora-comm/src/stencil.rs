//! Transfer stencils.
//!
//! A stencil is the precomputed answer to "who do I talk to this
//! exchange": a receive map `(source rank, tag) → local cell`, a send
//! list, and the inner/boundary split of local cells. Both sides derive
//! their lists from the shared topology; a send exists on one rank
//! exactly when the mirrored receive exists on the other, so exchanges
//! are symmetric by construction and never negotiated.

use aurora_core::{CellId, Rank};
use aurora_mesh::{mirror, MeshTopology, TopologyError, AVERAGES_RECV_OFFSETS, UPDATES_RECV_OFFSETS};
use indexmap::{IndexMap, IndexSet};

use crate::tag::MessageTag;

/// One outbound message of an exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SendEntry {
    /// The cell whose content is shipped.
    pub subject: CellId,
    /// Destination rank.
    pub dest: Rank,
    /// Tag the receiver expects.
    pub tag: MessageTag,
}

/// The communication plan of one rank for one exchange.
#[derive(Clone, Debug, Default)]
pub struct TransferStencil {
    /// Expected receives: `(source rank, tag)` to the local cell whose
    /// storage the payload targets. Insertion-ordered, so the drain
    /// order is deterministic.
    pub recvs: IndexMap<(Rank, MessageTag), CellId>,
    /// Messages this rank must post.
    pub sends: Vec<SendEntry>,
    /// Local cells whose exchange footprint is entirely local or
    /// replicated; safe to process before any receive completes.
    pub inner: Vec<CellId>,
    /// Local cells that depend on at least one remote peer.
    pub boundary: Vec<CellId>,
}

impl TransferStencil {
    /// Build the distribution-value (averages) stencil for `rank`.
    ///
    /// Receives pull each remote cell in the flux footprint (faces plus
    /// second-lower neighbors) into its local halo copy; sends are the
    /// mirror image, shipping local cells to every rank whose footprint
    /// contains them.
    pub fn averages(topo: &dyn MeshTopology, rank: Rank) -> Result<Self, TopologyError> {
        let mut stencil = Self::default();
        let mut posted = IndexSet::new();
        for cell in topo.cells_of(rank) {
            let mut has_remote = false;
            for (lane, &offset) in AVERAGES_RECV_OFFSETS.iter().enumerate() {
                if let Some(n) = topo.neighbor(cell, offset)? {
                    let owner = topo.owner(n)?;
                    if owner != rank {
                        has_remote = true;
                        stencil
                            .recvs
                            .insert((owner, MessageTag::averages(n, lane)), n);
                    }
                }
                if let Some(n) = topo.neighbor(cell, mirror(offset))? {
                    let owner = topo.owner(n)?;
                    if owner != rank {
                        let tag = MessageTag::averages(cell, lane);
                        if posted.insert((owner, tag)) {
                            stencil.sends.push(SendEntry {
                                subject: cell,
                                dest: owner,
                                tag,
                            });
                        }
                    }
                }
            }
            if has_remote {
                stencil.boundary.push(cell);
            } else {
                stencil.inner.push(cell);
            }
        }
        Ok(stencil)
    }

    /// Build the flux-update stencil for `rank`.
    ///
    /// The footprint is the full 26-cell box: during the flux pass a
    /// rank accumulates into any halo cell adjacent to its slab, and
    /// that accumulation must travel back to the owner. One message per
    /// (halo cell, peer rank) pair.
    pub fn updates(topo: &dyn MeshTopology, rank: Rank) -> Result<Self, TopologyError> {
        let mut stencil = Self::default();
        let mut posted = IndexSet::new();
        for cell in topo.cells_of(rank) {
            let mut has_remote = false;
            for &offset in UPDATES_RECV_OFFSETS.iter() {
                if let Some(n) = topo.neighbor(cell, offset)? {
                    let owner = topo.owner(n)?;
                    if owner != rank {
                        has_remote = true;
                        // The peer holds `cell` in its halo and will ship
                        // the flux it accumulated there back to us.
                        stencil.recvs.insert((owner, MessageTag::updates(cell)), cell);
                        // Symmetrically, we hold `n` in our halo.
                        let tag = MessageTag::updates(n);
                        if posted.insert((owner, tag)) {
                            stencil.sends.push(SendEntry {
                                subject: n,
                                dest: owner,
                                tag,
                            });
                        }
                    }
                }
            }
            if has_remote {
                stencil.boundary.push(cell);
            } else {
                stencil.inner.push(cell);
            }
        }
        Ok(stencil)
    }

    /// Ranks this stencil receives from, paired with the cells each
    /// one feeds. Used to size per-sender update buffers.
    pub fn senders_per_cell(&self) -> IndexMap<CellId, Vec<Rank>> {
        let mut out: IndexMap<CellId, Vec<Rank>> = IndexMap::new();
        for (&(source, _), &cell) in &self.recvs {
            let senders = out.entry(cell).or_default();
            if !senders.contains(&source) {
                senders.push(source);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_mesh::CartesianMesh;
    use indexmap::IndexSet;

    fn two_rank_mesh() -> CartesianMesh {
        CartesianMesh::new([6, 2, 2], [1.0; 3], [false; 3], 2).unwrap()
    }

    fn send_keys(s: &TransferStencil, dest: Rank) -> IndexSet<MessageTag> {
        s.sends
            .iter()
            .filter(|e| e.dest == dest)
            .map(|e| e.tag)
            .collect()
    }

    fn recv_keys(s: &TransferStencil, source: Rank) -> IndexSet<MessageTag> {
        s.recvs
            .keys()
            .filter(|(r, _)| *r == source)
            .map(|(_, t)| *t)
            .collect()
    }

    #[test]
    fn single_rank_stencils_are_empty() {
        let m = CartesianMesh::new([4, 4, 4], [1.0; 3], [false; 3], 1).unwrap();
        for s in [
            TransferStencil::averages(&m, Rank(0)).unwrap(),
            TransferStencil::updates(&m, Rank(0)).unwrap(),
        ] {
            assert!(s.recvs.is_empty());
            assert!(s.sends.is_empty());
            assert!(s.boundary.is_empty());
            assert_eq!(s.inner.len(), 64);
        }
    }

    #[test]
    fn averages_sends_match_peer_receives() {
        let m = two_rank_mesh();
        let s0 = TransferStencil::averages(&m, Rank(0)).unwrap();
        let s1 = TransferStencil::averages(&m, Rank(1)).unwrap();
        assert!(!s0.sends.is_empty());
        assert_eq!(send_keys(&s0, Rank(1)), recv_keys(&s1, Rank(0)));
        assert_eq!(send_keys(&s1, Rank(0)), recv_keys(&s0, Rank(1)));
    }

    #[test]
    fn updates_sends_match_peer_receives() {
        let m = two_rank_mesh();
        let s0 = TransferStencil::updates(&m, Rank(0)).unwrap();
        let s1 = TransferStencil::updates(&m, Rank(1)).unwrap();
        assert!(!s0.sends.is_empty());
        assert_eq!(send_keys(&s0, Rank(1)), recv_keys(&s1, Rank(0)));
        assert_eq!(send_keys(&s1, Rank(0)), recv_keys(&s0, Rank(1)));
    }

    #[test]
    fn updates_receives_are_one_message_per_cell_and_rank() {
        let m = two_rank_mesh();
        let s0 = TransferStencil::updates(&m, Rank(0)).unwrap();
        let mut seen = IndexSet::new();
        for (&(source, _), &cell) in &s0.recvs {
            assert!(seen.insert((source, cell)), "duplicate message for {cell}");
        }
    }

    #[test]
    fn averages_boundary_cells_read_across_the_cut() {
        let m = two_rank_mesh();
        // Rank 0 owns x in 0..3. Receive offsets per axis are -2, -1,
        // +1, so only x = 2 reads remote data (x = 3 at +1).
        let s0 = TransferStencil::averages(&m, Rank(0)).unwrap();
        for cell in &s0.boundary {
            assert_eq!(m.coords(*cell).unwrap()[0], 2);
        }
        for cell in &s0.inner {
            assert!(m.coords(*cell).unwrap()[0] < 2);
        }
        // Rank 1 owns x in 3..6; x = 3 reads x = 2 at -1 and x = 4
        // reads it at -2.
        let s1 = TransferStencil::averages(&m, Rank(1)).unwrap();
        for cell in &s1.boundary {
            assert!(m.coords(*cell).unwrap()[0] <= 4);
        }
        for cell in &s1.inner {
            assert_eq!(m.coords(*cell).unwrap()[0], 5);
        }
    }
}
