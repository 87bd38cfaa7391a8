//! Receive buffers for the flux-update exchange.
//!
//! A cell near the slab face receives one flux payload from each peer
//! rank that holds it as a halo. Each (cell, sender) pair owns a
//! dedicated buffer, allocated once from the updates stencil, so
//! arrivals never contend; a reduction pass folds the per-sender
//! buffers together before propagation reads them.

use aurora_core::{CellId, Rank};
use aurora_mesh::TopologyError;
use indexmap::IndexMap;

use crate::stencil::TransferStencil;

struct CellSlot {
    senders: Vec<Rank>,
    data: Vec<Vec<f64>>,
}

/// Per-(cell, sender) receive buffers for remote flux contributions.
pub struct UpdateBuffers {
    slots: IndexMap<CellId, CellSlot>,
}

impl UpdateBuffers {
    /// Allocate buffer slots for every receive of the updates stencil.
    ///
    /// Buffers start empty; size them with [`UpdateBuffers::ensure_sized`]
    /// once the owning cell's block count for the step is known.
    pub fn from_stencil(stencil: &TransferStencil) -> Self {
        let slots = stencil
            .senders_per_cell()
            .into_iter()
            .map(|(cell, senders)| {
                let data = senders.iter().map(|_| Vec::new()).collect();
                (cell, CellSlot { senders, data })
            })
            .collect();
        Self { slots }
    }

    /// Resize and zero every sender buffer of `cell` to `len` values.
    ///
    /// Block counts change between steps (velocity-space adaptation),
    /// so this runs at the start of every propagation.
    pub fn ensure_sized(&mut self, cell: CellId, len: usize) {
        if let Some(slot) = self.slots.get_mut(&cell) {
            for buf in &mut slot.data {
                buf.clear();
                buf.resize(len, 0.0);
            }
        }
    }

    /// Extend every sender buffer of `cell` to at least `len` values.
    ///
    /// Runs when a received payload admits new blocks on the owner
    /// mid-drain. Grow-only: content already scattered by earlier
    /// arrivals keeps its slot (admission appends to the owner's block
    /// order), new slots start zeroed.
    pub fn grow(&mut self, cell: CellId, len: usize) {
        if let Some(slot) = self.slots.get_mut(&cell) {
            for buf in &mut slot.data {
                if buf.len() < len {
                    buf.resize(len, 0.0);
                }
            }
        }
    }

    /// The buffer receiving `cell`'s contribution from `rank`.
    pub fn buffer_mut(&mut self, cell: CellId, rank: Rank) -> Result<&mut [f64], TopologyError> {
        let slot = self
            .slots
            .get_mut(&cell)
            .ok_or(TopologyError::MissingUpdateBuffer { cell, rank })?;
        let idx = slot
            .senders
            .iter()
            .position(|&r| r == rank)
            .ok_or(TopologyError::MissingUpdateBuffer { cell, rank })?;
        Ok(&mut slot.data[idx])
    }

    /// Fold all sender buffers of `cell` into one and return it.
    ///
    /// Summation is in sender-slot order, so the result is deterministic
    /// for a fixed partitioning regardless of arrival order. Returns
    /// `None` for cells with no remote contributions.
    pub fn reduce(&mut self, cell: CellId) -> Option<&[f64]> {
        let slot = self.slots.get_mut(&cell)?;
        let (first, rest) = slot.data.split_first_mut()?;
        for buf in rest {
            for (acc, v) in first.iter_mut().zip(buf.iter()) {
                *acc += *v;
            }
        }
        Some(first)
    }

    /// Cells with allocated buffer slots, in stencil order.
    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.slots.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::MessageTag;

    fn buffers_with_two_senders() -> UpdateBuffers {
        let mut stencil = TransferStencil::default();
        stencil
            .recvs
            .insert((Rank(1), MessageTag::updates(CellId(5))), CellId(5));
        stencil
            .recvs
            .insert((Rank(2), MessageTag::updates(CellId(5))), CellId(5));
        UpdateBuffers::from_stencil(&stencil)
    }

    #[test]
    fn missing_buffer_is_fatal() {
        let mut buffers = buffers_with_two_senders();
        assert!(matches!(
            buffers.buffer_mut(CellId(9), Rank(1)),
            Err(TopologyError::MissingUpdateBuffer { .. })
        ));
        assert!(matches!(
            buffers.buffer_mut(CellId(5), Rank(3)),
            Err(TopologyError::MissingUpdateBuffer { .. })
        ));
    }

    #[test]
    fn reduce_sums_all_senders() {
        let mut buffers = buffers_with_two_senders();
        buffers.ensure_sized(CellId(5), 4);
        buffers.buffer_mut(CellId(5), Rank(1)).unwrap()[0] = 1.0;
        buffers.buffer_mut(CellId(5), Rank(2)).unwrap()[0] = 2.5;
        buffers.buffer_mut(CellId(5), Rank(2)).unwrap()[3] = -1.0;
        let total = buffers.reduce(CellId(5)).unwrap();
        assert_eq!(total, &[3.5, 0.0, 0.0, -1.0]);
    }

    #[test]
    fn ensure_sized_clears_previous_content() {
        let mut buffers = buffers_with_two_senders();
        buffers.ensure_sized(CellId(5), 2);
        buffers.buffer_mut(CellId(5), Rank(1)).unwrap()[1] = 7.0;
        buffers.ensure_sized(CellId(5), 3);
        assert_eq!(buffers.reduce(CellId(5)).unwrap(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn grow_keeps_scattered_content() {
        let mut buffers = buffers_with_two_senders();
        buffers.ensure_sized(CellId(5), 2);
        buffers.buffer_mut(CellId(5), Rank(1)).unwrap()[1] = 7.0;
        buffers.grow(CellId(5), 4);
        assert_eq!(buffers.reduce(CellId(5)).unwrap(), &[0.0, 7.0, 0.0, 0.0]);
    }

    #[test]
    fn reduce_on_unknown_cell_is_none() {
        let mut buffers = buffers_with_two_senders();
        assert!(buffers.reduce(CellId(1)).is_none());
    }
}
