//! Payload construction and application for the two exchanges.
//!
//! The averages exchange replaces a halo cell's whole block set with
//! the owner's current content. The updates exchange goes the other
//! way: a halo cell's accumulated flux travels back to the owner and
//! lands in a per-sender update buffer, mapped by block ID onto the
//! owner's current block order.

use aurora_core::{CellStore, SpatialCell, VelocityBlock, BLOCK_VOLUME};

use crate::error::CommError;
use crate::wire::{decode, encode, CellPayload};

/// Encode a cell's distribution values for the averages exchange.
pub fn encode_averages(cell: &SpatialCell) -> Vec<u8> {
    encode(cell.id, cell.blocks.iter().map(|(&id, b)| (id, &b.values)))
}

/// Encode a halo cell's accumulated flux for the updates exchange.
pub fn encode_updates(cell: &SpatialCell) -> Vec<u8> {
    encode(cell.id, cell.blocks.iter().map(|(&id, b)| (id, &b.flux)))
}

/// Apply an averages payload: replace the halo copy's block set.
///
/// Creates the halo cell if the store does not hold it yet. Flux
/// accumulators of the new blocks start at zero.
pub fn apply_averages(store: &mut CellStore, bytes: &[u8]) -> Result<(), CommError> {
    let payload = decode(bytes)?;
    if store.get(payload.subject).is_none() {
        store.insert(SpatialCell::new_halo(payload.subject));
    }
    if let Some(cell) = store.get_mut(payload.subject) {
        cell.blocks.clear();
        for (i, &id) in payload.block_ids.iter().enumerate() {
            let mut block = VelocityBlock::new();
            block
                .values
                .copy_from_slice(&payload.values[i * BLOCK_VOLUME..(i + 1) * BLOCK_VOLUME]);
            cell.blocks.insert(id, block);
        }
    }
    Ok(())
}

/// Allocate any blocks of an updates payload the owner lacks, up to
/// `max_blocks` blocks total.
///
/// A halo can accumulate flux into blocks the owner never held, so the
/// owner grows to receive them before the payload is scattered. New
/// blocks start empty. Returns the summed payload values of blocks
/// that could not be allocated within the budget.
pub fn admit_update_blocks(
    owner: &mut SpatialCell,
    payload: &CellPayload,
    max_blocks: usize,
) -> f64 {
    let mut refused = 0.0;
    for (i, &id) in payload.block_ids.iter().enumerate() {
        if owner.blocks.contains_key(&id) {
            continue;
        }
        if owner.blocks.len() < max_blocks {
            owner.blocks.insert(id, VelocityBlock::new());
        } else {
            refused += payload.values[i * BLOCK_VOLUME..(i + 1) * BLOCK_VOLUME]
                .iter()
                .sum::<f64>();
        }
    }
    refused
}

/// Scatter a decoded updates payload into `buffer`, which holds
/// `owner.block_count() × 64` values in the owner's block order.
///
/// The sender's block set may differ from the owner's; run
/// [`admit_update_blocks`] first so the owner carries every payload
/// block the budget allows. Blocks still absent after admission are
/// dropped.
pub fn apply_updates(owner: &SpatialCell, payload: &CellPayload, buffer: &mut [f64]) {
    for (i, &id) in payload.block_ids.iter().enumerate() {
        if let Some(slot) = owner.blocks.get_index_of(&id) {
            let dst = &mut buffer[slot * BLOCK_VOLUME..(slot + 1) * BLOCK_VOLUME];
            dst.copy_from_slice(&payload.values[i * BLOCK_VOLUME..(i + 1) * BLOCK_VOLUME]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_core::{BlockId, CellId};

    fn cell_with_blocks(id: u64, blocks: &[(u32, f64, f64)]) -> SpatialCell {
        let mut cell = SpatialCell::new(CellId(id));
        for &(bid, value, flux) in blocks {
            let mut block = VelocityBlock::new();
            block.values = [value; BLOCK_VOLUME];
            block.flux = [flux; BLOCK_VOLUME];
            cell.blocks.insert(BlockId(bid), block);
        }
        cell
    }

    #[test]
    fn averages_replace_halo_content() {
        let source = cell_with_blocks(4, &[(0, 1.0, 9.0), (7, 2.0, 9.0)]);
        let bytes = encode_averages(&source);

        let mut store = CellStore::new();
        let mut stale = SpatialCell::new_halo(CellId(4));
        stale.blocks.insert(BlockId(99), VelocityBlock::new());
        store.insert(stale);

        apply_averages(&mut store, &bytes).unwrap();
        let halo = store.get(CellId(4)).unwrap();
        assert_eq!(halo.block_count(), 2);
        assert_eq!(halo.blocks[&BlockId(7)].values[0], 2.0);
        // Flux does not travel with averages.
        assert!(halo.blocks[&BlockId(0)].flux_is_zero());
    }

    #[test]
    fn averages_create_missing_halo() {
        let source = cell_with_blocks(11, &[(3, 0.5, 0.0)]);
        let mut store = CellStore::new();
        apply_averages(&mut store, &encode_averages(&source)).unwrap();
        let halo = store.get(CellId(11)).unwrap();
        assert!(halo.is_halo);
        assert_eq!(halo.blocks[&BlockId(3)].values[0], 0.5);
    }

    #[test]
    fn updates_map_by_block_id_onto_owner_order() {
        // Sender knows blocks 0 and 7; owner holds them in order 7, 0.
        let sender = cell_with_blocks(4, &[(0, 0.0, 1.0), (7, 0.0, 2.0)]);
        let owner = cell_with_blocks(4, &[(7, 0.0, 0.0), (0, 0.0, 0.0)]);
        let payload = decode(&encode_updates(&sender)).unwrap();
        let mut buffer = vec![0.0; owner.payload_len()];
        apply_updates(&owner, &payload, &mut buffer);
        assert_eq!(buffer[0], 2.0);
        assert_eq!(buffer[BLOCK_VOLUME], 1.0);
    }

    #[test]
    fn admission_grows_the_owner_for_new_payload_blocks() {
        let sender = cell_with_blocks(4, &[(0, 0.0, 1.0), (5, 0.0, 3.0)]);
        let mut owner = cell_with_blocks(4, &[(0, 0.0, 0.0)]);
        let payload = decode(&encode_updates(&sender)).unwrap();

        let refused = admit_update_blocks(&mut owner, &payload, usize::MAX);
        assert_eq!(refused, 0.0);
        assert_eq!(owner.block_count(), 2);
        // The admitted block is empty until propagation folds the
        // buffer in.
        assert_eq!(owner.blocks[&BlockId(5)].value_sum(), 0.0);

        let mut buffer = vec![0.0; owner.payload_len()];
        apply_updates(&owner, &payload, &mut buffer);
        assert_eq!(buffer[0], 1.0);
        let slot = owner.blocks.get_index_of(&BlockId(5)).unwrap();
        assert_eq!(buffer[slot * BLOCK_VOLUME], 3.0);
    }

    #[test]
    fn admission_over_budget_reports_the_refused_mass() {
        let sender = cell_with_blocks(4, &[(0, 0.0, 1.0), (5, 0.0, 3.0)]);
        let mut owner = cell_with_blocks(4, &[(0, 0.0, 0.0)]);
        let payload = decode(&encode_updates(&sender)).unwrap();

        let refused = admit_update_blocks(&mut owner, &payload, 1);
        assert_eq!(refused, 3.0 * BLOCK_VOLUME as f64);
        assert_eq!(owner.block_count(), 1);

        let mut buffer = vec![0.0; owner.payload_len()];
        apply_updates(&owner, &payload, &mut buffer);
        assert_eq!(buffer.iter().sum::<f64>(), BLOCK_VOLUME as f64);
    }
}
