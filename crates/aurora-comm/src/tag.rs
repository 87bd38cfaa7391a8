//! Message tags.
//!
//! A tag must identify a message uniquely within one exchange between
//! one (sender, receiver) pair. Tags are derived, not negotiated: both
//! sides compute the same tag from the subject cell and the lane.

use aurora_core::CellId;

/// Lanes per subject cell. Lanes 0..=8 carry the averages exchange (one
/// per receive offset); lane 63 carries flux updates.
pub const LANES: u64 = 64;

/// Lane reserved for the flux-update exchange.
pub const UPDATES_LANE: u64 = LANES - 1;

/// A derived message tag: `subject cell ID × 64 + lane`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageTag(pub u64);

impl MessageTag {
    /// Tag of an averages (distribution-value) message for `subject`
    /// requested at receive-offset lane `lane`.
    pub fn averages(subject: CellId, lane: usize) -> Self {
        debug_assert!((lane as u64) < UPDATES_LANE);
        Self(subject.0 * LANES + lane as u64)
    }

    /// Tag of a flux-update message for `subject`.
    pub fn updates(subject: CellId) -> Self {
        Self(subject.0 * LANES + UPDATES_LANE)
    }

    /// The subject cell this tag refers to.
    pub fn subject(&self) -> CellId {
        CellId(self.0 / LANES)
    }
}
