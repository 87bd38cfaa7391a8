//! Canonical neighbor-offset lists.
//!
//! Stencil builds on every rank must walk offsets in the same order, so
//! the lists live here as constants rather than being generated ad hoc.

/// A relative cell offset in mesh coordinates.
pub type Offset = [i32; 3];

/// Negate an offset. A receive from offset `o` pairs with a send toward
/// `mirror(o)` on the owning rank, which is what makes stencils
/// symmetric by construction.
#[inline]
pub fn mirror(o: Offset) -> Offset {
    [-o[0], -o[1], -o[2]]
}

/// Receive footprint of the distribution-value (averages) exchange: the
/// six face neighbors plus the second-lower neighbor per axis needed by
/// the flux limiter's upstream difference.
pub const AVERAGES_RECV_OFFSETS: [Offset; 9] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
    [-2, 0, 0],
    [0, -2, 0],
    [0, 0, -2],
];

/// Receive footprint of the flux-update exchange: the full 26-cell box.
///
/// Updates flow from any halo cell that accumulated flux back to its
/// owner, and a halo cell can sit anywhere in the box.
pub const UPDATES_RECV_OFFSETS: [Offset; 26] = full_box();

/// The 26 offsets of the 3×3×3 box without the center, z-major then
/// y then x, matching neighbor-slot order.
const fn full_box() -> [Offset; 26] {
    let mut out = [[0i32; 3]; 26];
    let mut n = 0;
    let mut dz = -1i32;
    while dz <= 1 {
        let mut dy = -1i32;
        while dy <= 1 {
            let mut dx = -1i32;
            while dx <= 1 {
                if dx != 0 || dy != 0 || dz != 0 {
                    out[n] = [dx, dy, dz];
                    n += 1;
                }
                dx += 1;
            }
            dy += 1;
        }
        dz += 1;
    }
    out
}

/// Lane of an averages-exchange offset within [`AVERAGES_RECV_OFFSETS`],
/// used to derive unique message tags. `None` for offsets outside the
/// averages footprint.
pub fn averages_lane(o: Offset) -> Option<usize> {
    AVERAGES_RECV_OFFSETS.iter().position(|&c| c == o)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_is_an_involution() {
        for o in AVERAGES_RECV_OFFSETS {
            assert_eq!(mirror(mirror(o)), o);
        }
    }

    #[test]
    fn full_box_covers_all_nonzero_offsets() {
        assert_eq!(UPDATES_RECV_OFFSETS.len(), 26);
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let o = [dx, dy, dz];
                    let present = UPDATES_RECV_OFFSETS.contains(&o);
                    assert_eq!(present, o != [0, 0, 0], "offset {o:?}");
                }
            }
        }
    }

    #[test]
    fn averages_lanes_are_unique() {
        for (i, o) in AVERAGES_RECV_OFFSETS.iter().enumerate() {
            assert_eq!(averages_lane(*o), Some(i));
        }
        assert_eq!(averages_lane([1, 1, 0]), None);
    }
}
