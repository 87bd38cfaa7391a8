//! Wire format for cell payloads.
//!
//! One message carries the sparse block content of one subject cell:
//! either its distribution values (averages exchange) or its
//! accumulated flux (updates exchange). The framing is a versioned flat
//! little-endian buffer so a malformed or mismatched peer is detected
//! instead of silently misread.

use aurora_core::{BlockId, CellId, BLOCK_VOLUME};
use std::error::Error;
use std::fmt;

/// Frame magic, `b"ARRA"` little-endian.
pub const MAGIC: u32 = 0x4152_5241;

/// Current frame version.
pub const VERSION: u16 = 1;

const HEADER_LEN: usize = 4 + 2 + 8 + 4;

/// Decoding failures. Always fatal: the peer is misbehaving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireError {
    /// The buffer ended before the advertised content.
    Truncated {
        /// Bytes expected.
        expected: usize,
        /// Bytes present.
        actual: usize,
    },
    /// The frame did not start with [`MAGIC`].
    BadMagic(u32),
    /// The frame version is not [`VERSION`].
    UnsupportedVersion(u16),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { expected, actual } => {
                write!(f, "frame truncated: expected {expected} bytes, got {actual}")
            }
            Self::BadMagic(m) => write!(f, "bad frame magic {m:#010x}"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported frame version {v}"),
        }
    }
}

impl Error for WireError {}

/// A decoded cell payload.
#[derive(Clone, Debug, PartialEq)]
pub struct CellPayload {
    /// The cell this payload describes.
    pub subject: CellId,
    /// Block IDs, in the sender's block order.
    pub block_ids: Vec<BlockId>,
    /// `block_ids.len() × 64` values, flat, matching `block_ids` order.
    pub values: Vec<f64>,
}

/// Encode one cell's sparse block content.
///
/// `blocks` yields `(block ID, 64 values)` pairs; the caller chooses
/// whether the values are distribution averages or accumulated flux.
pub fn encode<'a>(
    subject: CellId,
    blocks: impl ExactSizeIterator<Item = (BlockId, &'a [f64; BLOCK_VOLUME])>,
) -> Vec<u8> {
    let count = blocks.len();
    let mut out = Vec::with_capacity(HEADER_LEN + count * (4 + BLOCK_VOLUME * 8));
    out.extend_from_slice(&MAGIC.to_le_bytes());
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&subject.0.to_le_bytes());
    out.extend_from_slice(&(count as u32).to_le_bytes());
    let mut values = Vec::with_capacity(count * BLOCK_VOLUME * 8);
    for (id, data) in blocks {
        out.extend_from_slice(&id.0.to_le_bytes());
        for v in data {
            values.extend_from_slice(&v.to_le_bytes());
        }
    }
    out.extend_from_slice(&values);
    out
}

/// Decode a frame produced by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<CellPayload, WireError> {
    if bytes.len() < HEADER_LEN {
        return Err(WireError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }
    let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if magic != MAGIC {
        return Err(WireError::BadMagic(magic));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != VERSION {
        return Err(WireError::UnsupportedVersion(version));
    }
    let subject = CellId(u64::from_le_bytes([
        bytes[6], bytes[7], bytes[8], bytes[9], bytes[10], bytes[11], bytes[12], bytes[13],
    ]));
    let count = u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]) as usize;

    let expected = HEADER_LEN + count * 4 + count * BLOCK_VOLUME * 8;
    if bytes.len() < expected {
        return Err(WireError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }

    let mut block_ids = Vec::with_capacity(count);
    let mut at = HEADER_LEN;
    for _ in 0..count {
        block_ids.push(BlockId(u32::from_le_bytes([
            bytes[at],
            bytes[at + 1],
            bytes[at + 2],
            bytes[at + 3],
        ])));
        at += 4;
    }
    let mut values = Vec::with_capacity(count * BLOCK_VOLUME);
    for _ in 0..count * BLOCK_VOLUME {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[at..at + 8]);
        values.push(f64::from_le_bytes(raw));
        at += 8;
    }

    Ok(CellPayload {
        subject,
        block_ids,
        values,
    })
}
