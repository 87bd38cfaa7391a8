//! Communication errors.

use std::error::Error;
use std::fmt;

use aurora_core::Rank;

use crate::wire::WireError;

/// Failures of the transport layer or of frame decoding.
///
/// All variants are fatal; the mover does not retry communication.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommError {
    /// A channel endpoint hung up mid-exchange.
    Disconnected {
        /// The peer rank.
        peer: Rank,
    },
    /// A rank outside the fabric was addressed.
    UnknownRank(Rank),
    /// A received frame failed to decode.
    Malformed(WireError),
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { peer } => write!(f, "rank {peer} disconnected"),
            Self::UnknownRank(rank) => write!(f, "rank {rank} is not part of the fabric"),
            Self::Malformed(err) => write!(f, "malformed frame: {err}"),
        }
    }
}

impl Error for CommError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<WireError> for CommError {
    fn from(err: WireError) -> Self {
        Self::Malformed(err)
    }
}
