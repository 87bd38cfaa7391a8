//! Mesh topology errors.
//!
//! Topology errors are fatal: they indicate a malformed mesh or a
//! stencil/partition mismatch, not a recoverable runtime condition.

use std::error::Error;
use std::fmt;

use aurora_core::{CellId, Rank};

/// Errors raised while building or querying a mesh topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopologyError {
    /// The mesh has zero extent along an axis.
    ZeroExtent {
        /// Offending axis (0 = x, 1 = y, 2 = z).
        axis: usize,
    },
    /// The partition was requested for zero ranks.
    NoRanks,
    /// More ranks than slabs along the partition axis.
    TooManyRanks {
        /// Requested rank count.
        ranks: u32,
        /// Cells available along the partition axis.
        cells: u32,
    },
    /// A cell ID outside the mesh was passed to a topology query.
    MissingCell {
        /// The unknown cell.
        cell: CellId,
    },
    /// A stencil neighbor could not be resolved to local, remote, or
    /// replicated.
    UnresolvableNeighbor {
        /// The cell whose neighbor list failed to build.
        cell: CellId,
        /// The offending offset.
        offset: [i32; 3],
    },
    /// A remote flux contribution arrived for a (cell, sender) pair
    /// without an allocated update buffer.
    MissingUpdateBuffer {
        /// The receiving cell.
        cell: CellId,
        /// The sending rank.
        rank: Rank,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroExtent { axis } => {
                write!(f, "mesh has zero extent on axis {axis}")
            }
            Self::NoRanks => write!(f, "cannot partition a mesh over zero ranks"),
            Self::TooManyRanks { ranks, cells } => write!(
                f,
                "cannot partition {cells} cell(s) along x over {ranks} rank(s)"
            ),
            Self::MissingCell { cell } => write!(f, "cell {cell} is not part of the mesh"),
            Self::UnresolvableNeighbor { cell, offset } => write!(
                f,
                "cell {cell}: neighbor at offset ({}, {}, {}) cannot be resolved",
                offset[0], offset[1], offset[2]
            ),
            Self::MissingUpdateBuffer { cell, rank } => write!(
                f,
                "no update buffer allocated for cell {cell} from rank {rank}"
            ),
        }
    }
}

impl Error for TopologyError {}
