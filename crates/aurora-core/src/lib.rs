//! Core types for the Aurora kinetic plasma mover.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the data model shared by the whole workspace: strongly-typed IDs,
//! the sparse velocity-block representation of the distribution
//! function, spatial cells with their moment parameter slots, boundary
//! classification, and the solver error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod boundary;
pub mod cell;
pub mod error;
pub mod id;
pub mod params;

pub use block::{VelocityBlock, VelocityGrid, BLOCK_VOLUME, BLOCK_WIDTH};
pub use boundary::{BoundaryKind, BoundaryTag};
pub use cell::{neighbor_slot, CellStore, NeighborList, NeighborRef, SpatialCell, NEIGHBORHOOD_SIZE};
pub use error::{GridError, SolverError};
pub use id::{BlockId, CellId, Rank};
pub use params::{CellParams, MomentSlot, Moments};
