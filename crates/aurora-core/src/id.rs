//! Strongly-typed identifiers for cells, velocity blocks, and ranks.

use std::fmt;

/// Identifies a spatial cell within the distributed mesh.
///
/// Cell IDs are assigned by the partitioning subsystem and are globally
/// unique across ranks. The mover never invents cell IDs; it only
/// resolves them through the mesh topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u64);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CellId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies a velocity block within the global velocity-space lattice.
///
/// Block IDs are linear indices into the block lattice described by a
/// [`VelocityGrid`](crate::VelocityGrid); the same ID refers to the same
/// velocity sub-volume in every spatial cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BlockId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a process (mesh partition owner) in the distributed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub u32);

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Rank {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
