//! Top-level mover error.

use std::error::Error;
use std::fmt;

use aurora_comm::CommError;
use aurora_core::SolverError;
use aurora_mesh::TopologyError;

/// Any failure the mover pipeline can surface.
///
/// Topology and communication variants are fatal; solver variants are
/// reportable and typically answered with a smaller timestep.
#[derive(Clone, Debug, PartialEq)]
pub enum MoverError {
    /// Mesh or stencil construction failed.
    Topology(TopologyError),
    /// The transport layer failed.
    Comm(CommError),
    /// A numerical invariant was violated.
    Solver(SolverError),
}

impl fmt::Display for MoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topology(e) => write!(f, "topology error: {e}"),
            Self::Comm(e) => write!(f, "communication error: {e}"),
            Self::Solver(e) => write!(f, "solver error: {e}"),
        }
    }
}

impl Error for MoverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Topology(e) => Some(e),
            Self::Comm(e) => Some(e),
            Self::Solver(e) => Some(e),
        }
    }
}

impl From<TopologyError> for MoverError {
    fn from(e: TopologyError) -> Self {
        Self::Topology(e)
    }
}

impl From<CommError> for MoverError {
    fn from(e: CommError) -> Self {
        Self::Comm(e)
    }
}

impl From<SolverError> for MoverError {
    fn from(e: SolverError) -> Self {
        Self::Solver(e)
    }
}
