//! Solver-level error types.
//!
//! Topology and communication errors live next to the subsystems that
//! raise them (`aurora-mesh`, `aurora-comm`); this module covers the
//! numerical contracts of the mover itself.

use std::error::Error;
use std::fmt;

use crate::id::CellId;

/// Errors raised while validating a velocity-grid description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridError {
    /// A velocity-cell spacing was zero or negative.
    NonPositiveSpacing {
        /// Offending axis (0 = vx, 1 = vy, 2 = vz).
        axis: usize,
    },
    /// The block lattice has zero extent along an axis.
    ZeroExtent {
        /// Offending axis (0 = vx, 1 = vy, 2 = vz).
        axis: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveSpacing { axis } => {
                write!(f, "velocity spacing on axis {axis} must be positive")
            }
            Self::ZeroExtent { axis } => {
                write!(f, "velocity block lattice has zero extent on axis {axis}")
            }
        }
    }
}

impl Error for GridError {}

/// Violations of the mover's numerical invariants.
///
/// Reportable rather than fatal: the caller is expected to react,
/// typically by retrying the step with a reduced timestep.
#[derive(Clone, Debug, PartialEq)]
pub enum SolverError {
    /// Total density drifted beyond tolerance across a remap.
    ///
    /// Either the reconstruction lost mass (a bug) or the sparse block
    /// budget was exhausted and overflow mass was dropped.
    ConservationViolation {
        /// The cell whose remap failed the check.
        cell: CellId,
        /// Integrated density before the remap.
        before: f64,
        /// Integrated density after the remap.
        after: f64,
        /// Relative tolerance that was exceeded.
        tolerance: f64,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConservationViolation {
                cell,
                before,
                after,
                tolerance,
            } => write!(
                f,
                "cell {cell}: density {before} -> {after} violates \
                 conservation tolerance {tolerance}"
            ),
        }
    }
}

impl Error for SolverError {}
