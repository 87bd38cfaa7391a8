//! Boundary classification tags.
//!
//! Tags are owned and assigned by the external boundary-condition
//! subsystem; the mover only reads them to gate compute/skip decisions.

use std::fmt;

/// The system boundary type of a boundary-governed cell.
///
/// Opaque to the mover: all kinds are treated identically, only the
/// distinction ordinary / do-not-compute / boundary-governed matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Copy-out boundary at the outer edge of the simulation box.
    Outflow,
    /// Inner (ionospheric) boundary.
    Ionosphere,
    /// Driven inflow boundary (solar wind).
    SolarWind,
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outflow => write!(f, "outflow"),
            Self::Ionosphere => write!(f, "ionosphere"),
            Self::SolarWind => write!(f, "solar-wind"),
        }
    }
}

/// Per-cell boundary classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryTag {
    /// A regular simulation cell; fully propagated.
    Ordinary,
    /// Excluded from all computation (e.g. inside an inner boundary).
    DoNotCompute,
    /// State imposed by the boundary-condition subsystem.
    Boundary(BoundaryKind),
}

impl BoundaryTag {
    /// True for [`BoundaryTag::Ordinary`].
    pub fn is_ordinary(&self) -> bool {
        matches!(self, Self::Ordinary)
    }

    /// True for [`BoundaryTag::DoNotCompute`].
    pub fn is_do_not_compute(&self) -> bool {
        matches!(self, Self::DoNotCompute)
    }
}

impl fmt::Display for BoundaryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinary => write!(f, "ordinary"),
            Self::DoNotCompute => write!(f, "do-not-compute"),
            Self::Boundary(kind) => write!(f, "boundary({kind})"),
        }
    }
}
