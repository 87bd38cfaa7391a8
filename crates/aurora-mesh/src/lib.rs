//! Spatial mesh topology and rank partitioning for Aurora.
//!
//! A [`MeshTopology`] answers ownership and adjacency queries for the
//! global spatial mesh; every rank holds an identical copy and derives
//! its communication stencils from it deterministically.
//! [`CartesianMesh`] is the uniform-grid implementation with contiguous
//! x-slab partitioning.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cartesian;
pub mod error;
pub mod offset;
pub mod topology;

pub use cartesian::CartesianMesh;
pub use error::TopologyError;
pub use offset::{averages_lane, mirror, Offset, AVERAGES_RECV_OFFSETS, UPDATES_RECV_OFFSETS};
pub use topology::MeshTopology;
