//! Aurora: a distributed semi-Lagrangian Vlasov mover.
//!
//! Aurora advances a particle velocity-distribution function over a
//! partitioned spatial mesh by operator-split transport: a conservative
//! 1-D semi-Lagrangian remap along velocity axes for acceleration, a
//! flux-limited upwind spatial translation with overlapped halo
//! exchange, and velocity-moment integration after each stage.
//!
//! The workspace splits along concerns:
//!
//! - [`aurora_core`] — the shared data model (velocity blocks, spatial
//!   cells, moment slots, boundary tags).
//! - [`aurora_mesh`] — mesh topology and rank partitioning.
//! - [`aurora_comm`] — stencils, wire codec, transport, update buffers.
//! - [`aurora_solver`] — the numerical kernels.
//! - [`aurora_engine`] — context construction and the step pipeline.
//!
//! # Example
//!
//! ```
//! use aurora::prelude::*;
//!
//! let mesh = CartesianMesh::new([4, 1, 1], [1.0; 3], [true; 3], 1)?;
//! let grid = VelocityGrid::new([-2.0; 3], [0.25; 3], [4, 4, 4])?;
//!
//! let mut store = CellStore::new();
//! let context = MoverContext::build(&mesh, &mut store, Rank(0))?;
//! let transport = match LocalFabric::endpoints(1).pop() {
//!     Some(t) => t,
//!     None => unreachable!(),
//! };
//! let mut mover = VlasovMover::new(MoverConfig::new(grid), context, transport);
//!
//! let passes = [AccelPass::identity(2), AccelPass::identity(0), AccelPass::identity(1)];
//! let metrics = mover.step(&mut store, &passes, 0.01)?;
//! assert_eq!(metrics.cells_accelerated, 0); // no cells seeded yet
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use aurora_comm as comm;
pub use aurora_core as core;
pub use aurora_engine as engine;
pub use aurora_mesh as mesh;
pub use aurora_solver as solver;

/// The commonly-needed names in one import.
pub mod prelude {
    pub use aurora_comm::{LocalFabric, LocalTransport, Transport};
    pub use aurora_core::{
        BlockId, BoundaryKind, BoundaryTag, CellId, CellStore, MomentSlot, Moments, NeighborRef,
        Rank, SpatialCell, VelocityBlock, VelocityGrid,
    };
    pub use aurora_engine::{MoverConfig, MoverContext, MoverError, MoverMetrics, VlasovMover};
    pub use aurora_mesh::{CartesianMesh, MeshTopology};
    pub use aurora_solver::{AccelPass, RemapGeometry};
}
