//! Numerical kernels of the Aurora Vlasov mover.
//!
//! Three families of kernels, all operating on [`aurora_core`] cells:
//! the conservative 1-D semi-Lagrangian [`remap`] (velocity-space
//! acceleration), the limited upwind spatial [`flux`] calculator with
//! its two-phase scatter, and the [`moments`] integrator. All kernels
//! are per-cell or read-only over the store, so callers can parallelize
//! over cells freely.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod acceleration;
pub mod flux;
pub mod limiter;
pub mod moments;
pub mod propagate;
pub mod remap;

pub use acceleration::{accelerate_cell, AccelPass};
pub use flux::{
    apply_contributions, compute_flux_contributions, update_spatial_cfl, PendingContribution,
};
pub use propagate::apply_translation;
pub use remap::{map_1d, RemapGeometry, RemapStats};
