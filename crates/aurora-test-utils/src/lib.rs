//! Shared fixtures for Aurora tests and benchmarks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod fixtures;

pub use fixtures::{
    cell_mass, identity_passes, maxwellian_cell, perturbed_maxwellian_cell,
    single_cell_periodic_mesh, standard_grid,
};
