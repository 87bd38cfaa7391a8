//! Pipeline orchestration for the Aurora Vlasov mover.
//!
//! [`MoverContext`] holds everything derived from the mesh partition
//! (neighbor lists, stencils, update buffers) with explicit
//! build/rebuild; [`VlasovMover`] drives one step of the
//! acceleration-flux-propagation pipeline over a cell store and
//! reports [`MoverMetrics`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod mover;

pub use config::MoverConfig;
pub use context::MoverContext;
pub use error::MoverError;
pub use metrics::MoverMetrics;
pub use mover::VlasovMover;
