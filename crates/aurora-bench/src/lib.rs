//! Benchmark-only crate; see `benches/solver_ops.rs`.

#![deny(missing_docs)]
#![forbid(unsafe_code)]
