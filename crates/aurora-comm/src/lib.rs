//! Inter-rank communication for Aurora.
//!
//! Everything a rank needs to exchange cell content with its peers:
//! derived [`MessageTag`]s, the [`TransferStencil`] communication plan,
//! the versioned [`wire`] codec, per-sender [`UpdateBuffers`], and the
//! [`Transport`] abstraction with its in-process [`LocalFabric`]
//! implementation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffers;
pub mod error;
pub mod exchange;
pub mod stencil;
pub mod tag;
pub mod transport;
pub mod wire;

pub use buffers::UpdateBuffers;
pub use error::CommError;
pub use exchange::{
    admit_update_blocks, apply_averages, apply_updates, encode_averages, encode_updates,
};
pub use stencil::{SendEntry, TransferStencil};
pub use tag::MessageTag;
pub use transport::{LocalFabric, LocalTransport, Transport};
pub use wire::{decode, CellPayload, WireError};
