//! Chunked metadata+photo request assembly.
//!
//! Streamed create/update calls arrive as an ordered sequence of fragments,
//! each carrying at most one of a metadata object or a slice of photo bytes.
//! [`PendingUpload`] accumulates fragments one at a time (the transport
//! adapter feeds it as parts arrive); [`assemble`] drains a whole fragment
//! stream to completion. Either way the result is one
//! [`AssembledUpload`]: the last metadata object seen plus the photo bytes
//! concatenated in arrival order.

mod assembler;
mod error;
mod fragment;

pub use assembler::assemble;
pub use error::UploadError;
pub use fragment::{AssembledUpload, Fragment, PendingUpload};
