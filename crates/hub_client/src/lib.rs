//! SemTUI backend client, shared by the CLI and library users.
//!
//! This crate is the single source of truth for the HTTP side of the wire
//! contract: dataset browsing, table fetch/upload/update and the
//! reconciliator / extender services.
//!
//! Blocking, no retries. Merge logic lives in `semtui-recon`; this crate
//! only moves documents back and forth.

mod client;
mod endpoint;
mod transport;

pub use client::{ClientError, SemTuiClient};
pub use endpoint::join_url;
