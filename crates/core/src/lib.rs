//! Domain types shared by every chartflow crate.
//!
//! Nothing in here performs I/O: job identifiers, the per-job
//! [`StatusRecord`](status::StatusRecord) observed by pollers, and the
//! request payloads accepted by the service.

pub mod error;
pub mod request;
pub mod status;
pub mod types;
