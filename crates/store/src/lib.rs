//! In-memory, time-bounded storage for job status records.
//!
//! - [`TtlCache`] -- generic LRU cache whose entries expire a fixed time
//!   after their last write.
//! - [`ResultStore`] -- job id to [`StatusRecord`](chartflow_core::status::StatusRecord)
//!   map shared by the orchestrator, the cancel path, and pollers.
//! - [`StoreJanitor`] -- background task purging expired entries.

pub mod cache;
pub mod janitor;
pub mod result_store;

pub use cache::TtlCache;
pub use janitor::StoreJanitor;
pub use result_store::{ResultStore, StoreConfig, Transition};
