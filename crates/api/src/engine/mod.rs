//! Chart job engine.
//!
//! [`job`] holds the kind-agnostic lifecycle (status transitions, stop
//! checks, failure classification); [`chart`] and [`adjustment`] supply the
//! stage sequences for the two job kinds.

pub mod adjustment;
pub mod chart;
pub mod job;

#[cfg(test)]
pub(crate) mod testing;

pub use adjustment::{ChartAdjustmentFlow, ChartAdjustmentService};
pub use chart::{ChartFlow, ChartService};
pub use job::{JobError, JobFlow, JobOutcome, JobService, JobTracker};
