//! Request handlers for the chart job resources.
//!
//! Handlers only validate input and talk to the job services; every job
//! outcome, including failures, is reported through the result endpoints.

pub mod chart_adjustments;
pub mod charts;

use chartflow_core::types::JobId;
use serde::Serialize;

/// Body returned by submit and stop endpoints.
#[derive(Debug, Serialize)]
pub struct QueryIdResponse {
    pub query_id: JobId,
}
