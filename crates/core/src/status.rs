//! Job lifecycle states and the status record exposed to pollers.
//!
//! A job moves `understanding -> fetching -> generating -> finished`.
//! `failed` and `stopped` can be reached from any non-terminal state.
//! [`StatusRecord`] only carries a `response` when finished and an `error`
//! when failed; its constructors are the only way to build one.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::JobId;

// ---------------------------------------------------------------------------
// ChartStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a chart job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStatus {
    Understanding,
    Fetching,
    Generating,
    Finished,
    Failed,
    Stopped,
}

impl ChartStatus {
    /// Whether no further transitions may follow this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Stopped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Understanding => "understanding",
            Self::Fetching => "fetching",
            Self::Generating => "generating",
            Self::Finished => "finished",
            Self::Failed => "failed",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ChartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Classified failure kind reported to pollers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Generation completed but produced nothing usable.
    NoChart,
    /// Stage failure, internal fault, or unknown job id.
    Others,
}

/// Message used for [`ErrorCode::NoChart`] failures.
pub const NO_CHART_MESSAGE: &str = "chart generation failed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartError {
    pub code: ErrorCode,
    pub message: String,
}

impl ChartError {
    pub fn no_chart() -> Self {
        Self {
            code: ErrorCode::NoChart,
            message: NO_CHART_MESSAGE.to_string(),
        }
    }

    pub fn others(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Others,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChartResult
// ---------------------------------------------------------------------------

/// Sanitized generation output.
///
/// An empty `chart_schema` is the canonical "no usable result" value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    pub reasoning: String,
    pub chart_schema: Map<String, Value>,
}

impl ChartResult {
    /// The empty result: no schema, no reasoning.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.chart_schema.is_empty()
    }
}

// ---------------------------------------------------------------------------
// StatusRecord
// ---------------------------------------------------------------------------

/// Current state of one job as stored in the result store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRecord {
    status: ChartStatus,
    response: Option<ChartResult>,
    error: Option<ChartError>,
}

impl StatusRecord {
    fn bare(status: ChartStatus) -> Self {
        Self {
            status,
            response: None,
            error: None,
        }
    }

    pub fn understanding() -> Self {
        Self::bare(ChartStatus::Understanding)
    }

    pub fn fetching() -> Self {
        Self::bare(ChartStatus::Fetching)
    }

    pub fn generating() -> Self {
        Self::bare(ChartStatus::Generating)
    }

    pub fn stopped() -> Self {
        Self::bare(ChartStatus::Stopped)
    }

    pub fn finished(result: ChartResult) -> Self {
        Self {
            status: ChartStatus::Finished,
            response: Some(result),
            error: None,
        }
    }

    pub fn failed(error: ChartError) -> Self {
        Self {
            status: ChartStatus::Failed,
            response: None,
            error: Some(error),
        }
    }

    /// Record returned to pollers asking about an unknown or expired job.
    pub fn not_found(id: &JobId) -> Self {
        Self::failed(ChartError::others(format!("{id} is not found")))
    }

    pub fn status(&self) -> ChartStatus {
        self.status
    }

    pub fn response(&self) -> Option<&ChartResult> {
        self.response.as_ref()
    }

    pub fn error(&self) -> Option<&ChartError> {
        self.error.as_ref()
    }

    pub fn is_stopped(&self) -> bool {
        self.status == ChartStatus::Stopped
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!ChartStatus::Understanding.is_terminal());
        assert!(!ChartStatus::Fetching.is_terminal());
        assert!(!ChartStatus::Generating.is_terminal());
        assert!(ChartStatus::Finished.is_terminal());
        assert!(ChartStatus::Failed.is_terminal());
        assert!(ChartStatus::Stopped.is_terminal());
    }

    #[test]
    fn non_terminal_records_carry_no_payload() {
        for record in [
            StatusRecord::understanding(),
            StatusRecord::fetching(),
            StatusRecord::generating(),
            StatusRecord::stopped(),
        ] {
            assert!(record.response().is_none());
            assert!(record.error().is_none());
        }
    }

    #[test]
    fn finished_record_serializes_with_null_error() {
        let mut schema = Map::new();
        schema.insert("mark".into(), json!("bar"));
        let record = StatusRecord::finished(ChartResult {
            reasoning: "r".into(),
            chart_schema: schema,
        });

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "status": "finished",
                "response": {"reasoning": "r", "chart_schema": {"mark": "bar"}},
                "error": null,
            })
        );
    }

    #[test]
    fn failed_record_uses_screaming_error_codes() {
        let value = serde_json::to_value(StatusRecord::failed(ChartError::no_chart())).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"]["code"], "NO_CHART");
        assert_eq!(value["error"]["message"], NO_CHART_MESSAGE);
        assert!(value["response"].is_null());
    }

    #[test]
    fn not_found_names_the_id() {
        let record = StatusRecord::not_found(&JobId::new("q-1"));
        assert_eq!(record.status(), ChartStatus::Failed);
        let error = record.error().unwrap();
        assert_eq!(error.code, ErrorCode::Others);
        assert_eq!(error.message, "q-1 is not found");
    }

    #[test]
    fn empty_result_is_empty() {
        assert!(ChartResult::empty().is_empty());
        assert_eq!(ChartResult::empty().reasoning, "");
    }
}
