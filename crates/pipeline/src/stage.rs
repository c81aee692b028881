//! Stage collaborator contracts and per-stage trace emission.
//!
//! The SQL engine and the text generator are external services. They are
//! reached through the [`SqlExecutor`] and [`Generator`] traits so the
//! orchestrator can be driven by any implementation (HTTP clients in
//! production, in-memory fakes in tests).

use std::fmt;
use std::future::Future;
use std::time::Instant;

use async_trait::async_trait;
use chartflow_core::types::JobId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a single stage invocation.
///
/// The display form is what ends up in a failed job's `error.message`.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// The collaborator reported a failure (bad SQL, upstream error, ...).
    #[error("{0}")]
    Failed(String),

    /// The collaborator answered, but not in the documented shape.
    #[error("{stage} returned malformed output: {message}")]
    Malformed {
        stage: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Data retrieval
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default, rename = "type")]
    pub data_type: Option<String>,
}

/// Column-oriented result of a SQL statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryData {
    pub columns: Vec<Column>,
    pub data: Vec<Vec<Value>>,
}

impl QueryData {
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Values of the column at `index`; short rows yield `null`.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.data
            .iter()
            .map(move |row| row.get(index).unwrap_or(&Value::Null))
    }
}

/// Runs a SQL statement and returns at most `limit` rows.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(
        &self,
        sql: &str,
        project_id: Option<&str>,
        limit: usize,
    ) -> Result<QueryData, StageError>;
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Raw generator output; only the first reply is consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReplies {
    pub replies: Vec<String>,
}

#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<GenerationReplies, StageError>;
}

// ---------------------------------------------------------------------------
// Trace emission
// ---------------------------------------------------------------------------

/// Logs entry, duration and outcome of one stage invocation.
pub struct StageTimer<'a> {
    job_id: &'a JobId,
    stage: &'static str,
    started: Instant,
}

impl<'a> StageTimer<'a> {
    pub fn start(job_id: &'a JobId, stage: &'static str) -> Self {
        tracing::debug!(job_id = %job_id, stage, "Stage started");
        Self {
            job_id,
            stage,
            started: Instant::now(),
        }
    }

    pub fn finish<T, E: fmt::Display>(self, result: &Result<T, E>) {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        match result {
            Ok(_) => tracing::info!(
                job_id = %self.job_id,
                stage = self.stage,
                elapsed_ms,
                "Stage completed",
            ),
            Err(e) => tracing::warn!(
                job_id = %self.job_id,
                stage = self.stage,
                elapsed_ms,
                error = %e,
                "Stage failed",
            ),
        }
    }

    /// Finish a stage that cannot fail.
    pub fn done(self) {
        self.finish::<(), std::convert::Infallible>(&Ok(()));
    }
}

/// Await `fut` inside a [`StageTimer`].
pub async fn observe<T, E, F>(job_id: &JobId, stage: &'static str, fut: F) -> Result<T, E>
where
    E: fmt::Display,
    F: Future<Output = Result<T, E>>,
{
    let timer = StageTimer::start(job_id, stage);
    let result = fut.await;
    timer.finish(&result);
    result
}
