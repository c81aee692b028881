//! Job lifecycle shared by every chart job kind.
//!
//! [`JobService`] owns the result store and drives a [`JobFlow`] through
//! the status state machine. Every write made on behalf of a running job
//! goes through [`JobTracker`], which refuses to overwrite a `stopped`
//! record or to recreate one that expired; either way the remaining
//! stages are abandoned.

use std::sync::Arc;

use async_trait::async_trait;
use chartflow_core::status::{ChartError, ChartResult, ChartStatus, ErrorCode, StatusRecord};
use chartflow_core::types::JobId;
use chartflow_pipeline::StageError;
use chartflow_store::{ResultStore, Transition};
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// Outcome / errors
// ---------------------------------------------------------------------------

/// Terminal result of a job run, as seen by whoever awaited it.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Finished(ChartResult),
    Failed(ChartError),
    Stopped,
}

/// Reasons a flow stops early.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// A `stopped` record, or no record at all, was found at a transition
    /// checkpoint.
    #[error("job was stopped")]
    Stopped,

    #[error(transparent)]
    Stage(#[from] StageError),
}

// ---------------------------------------------------------------------------
// JobTracker
// ---------------------------------------------------------------------------

/// Status writer for one running job.
pub struct JobTracker<'a> {
    store: &'a ResultStore,
    id: &'a JobId,
}

impl<'a> JobTracker<'a> {
    pub fn new(store: &'a ResultStore, id: &'a JobId) -> Self {
        Self { store, id }
    }

    pub fn id(&self) -> &JobId {
        self.id
    }

    /// Record a non-terminal transition, or bail out if the job was stopped
    /// or its record is gone.
    pub fn advance(&self, record: StatusRecord) -> Result<(), JobError> {
        let status = record.status();
        debug_assert!(!status.is_terminal(), "advance() takes a non-terminal status");
        match self.store.put_unless_stopped(self.id, record) {
            Transition::Applied => {
                tracing::debug!(job_id = %self.id, %status, "Job status updated");
                Ok(())
            }
            Transition::Stopped => {
                tracing::info!(
                    job_id = %self.id,
                    skipped = %status,
                    "Job was stopped, abandoning remaining stages",
                );
                Err(JobError::Stopped)
            }
            Transition::Gone => {
                self.log_gone(status);
                Err(JobError::Stopped)
            }
        }
    }

    pub fn finish(&self, result: ChartResult) -> JobOutcome {
        match self
            .store
            .put_unless_stopped(self.id, StatusRecord::finished(result.clone()))
        {
            Transition::Applied => {
                tracing::info!(job_id = %self.id, "Job finished");
                JobOutcome::Finished(result)
            }
            Transition::Stopped => self.yield_to_stop(),
            Transition::Gone => {
                self.log_gone(ChartStatus::Finished);
                JobOutcome::Stopped
            }
        }
    }

    pub fn fail(&self, error: ChartError) -> JobOutcome {
        match self
            .store
            .put_unless_stopped(self.id, StatusRecord::failed(error.clone()))
        {
            Transition::Applied => {
                match error.code {
                    ErrorCode::NoChart => {
                        tracing::warn!(job_id = %self.id, "Job failed - NO_CHART")
                    }
                    ErrorCode::Others => tracing::error!(
                        job_id = %self.id,
                        error = %error.message,
                        "Job failed - OTHERS",
                    ),
                }
                JobOutcome::Failed(error)
            }
            Transition::Stopped => self.yield_to_stop(),
            Transition::Gone => {
                self.log_gone(ChartStatus::Failed);
                JobOutcome::Stopped
            }
        }
    }

    /// The record expired or was evicted mid-run. A stop may have been
    /// lost with it, so the job is treated as stopped and writes nothing.
    fn log_gone(&self, skipped: ChartStatus) {
        tracing::warn!(
            job_id = %self.id,
            %skipped,
            "Job record expired or was evicted, abandoning job",
        );
    }

    fn yield_to_stop(&self) -> JobOutcome {
        tracing::info!(job_id = %self.id, "Job was stopped before its terminal write");
        JobOutcome::Stopped
    }
}

// ---------------------------------------------------------------------------
// JobFlow
// ---------------------------------------------------------------------------

/// Stage sequence of one job kind.
///
/// Implementations call [`JobTracker::advance`] before each stage and end
/// with [`JobTracker::finish`] or [`JobTracker::fail`]. Returning an error
/// hands classification back to [`JobService`].
#[async_trait]
pub trait JobFlow: Send + Sync + 'static {
    type Request: Send + Sync + 'static;

    /// Short name used in log output.
    const KIND: &'static str;

    async fn execute(
        &self,
        tracker: &JobTracker<'_>,
        request: &Self::Request,
    ) -> Result<JobOutcome, JobError>;
}

// ---------------------------------------------------------------------------
// JobService
// ---------------------------------------------------------------------------

/// Submission, cancellation and polling for one job kind.
pub struct JobService<F: JobFlow> {
    store: Arc<ResultStore>,
    flow: F,
}

impl<F: JobFlow> JobService<F> {
    pub fn new(store: Arc<ResultStore>, flow: F) -> Self {
        Self { store, flow }
    }

    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }

    /// Record `understanding` for a newly accepted job.
    pub fn accept(&self, id: &JobId) {
        self.store.put(id, StatusRecord::understanding());
        tracing::info!(job_id = %id, kind = F::KIND, "Job accepted");
    }

    /// Drive an accepted job to a terminal state.
    ///
    /// Stage failures are recorded as `failed` / `OTHERS`; nothing is
    /// propagated to the caller.
    pub async fn run(&self, id: JobId, request: F::Request) -> JobOutcome {
        let tracker = JobTracker::new(&self.store, &id);
        match self.flow.execute(&tracker, &request).await {
            Ok(outcome) => outcome,
            Err(JobError::Stopped) => JobOutcome::Stopped,
            Err(JobError::Stage(e)) => tracker.fail(ChartError::others(e.to_string())),
        }
    }

    /// Accept and run a job on the current task.
    pub async fn submit(&self, id: JobId, request: F::Request) -> JobOutcome {
        self.accept(&id);
        self.run(id, request).await
    }

    /// Accept a job and run it on its own task.
    ///
    /// `understanding` is recorded before this returns. A panic inside the
    /// flow is caught and recorded as `failed` / `OTHERS`.
    pub fn spawn(self: &Arc<Self>, id: JobId, request: F::Request) -> JoinHandle<JobOutcome> {
        self.accept(&id);

        let service = Arc::clone(self);
        tokio::spawn(async move {
            let inner = {
                let service = Arc::clone(&service);
                let id = id.clone();
                tokio::spawn(async move { service.run(id, request).await })
            };

            match inner.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(job_id = %id, kind = F::KIND, error = %e, "Job task aborted");
                    JobTracker::new(&service.store, &id)
                        .fail(ChartError::others(format!("job task failed: {e}")))
                }
            }
        })
    }

    /// Mark a job as stopped. Idempotent; in-flight stages run to
    /// completion but their results are discarded.
    pub fn stop(&self, id: &JobId) {
        self.store.put(id, StatusRecord::stopped());
        tracing::info!(job_id = %id, kind = F::KIND, "Job stop requested");
    }

    /// Current record, or a `failed` / `OTHERS` record for unknown ids.
    pub fn result(&self, id: &JobId) -> StatusRecord {
        self.store.get(id).unwrap_or_else(|| {
            tracing::warn!(job_id = %id, kind = F::KIND, "Job result not found");
            StatusRecord::not_found(id)
        })
    }
}
