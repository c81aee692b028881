//! Chart generation jobs: fetch rows, generate, validate.

use std::sync::Arc;

use async_trait::async_trait;
use chartflow_core::request::ChartRequest;
use chartflow_core::status::{ChartError, StatusRecord};
use chartflow_pipeline::stage::observe;
use chartflow_pipeline::{
    ChartGeneration, ChartGenerationInput, Generator, SchemaValidator, SqlExecutor,
};

use super::job::{JobError, JobFlow, JobOutcome, JobService, JobTracker};

/// Maximum rows fetched for a chart when not configured otherwise.
pub const DEFAULT_ROW_LIMIT: usize = 500;

pub type ChartService = JobService<ChartFlow>;

pub struct ChartFlow {
    executor: Arc<dyn SqlExecutor>,
    generation: ChartGeneration,
    row_limit: usize,
}

impl ChartFlow {
    pub fn new(
        executor: Arc<dyn SqlExecutor>,
        generator: Arc<dyn Generator>,
        validator: Arc<SchemaValidator>,
    ) -> Self {
        Self {
            executor,
            generation: ChartGeneration::new(generator, validator),
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }

    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }
}

#[async_trait]
impl JobFlow for ChartFlow {
    type Request = ChartRequest;

    const KIND: &'static str = "chart";

    async fn execute(
        &self,
        tracker: &JobTracker<'_>,
        request: &ChartRequest,
    ) -> Result<JobOutcome, JobError> {
        tracker.advance(StatusRecord::fetching())?;
        let data = observe(
            tracker.id(),
            "execute_sql",
            self.executor
                .execute(&request.sql, request.project_id.as_deref(), self.row_limit),
        )
        .await?;

        tracker.advance(StatusRecord::generating())?;
        let result = self
            .generation
            .run(
                tracker.id(),
                ChartGenerationInput {
                    query: &request.query,
                    sql: &request.sql,
                    data: &data,
                    configurations: &request.configurations,
                },
            )
            .await?;

        if result.is_empty() {
            return Ok(tracker.fail(ChartError::no_chart()));
        }
        Ok(tracker.finish(result))
    }
}
