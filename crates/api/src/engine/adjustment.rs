//! Chart adjustment jobs: refetch rows and regenerate an existing chart.

use std::sync::Arc;

use async_trait::async_trait;
use chartflow_core::request::ChartAdjustmentRequest;
use chartflow_core::status::{ChartError, StatusRecord};
use chartflow_pipeline::stage::observe;
use chartflow_pipeline::{
    ChartAdjustment, ChartAdjustmentInput, Generator, SchemaValidator, SqlExecutor,
};

use super::chart::DEFAULT_ROW_LIMIT;
use super::job::{JobError, JobFlow, JobOutcome, JobService, JobTracker};

pub type ChartAdjustmentService = JobService<ChartAdjustmentFlow>;

pub struct ChartAdjustmentFlow {
    executor: Arc<dyn SqlExecutor>,
    adjustment: ChartAdjustment,
    row_limit: usize,
}

impl ChartAdjustmentFlow {
    pub fn new(
        executor: Arc<dyn SqlExecutor>,
        generator: Arc<dyn Generator>,
        validator: Arc<SchemaValidator>,
    ) -> Self {
        Self {
            executor,
            adjustment: ChartAdjustment::new(generator, validator),
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }

    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }
}

#[async_trait]
impl JobFlow for ChartAdjustmentFlow {
    type Request = ChartAdjustmentRequest;

    const KIND: &'static str = "chart_adjustment";

    async fn execute(
        &self,
        tracker: &JobTracker<'_>,
        request: &ChartAdjustmentRequest,
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
            .adjustment
            .run(
                tracker.id(),
                ChartAdjustmentInput {
                    query: &request.query,
                    sql: &request.sql,
                    adjustment_option: &request.adjustment_option,
                    chart_schema: &request.chart_schema,
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
