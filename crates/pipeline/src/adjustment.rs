//! Chart adjustment: regenerate an existing chart with new encodings.

use std::sync::Arc;

use chartflow_core::request::{ChartAdjustmentOption, ChartConfigurations};
use chartflow_core::status::ChartResult;
use chartflow_core::types::JobId;
use chrono::Utc;
use serde_json::{Map, Value};

use crate::postprocess::ChartPostProcessor;
use crate::preprocess::ChartDataPreprocessor;
use crate::prompt;
use crate::schema::SchemaValidator;
use crate::stage::{observe, Generator, QueryData, StageError, StageTimer};

#[derive(Debug, Clone, Copy)]
pub struct ChartAdjustmentInput<'a> {
    pub query: &'a str,
    pub sql: &'a str,
    pub adjustment_option: &'a ChartAdjustmentOption,
    pub chart_schema: &'a Map<String, Value>,
    pub data: &'a QueryData,
    pub configurations: &'a ChartConfigurations,
}

pub struct ChartAdjustment {
    generator: Arc<dyn Generator>,
    preprocessor: ChartDataPreprocessor,
    post_processor: ChartPostProcessor,
}

impl ChartAdjustment {
    pub fn new(generator: Arc<dyn Generator>, validator: Arc<SchemaValidator>) -> Self {
        Self {
            generator,
            preprocessor: ChartDataPreprocessor::default(),
            post_processor: ChartPostProcessor::new(validator),
        }
    }

    pub async fn run(
        &self,
        job_id: &JobId,
        input: ChartAdjustmentInput<'_>,
    ) -> Result<ChartResult, StageError> {
        let timer = StageTimer::start(job_id, "preprocess_data");
        let data = self.preprocessor.run(input.data);
        timer.done();

        let prompt = prompt::chart_adjustment_prompt(
            input.query,
            input.sql,
            input.adjustment_option,
            input.chart_schema,
            &data,
            input.configurations,
            Utc::now(),
        );

        let replies = observe(
            job_id,
            "generate_chart_adjustment",
            self.generator.generate(&prompt),
        )
        .await?;

        let timer = StageTimer::start(job_id, "post_process");
        let result = self.post_processor.run(&replies.replies);
        timer.done();

        Ok(result)
    }
}
