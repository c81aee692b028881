//! Chart generation: preprocess -> prompt -> generate -> post-process.

use std::sync::Arc;

use chartflow_core::request::ChartConfigurations;
use chartflow_core::status::ChartResult;
use chartflow_core::types::JobId;
use chrono::Utc;

use crate::postprocess::ChartPostProcessor;
use crate::preprocess::ChartDataPreprocessor;
use crate::prompt;
use crate::schema::SchemaValidator;
use crate::stage::{observe, Generator, QueryData, StageError, StageTimer};

/// Inputs of one chart generation run, borrowed from the job's context.
#[derive(Debug, Clone, Copy)]
pub struct ChartGenerationInput<'a> {
    pub query: &'a str,
    pub sql: &'a str,
    pub data: &'a QueryData,
    pub configurations: &'a ChartConfigurations,
}

pub struct ChartGeneration {
    generator: Arc<dyn Generator>,
    preprocessor: ChartDataPreprocessor,
    post_processor: ChartPostProcessor,
}

impl ChartGeneration {
    pub fn new(generator: Arc<dyn Generator>, validator: Arc<SchemaValidator>) -> Self {
        Self {
            generator,
            preprocessor: ChartDataPreprocessor::default(),
            post_processor: ChartPostProcessor::new(validator),
        }
    }

    /// Run the generation stages for `job_id`.
    ///
    /// Only the generator call can fail; an unusable generation comes back
    /// as an empty [`ChartResult`].
    pub async fn run(
        &self,
        job_id: &JobId,
        input: ChartGenerationInput<'_>,
    ) -> Result<ChartResult, StageError> {
        let timer = StageTimer::start(job_id, "preprocess_data");
        let data = self.preprocessor.run(input.data);
        timer.done();

        let prompt = prompt::chart_generation_prompt(
            input.query,
            input.sql,
            &data,
            input.configurations,
            Utc::now(),
        );

        let replies = observe(job_id, "generate_chart", self.generator.generate(&prompt)).await?;

        let timer = StageTimer::start(job_id, "post_process");
        let result = self.post_processor.run(&replies.replies);
        timer.done();

        Ok(result)
    }
}
