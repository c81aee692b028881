//! Chart generation stages.
//!
//! Each job runs a fixed, linear sequence: SQL execution
//! ([`SqlExecutor`]), data preprocessing, prompt construction, generation
//! ([`Generator`]) and post-processing against the chart schema document.
//! [`ChartGeneration`] and [`ChartAdjustment`] wire those stages together
//! for the two job kinds.

pub mod adjustment;
pub mod generation;
pub mod postprocess;
pub mod preprocess;
pub mod prompt;
pub mod schema;
pub mod stage;

pub use adjustment::{ChartAdjustment, ChartAdjustmentInput};
pub use generation::{ChartGeneration, ChartGenerationInput};
pub use postprocess::ChartPostProcessor;
pub use preprocess::{ChartDataPreprocessor, PreprocessedData};
pub use schema::{SchemaError, SchemaValidator};
pub use stage::{Column, GenerationReplies, Generator, Prompt, QueryData, SqlExecutor, StageError};
