//! HTTP-backed stage collaborators.
//!
//! Wraps the external services a chart job talks to using [`reqwest`]:
//!
//! - [`EngineClient`] -- SQL execution against the query engine.
//! - [`OpenAiGenerator`] -- chat-completions text generation.
//! - [`fetch_schema_document`] -- one-shot download of the chart schema.

pub mod engine;
pub mod error;
pub mod llm;
pub mod schema_source;

pub use engine::EngineClient;
pub use error::ProviderError;
pub use llm::{LlmConfig, OpenAiGenerator};
pub use schema_source::{fetch_schema_document, VEGA_LITE_SCHEMA_URL};
