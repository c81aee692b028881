//! Download of the chart schema document.
//!
//! Called once at startup; the document is then compiled into a
//! [`SchemaValidator`](chartflow_pipeline::SchemaValidator) and never
//! fetched again.

use serde_json::Value;

use crate::error::{parse_response, ProviderError};

pub const VEGA_LITE_SCHEMA_URL: &str = "https://vega.github.io/schema/vega-lite/v5.json";

pub async fn fetch_schema_document(
    client: &reqwest::Client,
    url: &str,
) -> Result<Value, ProviderError> {
    tracing::info!(url, "Fetching chart schema document");
    let document: Value = parse_response(client.get(url).send().await?).await?;
    if !document.is_object() {
        return Err(ProviderError::UnexpectedResponse(
            "schema document is not a JSON object".into(),
        ));
    }
    Ok(document)
}
