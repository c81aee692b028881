//! REST client for the SQL query engine.
//!
//! `POST {base_url}/v1/query` with `{sql, limit, project_id}` answers with
//! column-oriented rows (`{columns, data}`).

use async_trait::async_trait;
use chartflow_pipeline::{QueryData, SqlExecutor, StageError};
use serde::Serialize;

use crate::error::{parse_response, ProviderError};

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    sql: &'a str,
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<&'a str>,
}

/// HTTP client for a single query engine.
pub struct EngineClient {
    client: reqwest::Client,
    base_url: String,
}

impl EngineClient {
    /// * `base_url` - e.g. `http://engine:8080`, without a trailing slash.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn query(
        &self,
        sql: &str,
        project_id: Option<&str>,
        limit: usize,
    ) -> Result<QueryData, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/query", self.base_url))
            .json(&QueryBody {
                sql,
                limit,
                project_id,
            })
            .send()
            .await?;

        parse_response(response).await
    }
}

#[async_trait]
impl SqlExecutor for EngineClient {
    async fn execute(
        &self,
        sql: &str,
        project_id: Option<&str>,
        limit: usize,
    ) -> Result<QueryData, StageError> {
        let data = self.query(sql, project_id, limit).await?;
        tracing::debug!(rows = data.row_count(), limit, "Query engine returned rows");
        Ok(data)
    }
}
