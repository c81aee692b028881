//! Shared helpers for API integration tests.
//!
//! Builds the production router around in-memory stage fakes so the full
//! middleware stack and job engine run without any network access.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use chartflow_api::config::{ChartConfig, ServerConfig};
use chartflow_api::engine::{ChartAdjustmentFlow, ChartAdjustmentService, ChartFlow, ChartService};
use chartflow_api::router::build_app_router;
use chartflow_api::state::AppState;
use chartflow_pipeline::{
    Column, GenerationReplies, Generator, Prompt, QueryData, SchemaValidator, SqlExecutor,
    StageError,
};
use chartflow_store::ResultStore;

/// Reply of a generator that draws a bar chart of `x`.
pub const BAR_CHART_REPLY: &str =
    r#"{"reasoning":"r","chart_schema":{"mark":"bar","data":{"values":[{"x":1}]}}}"#;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        chart: ChartConfig::default(),
    }
}

// ---------------------------------------------------------------------------
// Stage fakes
// ---------------------------------------------------------------------------

/// Executor returning a fixed outcome for every statement.
pub struct StaticExecutor(pub Result<QueryData, String>);

impl StaticExecutor {
    pub fn one_row() -> Self {
        Self(Ok(QueryData {
            columns: vec![Column {
                name: "x".into(),
                data_type: Some("integer".into()),
            }],
            data: vec![vec![json!(1)]],
        }))
    }

    pub fn failing(message: &str) -> Self {
        Self(Err(message.to_string()))
    }
}

#[async_trait]
impl SqlExecutor for StaticExecutor {
    async fn execute(
        &self,
        _sql: &str,
        _project_id: Option<&str>,
        _limit: usize,
    ) -> Result<QueryData, StageError> {
        self.0.clone().map_err(StageError::Failed)
    }
}

/// Generator returning the same reply for every prompt.
pub struct StaticGenerator(pub String);

#[async_trait]
impl Generator for StaticGenerator {
    async fn generate(&self, _prompt: &Prompt) -> Result<GenerationReplies, StageError> {
        Ok(GenerationReplies {
            replies: vec![self.0.clone()],
        })
    }
}

/// Generator that never answers, keeping jobs in `generating`.
pub struct PendingGenerator;

#[async_trait]
impl Generator for PendingGenerator {
    async fn generate(&self, _prompt: &Prompt) -> Result<GenerationReplies, StageError> {
        std::future::pending().await
    }
}

fn mark_schema() -> Arc<SchemaValidator> {
    Arc::new(
        SchemaValidator::new(&json!({
            "type": "object",
            "required": ["mark"],
            "properties": {
                "mark": {"type": "string"},
                "data": {"type": "object"}
            }
        }))
        .unwrap(),
    )
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router around the given stage fakes.
pub fn build_test_app(
    executor: impl SqlExecutor + 'static,
    generator: impl Generator + 'static,
) -> Router {
    let config = test_config();
    let executor: Arc<dyn SqlExecutor> = Arc::new(executor);
    let generator: Arc<dyn Generator> = Arc::new(generator);
    let validator = mark_schema();

    let state = AppState {
        config: Arc::new(config.clone()),
        charts: Arc::new(ChartService::new(
            Arc::new(ResultStore::new(config.chart.store())),
            ChartFlow::new(
                Arc::clone(&executor),
                Arc::clone(&generator),
                Arc::clone(&validator),
            ),
        )),
        adjustments: Arc::new(ChartAdjustmentService::new(
            Arc::new(ResultStore::new(config.chart.store())),
            ChartAdjustmentFlow::new(executor, generator, validator),
        )),
    };

    build_app_router(state, &config)
}

/// App whose jobs all succeed with [`BAR_CHART_REPLY`].
pub fn build_default_app() -> Router {
    build_test_app(
        StaticExecutor::one_row(),
        StaticGenerator(BAR_CHART_REPLY.into()),
    )
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, body).await
}

/// Submit a job and return its `query_id`.
pub async fn submit(app: &Router, uri: &str, body: Value) -> String {
    let response = post_json(app.clone(), uri, body).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    json["query_id"].as_str().unwrap().to_string()
}

/// Poll `uri` until the record reaches a terminal status.
pub async fn wait_for_terminal(app: &Router, uri: &str) -> Value {
    for _ in 0..200 {
        let record = body_json(get(app.clone(), uri).await).await;
        if matches!(
            record["status"].as_str(),
            Some("finished" | "failed" | "stopped")
        ) {
            return record;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job at {uri} did not reach a terminal status");
}
