//! In-memory stage fakes for engine tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chartflow_pipeline::{
    Column, GenerationReplies, Generator, Prompt, QueryData, SchemaValidator, SqlExecutor,
    StageError,
};
use serde_json::json;
use tokio::sync::Notify;

/// Reply of a successful generation for the `SELECT 1` scenario.
pub(crate) const BAR_CHART_REPLY: &str =
    r#"{"reasoning":"r","chart_schema":{"mark":"bar","data":{"values":[{"x":1}]}}}"#;

/// Pauses a fake stage until the test releases it.
#[derive(Default)]
pub(crate) struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Wait until the stage is in flight.
    pub(crate) async fn entered(&self) {
        self.entered.notified().await;
    }

    pub(crate) fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

pub(crate) fn one_row() -> QueryData {
    QueryData {
        columns: vec![Column {
            name: "x".into(),
            data_type: Some("integer".into()),
        }],
        data: vec![vec![json!(1)]],
    }
}

pub(crate) fn mark_schema() -> Arc<SchemaValidator> {
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
// SQL executor
// ---------------------------------------------------------------------------

pub(crate) struct FakeExecutor {
    rows: Result<QueryData, String>,
    gate: Option<Arc<Gate>>,
    pub(crate) calls: Mutex<Vec<(String, Option<String>, usize)>>,
}

impl FakeExecutor {
    pub(crate) fn returning(rows: QueryData) -> Self {
        Self {
            rows: Ok(rows),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            rows: Err(message.to_string()),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl SqlExecutor for FakeExecutor {
    async fn execute(
        &self,
        sql: &str,
        project_id: Option<&str>,
        limit: usize,
    ) -> Result<QueryData, StageError> {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), project_id.map(str::to_string), limit));
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        self.rows.clone().map_err(StageError::Failed)
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

pub(crate) struct FakeGenerator {
    reply: Result<String, String>,
    gate: Option<Arc<Gate>>,
    pub(crate) prompts: Mutex<Vec<Prompt>>,
}

impl FakeGenerator {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            gate: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            gate: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<GenerationReplies, StageError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        match &self.reply {
            Ok(reply) => Ok(GenerationReplies {
                replies: vec![reply.clone()],
            }),
            Err(message) => Err(StageError::Failed(message.clone())),
        }
    }
}

/// Generator that panics mid-stage.
pub(crate) struct PanickingGenerator;

#[async_trait]
impl Generator for PanickingGenerator {
    async fn generate(&self, _prompt: &Prompt) -> Result<GenerationReplies, StageError> {
        panic!("generator blew up");
    }
}
