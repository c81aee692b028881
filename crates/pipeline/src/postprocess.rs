//! Turn raw generator output into a sanitized [`ChartResult`].
//!
//! Never fails: unparsable output, an invalid schema, a schema without a
//! `data` object, or a missing reply all degrade to [`ChartResult::empty`],
//! which the orchestrator reports as `NO_CHART`.

use std::sync::Arc;

use chartflow_core::status::ChartResult;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::schema::SchemaValidator;

#[derive(Debug, Deserialize)]
struct RawGeneration {
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    chart_schema: Value,
}

#[derive(Clone)]
pub struct ChartPostProcessor {
    validator: Arc<SchemaValidator>,
}

impl ChartPostProcessor {
    pub fn new(validator: Arc<SchemaValidator>) -> Self {
        Self { validator }
    }

    pub fn run(&self, replies: &[String]) -> ChartResult {
        let Some(reply) = replies.first() else {
            tracing::warn!("Generator returned no replies");
            return ChartResult::empty();
        };

        let generation: RawGeneration = match serde_json::from_str(reply) {
            Ok(generation) => generation,
            Err(e) => {
                tracing::warn!(error = %e, "JSON deserialization of generation output failed");
                return ChartResult::empty();
            }
        };

        let schema = match generation.chart_schema {
            Value::Null => Map::new(),
            Value::Object(schema) => schema,
            other => {
                tracing::warn!(kind = json_kind(&other), "chart_schema is not an object");
                return ChartResult::empty();
            }
        };

        if schema.is_empty() {
            return ChartResult {
                reasoning: generation.reasoning,
                chart_schema: schema,
            };
        }

        let schema = Value::Object(schema);
        if let Err(e) = self.validator.validate(&schema) {
            tracing::warn!(error = %e, "Vega-lite schema is not valid");
            return ChartResult::empty();
        }

        let Value::Object(mut schema) = schema else {
            return ChartResult::empty();
        };
        if !strip_data_values(&mut schema) {
            tracing::warn!("Vega-lite schema has no data section");
            return ChartResult::empty();
        }

        ChartResult {
            reasoning: generation.reasoning,
            chart_schema: schema,
        }
    }
}

/// Replace inline rows with an empty sequence; rows reach the caller
/// separately. Returns `false` when there is no `data` object to strip.
fn strip_data_values(schema: &mut Map<String, Value>) -> bool {
    match schema.get_mut("data") {
        Some(Value::Object(data)) => {
            data.insert("values".into(), json!([]));
            true
        }
        _ => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tests::mark_schema;

    fn processor() -> ChartPostProcessor {
        ChartPostProcessor::new(Arc::new(mark_schema()))
    }

    fn run(reply: &str) -> ChartResult {
        processor().run(&[reply.to_string()])
    }

    #[test]
    fn valid_schema_loses_inline_rows() {
        let result =
            run(r#"{"reasoning":"r","chart_schema":{"mark":"bar","data":{"values":[{"x":1}]}}}"#);

        assert_eq!(result.reasoning, "r");
        assert_eq!(result.chart_schema["mark"], "bar");
        assert_eq!(result.chart_schema["data"]["values"], json!([]));
    }

    #[test]
    fn missing_data_section_is_discarded() {
        let result = run(r#"{"reasoning":"r","chart_schema":{"mark":"bar"}}"#);
        assert!(result.is_empty());
        assert_eq!(result.reasoning, "");
    }

    #[test]
    fn non_object_data_section_is_discarded() {
        assert!(run(r#"{"reasoning":"r","chart_schema":{"mark":"bar","data":[1]}}"#).is_empty());
    }

    #[test]
    fn unparsable_reply_is_empty() {
        let result = run("not json at all");
        assert!(result.is_empty());
        assert_eq!(result.reasoning, "");
    }

    #[test]
    fn invalid_schema_is_discarded() {
        let result = run(r#"{"reasoning":"r","chart_schema":{"mark":42}}"#);
        assert!(result.is_empty());
        assert_eq!(result.reasoning, "");
    }

    #[test]
    fn empty_schema_keeps_reasoning() {
        let result = run(r#"{"reasoning":"no chart fits","chart_schema":{}}"#);
        assert!(result.is_empty());
        assert_eq!(result.reasoning, "no chart fits");
    }

    #[test]
    fn non_object_schema_is_empty() {
        assert!(run(r#"{"reasoning":"r","chart_schema":"bar"}"#).is_empty());
        assert!(run(r#"[1, 2]"#).is_empty());
    }

    #[test]
    fn no_replies_is_empty() {
        assert!(processor().run(&[]).is_empty());
    }
}
