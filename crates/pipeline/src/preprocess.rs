//! Reduce query results to what the generator needs to see.
//!
//! The generator gets a small row sample plus per-column statistics
//! instead of the full result set.

use std::collections::HashSet;

use serde_json::{json, Map, Value};

use crate::stage::QueryData;

/// Number of rows kept in the sample.
pub const DEFAULT_SAMPLE_SIZE: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedData {
    /// `{"columns": [...], "data": [[...], ...]}` limited to the sample size.
    pub sample_data: Value,
    /// Column name to `{count, null_count, unique_count, min?, max?}`.
    pub sample_data_statistics: Value,
}

#[derive(Debug, Clone)]
pub struct ChartDataPreprocessor {
    sample_size: usize,
}

impl Default for ChartDataPreprocessor {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_SIZE)
    }
}

impl ChartDataPreprocessor {
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size }
    }

    pub fn run(&self, data: &QueryData) -> PreprocessedData {
        let rows: Vec<&Vec<Value>> = data.data.iter().take(self.sample_size).collect();
        let sample_data = json!({
            "columns": data.column_names(),
            "data": rows,
        });

        let mut statistics = Map::new();
        for (index, column) in data.columns.iter().enumerate() {
            statistics.insert(column.name.clone(), column_statistics(data, index));
        }

        PreprocessedData {
            sample_data,
            sample_data_statistics: Value::Object(statistics),
        }
    }
}

fn column_statistics(data: &QueryData, index: usize) -> Value {
    let mut null_count = 0usize;
    let mut unique = HashSet::new();
    let mut numeric: Option<(f64, f64)> = None;
    let mut all_numeric = true;

    for value in data.column_values(index) {
        if value.is_null() {
            null_count += 1;
            continue;
        }
        unique.insert(value.to_string());
        match value.as_f64() {
            Some(n) => {
                numeric = Some(match numeric {
                    Some((min, max)) => (min.min(n), max.max(n)),
                    None => (n, n),
                });
            }
            None => all_numeric = false,
        }
    }

    let mut stats = Map::new();
    stats.insert("count".into(), json!(data.row_count()));
    stats.insert("null_count".into(), json!(null_count));
    stats.insert("unique_count".into(), json!(unique.len()));
    if let (true, Some((min, max))) = (all_numeric, numeric) {
        stats.insert("min".into(), json!(min));
        stats.insert("max".into(), json!(max));
    }
    Value::Object(stats)
}
