//! Prompt text for chart generation and adjustment.

use chartflow_core::request::{ChartAdjustmentOption, ChartConfigurations, Timezone};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::preprocess::PreprocessedData;
use crate::stage::Prompt;

pub const CHART_GENERATION_INSTRUCTIONS: &str = "\
### INSTRUCTIONS ###

- Chart types: bar, grouped_bar, stacked_bar, line, multi_line, area, pie.
- Choose the chart type that best answers the question; if no chart fits the data, return an empty chart_schema.
- Only use column names that appear in the sample data.
- Put the chart title in the language provided by the user.
- Leave data.values empty or omit it; the data is supplied to the chart separately.
- For temporal fields use an appropriate timeUnit.
- Do not add interactive parameters (params) to the schema.";

const OUTPUT_FORMAT: &str = "\
### OUTPUT FORMAT ###

Please provide your chain of thought reasoning and the vega-lite schema in JSON format.

{
    \"reasoning\": <REASON_TO_CHOOSE_THE_SCHEMA_IN_STRING_FORMATTED_IN_LANGUAGE_PROVIDED_BY_USER>,
    \"chart_schema\": <VEGA_LITE_JSON_SCHEMA>
}";

/// Render `now` in the caller's timezone, falling back to UTC when the
/// offset cannot be parsed.
pub fn current_time(now: DateTime<Utc>, timezone: Option<&Timezone>) -> String {
    match timezone.and_then(|tz| tz.fixed_offset().ok().map(|offset| (tz, offset))) {
        Some((tz, offset)) => format!(
            "{} ({})",
            now.with_timezone(&offset).format("%Y-%m-%d %A %H:%M:%S"),
            tz.name
        ),
        None => format!("{} (UTC)", now.format("%Y-%m-%d %A %H:%M:%S")),
    }
}

pub fn chart_generation_system_prompt() -> String {
    format!(
        "### TASK ###\n\n\
         You are a data analyst great at visualizing data using vega-lite! Given the user's question, \
         SQL, sample data and sample column values, you need to generate vega-lite schema in JSON and \
         provide suitable chart type. Besides, you need to give a concise and easy-to-understand \
         reasoning to describe why you provide such vega-lite schema.\n\n\
         {CHART_GENERATION_INSTRUCTIONS}\n\n{OUTPUT_FORMAT}\n"
    )
}

pub fn chart_adjustment_system_prompt() -> String {
    format!(
        "### TASK ###\n\n\
         You are a data analyst great at visualizing data using vega-lite! Given the sample data, \
         original question, SQL, the original vega-lite schema and the adjustment options, you need \
         to regenerate vega-lite schema in JSON and provide suitable chart. Besides, you need to give \
         a concise and easy-to-understand reasoning to describe why you provide such vega-lite schema.\n\n\
         {CHART_GENERATION_INSTRUCTIONS}\n\n{OUTPUT_FORMAT}\n"
    )
}

pub fn chart_generation_prompt(
    query: &str,
    sql: &str,
    data: &PreprocessedData,
    configurations: &ChartConfigurations,
    now: DateTime<Utc>,
) -> Prompt {
    let user = format!(
        "### INPUT ###\n\
         Question: {query}\n\
         SQL: {sql}\n\
         Sample Data: {}\n\
         Sample Data Statistics: {}\n\
         Language: {}\n\
         Current Time: {}\n\n\
         Please think step by step",
        data.sample_data,
        data.sample_data_statistics,
        configurations.language,
        current_time(now, configurations.timezone.as_ref()),
    );

    Prompt {
        system: chart_generation_system_prompt(),
        user,
    }
}

pub fn chart_adjustment_prompt(
    query: &str,
    sql: &str,
    option: &ChartAdjustmentOption,
    chart_schema: &Map<String, Value>,
    data: &PreprocessedData,
    configurations: &ChartConfigurations,
    now: DateTime<Utc>,
) -> Prompt {
    let mut options = format!("- Chart Type: {}\n", option.chart_type.as_str());
    for (label, value) in [
        ("X Axis", &option.x_axis),
        ("Y Axis", &option.y_axis),
        ("X Offset", &option.x_offset),
        ("Color", &option.color),
        ("Theta", &option.theta),
    ] {
        if let Some(value) = value {
            options.push_str(&format!("- {label}: {value}\n"));
        }
    }

    let user = format!(
        "### INPUT ###\n\
         Adjustment Options:\n{options}\
         Original Question: {query}\n\
         Original SQL: {sql}\n\
         Original Vega-Lite Schema: {}\n\
         Sample Data: {}\n\
         Sample Data Statistics: {}\n\
         Language: {}\n\
         Current Time: {}\n\n\
         Please think step by step",
        Value::Object(chart_schema.clone()),
        data.sample_data,
        data.sample_data_statistics,
        configurations.language,
        current_time(now, configurations.timezone.as_ref()),
    );

    Prompt {
        system: chart_adjustment_system_prompt(),
        user,
    }
}
