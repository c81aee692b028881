//! Request payloads accepted by the chart service.
//!
//! Job ids are never part of these values: the service assigns them and
//! passes them alongside the request.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Locale options
// ---------------------------------------------------------------------------

pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_TIMEZONE_NAME: &str = "Asia/Taipei";
pub const DEFAULT_UTC_OFFSET: &str = "+8:00";

/// Named timezone with its UTC offset, e.g. `Asia/Taipei` / `+8:00`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Timezone {
    pub name: String,
    #[validate(custom(function = "validate_utc_offset"))]
    pub utc_offset: String,
}

impl Default for Timezone {
    fn default() -> Self {
        Self {
            name: DEFAULT_TIMEZONE_NAME.to_string(),
            utc_offset: DEFAULT_UTC_OFFSET.to_string(),
        }
    }
}

impl Timezone {
    /// Parse `utc_offset` (`+8:00`, `-05:30`, `+0`) into a [`FixedOffset`].
    pub fn fixed_offset(&self) -> Result<FixedOffset, CoreError> {
        parse_utc_offset(&self.utc_offset)
    }
}

fn parse_utc_offset(raw: &str) -> Result<FixedOffset, CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid UTC offset '{raw}'"));
    let raw = raw.trim();

    let (sign, rest) = match raw.chars().next() {
        Some('+') => (1, &raw[1..]),
        Some('-') => (-1, &raw[1..]),
        _ => return Err(invalid()),
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn validate_utc_offset(raw: &str) -> Result<(), ValidationError> {
    parse_utc_offset(raw)
        .map(|_| ())
        .map_err(|_| ValidationError::new("utc_offset"))
}

/// Locale options forwarded to the generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ChartConfigurations {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timezone")]
    #[validate(nested)]
    pub timezone: Option<Timezone>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_timezone() -> Option<Timezone> {
    Some(Timezone::default())
}

impl Default for ChartConfigurations {
    fn default() -> Self {
        Self {
            language: default_language(),
            timezone: default_timezone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Chart generation
// ---------------------------------------------------------------------------

/// Body of `POST /v1/charts`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChartRequest {
    #[validate(length(min = 1, message = "query must not be empty"))]
    pub query: String,
    #[validate(length(min = 1, message = "sql must not be empty"))]
    pub sql: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub configurations: ChartConfigurations,
}

// ---------------------------------------------------------------------------
// Chart adjustment
// ---------------------------------------------------------------------------

/// Chart kinds the adjustment flow can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Bar,
    GroupedBar,
    StackedBar,
    Line,
    MultiLine,
    Area,
    Pie,
}

impl ChartType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::GroupedBar => "grouped_bar",
            Self::StackedBar => "stacked_bar",
            Self::Line => "line",
            Self::MultiLine => "multi_line",
            Self::Area => "area",
            Self::Pie => "pie",
        }
    }
}

/// User-selected encoding changes for an existing chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartAdjustmentOption {
    pub chart_type: ChartType,
    #[serde(default)]
    pub x_axis: Option<String>,
    #[serde(default)]
    pub y_axis: Option<String>,
    #[serde(default)]
    pub x_offset: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub theta: Option<String>,
}

/// Body of `POST /v1/chart-adjustments`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChartAdjustmentRequest {
    #[validate(length(min = 1, message = "query must not be empty"))]
    pub query: String,
    #[validate(length(min = 1, message = "sql must not be empty"))]
    pub sql: String,
    pub adjustment_option: ChartAdjustmentOption,
    pub chart_schema: Map<String, Value>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub configurations: ChartConfigurations,
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// The only status a caller may set on a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedStatus {
    Stopped,
}

/// Body of `PATCH /v1/charts/{query_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRequest {
    pub status: RequestedStatus,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
