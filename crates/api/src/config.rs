use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use chartflow_providers::llm::{DEFAULT_API_BASE, DEFAULT_MODEL};
use chartflow_providers::{LlmConfig, VEGA_LITE_SCHEMA_URL};
use chartflow_store::StoreConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Chart job settings.
    pub chart: ChartConfig,
}

/// Chart job and collaborator settings.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Seconds a status record survives after its last write.
    pub result_ttl_secs: u64,
    /// Maximum number of status records kept per job kind.
    pub result_max_entries: NonZeroUsize,
    /// Maximum rows fetched from the query engine per job.
    pub row_limit: usize,
    /// Seconds between sweeps of expired status records.
    pub purge_interval_secs: u64,
    /// Location of the chart JSON Schema document.
    pub schema_url: String,
    /// Base URL of the SQL query engine.
    pub engine_url: String,
    /// Chat-completions endpoint settings.
    pub llm: LlmConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// See [`ChartConfig::from_env`] for the chart settings.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parse_env("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_env("REQUEST_TIMEOUT_SECS", 30);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            chart: ChartConfig::from_env(),
        }
    }
}

impl ChartConfig {
    /// | Env Var                     | Default                                  |
    /// |-----------------------------|------------------------------------------|
    /// | `CHART_RESULT_TTL_SECS`     | `120`                                    |
    /// | `CHART_RESULT_MAX_ENTRIES`  | `1000000`                                |
    /// | `CHART_ROW_LIMIT`           | `500`                                    |
    /// | `STORE_PURGE_INTERVAL_SECS` | `30`                                     |
    /// | `VEGA_LITE_SCHEMA_URL`      | Vega-Lite v5 schema on vega.github.io    |
    /// | `ENGINE_URL`                | `http://localhost:8080`                  |
    /// | `LLM_API_BASE`              | `https://api.openai.com/v1`              |
    /// | `LLM_API_KEY`               | unset                                    |
    /// | `LLM_MODEL`                 | `gpt-4o-mini`                            |
    pub fn from_env() -> Self {
        let result_max_entries: usize = parse_env("CHART_RESULT_MAX_ENTRIES", 1_000_000);

        Self {
            result_ttl_secs: parse_env("CHART_RESULT_TTL_SECS", 120),
            result_max_entries: NonZeroUsize::new(result_max_entries)
                .expect("CHART_RESULT_MAX_ENTRIES must be greater than zero"),
            row_limit: parse_env("CHART_ROW_LIMIT", 500),
            purge_interval_secs: parse_env("STORE_PURGE_INTERVAL_SECS", 30),
            schema_url: std::env::var("VEGA_LITE_SCHEMA_URL")
                .unwrap_or_else(|_| VEGA_LITE_SCHEMA_URL.into()),
            engine_url: std::env::var("ENGINE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".into()),
            llm: LlmConfig {
                api_base: std::env::var("LLM_API_BASE")
                    .unwrap_or_else(|_| DEFAULT_API_BASE.into()),
                api_key: std::env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
                model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
                ..LlmConfig::default()
            },
        }
    }

    pub fn store(&self) -> StoreConfig {
        StoreConfig {
            max_entries: self.result_max_entries,
            ttl: Duration::from_secs(self.result_ttl_secs),
        }
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs)
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        let store = StoreConfig::default();
        Self {
            result_ttl_secs: store.ttl.as_secs(),
            result_max_entries: store.max_entries,
            row_limit: 500,
            purge_interval_secs: 30,
            schema_url: VEGA_LITE_SCHEMA_URL.into(),
            engine_url: "http://localhost:8080".into(),
            llm: LlmConfig::default(),
        }
    }
}

/// Read `key` and parse it, falling back to `default` when unset.
///
/// Panics on an unparsable value: misconfiguration should fail at startup.
fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
