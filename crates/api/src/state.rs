use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::{ChartAdjustmentService, ChartService};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Chart generation jobs.
    pub charts: Arc<ChartService>,
    /// Chart adjustment jobs, tracked in their own result store.
    pub adjustments: Arc<ChartAdjustmentService>,
}
