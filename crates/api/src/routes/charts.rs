//! Route definitions for the `/charts` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::charts;
use crate::state::AppState;

/// Routes mounted at `/charts`.
///
/// ```text
/// POST   /                     -> submit_chart
/// PATCH  /{query_id}           -> stop_chart
/// GET    /{query_id}/result    -> chart_result
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(charts::submit_chart))
        .route("/{query_id}", patch(charts::stop_chart))
        .route("/{query_id}/result", get(charts::chart_result))
}
