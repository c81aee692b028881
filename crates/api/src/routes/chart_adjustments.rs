//! Route definitions for the `/chart-adjustments` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::chart_adjustments;
use crate::state::AppState;

/// Routes mounted at `/chart-adjustments`.
///
/// ```text
/// POST   /                     -> submit_chart_adjustment
/// PATCH  /{query_id}           -> stop_chart_adjustment
/// GET    /{query_id}/result    -> chart_adjustment_result
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(chart_adjustments::submit_chart_adjustment))
        .route("/{query_id}", patch(chart_adjustments::stop_chart_adjustment))
        .route(
            "/{query_id}/result",
            get(chart_adjustments::chart_adjustment_result),
        )
}
