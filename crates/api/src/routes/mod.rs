pub mod chart_adjustments;
pub mod charts;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /charts                                  submit (POST)
/// /charts/{query_id}                       stop (PATCH)
/// /charts/{query_id}/result                poll (GET)
///
/// /chart-adjustments                       submit (POST)
/// /chart-adjustments/{query_id}            stop (PATCH)
/// /chart-adjustments/{query_id}/result     poll (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/charts", charts::router())
        .nest("/chart-adjustments", chart_adjustments::router())
}
