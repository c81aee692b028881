//! Handlers for the `/charts` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chartflow_core::request::{ChartRequest, RequestedStatus, StopRequest};
use chartflow_core::status::StatusRecord;
use chartflow_core::types::JobId;
use validator::Validate;

use super::QueryIdResponse;
use crate::error::AppResult;
use crate::state::AppState;

/// POST /v1/charts
///
/// Accept a chart job and start it in the background. Returns 202 with the
/// generated `query_id`; the job is already `understanding` when this
/// returns.
pub async fn submit_chart(
    State(state): State<AppState>,
    payload: Result<Json<ChartRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    input.validate()?;

    let query_id = JobId::generate();
    tracing::info!(
        job_id = %query_id,
        project_id = input.project_id.as_deref(),
        thread_id = input.thread_id.as_deref(),
        "Chart job submitted",
    );
    state.charts.spawn(query_id.clone(), input);

    Ok((StatusCode::ACCEPTED, Json(QueryIdResponse { query_id })))
}

/// PATCH /v1/charts/{query_id}
///
/// Stop a chart job. Idempotent, and accepted for unknown ids as well.
pub async fn stop_chart(
    State(state): State<AppState>,
    Path(query_id): Path<JobId>,
    payload: Result<Json<StopRequest>, JsonRejection>,
) -> AppResult<Json<QueryIdResponse>> {
    let Json(request) = payload?;
    match request.status {
        RequestedStatus::Stopped => state.charts.stop(&query_id),
    }

    Ok(Json(QueryIdResponse { query_id }))
}

/// GET /v1/charts/{query_id}/result
pub async fn chart_result(
    State(state): State<AppState>,
    Path(query_id): Path<JobId>,
) -> Json<StatusRecord> {
    Json(state.charts.result(&query_id))
}
