//! Integration tests for the `/v1/charts` resource.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_default_app, build_test_app, get, patch_json, post_json, submit,
    wait_for_terminal, PendingGenerator, StaticExecutor, StaticGenerator,
};
use serde_json::{json, Value};

fn chart_body(sql: &str) -> Value {
    json!({
        "query": "How many orders per month?",
        "sql": sql,
        "project_id": "p1",
        "configurations": {
            "language": "English",
            "timezone": {"name": "Asia/Taipei", "utc_offset": "+8:00"}
        }
    })
}

// ---------------------------------------------------------------------------
// Submit and poll
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submitted_chart_finishes_with_stripped_values() {
    let app = build_default_app();

    let id = submit(&app, "/v1/charts", chart_body("SELECT 1")).await;
    let record = wait_for_terminal(&app, &format!("/v1/charts/{id}/result")).await;

    assert_eq!(record["status"], "finished");
    assert_eq!(record["response"]["reasoning"], "r");
    assert_eq!(record["response"]["chart_schema"]["mark"], "bar");
    assert_eq!(record["response"]["chart_schema"]["data"]["values"], json!([]));
    assert!(record["error"].is_null());
}

#[tokio::test]
async fn submit_records_status_before_responding() {
    let app = build_test_app(StaticExecutor::one_row(), PendingGenerator);

    let id = submit(&app, "/v1/charts", chart_body("SELECT 1")).await;
    let record = body_json(get(app.clone(), &format!("/v1/charts/{id}/result")).await).await;

    let status = record["status"].as_str().unwrap();
    assert!(
        ["understanding", "fetching", "generating"].contains(&status),
        "unexpected status {status}"
    );
}

#[tokio::test]
async fn empty_chart_schema_is_no_chart() {
    let app = build_test_app(
        StaticExecutor::one_row(),
        StaticGenerator(r#"{"reasoning":"r","chart_schema":{}}"#.into()),
    );

    let id = submit(&app, "/v1/charts", chart_body("SELECT 1")).await;
    let record = wait_for_terminal(&app, &format!("/v1/charts/{id}/result")).await;

    assert_eq!(record["status"], "failed");
    assert_eq!(record["error"]["code"], "NO_CHART");
}

#[tokio::test]
async fn retrieval_failure_is_others() {
    let app = build_test_app(
        StaticExecutor::failing("syntax error at or near \"SELEC\""),
        PendingGenerator,
    );

    let id = submit(&app, "/v1/charts", chart_body("SELEC 1")).await;
    let record = wait_for_terminal(&app, &format!("/v1/charts/{id}/result")).await;

    assert_eq!(record["status"], "failed");
    assert_eq!(record["error"]["code"], "OTHERS");
    assert!(record["error"]["message"]
        .as_str()
        .unwrap()
        .contains("syntax error"));
}

#[tokio::test]
async fn unknown_id_is_failed_not_found() {
    let app = build_default_app();

    let response = get(app, "/v1/charts/does-not-exist/result").await;
    assert_eq!(response.status(), StatusCode::OK);

    let record = body_json(response).await;
    assert_eq!(record["status"], "failed");
    assert_eq!(record["error"]["code"], "OTHERS");
    assert_eq!(record["error"]["message"], "does-not-exist is not found");
}

// ---------------------------------------------------------------------------
// Stop
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stopped_chart_stays_stopped() {
    let app = build_test_app(StaticExecutor::one_row(), PendingGenerator);
    let id = submit(&app, "/v1/charts", chart_body("SELECT 1")).await;

    let response = patch_json(
        app.clone(),
        &format!("/v1/charts/{id}"),
        json!({"status": "stopped"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["query_id"], id.as_str());

    let record = wait_for_terminal(&app, &format!("/v1/charts/{id}/result")).await;
    assert_eq!(record["status"], "stopped");
    assert!(record["response"].is_null());
}

#[tokio::test]
async fn stop_is_idempotent() {
    let app = build_default_app();

    for _ in 0..2 {
        let response =
            patch_json(app.clone(), "/v1/charts/q-1", json!({"status": "stopped"})).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let record = body_json(get(app, "/v1/charts/q-1/result").await).await;
    assert_eq!(record, json!({"status": "stopped", "response": null, "error": null}));
}

#[tokio::test]
async fn stop_rejects_other_statuses() {
    let app = build_default_app();

    let response = patch_json(app, "/v1/charts/q-1", json!({"status": "finished"})).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "INVALID_BODY");
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_sql_is_rejected() {
    let app = build_default_app();

    let response = post_json(app, "/v1/charts", chart_body("")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("sql"));
}

#[tokio::test]
async fn invalid_utc_offset_is_rejected() {
    let app = build_default_app();
    let mut body = chart_body("SELECT 1");
    body["configurations"]["timezone"]["utc_offset"] = json!("+25:00");

    let response = post_json(app, "/v1/charts", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let app = build_default_app();

    let response = post_json(app, "/v1/charts", json!({"query": "q"})).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "INVALID_BODY");
}
