use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::seeded_service;
use crate::reports::router::report_router;

async fn get(uri: &str) -> Response {
    let app = report_router(seeded_service());
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds"),
    )
    .await
    .expect("router responds")
}

async fn post_json(uri: &str, body: Value) -> Response {
    let app = report_router(seeded_service());
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds"),
    )
    .await
    .expect("router responds")
}

fn submission(severity: u8) -> Value {
    json!({
        "id": "rep-100",
        "title": "Collapsed drain cover",
        "category": "flooding",
        "severity": severity,
        "status": "pending",
        "location": "Rua Boa Vista, 200",
        "region": "Centro",
        "coordinates": { "lat": -23.545, "lng": -46.634 },
        "submitted_at": "2025-05-22T09:15:00Z"
    })
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body collects");
    serde_json::from_slice(&bytes).expect("body is json")
}

#[tokio::test]
async fn list_returns_a_page_with_totals() {
    let response = get("/api/v1/reports?per_page=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total"], 5);
    assert_eq!(body["page_count"], 3);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn assigned_status_param_uses_the_special_case() {
    let response = get("/api/v1/reports?status=assigned&sort=id").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let ids: Vec<&str> = body["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["id"].as_str().expect("id string"))
        .collect();
    assert_eq!(ids, vec!["rep-001", "rep-003", "rep-005"]);
}

#[tokio::test]
async fn unknown_status_param_is_a_bad_request() {
    let response = get("/api/v1/reports?status=escalated").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error string")
        .contains("escalated"));
}

#[tokio::test]
async fn malformed_date_param_is_a_bad_request() {
    let response = get("/api/v1/reports?from=05-20-2025").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_streams_csv() {
    let response = get("/api/v1/reports/export?status=assigned").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body collects");
    let text = String::from_utf8(bytes.to_vec()).expect("utf8");
    // header + three assigned fixture rows
    assert_eq!(text.lines().count(), 4);
}

#[tokio::test]
async fn dashboard_returns_kpis_and_categories() {
    let response = get("/api/v1/dashboard/kpis?recency=all").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["kpis"]["total_reports"]["all_time"], 5);
    assert_eq!(body["kpis"]["active_interventions"], 1);
    assert!(body["top_categories"].as_array().is_some());
    assert_eq!(body["neighborhoods"][0]["name"], "Centro");
    assert_eq!(body["neighborhoods"][0]["report_count"], 3);
    assert_eq!(body["recent_reports"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn submission_rejects_an_out_of_scale_severity() {
    let response = post_json("/api/v1/reports", submission(99)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn submission_accepts_an_in_scale_severity() {
    let response = post_json("/api/v1/reports", submission(4)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["id"], "rep-100");
    assert_eq!(body["severity"], 4);
}

#[tokio::test]
async fn deleting_an_unknown_report_is_not_found() {
    let app = report_router(seeded_service());
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/reports/rep-999")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
