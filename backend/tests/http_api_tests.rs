//! End-to-end tests through the axum router.

#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use signal_cycle::db::repositories::LocalRepository;
use signal_cycle::http::{create_router, AppState};

mod support;

fn router_at(time: &str) -> (LocalRepository, Router) {
    let (repo, service) = support::local_service(time);
    (repo, create_router(AppState::new(Arc::new(service))))
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    (status, value)
}

fn allocate_body(current_time: Option<&str>) -> Value {
    let mut body = json!({
        "total_cycle_time": 120.0,
        "signals": [
            {"signal_id": 1, "quantity": 50, "rate": 3.0},
            {"signal_id": 2, "quantity": 30, "rate": 2.0}
        ]
    });
    if let Some(t) = current_time {
        body["current_time"] = json!(t);
    }
    body
}

#[tokio::test]
async fn test_register_then_allocate_during_peak() {
    let (repo, router) = router_at("08:30");

    let (status, body) = send(
        &router,
        Method::PUT,
        "/v1/peak-hours",
        Some(json!([{"signal_id": 1, "peak_hours": ["08:00-09:00"]}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registered"], 1);
    assert_eq!(repo.write_count(), 1);

    let (status, body) = send(&router, Method::POST, "/v1/cycles/allocate", Some(allocate_body(None))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_time"], "08:30");
    assert_eq!(
        body["allocations"],
        json!([
            {"signal_id": 1, "allocated_time": 75.0},
            {"signal_id": 2, "allocated_time": 45.0}
        ])
    );
}

#[tokio::test]
async fn test_allocate_with_explicit_time_outside_peak() {
    let (_, router) = router_at("08:30");
    send(
        &router,
        Method::PUT,
        "/v1/peak-hours",
        Some(json!([{"signal_id": 1, "peak_hours": ["08:00-09:00"]}])),
    )
    .await;

    let (status, body) = send(
        &router,
        Method::POST,
        "/v1/cycles/allocate",
        Some(allocate_body(Some("12:00"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_time"], "12:00");
    assert_eq!(body["allocations"][0]["allocated_time"], 63.16);
    assert_eq!(body["allocations"][1]["allocated_time"], 56.84);
}

#[tokio::test]
async fn test_malformed_interval_is_rejected_with_context() {
    let (repo, router) = router_at("08:30");
    send(
        &router,
        Method::PUT,
        "/v1/peak-hours",
        Some(json!([{"signal_id": 1, "peak_hours": ["08:00-09:00"]}])),
    )
    .await;

    let (status, body) = send(
        &router,
        Method::PUT,
        "/v1/peak-hours",
        Some(json!([
            {"signal_id": 1, "peak_hours": ["06:00-07:00"]},
            {"signal_id": 5, "peak_hours": ["25:00-26:00"]}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "MALFORMED_INTERVAL");
    assert_eq!(body["details"]["signal_id"], 5);
    assert_eq!(body["details"]["raw"], "25:00-26:00");
    assert_eq!(repo.write_count(), 1);

    let (_, body) = send(&router, Method::GET, "/v1/peak-hours/1", None).await;
    assert_eq!(body["peak_hours"], json!(["08:00-09:00"]));
}

#[tokio::test]
async fn test_listing_reflects_latest_registration() {
    let (_, router) = router_at("08:30");
    send(
        &router,
        Method::PUT,
        "/v1/peak-hours",
        Some(json!([
            {"signal_id": 3, "peak_hours": ["17:00-18:00"]},
            {"signal_id": 1, "peak_hours": ["8:00-9:00", "12:00-12:30"]}
        ])),
    )
    .await;
    send(
        &router,
        Method::PUT,
        "/v1/peak-hours",
        Some(json!([{"signal_id": 3, "peak_hours": ["16:00-17:00"]}])),
    )
    .await;

    let (status, body) = send(&router, Method::GET, "/v1/peak-hours", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(
        body["entries"],
        json!([{"signal_id": 3, "peak_hours": ["16:00-17:00"]}])
    );

    let (_, body) = send(&router, Method::GET, "/v1/peak-hours/1", None).await;
    assert_eq!(body["peak_hours"], json!([]));
}

#[tokio::test]
async fn test_zero_rate_is_rejected() {
    let (_, router) = router_at("08:30");
    let body = json!({
        "total_cycle_time": 60.0,
        "signals": [
            {"signal_id": 1, "quantity": 10, "rate": 1.0},
            {"signal_id": 2, "quantity": 10, "rate": 0.0}
        ]
    });
    let (status, body) = send(&router, Method::POST, "/v1/cycles/allocate", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_RATE");
    assert_eq!(body["details"]["signal_id"], 2);
}

#[tokio::test]
async fn test_zero_demand_is_rejected() {
    let (_, router) = router_at("08:30");
    let body = json!({
        "total_cycle_time": 60.0,
        "signals": [
            {"signal_id": 1, "quantity": 0, "rate": 1.0},
            {"signal_id": 2, "quantity": 0, "rate": 2.0}
        ]
    });
    let (status, body) = send(&router, Method::POST, "/v1/cycles/allocate", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "ZERO_DEMAND");
}

#[tokio::test]
async fn test_empty_and_duplicate_requests_are_invalid() {
    let (_, router) = router_at("08:30");
    let (status, body) = send(
        &router,
        Method::POST,
        "/v1/cycles/allocate",
        Some(json!({"total_cycle_time": 60.0, "signals": []})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_REQUEST");

    let (status, body) = send(
        &router,
        Method::POST,
        "/v1/cycles/allocate",
        Some(json!({
            "total_cycle_time": 60.0,
            "signals": [
                {"signal_id": 4, "quantity": 1, "rate": 1.0},
                {"signal_id": 4, "quantity": 2, "rate": 1.0}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"]["signal_id"], 4);
}

#[tokio::test]
async fn test_store_failure_surfaces_as_repository_error() {
    let (repo, router) = router_at("08:30");
    repo.set_healthy(false);

    let (status, body) = send(
        &router,
        Method::PUT,
        "/v1/peak-hours",
        Some(json!([{"signal_id": 1, "peak_hours": ["08:00-09:00"]}])),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "REPOSITORY_ERROR");

    let (status, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "local: unavailable");
}

#[tokio::test]
async fn test_bad_current_time_is_structured_error() {
    let (_, router) = router_at("08:30");
    let (status, body) = send(
        &router,
        Method::POST,
        "/v1/cycles/allocate",
        Some(allocate_body(Some("8:30pm"))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("current_time"));
}

#[tokio::test]
async fn test_negative_quantity_is_structured_error() {
    let (_, router) = router_at("08:30");
    let body = json!({
        "total_cycle_time": 60.0,
        "signals": [{"signal_id": 1, "quantity": -5, "rate": 1.0}]
    });
    let (status, body) = send(&router, Method::POST, "/v1/cycles/allocate", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("signals[0].quantity"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (_, router) = router_at("08:30");
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/v1/peak-hours")
        .header("content-type", "application/json")
        .body(Body::from("[{\"signal_id\": 1,"))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
}
