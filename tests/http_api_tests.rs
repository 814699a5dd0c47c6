#![cfg(feature = "http_api")]

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use timetable::http_api::{AppState, ContainsResponse, router};
use timetable::{ClockTime, Interval, IntervalConfig, Timetable};
use tower::ServiceExt;

fn app() -> axum::Router {
    let timetable = Timetable::new().with_interval(
        Interval::builder()
            .label("morning")
            .clock(ClockTime::utc(8, 0).unwrap(), ClockTime::utc(12, 0).unwrap())
            .build(),
    );
    router(AppState::new(timetable))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn contains_reports_matching_interval() {
    let response = app()
        .oneshot(
            Request::get("/contains?at=2019-11-05T09:30:00Z")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: ContainsResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(body.contains);
    assert_eq!(body.matched_index, Some(0));
    assert_eq!(body.matched_label.as_deref(), Some("morning"));
}

#[tokio::test]
async fn contains_evaluates_in_requested_zone() {
    // 07:30 UTC is 08:30 in Rome during winter
    let response = app()
        .oneshot(
            Request::get("/contains?at=2020-01-15T07:30:00Z&tz=Europe/Rome")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body: ContainsResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(body.contains);
    assert_eq!(body.matched_index, Some(0));
    assert_eq!(body.at, "2020-01-15T08:30:00+01:00");

    let response = app()
        .oneshot(
            Request::get("/contains?at=2020-01-15T07:30:00Z")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body: ContainsResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(!body.contains);
    assert_eq!(body.matched_index, None);
}

#[tokio::test]
async fn contains_rejects_bad_input() {
    for uri in [
        "/contains?at=yesterday",
        "/contains?at=2020-01-15T07:30:00Z&tz=Mars/Olympus",
    ] {
        let response = app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["error"], "invalid_request");
    }
}

#[tokio::test]
async fn created_interval_is_listed_and_used() {
    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::post("/intervals")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"label":"evening","start_clock":"18:00","end_clock":"20:00","weekdays":["Tue"]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(Request::get("/intervals").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listed: Vec<IntervalConfig> = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1].label.as_deref(), Some("evening"));

    // 2019-11-05 is a Tuesday
    let response = app
        .oneshot(
            Request::get("/contains?at=2019-11-05T19:00:00Z")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body: ContainsResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(body.matched_index, Some(1));
}

#[tokio::test]
async fn create_interval_rejects_bad_body() {
    let app = app();
    for body in [r#"{"start_clock":"25:00"}"#, r#"{"weekdays":["Someday"]}"#, "not json"] {
        let response = app
            .clone()
            .oneshot(
                Request::post("/intervals")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let json = body_json(response).await;
        assert_eq!(json["error"], "invalid_request", "{body}");
        assert!(json["message"].is_string(), "{body}");
    }

    let response = app
        .clone()
        .oneshot(Request::get("/intervals").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listed: Vec<IntervalConfig> = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(listed.len(), 1);
}
