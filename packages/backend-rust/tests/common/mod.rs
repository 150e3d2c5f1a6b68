#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use area_tutor_backend::config::Config;

pub fn test_config() -> Config {
    Config {
        session_ttl: Duration::from_secs(600),
        ..Config::default()
    }
}

pub fn create_test_app() -> Router {
    area_tutor_backend::create_app(&test_config())
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Create a session and return its id.
pub async fn create_session(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["sessionId"].as_str().unwrap().to_string()
}

/// Read the expected area out of the worked-example hint.
pub async fn expected_area(app: &Router, id: &str) -> f64 {
    let (status, body) = send(app, "GET", &format!("/api/sessions/{id}/hint/3"), None).await;
    assert_eq!(status, StatusCode::OK);
    let hint = body["data"]["hint"].as_str().unwrap();
    let (_, tail) = hint.rsplit_once("= ").unwrap();
    tail.split_whitespace().next().unwrap().parse().unwrap()
}
