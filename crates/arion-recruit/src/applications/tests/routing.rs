use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tokio::task::JoinSet;
use tower::ServiceExt;

use super::common::*;
use crate::applications::registration::RegistrationCode;
use crate::applications::repository::RegistrationRepository;
use crate::applications::router::registration_router;
use crate::applications::sqlite::SqliteRegistrationRepository;

fn app() -> (Router, Arc<MemoryRepository>) {
    let (service, repository) = build_service();
    (registration_router(Arc::new(service)), repository)
}

fn post_json(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/applications")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn post_returns_registration_number() {
    let (app, repository) = app();

    let response = app
        .oneshot(post_json(payload_json().to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json_body(response).await;
    assert_eq!(json["success"], Value::Bool(true));
    assert!(json.get("error").is_none());

    let reg_no = json["regNo"].as_str().expect("regNo string");
    let code = RegistrationCode::parse(reg_no).expect("well-formed code");
    assert_eq!(code.prefix(), "AR25");
    assert_eq!(repository.records()[0].reg_no, code);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_posts_are_all_registered() {
    let repository = Arc::new(
        SqliteRegistrationRepository::open_in_memory().expect("in-memory database"),
    );
    let app = registration_router(Arc::new(service_with(repository.clone(), 11)));

    let mut requests = JoinSet::new();
    for _ in 0..8 {
        let app = app.clone();
        requests.spawn(async move {
            let response = app
                .oneshot(post_json(payload_json().to_string()))
                .await
                .expect("response");
            let status = response.status();
            (status, read_json_body(response).await)
        });
    }

    let mut codes = HashSet::new();
    while let Some(joined) = requests.join_next().await {
        let (status, json) = joined.expect("request task");
        assert_eq!(status, StatusCode::OK, "{json}");
        codes.insert(json["regNo"].as_str().expect("regNo string").to_string());
    }

    assert_eq!(codes.len(), 8);
    assert_eq!(repository.count().expect("count"), 8);
}

#[tokio::test]
async fn post_accepts_motivation_under_either_key() {
    let (app, repository) = app();
    let mut body = payload_json();
    let motivation = body
        .as_object_mut()
        .and_then(|object| object.remove("interest"))
        .expect("fixture carries interest");
    body["motivation"] = motivation;

    let response = app
        .oneshot(post_json(body.to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(repository.records()[0].applicant.motivation, MOTIVATION);
}

#[tokio::test]
async fn incomplete_payload_is_unprocessable() {
    let (app, repository) = app();
    let mut body = payload_json();
    body["phone"] = Value::from("12345");

    let response = app
        .oneshot(post_json(body.to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = read_json_body(response).await;
    assert_eq!(json["success"], Value::Bool(false));
    assert!(json["error"]
        .as_str()
        .expect("error message")
        .contains("Basic Info"));
    assert_eq!(repository.count().expect("count"), 0);
}

#[tokio::test]
async fn unknown_catalog_label_is_rejected() {
    let (app, repository) = app();
    let mut body = payload_json();
    body["branch"] = Value::from("Astrology");

    let response = app
        .oneshot(post_json(body.to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = read_json_body(response).await;
    assert_eq!(json["success"], Value::Bool(false));
    assert_eq!(repository.count().expect("count"), 0);
}

#[tokio::test]
async fn malformed_body_is_unprocessable() {
    let (app, _repository) = app();

    let response = app
        .oneshot(post_json("{\"fullName\":".to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = read_json_body(response).await;
    assert_eq!(json["success"], Value::Bool(false));
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn storage_failure_is_a_server_error() {
    let service = service_with(Arc::new(UnavailableRepository), 3);
    let app = registration_router(Arc::new(service));

    let response = app
        .oneshot(post_json(payload_json().to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = read_json_body(response).await;
    assert_eq!(json["success"], Value::Bool(false));
    assert_eq!(json["error"], Value::from("Server error"));
}

#[tokio::test]
async fn lookup_reports_stored_registration() {
    let (service, _repository) = build_service();
    let record = service.register(payload()).expect("registered");
    let app = registration_router(Arc::new(service));

    let response = app
        .oneshot(get(&format!("/api/applications/{}", record.reg_no)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json_body(response).await;
    assert_eq!(json["success"], Value::Bool(true));
    assert_eq!(json["regNo"], Value::from(record.reg_no.as_str()));
    assert!(json["submittedAt"].is_string());
    assert!(json.get("fullName").is_none());
}

#[tokio::test]
async fn lookup_of_unknown_or_garbled_code_is_not_found() {
    for uri in [
        "/api/applications/AR25-20250115-4821",
        "/api/applications/not-a-code",
    ] {
        let (app, _repository) = app();
        let response = app.oneshot(get(uri)).await.expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let json = read_json_body(response).await;
        assert_eq!(json["success"], Value::Bool(false));
    }
}
