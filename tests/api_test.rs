mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use job_portal::identity::MemoryIdentity;
use job_portal::middleware::rate_limit::RateLimiter;
use job_portal::routes;
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

use common::JWT_SECRET;

fn app() -> Router {
    let store = common::store();
    let identity = Arc::new(MemoryIdentity::new(JWT_SECRET));
    routes::router(common::app_state(&store, identity), RateLimiter::new(100))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn sign_up(app: &Router, email: &str, name: &str, role: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "email": email,
            "password": "password1",
            "full_name": name,
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["session"]["access_token"]
        .as_str()
        .expect("access token")
        .to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_need_a_valid_bearer() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_authorization");

    let (status, body) = send(&app, Method::GET, "/api/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn sign_up_validates_before_anything_else() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "email": "x@example.com",
            "password": "123",
            "full_name": "X",
            "role": "superuser",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Password must be at least 6 characters"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/signin",
        None,
        Some(json!({ "email": "x@example.com", "password": "1234567" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn roles_gate_their_routes() {
    let app = app();
    let admin = sign_up(&app, "boss@example.com", "Boss", "admin").await;
    let student = sign_up(&app, "kid@example.com", "Kid", "student").await;

    let (status, body) = send(&app, Method::GET, "/api/me", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["role"], "student");
    assert_eq!(body["profile"]["full_name"], "Kid");

    let (status, _) = send(&app, Method::GET, "/api/admin/jobs", Some(&student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::GET, "/api/jobs", Some(&admin), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn hiring_flow_end_to_end() {
    let app = app();
    let admin = sign_up(&app, "hr@example.com", "Helen HR", "admin").await;
    let student = sign_up(&app, "sam@example.com", "Sam", "student").await;

    let (status, job) = send(
        &app,
        Method::POST,
        "/api/admin/jobs",
        Some(&admin),
        Some(json!({
            "title": "Rust Developer",
            "description": "Build services",
            "skills_required": [" Rust ", "rust", "Postgres", ""],
            "application_deadline": (Utc::now() + Duration::days(3)).to_rfc3339(),
            "openings_count": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", job);
    assert_eq!(job["skills_required"], json!(["Rust", "Postgres"]));
    let job_id = job["id"].as_str().unwrap().to_string();

    let (status, jobs) = send(&app, Method::GET, "/api/jobs?skill=RUST", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(jobs.as_array().unwrap().len(), 1);
    let (_, jobs) = send(&app, Method::GET, "/api/jobs?skill=go", Some(&student), None).await;
    assert!(jobs.as_array().unwrap().is_empty());

    let submission = json!({
        "job_id": job_id,
        "resume_url": "https://cv.example.com/sam.pdf",
        "cover_letter": "Hello",
    });
    let (status, application) = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(&student),
        Some(submission.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", application);
    assert_eq!(application["status"], "pending");
    let application_id = application["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(&student),
        Some(submission),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You have already applied for this job");

    let (_, listed) = send(&app, Method::GET, "/api/admin/applications?status=pending", Some(&admin), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["student_name"], "Sam");

    let (status, shortlisted) = send(
        &app,
        Method::POST,
        &format!("/api/admin/applications/{}/shortlist", application_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shortlisted["status"], "shortlisted");

    let (status, scheduled) = send(
        &app,
        Method::POST,
        &format!("/api/admin/applications/{}/interview", application_id),
        Some(&admin),
        Some(json!({
            "scheduled_date": (Utc::now() + Duration::minutes(10)).to_rfc3339(),
            "passcode": "Q7Z9",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", scheduled);
    assert_eq!(scheduled["application"]["status"], "interview_scheduled");
    let interview_id = scheduled["interview"]["id"].as_str().unwrap().to_string();

    let (_, mine) = send(&app, Method::GET, "/api/interviews", Some(&student), None).await;
    assert_eq!(mine[0]["access_status"], "live");
    assert!(mine[0].get("passcode").is_none());
    assert!(mine[0].get("meeting_url").is_none());

    let join_uri = format!("/api/interviews/{}/join", interview_id);
    let (status, _) = send(&app, Method::POST, &join_uri, Some(&student), Some(json!({ "passcode": "nope" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, joined) = send(&app, Method::POST, &join_uri, Some(&student), Some(json!({ "passcode": "q7z9" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(joined["meeting_url"], scheduled["interview"]["meeting_url"]);

    let (_, inbox) = send(&app, Method::GET, "/api/notifications", Some(&student), None).await;
    assert_eq!(inbox["unread_count"], 3);
    let (_, marked) = send(&app, Method::POST, "/api/notifications/read-all", Some(&student), None).await;
    assert_eq!(marked["updated"], 3);
    let (_, unread) = send(&app, Method::GET, "/api/notifications?filter=unread", Some(&student), None).await;
    assert!(unread["items"].as_array().unwrap().is_empty());
    assert_eq!(unread["unread_count"], 0);

    let (status, _) = send(&app, Method::POST, "/api/auth/signout", Some(&student), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn notifications_are_read_and_deleted_by_their_owner_only() {
    let app = app();
    let admin = sign_up(&app, "hr2@example.com", "Hana HR", "admin").await;
    let owner = sign_up(&app, "ola@example.com", "Ola", "student").await;
    let stranger = sign_up(&app, "ben@example.com", "Ben", "student").await;

    let (status, job) = send(
        &app,
        Method::POST,
        "/api/admin/jobs",
        Some(&admin),
        Some(json!({
            "title": "Data Engineer",
            "description": "Pipelines",
            "skills_required": ["SQL"],
            "application_deadline": (Utc::now() + Duration::days(3)).to_rfc3339(),
            "openings_count": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", job);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(&owner),
        Some(json!({
            "job_id": job["id"],
            "resume_url": "https://cv.example.com/ola.pdf",
            "cover_letter": "Hi",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, inbox) = send(&app, Method::GET, "/api/notifications", Some(&owner), None).await;
    assert_eq!(inbox["items"].as_array().unwrap().len(), 1);
    let id = inbox["items"][0]["id"].as_str().unwrap().to_string();
    let read_uri = format!("/api/notifications/{}/read", id);
    let item_uri = format!("/api/notifications/{}", id);

    let (status, _) = send(&app, Method::POST, &read_uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &item_uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, inbox) = send(&app, Method::GET, "/api/notifications?filter=unread", Some(&owner), None).await;
    assert_eq!(inbox["unread_count"], 1);

    let (status, read) = send(&app, Method::POST, &read_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["read"], true);

    let (status, _) = send(&app, Method::DELETE, &item_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &item_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, inbox) = send(&app, Method::GET, "/api/notifications", Some(&owner), None).await;
    assert!(inbox["items"].as_array().unwrap().is_empty());
}
