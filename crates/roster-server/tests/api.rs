use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use roster_server::{app, router, AppState};
use roster_store::Store;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> Router {
    let store = Store::open_in_memory().expect("open store");
    store.migrate().expect("migrate");
    router(AppState::new(store))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

fn student(full_name: &str, email: &str, course: &str) -> Value {
    json!({ "fullName": full_name, "email": email, "course": course })
}

#[tokio::test]
async fn root_reports_running() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("API is running...".to_string()));
}

#[tokio::test]
async fn create_then_list_newest_first() {
    let app = test_app();

    let (status, first) = send(
        &app,
        Method::POST,
        "/students",
        Some(student("  Ada Lovelace ", " ADA@Example.com ", " Math ")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["fullName"], "Ada Lovelace");
    assert_eq!(first["email"], "ada@example.com");
    assert_eq!(first["course"], "Math");
    assert!(first["id"].as_str().is_some());
    assert!(first["createdAt"].as_i64().is_some());

    let (status, _) = send(
        &app,
        Method::POST,
        "/students",
        Some(student("Alan Turing", "alan@example.com", "Logic")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, list) = send(&app, Method::GET, "/students", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().expect("array");
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["fullName"], "Alan Turing");
    assert_eq!(list[1]["fullName"], "Ada Lovelace");
}

#[tokio::test]
async fn api_prefix_serves_the_same_records() {
    let app = test_app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/students",
        Some(student("Grace Hopper", "grace@example.com", "Compilers")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, list) = send(&app, Method::GET, "/students", None).await;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn validation_failures_return_first_rule() {
    let app = test_app();
    let cases = [
        (
            student("   ", "a@b.co", "CSE"),
            "fullName, email, and course are required.",
        ),
        (student("Jo", "a@b.co", "CS"), "full name too short."),
        (student("Johnathon", "a@b.co", "CSE"), "enter full name"),
        (
            student("John2 Doe", "a@b.co", "CSE"),
            "full name must contain letters only.",
        ),
        (
            student("John Doe", "not-an-email", "CS"),
            "enter a valid email.",
        ),
        (student("John Doe", "a@b.co", "CS"), "course too short."),
    ];

    for (body, message) in cases {
        let (status, response) = send(&app, Method::POST, "/students", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{message}");
        assert_eq!(response["message"], message);
    }

    let (status, response) = send(
        &app,
        Method::POST,
        "/students",
        Some(json!({ "fullName": "John Doe" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["message"],
        "fullName, email, and course are required."
    );
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/students")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["message"], "malformed request body");
}

#[tokio::test]
async fn duplicate_and_email_conflicts_are_distinct() {
    let app = test_app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/students",
        Some(student("John Doe", "john@example.com", "Math")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/students",
        Some(student(" john   DOE ", "JOHN@example.com", "math ")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "duplicate data is not allowed");

    let (status, body) = send(
        &app,
        Method::POST,
        "/students",
        Some(student("Jane Roe", "John@Example.com", "History")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "email already exists");
}

#[tokio::test]
async fn update_replaces_fields_and_allows_self_match() {
    let app = test_app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/students",
        Some(student("John Doe", "john@example.com", "Math")),
    )
    .await;
    let id = created["id"].as_str().expect("id").to_string();
    let uri = format!("/students/{id}");

    let (status, same) = send(
        &app,
        Method::PUT,
        &uri,
        Some(student("John Doe", "john@example.com", "Math")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same["id"], id.as_str());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(student("John Doe", "john@example.com", "Physics")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["course"], "Physics");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(student("John Doe", "john@example.com", "  ")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "fullName, email, and course are required.");
}

#[tokio::test]
async fn update_conflicts_with_other_records() {
    let app = test_app();
    send(
        &app,
        Method::POST,
        "/students",
        Some(student("John Doe", "john@example.com", "Math")),
    )
    .await;
    let (_, other) = send(
        &app,
        Method::POST,
        "/students",
        Some(student("Jane Roe", "jane@example.com", "History")),
    )
    .await;
    let uri = format!("/students/{}", other["id"].as_str().expect("id"));

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(student("Jane Roe", "JOHN@example.com", "History")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "email already exists");
}

#[tokio::test]
async fn update_missing_or_invalid_id_is_not_found() {
    let app = test_app();
    let missing = "/students/5f0c2d3e-8f7a-4b6c-9d1e-2a3b4c5d6e7f";
    let (status, body) = send(
        &app,
        Method::PUT,
        missing,
        Some(student("John Doe", "john@example.com", "Math")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student not found");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/students/not-a-uuid",
        Some(student("John Doe", "john@example.com", "Math")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student not found");
}

#[tokio::test]
async fn delete_twice_reports_not_found() {
    let app = test_app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/students",
        Some(student("John Doe", "john@example.com", "Math")),
    )
    .await;
    let uri = format!("/students/{}", created["id"].as_str().expect("id"));

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student deleted");

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student not found");

    let (_, list) = send(&app, Method::GET, "/students", None).await;
    assert_eq!(list.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/courses", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn unsupported_methods_on_known_paths_are_not_found() {
    let app = test_app();
    let requests = [
        (Method::GET, "/students/5f0c2d3e-8f7a-4b6c-9d1e-2a3b4c5d6e7f"),
        (Method::DELETE, "/students"),
        (Method::PATCH, "/api/students"),
        (Method::POST, "/"),
    ];

    for (method, uri) in requests {
        let (status, body) = send(&app, method.clone(), uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["message"], "Route not found", "{method} {uri}");
    }
}

#[tokio::test]
async fn preflight_allows_configured_origin() {
    let store = Store::open_in_memory().expect("open store");
    store.migrate().expect("migrate");
    let origins = vec!["http://localhost:5173".to_string()];
    let app = app(AppState::new(store), &origins).expect("app");

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/students")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("http://localhost:5173")
    );
}

#[tokio::test]
async fn preflight_ignores_unlisted_origin() {
    let store = Store::open_in_memory().expect("open store");
    store.migrate().expect("migrate");
    let origins = vec!["http://localhost:5173".to_string()];
    let app = app(AppState::new(store), &origins).expect("app");

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/students")
        .header(header::ORIGIN, "http://evil.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
