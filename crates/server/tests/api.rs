use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use db::DbService;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::{AppState, app};
use tower::util::ServiceExt;

async fn test_app() -> Router {
    let db = DbService {
        pool: db::test_pool().await,
    };
    app(AppState::new(db, "test-secret".to_string(), 24))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/api/auth/register",
            None,
            json!({"email": email, "password": "hunter22", "name": "Tester"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_login_me_flow() {
    let app = test_app().await;
    let token = register(&app, "flow@example.com").await;

    let (status, body) = send(&app, get_with_token("/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "flow@example.com");

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/login",
            None,
            json!({"email": "flow@example.com", "password": "hunter22"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = test_app().await;
    let request = Request::builder()
        .uri("/api/pet")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = test_app().await;
    let (status, _) = send(&app, get_with_token("/api/pet", "garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_forbidden_for_regular_users() {
    let app = test_app().await;
    let token = register(&app, "user@example.com").await;
    let (status, _) = send(&app, get_with_token("/api/admin/stats", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_pet_and_task_crud() {
    let app = test_app().await;
    let token = register(&app, "crud@example.com").await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/pet",
            Some(&token),
            json!({"name": "Rex", "species": "dog", "breed": "Labrador"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pet_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post_json(
            "/api/task",
            Some(&token),
            json!({
                "pet_id": pet_id,
                "task_type": "Feeding",
                "description": "Morning kibble",
                "time": "2024-01-01T10:05:00Z",
                "frequency": "daily"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["frequency"], "daily");

    let (status, body) = send(&app, get_with_token("/api/task", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        get_with_token(&format!("/api/task?pet_id={pet_id}"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_other_users_pet_is_invisible() {
    let app = test_app().await;
    let owner = register(&app, "owner@example.com").await;
    let intruder = register(&app, "intruder@example.com").await;

    let (_, body) = send(
        &app,
        post_json(
            "/api/pet",
            Some(&owner),
            json!({"name": "Rex", "species": "dog"}),
        ),
    )
    .await;
    let pet_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        get_with_token(&format!("/api/pet/{pet_id}"), &intruder),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notifications_respect_dismissed_set() {
    let app = test_app().await;
    let token = register(&app, "notify@example.com").await;

    let (_, body) = send(
        &app,
        post_json(
            "/api/pet",
            Some(&token),
            json!({"name": "Rex", "species": "dog"}),
        ),
    )
    .await;
    let pet_id = body["data"]["id"].as_str().unwrap().to_string();

    // A daily task due a few minutes from now is always inside the due
    // window, whatever wall-clock time the test runs at.
    let now = (chrono::Utc::now() + chrono::Duration::minutes(5)).to_rfc3339();
    let (_, body) = send(
        &app,
        post_json(
            "/api/task",
            Some(&token),
            json!({
                "pet_id": pet_id,
                "task_type": "Feeding",
                "description": "Kibble",
                "time": now,
                "frequency": "daily"
            }),
        ),
    )
    .await;
    let task_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get_with_token("/api/notification", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap().to_string())
        .collect();
    let due_id = format!("due-{task_id}");
    assert!(ids.contains(&due_id), "expected {due_id} in {ids:?}");

    let (status, body) = send(
        &app,
        get_with_token(&format!("/api/notification?dismissed={due_id}"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|n| n["id"] != due_id)
    );
}

#[tokio::test]
async fn test_like_produces_notification_for_post_owner() {
    let app = test_app().await;
    let author = register(&app, "author@example.com").await;
    let fan = register(&app, "fan@example.com").await;

    let (_, body) = send(
        &app,
        post_json(
            "/api/post",
            Some(&author),
            json!({"caption": "First walk in the park"}),
        ),
    )
    .await;
    let post_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post_json(&format!("/api/post/{post_id}/like"), Some(&fan), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["likes"], 1);

    // The author sees the like notification; the fan does not.
    let (_, body) = send(&app, get_with_token("/api/notification", &author)).await;
    let likes_id = format!("likes-{post_id}");
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n["id"] == likes_id)
    );

    let (_, body) = send(&app, get_with_token("/api/notification", &fan)).await;
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|n| n["id"] != likes_id)
    );
}
