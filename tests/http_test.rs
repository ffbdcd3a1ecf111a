use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use initiatives::http::router;
use initiatives::{AppState, ServerConfig};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn test_app(dir: &TempDir) -> Router {
    let config = ServerConfig {
        data_dir: dir.path().to_path_buf(),
        storage_dir: Some(dir.path().join("storage")),
        ..ServerConfig::default()
    };
    let state = AppState::from_config(&config)
        .unwrap()
        .with_reference(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    router(state)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn challenge(uid: &str, theme: &str, region: &str) -> Value {
    json!({
        "uid": uid,
        "company": "Acme",
        "title": format!("Initiative {}", uid),
        "challenge": "Plastic waste",
        "solution": "Refill stations",
        "callToAction": "Join us",
        "theme": theme,
        "region": region,
        "impactScore": 70.0
    })
}

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = call(&app, Method::GET, "/api/challenges", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["challenges"], json!([]));
}

#[tokio::test]
async fn test_create_then_list() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/challenges",
        Some(challenge("challenge-1", "Water", "Africa")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["challenge"]["uid"], "challenge-1");

    let (status, body) = call(&app, Method::GET, "/api/challenges", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["challenges"].as_array().unwrap().len(), 1);

    // the creation notified the dashboard
    let (_, body) = call(&app, Method::GET, "/api/notifications", None).await;
    assert_eq!(body["unread"], 1);
}

#[tokio::test]
async fn test_create_rejects_missing_fields_and_duplicates() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/challenges",
        Some(json!({ "uid": "x", "company": "", "title": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/challenges",
        Some(json!({ "company": "Acme" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let payload = challenge("challenge-1", "Water", "Africa");
    let (status, _) = call(&app, Method::POST, "/api/challenges", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = call(&app, Method::POST, "/api/challenges", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_update_challenge() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    call(&app, Method::POST, "/api/challenges", Some(challenge("c-1", "Water", "Africa"))).await;

    let mut changed = challenge("c-1", "Water", "Asia");
    changed["title"] = json!("Renamed");
    let (status, body) = call(&app, Method::PUT, "/api/challenges/c-1", Some(changed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["challenge"]["title"], "Renamed");

    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/challenges/c-2",
        Some(challenge("c-1", "Water", "Asia")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/challenges/c-9",
        Some(challenge("c-9", "Water", "Asia")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_enhanced_listing_filters_and_is_stable() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    for (uid, theme, region) in [
        ("c-1", "Education", "Global"),
        ("c-2", "Education", "Africa"),
        ("c-3", "Water", "Global"),
    ] {
        call(&app, Method::POST, "/api/challenges", Some(challenge(uid, theme, region))).await;
    }

    let uri = "/api/initiatives?theme=education&region=global&sort=alphabetical";
    let (status, first) = call(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["total"], 3);
    assert_eq!(first["count"], 1);
    assert_eq!(first["initiatives"][0]["uid"], "c-1");
    assert_eq!(
        first["initiatives"][0]["milestones"][0]["title"],
        "Project Initiation"
    );

    let (_, second) = call(&app, Method::GET, uri, None).await;
    assert_eq!(first["initiatives"], second["initiatives"]);

    let (status, _) = call(&app, Method::GET, "/api/initiatives?sort=sideways", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::GET, "/api/initiatives/facets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["facets"]["themes"], json!(["Education", "Water"]));

    let (status, body) = call(&app, Method::GET, "/api/initiatives/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total"], 3);
}

#[tokio::test]
async fn test_unknown_initiative_is_404() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = call(&app, Method::GET, "/api/initiatives/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_users_and_participation() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    call(&app, Method::POST, "/api/challenges", Some(challenge("c-1", "Water", "Africa"))).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({ "email": "ada@example.com", "name": "Ada", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user"].get("password").is_none());
    let user_id = body["user"]["id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({ "email": "ADA@example.com", "name": "Other", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/initiatives/c-1/support",
        Some(json!({ "userId": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["initiative"]["supporters"], 1);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/initiatives/c-1/donate",
        Some(json!({ "userId": user_id, "amount": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/initiatives/c-1/donate",
        Some(json!({ "userId": user_id, "amount": 25.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["initiative"]["donations"], 25.5);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/initiatives/c-1/support",
        Some(json!({ "userId": "nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preferences_drive_default_sort() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = call(&app, Method::GET, "/api/preferences", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preferences"]["defaultSort"], "recent");

    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/preferences",
        Some(json!({ "defaultSort": "impact" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, Method::GET, "/api/initiatives", None).await;
    assert_eq!(body["sort"], "impact");
}

#[tokio::test]
async fn test_notifications_mark_read() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    call(&app, Method::POST, "/api/challenges", Some(challenge("c-1", "Water", "Africa"))).await;

    let (_, body) = call(&app, Method::GET, "/api/notifications", None).await;
    let id = body["notifications"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/notifications/{}/read", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notification"]["read"], true);

    let (status, _) = call(&app, Method::POST, "/api/notifications/nope/read", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call(&app, Method::GET, "/api/notifications", None).await;
    assert_eq!(body["unread"], 0);
}

async fn create_user(app: &Router, email: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/users",
        Some(json!({ "email": email, "name": "Ada", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["user"]["id"].as_str().unwrap().to_string()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_supports_are_all_counted() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    call(&app, Method::POST, "/api/challenges", Some(challenge("c-1", "Water", "Africa"))).await;
    let user_id = create_user(&app, "ada@example.com").await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let app = app.clone();
        let payload = json!({ "userId": user_id });
        handles.push(tokio::spawn(async move {
            call(&app, Method::POST, "/api/initiatives/c-1/support", Some(payload)).await
        }));
    }
    for handle in handles {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = call(&app, Method::GET, "/api/initiatives/c-1", None).await;
    assert_eq!(body["initiative"]["supporters"], 20);
    let (_, body) = call(&app, Method::GET, "/api/challenges", None).await;
    assert_eq!(body["challenges"][0]["supporters"], 20);
    let (_, body) = call(&app, Method::GET, &format!("/api/users/{}", user_id), None).await;
    assert_eq!(body["user"]["points"], 200);
}

#[tokio::test]
async fn test_oversized_donation_rejected_without_writes() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    call(&app, Method::POST, "/api/challenges", Some(challenge("c-1", "Water", "Africa"))).await;
    let user_id = create_user(&app, "ada@example.com").await;

    for _ in 0..2 {
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/initiatives/c-1/donate",
            Some(json!({ "userId": user_id, "amount": 1e300 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    let (_, body) = call(&app, Method::GET, "/api/challenges", None).await;
    assert!(body["challenges"][0].get("donations").is_none());
    let (_, body) = call(&app, Method::GET, &format!("/api/users/{}", user_id), None).await;
    assert_eq!(body["user"]["points"], 0);
}

#[tokio::test]
async fn test_unknown_user_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    call(&app, Method::POST, "/api/challenges", Some(challenge("c-1", "Water", "Africa"))).await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/initiatives/c-1/donate",
        Some(json!({ "userId": "nobody", "amount": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call(&app, Method::GET, "/api/challenges", None).await;
    assert!(body["challenges"][0].get("donations").is_none());
}

#[tokio::test]
async fn test_status_reports_counts() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    call(&app, Method::POST, "/api/challenges", Some(challenge("c-1", "Water", "Africa"))).await;
    create_user(&app, "ada@example.com").await;

    let (status, body) = call(&app, Method::GET, "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], initiatives::VERSION);
    assert_eq!(body["storage"]["initiatives"], 1);
    assert_eq!(body["storage"]["users"], 1);
    assert_eq!(body["storage"]["unreadNotifications"], 1);
}

#[tokio::test]
async fn test_get_user_by_id() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let user_id = create_user(&app, "ada@example.com").await;

    let (status, body) = call(&app, Method::GET, &format!("/api/users/{}", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"].get("password").is_none());

    let (status, body) = call(&app, Method::GET, "/api/users/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_collaboration_comments_and_watchers() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    call(&app, Method::POST, "/api/challenges", Some(challenge("c-1", "Water", "Africa"))).await;

    let (status, _) = call(&app, Method::GET, "/api/initiatives/c-9/collaboration", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::GET, "/api/initiatives/c-1/collaboration", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["collaboration"]["comments"], json!([]));

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/initiatives/c-1/comments",
        Some(json!({ "author": "Ana", "body": "Great start" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comment"]["author"], "Ana");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/initiatives/c-1/comments",
        Some(json!({ "author": "  ", "body": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/initiatives/c-1/watch",
        Some(json!({ "userId": "u-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["watching"], true);

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/initiatives/c-1/watch",
        Some(json!({ "userId": "u-1" })),
    )
    .await;
    assert_eq!(body["watching"], false);

    let (_, body) = call(&app, Method::GET, "/api/initiatives/c-1/collaboration", None).await;
    assert_eq!(body["collaboration"]["comments"][0]["body"], "Great start");
    assert_eq!(body["collaboration"]["watchers"], json!([]));
}

#[tokio::test]
async fn test_layout_round_trip() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = call(&app, Method::GET, "/api/layout", None).await;
    assert_eq!(status, StatusCode::OK);
    let mut layout = body["layout"].clone();
    assert_eq!(layout["widgets"].as_array().unwrap().len(), 6);

    layout["widgets"][0]["visible"] = json!(false);
    let (status, _) = call(&app, Method::PUT, "/api/layout", Some(layout.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, Method::GET, "/api/layout", None).await;
    assert_eq!(body["layout"], layout);

    let (status, _) = call(&app, Method::PUT, "/api/layout", Some(json!({ "widgets": 3 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_history_records_creations() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = call(&app, Method::GET, "/api/metrics/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"], json!([]));

    call(&app, Method::POST, "/api/challenges", Some(challenge("c-1", "Water", "Africa"))).await;
    call(&app, Method::POST, "/api/challenges", Some(challenge("c-2", "Energy", "Europe"))).await;

    let (_, body) = call(&app, Method::GET, "/api/metrics/history", None).await;
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.last().unwrap()["total"], 2);
}
