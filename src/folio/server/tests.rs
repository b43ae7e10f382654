use super::*;
use crate::commands::FolioPaths;
use crate::store::memory::InMemoryStore;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const TOKEN: &str = "test-token";
const BOUNDARY: &str = "folio-test-boundary";

fn app_with(config: FolioConfig, remote: Option<RemoteSource>) -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let paths = FolioPaths::new(dir.path().to_path_buf(), &config);
    let api = FolioApi::new(InMemoryStore::new(), paths.clone(), config.max_upload_bytes);
    let state = Arc::new(AppState::new(api, config).with_remote(remote));
    (dir, router(state, paths.upload_dir))
}

fn app() -> (TempDir, Router) {
    app_with(FolioConfig::default(), None)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn create(app: &Router, title: &str, category: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/articles",
            json!({"title": title, "content": "Body", "category": category}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn titles(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let (_dir, app) = app();
    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn newest_creation_lists_first() {
    let (_dir, app) = app();
    create(&app, "First", "family").await;
    create(&app, "Second", "career").await;

    let (status, body) = send(&app, get("/api/articles")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Second", "First"]);

    let (_, body) = send(&app, get("/api/articles?category=family")).await;
    assert_eq!(titles(&body), vec!["First"]);

    let (_, body) = send(&app, get("/api/articles?sortBy=title")).await;
    assert_eq!(titles(&body), vec!["First", "Second"]);
}

#[tokio::test]
async fn create_requires_fields() {
    let (_dir, app) = app();
    let (status, body) = send(
        &app,
        json_request("POST", "/api/articles", json!({"title": "Only title"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn bad_status_filter_is_rejected() {
    let (_dir, app) = app();
    let (status, _) = send(&app, get("/api/articles?status=sparkly")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_and_get_one() {
    let (_dir, app) = app();
    let id = create(&app, "Draft", "family").await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/articles/{id}"),
            json!({"title": "Final", "content": "", "status": "published"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Final");
    assert_eq!(body["content"], "Body");
    assert_eq!(body["status"], "published");

    let (status, body) = send(&app, get(&format!("/api/articles/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "local");

    let (status, _) = send(&app, get("/api/articles/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reorder_then_delete_prunes() {
    let (_dir, app) = app();
    let a = create(&app, "A", "x").await;
    let _b = create(&app, "B", "x").await;
    let c = create(&app, "C", "x").await;

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/api/articles-order",
            json!({"order": [a, c, "ghost"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, get("/api/articles")).await;
    assert_eq!(titles(&body), vec!["A", "C", "B"]);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/articles/{c}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get("/api/articles-order")).await;
    assert_eq!(body["order"], json!([a, "ghost"]));
}

#[tokio::test]
async fn reorder_rejects_non_array() {
    let (_dir, app) = app();
    let (status, _) = send(
        &app,
        json_request("POST", "/api/articles/reorder", json!({"order": "a,b"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hybrid_without_remote_is_local_only() {
    let (_dir, app) = app();
    create(&app, "Mine", "x").await;
    let (status, body) = send(&app, get("/api/articles/hybrid")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["source"], "local");
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn hybrid_survives_a_dead_remote() {
    let remote = RemoteSource::new("http://127.0.0.1:9", "wordpress", Duration::from_millis(300));
    let (_dir, app) = app_with(FolioConfig::default(), Some(remote));
    create(&app, "Mine", "x").await;

    let (status, body) = send(&app, get("/api/articles/hybrid")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Mine"]);
}

#[tokio::test]
async fn webhook_requires_token_when_configured() {
    let config = FolioConfig {
        webhook_token: Some(TOKEN.to_string()),
        ..FolioConfig::default()
    };
    let (_dir, app) = app_with(config, None);

    let (status, _) = send(&app, get("/api/n8n/health")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/n8n/health")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["totalArticles"], 0);
}

#[tokio::test]
async fn scraped_duplicate_is_a_conflict() {
    let (_dir, app) = app();
    let payload = json!({
        "title": "Found",
        "content": "Text",
        "category": "finance",
        "sourceUrl": "https://example.org/a"
    });

    let (status, body) = send(
        &app,
        json_request("POST", "/api/n8n/articles/scraped", payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let first_id = body["article"]["id"].as_str().unwrap().to_string();
    assert!(first_id.starts_with("scraped_"));

    let (status, body) = send(
        &app,
        json_request("POST", "/api/n8n/articles/scraped", payload),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["existingId"], first_id);
}

#[tokio::test]
async fn publish_status_and_pending() {
    let (_dir, app) = app();
    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/api/n8n/articles/ai-generated",
            json!({"title": "AI", "content": "Text", "category": "psychology"}),
        ),
    )
    .await;
    let id = body["article"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["article"]["isAIGenerated"], true);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/n8n/articles/{id}/publish-status"),
            json!({"publishStatus": "ready", "platform": "wechat"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["article"]["publishHistory"][0]["platform"], "wechat");

    let (_, body) = send(&app, get("/api/n8n/articles/pending")).await;
    assert_eq!(body["count"], 1);

    let (_, body) = send(&app, get("/api/n8n/articles/category/psychology?limit=1")).await;
    assert_eq!(body["category"], "psychology");
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn upload_serve_and_remove() {
    let (_dir, app) = app();
    let (status, body) = send(&app, multipart("image", "cat.png", "image/png", b"PNGDATA")).await;
    assert_eq!(status, StatusCode::OK);
    let url = body["imageUrl"].as_str().unwrap().to_string();
    let filename = body["filename"].as_str().unwrap().to_string();
    assert_eq!(url, format!("/uploads/{filename}"));

    let response = app.clone().oneshot(get(&url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"PNGDATA");

    let remove = Request::builder()
        .method("DELETE")
        .uri(format!("/api/upload/{filename}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, remove).await;
    assert_eq!(status, StatusCode::OK);

    let remove_again = Request::builder()
        .method("DELETE")
        .uri(format!("/api/upload/{filename}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, remove_again).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_rejects_non_images_and_oversize() {
    let config = FolioConfig {
        max_upload_bytes: 8,
        ..FolioConfig::default()
    };
    let (_dir, app) = app_with(config, None);

    let (status, _) = send(&app, multipart("image", "a.txt", "text/plain", b"hi")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, multipart("image", "a.png", "image/png", b"0123456789")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, multipart("file", "a.png", "image/png", b"png")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
