//! End-to-end HTTP tests: the router served on an ephemeral port, driven with reqwest.
//!
//! Backed by the in-memory store so no database is needed.

use inventory_api::infra::CorsOrigins;
use inventory_api::transport;
use inventory_api::{MemoryProductStore, ProductService};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    store: MemoryProductStore,
}

async fn spawn_server() -> TestServer {
    let store = MemoryProductStore::new();
    let service = ProductService::new(Arc::new(store.clone()));
    let app_state = transport::http::AppState::new(service);
    let origins = CorsOrigins::List(vec!["http://localhost:3000".parse().unwrap()]);
    let router = transport::http::create_app(app_state, &origins);

    // Bind to an ephemeral port to avoid conflicts if an API server is already running.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        store,
    }
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn smartphone() -> Value {
    json!({
        "id": 1,
        "name": "Smartphone",
        "description": "Latest model",
        "price": 599.99,
        "quantity": 50
    })
}

#[tokio::test]
async fn smartphone_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server().await;
    let client = &server.client;

    // --- create ---
    let resp = client
        .post(server.url("/products/1"))
        .json(&smartphone())
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.json::<Value>().await?, smartphone());

    // --- list ---
    let list = client
        .get(server.url("/products"))
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(list, vec![smartphone()]);

    // --- update ---
    let mut updated = smartphone();
    updated["price"] = json!(649.99);
    updated["quantity"] = json!(45);
    let resp = client
        .put(server.url("/products/1"))
        .json(&updated)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let fetched = client
        .get(server.url("/products/id/1"))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(fetched["price"], 649.99);
    assert_eq!(fetched["quantity"], 45);
    assert_eq!(fetched["name"], "Smartphone");

    // --- delete ---
    let resp = client.delete(server.url("/products/del_id/1")).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.json::<Value>().await?, json!({ "id": 1, "deleted": true }));

    let list = client
        .get(server.url("/products"))
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert!(list.iter().all(|p| p["id"] != 1));
    Ok(())
}

#[tokio::test]
async fn unknown_id_is_404_for_get_put_delete() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server().await;
    let client = &server.client;

    let resp = client.get(server.url("/products/id/99")).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["id"], 99);

    let resp = client
        .put(server.url("/products/99"))
        .json(&json!({ "name": "Ghost", "price": 1.0, "quantity": 1 }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client.delete(server.url("/products/del_id/99")).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn duplicate_create_is_409() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server().await;
    let client = &server.client;

    let first = client
        .post(server.url("/products/1"))
        .json(&smartphone())
        .send()
        .await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(server.url("/products/1"))
        .json(&smartphone())
        .send()
        .await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = second.json::<Value>().await?;
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["id"], 1);

    assert_eq!(server.store.snapshot().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn missing_price_is_422_and_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server().await;

    let resp = server
        .client
        .post(server.url("/products/1"))
        .json(&json!({ "id": 1, "name": "Smartphone", "description": null, "quantity": 50 }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = resp.json::<Value>().await?;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["fields"][0]["field"], "price");
    assert!(server.store.snapshot().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn body_id_disagreeing_with_path_is_422() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server().await;

    let resp = server
        .client
        .post(server.url("/products/2"))
        .json(&smartphone())
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["fields"][0]["field"], "id");
    assert_eq!(body["fields"][0]["kind"], "mismatch");
    Ok(())
}

#[tokio::test]
async fn malformed_requests_are_422() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server().await;
    let client = &server.client;

    let resp = client.get(server.url("/products/id/abc")).send().await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.json::<Value>().await?["fields"][0]["field"], "id");

    let resp = client.delete(server.url("/products/del_id/abc")).send().await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.json::<Value>().await?["fields"][0]["field"], "id");

    let resp = client
        .put(server.url("/products/abc"))
        .json(&smartphone())
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.json::<Value>().await?["fields"][0]["field"], "id");

    let resp = client
        .post(server.url("/products/1"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.json::<Value>().await?["fields"][0]["field"], "body");
    Ok(())
}

#[tokio::test]
async fn update_missing_price_is_422() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server().await;
    let client = &server.client;

    client
        .post(server.url("/products/1"))
        .json(&smartphone())
        .send()
        .await?;

    let resp = client
        .put(server.url("/products/1"))
        .json(&json!({ "name": "b", "quantity": 2 }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.json::<Value>().await?["fields"][0]["field"], "price");

    let fetched = client
        .get(server.url("/products/id/1"))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(fetched, smartphone());

    // Validation happens before the id is looked up.
    let resp = client
        .put(server.url("/products/99"))
        .json(&json!({ "name": "b", "quantity": 2 }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn unreadable_bodies_keep_their_status() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server().await;
    let client = &server.client;

    let resp = client
        .post(server.url("/products/1"))
        .body(smartphone().to_string())
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(resp.json::<Value>().await?["error"], "invalid_request");

    assert!(server.store.snapshot().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn health_and_openapi_are_served() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server().await;
    let client = &server.client;

    let health = client
        .get(server.url("/health"))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(health, json!({ "status": "ok" }));

    let resp = client.get(server.url("/api-docs/openapi.json")).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = resp.json::<Value>().await?;
    assert!(doc["paths"]["/products/{id}"].is_object());
    Ok(())
}

#[tokio::test]
async fn cors_allows_configured_origin() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server().await;

    let resp = server
        .client
        .get(server.url("/products"))
        .header("origin", "http://localhost:3000")
        .send()
        .await?;
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
    Ok(())
}
