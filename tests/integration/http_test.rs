//! End-to-end HTTP tests against a running server

use reqwest::StatusCode;
use serde_json::{Value, json};

use crate::{TestServer, http_client as client};

fn create(server: &TestServer, body: &Value) -> Value {
    let response = client().post(server.url("/api/todos")).json(body).send().unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().unwrap()
}

fn list(server: &TestServer) -> Vec<Value> {
    let response = client().get(server.url("/api/todos")).send().unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.json().unwrap()
}

// =============================================================================
// HEALTH
// =============================================================================

#[test]
fn test_health() {
    let server = TestServer::start();
    let response = client().get(server.url("/api/health")).send().unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().unwrap();
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

// =============================================================================
// FULL LIFECYCLE
// =============================================================================

#[test]
fn test_todo_lifecycle() {
    let server = TestServer::start();

    // Create
    let created = create(&server, &json!({ "text": "Test todo" }));
    assert_eq!(created["text"], "Test todo");
    assert_eq!(created["completed"], false);
    assert!(created["createdAt"].is_string());
    assert!(created.get("updatedAt").is_none());
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    // List includes it
    assert!(list(&server).iter().any(|t| t["id"] == id.as_str()));

    // Toggle
    let response = client()
        .put(server.url(&format!("/api/todos/{id}")))
        .json(&json!({ "completed": true }))
        .send()
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().unwrap();
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["text"], "Test todo");
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert!(updated["updatedAt"].is_string());

    // Delete
    let response = client().delete(server.url(&format!("/api/todos/{id}"))).send().unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.text().unwrap().is_empty());

    // Gone
    assert!(list(&server).iter().all(|t| t["id"] != id.as_str()));

    let response = client()
        .put(server.url(&format!("/api/todos/{id}")))
        .json(&json!({ "completed": false }))
        .send()
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client().delete(server.url(&format!("/api/todos/{id}"))).send().unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().unwrap();
    assert_eq!(body["error"], "Todo not found");
}

// =============================================================================
// VALIDATION
// =============================================================================

#[test]
fn test_create_trims_text() {
    let server = TestServer::start();
    let created = create(&server, &json!({ "text": "  A  " }));
    assert_eq!(created["text"], "A");
}

#[test]
fn test_create_empty_text_is_400() {
    let server = TestServer::start();
    for body in [json!({ "text": "", "completed": false }), json!({ "text": "   " })] {
        let response = client().post(server.url("/api/todos")).json(&body).send().unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().unwrap();
        assert_eq!(body["error"], "Todo text is required");
    }
    assert!(list(&server).is_empty());
}

#[test]
fn test_create_missing_text_is_400() {
    let server = TestServer::start();
    let response = client()
        .post(server.url("/api/todos"))
        .json(&json!({ "completed": false }))
        .send()
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().unwrap();
    assert!(body["error"].is_string());
}

#[test]
fn test_malformed_json_is_generic_500() {
    let server = TestServer::start();
    let response = client()
        .post(server.url("/api/todos"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().unwrap();
    assert_eq!(body, json!({ "error": "Something went wrong!" }));
    assert!(list(&server).is_empty());
}

#[test]
fn test_wrongly_typed_field_is_generic_500() {
    let server = TestServer::start();
    let created = create(&server, &json!({ "text": "typed" }));
    let id = created["id"].as_str().unwrap();

    let response = client()
        .put(server.url(&format!("/api/todos/{id}")))
        .json(&json!({ "completed": "yes" }))
        .send()
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().unwrap();
    assert_eq!(body, json!({ "error": "Something went wrong!" }));

    let todos = list(&server);
    assert_eq!(todos[0]["completed"], false);
    assert!(todos[0].get("updatedAt").is_none());
}

#[test]
fn test_oversized_body_is_413() {
    let server = TestServer::start();
    let text = "a".repeat(tasklist::server::routes::MAX_BODY_BYTES);
    let response = client()
        .post(server.url("/api/todos"))
        .json(&json!({ "text": text }))
        .send()
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json().unwrap();
    assert_eq!(body["error"], "Request body too large");
    assert!(list(&server).is_empty());

    // The server keeps serving afterwards
    create(&server, &json!({ "text": "still up" }));
}

#[test]
fn test_update_with_blank_text_is_400() {
    let server = TestServer::start();
    let created = create(&server, &json!({ "text": "keep me" }));
    let id = created["id"].as_str().unwrap();

    let response = client()
        .put(server.url(&format!("/api/todos/{id}")))
        .json(&json!({ "text": "  " }))
        .send()
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(list(&server)[0]["text"], "keep me");
}

#[test]
fn test_update_nonexistent_is_404() {
    let server = TestServer::start();
    let response = client()
        .put(server.url("/api/todos/nonexistent"))
        .json(&json!({ "completed": true }))
        .send()
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().unwrap();
    assert!(body["error"].is_string());
}

// =============================================================================
// ROUTING
// =============================================================================

#[test]
fn test_unknown_route_is_404() {
    let server = TestServer::start();
    for path in ["/api/unknown", "/nowhere", "/api/todos/1/extra"] {
        let response = client().get(server.url(path)).send().unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        let body: Value = response.json().unwrap();
        assert_eq!(body, json!({ "error": "Route not found" }));
    }
}

#[test]
fn test_query_string_is_ignored_for_routing() {
    let server = TestServer::start();
    let response = client().get(server.url("/api/todos?fresh=1")).send().unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_cors_headers_and_preflight() {
    let server = TestServer::start();
    let response = client()
        .request(reqwest::Method::OPTIONS, server.url("/api/todos"))
        .send()
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let response = client().get(server.url("/api/health")).send().unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

// =============================================================================
// SEEDING AND WORKERS
// =============================================================================

#[test]
fn test_seeded_server_lists_demo_todos() {
    let config = tasklist::config::ServerConfig {
        no_seed: false,
        ..tasklist::config::ServerConfig::local()
    };
    let server = TestServer::with_config(config, tasklist::storage::TodoStore::seeded());
    let todos = list(&server);
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0]["text"], "Learn React");
}

#[test]
fn test_parallel_creates_with_worker_pool() {
    let config = tasklist::config::ServerConfig {
        workers: 4,
        ..tasklist::config::ServerConfig::local()
    };
    let server = TestServer::with_config(config, tasklist::storage::TodoStore::new());

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let server = &server;
            scope.spawn(move || {
                for n in 0..10 {
                    create(server, &json!({ "text": format!("w{worker}-{n}") }));
                }
            });
        }
    });

    let todos = list(&server);
    assert_eq!(todos.len(), 40);
    let ids: std::collections::HashSet<_> =
        todos.iter().map(|t| t["id"].as_str().unwrap().to_string()).collect();
    assert_eq!(ids.len(), 40);
}
