//! `tiny_http` request handling
//!
//! Handles routing, body parsing, and response conversion.

use std::io::{Cursor, Read as _};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::{Serialize, de::DeserializeOwned};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::api::{self, ApiError, CreateTodoRequest, ErrorBody, UpdateTodoRequest};
use crate::storage::TodoStore;

use super::static_files;

/// Response type produced by every route
pub type HttpResponse = Response<Cursor<Vec<u8>>>;

/// Largest request body accepted, in bytes
pub const MAX_BODY_BYTES: usize = 100 * 1024;

const API_PREFIX: &str = "/api";
const TODOS_PREFIX: &str = "/api/todos/";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// CORS and security headers sent on every response
const COMMON_HEADERS: [(&str, &str); 6] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "SAMEORIGIN"),
    ("Referrer-Policy", "no-referrer"),
];

/// Shared state handed to every request
#[derive(Debug)]
pub struct AppState {
    /// The todo store
    pub store: Arc<TodoStore>,
    /// Client bundle directory; `None` outside production
    pub static_root: Option<PathBuf>,
}

/// A routed response before it is turned into a `tiny_http` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header, if the reply has a body
    pub content_type: Option<String>,
    /// Response body
    pub body: Vec<u8>,
}

impl Reply {
    /// Convert into a `tiny_http` response with the common headers attached
    #[must_use]
    pub fn into_response(self) -> HttpResponse {
        let mut response =
            Response::from_data(self.body).with_status_code(StatusCode(self.status));
        if let Some(content_type) = self.content_type.as_deref() {
            add_header(&mut response, "Content-Type", content_type);
        }
        for (name, value) in COMMON_HEADERS {
            add_header(&mut response, name, value);
        }
        response
    }
}

// =============================================================================
// REQUEST HANDLING
// =============================================================================

/// Handle one request end to end: route it, log it, and send the response.
pub fn respond(state: &AppState, mut request: Request) {
    let started = Instant::now();
    let method = request.method().clone();
    let url = request.url().to_string();

    let reply = guarded(&format!("{method} {url}"), || handle_request(state, &mut request));

    log::info!(
        "{method} {url} {} {:.1}ms",
        reply.status,
        started.elapsed().as_secs_f64() * 1000.0
    );

    if let Err(e) = request.respond(reply.into_response()) {
        log::warn!("Failed to send response for {method} {url}: {e}");
    }
}

/// Run a handler, turning a panic into a generic 500
///
/// One bad request cannot take a worker down.
pub fn guarded<F: FnOnce() -> Reply>(label: &str, handler: F) -> Reply {
    panic::catch_unwind(AssertUnwindSafe(handler)).unwrap_or_else(|_| {
        error_response(&ApiError::internal(format!("handler panicked on {label}")))
    })
}

/// Route a request to its handler
///
/// This is the main routing function that maps URL paths to handlers.
pub fn handle_request(state: &AppState, request: &mut Request) -> Reply {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or_default();
    let method = request.method().clone();

    match (&method, path) {
        // CORS preflight
        (&Method::Options, _) => empty_response(204),

        (&Method::Get, "/api/health") => json_response(&api::health(), 200),
        (&Method::Get, "/api/todos") => json_response(&api::list_todos(&state.store), 200),

        // POST /api/todos - create todo
        (&Method::Post, "/api/todos") => match read_json_body::<CreateTodoRequest>(request) {
            Ok(req) => handle_result(api::create_todo(&state.store, req), 201),
            Err(e) => error_response(&e),
        },

        // PUT /api/todos/{id} - update todo
        (&Method::Put, _) if todo_id(path).is_some() => {
            let id = todo_id(path).unwrap_or_default();
            match read_json_body::<UpdateTodoRequest>(request) {
                Ok(req) => handle_result(api::update_todo(&state.store, id, req), 200),
                Err(e) => error_response(&e),
            }
        },

        // DELETE /api/todos/{id} - delete todo
        (&Method::Delete, _) if todo_id(path).is_some() => {
            let id = todo_id(path).unwrap_or_default();
            match api::delete_todo(&state.store, id) {
                Ok(()) => empty_response(204),
                Err(e) => error_response(&e),
            }
        },

        // Client bundle for everything else in production
        (&Method::Get, _) if !is_api_path(path) => state.static_root.as_deref().map_or_else(
            || error_response(&ApiError::route_not_found()),
            |root| match static_files::load(root, path) {
                Ok(asset) => asset_response(asset),
                Err(e) => error_response(&e),
            },
        ),

        _ => error_response(&ApiError::route_not_found()),
    }
}

/// Extract `{id}` from `/api/todos/{id}`
fn todo_id(path: &str) -> Option<&str> {
    path.strip_prefix(TODOS_PREFIX).filter(|id| !id.is_empty() && !id.contains('/'))
}

fn is_api_path(path: &str) -> bool {
    path == API_PREFIX || path.starts_with("/api/")
}

// =============================================================================
// BODY PARSING
// =============================================================================

/// Read and parse JSON body from request
///
/// An empty body is treated as `{}`. Bodies that cannot be read or parsed
/// are internal faults: the client only sees the generic message.
fn read_json_body<T: DeserializeOwned + Default>(request: &mut Request) -> Result<T, ApiError> {
    if request.body_length().is_some_and(|len| len > MAX_BODY_BYTES) {
        return Err(ApiError::payload_too_large());
    }

    let mut body = String::new();
    request
        .as_reader()
        .take(MAX_BODY_BYTES as u64 + 1)
        .read_to_string(&mut body)
        .map_err(|e| ApiError::internal(format!("failed to read request body: {e}")))?;

    parse_json_body(&body)
}

/// Parse a body that has already been read
fn parse_json_body<T: DeserializeOwned + Default>(body: &str) -> Result<T, ApiError> {
    if body.len() > MAX_BODY_BYTES {
        return Err(ApiError::payload_too_large());
    }
    if body.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(body).map_err(|e| ApiError::internal(format!("invalid JSON body: {e}")))
}

// =============================================================================
// RESPONSE CONVERSION
// =============================================================================

/// Convert a handler result to a reply
fn handle_result<T: Serialize>(result: Result<T, ApiError>, status: u16) -> Reply {
    match result {
        Ok(data) => json_response(&data, status),
        Err(e) => error_response(&e),
    }
}

/// Create an error JSON reply with appropriate status code
///
/// Internal errors are logged with their detail; the client gets the
/// generic message.
fn error_response(error: &ApiError) -> Reply {
    if error.status_code() >= 500 {
        log::error!("{error}");
    }
    json_response(&ErrorBody::from(error), error.status_code())
}

/// Serialize data to a JSON reply with status code
fn json_response<T: Serialize>(data: &T, status: u16) -> Reply {
    match serde_json::to_vec(data) {
        Ok(body) => Reply {
            status,
            content_type: Some(JSON_CONTENT_TYPE.to_string()),
            body,
        },
        Err(e) => {
            log::error!("Failed to serialize response: {e}");
            Reply {
                status: 500,
                content_type: Some(JSON_CONTENT_TYPE.to_string()),
                body: format!(r#"{{"error":"{}"}}"#, api::GENERIC_ERROR_MESSAGE).into_bytes(),
            }
        },
    }
}

const fn empty_response(status: u16) -> Reply {
    Reply {
        status,
        content_type: None,
        body: Vec::new(),
    }
}

fn asset_response(asset: static_files::Asset) -> Reply {
    Reply {
        status: 200,
        content_type: Some(asset.content_type),
        body: asset.body,
    }
}

fn add_header(response: &mut HttpResponse, name: &str, value: &str) {
    if let Ok(header) = Header::from_bytes(name, value) {
        response.add_header(header);
    }
}
