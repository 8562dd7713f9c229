//! Usage: In-process stand-in for the GMX server used by async tests.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) authorization: Option<String>,
    pub(crate) body: Value,
}

#[derive(Clone, Default)]
struct ServerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub(crate) struct TestServer {
    pub(crate) base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub(crate) fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub(crate) fn last(&self) -> RecordedRequest {
        self.recorded().pop().expect("at least one request")
    }
}

pub(crate) async fn spawn() -> TestServer {
    let state = ServerState::default();
    let requests = Arc::clone(&state.requests);
    let app = Router::new().fallback(handle).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestServer {
        base_url: format!("http://{addr}"),
        requests,
    }
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

async fn handle(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let path = uri.path().to_string();

    state
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method: method.to_string(),
            path: path.clone(),
            authorization: authorization.clone(),
            body: body.clone(),
        });

    let username = body.get("username").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);

    match (method.as_str(), path.as_str()) {
        ("POST", "/api/login") => match (username, password) {
            (Some("alice"), Some("pw")) => reply(
                StatusCode::OK,
                json!({ "token": "abc", "user": { "id": 1, "name": "alice" } }),
            ),
            (Some("tokenless"), _) => reply(StatusCode::OK, json!({ "user": { "id": 2 } })),
            (Some("guest"), _) => reply(StatusCode::OK, json!({ "token": "g1", "user": null })),
            _ => reply(
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid credentials" }),
            ),
        },
        ("POST", "/api/register") => match username {
            Some("taken") => reply(
                StatusCode::BAD_REQUEST,
                json!({ "error": "Username already exists" }),
            ),
            _ => reply(
                StatusCode::CREATED,
                json!({ "message": "User registered successfully" }),
            ),
        },
        ("GET", "/api/user/info") => match authorization.as_deref() {
            Some("Bearer abc") => reply(
                StatusCode::OK,
                json!({ "id": 1, "name": "alice", "is_admin": true }),
            ),
            _ => reply(
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Token is missing!" }),
            ),
        },
        ("GET", "/plain") => (StatusCode::OK, "pong").into_response(),
        ("DELETE", "/empty") => StatusCode::NO_CONTENT.into_response(),
        _ => reply(
            StatusCode::OK,
            json!({ "method": method.as_str(), "path": path.clone(), "body": body.clone() }),
        ),
    }
}
