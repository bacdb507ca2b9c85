//! A scripted HTTP backend on an ephemeral port for exercising `RestCatalogService`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use flowshelf::config::ClientConfig;

pub const API_KEY: &str = "anon-key";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Default)]
struct StubState {
    routes: HashMap<(Method, String), (StatusCode, String)>,
    requests: Vec<RecordedRequest>,
}

type SharedState = Arc<Mutex<StubState>>;

pub struct StubBackend {
    pub base_url: String,
    state: SharedState,
    server: JoinHandle<()>,
}

impl StubBackend {
    pub async fn start() -> Self {
        let state = SharedState::default();
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve stub backend");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            server,
        }
    }

    /// Answers every `method` request to `path` (query ignored) with `status` and a JSON `body`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        let status = StatusCode::from_u16(status).expect("valid status");
        self.state
            .lock()
            .unwrap()
            .routes
            .insert((method, path.to_string()), (status, body.into()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request was received")
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            service_url: Some(self.base_url.clone()),
            api_key: Some(API_KEY.to_string()),
            ..ClientConfig::default()
        }
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut state = state.lock().unwrap();
    let key = (method.clone(), uri.path().to_string());
    state.requests.push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        headers,
        body,
    });

    let (status, body) = state.routes.get(&key).cloned().unwrap_or((
        StatusCode::NOT_FOUND,
        r#"{"message":"no such route"}"#.to_string(),
    ));
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
