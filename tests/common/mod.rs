//! Shared mock servers for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Read until the end of the request head so the client never sees a reset.
async fn read_request_head(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        204 => "204 No Content",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Start a programmable health backend on an ephemeral port.
///
/// `f` is called once per accepted connection and decides the status code.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = u16> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                let status = f().await;
                let body = if status == 200 { "ok" } else { "unavailable" };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text(status),
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    addr
}

/// Start a backend that always answers with `status`.
pub async fn start_fixed_backend(status: u16) -> SocketAddr {
    start_programmable_backend(move || async move { status }).await
}

/// Start a backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                tokio::time::sleep(Duration::from_secs(3600)).await;
            });
        }
    });

    addr
}

/// Start a backend that never answers and reports when the client hangs up.
///
/// The flag flips once the client closes its side of the connection.
pub async fn start_hanging_backend() -> (SocketAddr, Arc<AtomicBool>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let closed = Arc::new(AtomicBool::new(false));
    let flag = closed.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let flag = flag.clone();
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                let mut chunk = [0u8; 1024];
                loop {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {}
                    }
                }
                flag.store(true, Ordering::SeqCst);
            });
        }
    });

    (addr, closed)
}

/// What the mock API saw.
#[derive(Debug, Default)]
pub struct Recorded {
    pub uploads: Vec<(String, usize, String)>,
    pub chats: Vec<Value>,
    pub request_ids: Vec<String>,
}

#[derive(Clone)]
struct MockApi {
    collections: Arc<Mutex<BTreeMap<String, u64>>>,
    listing_shape: &'static str,
    recorded: Arc<Mutex<Recorded>>,
}

/// Handle to a running mock API.
pub struct MockApiHandle {
    pub addr: SocketAddr,
    pub recorded: Arc<Mutex<Recorded>>,
    pub collections: Arc<Mutex<BTreeMap<String, u64>>>,
}

impl MockApiHandle {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Start an in-process mock of the document API.
///
/// `listing_shape` picks the body of `GET /collections`:
/// `"array"`, `"wrapped"` or `"map"`.
pub async fn start_mock_api(listing_shape: &'static str) -> MockApiHandle {
    let mut initial = BTreeMap::new();
    initial.insert("Resume".to_string(), 2);
    initial.insert("My Notes".to_string(), 0);

    let state = MockApi {
        collections: Arc::new(Mutex::new(initial)),
        listing_shape,
        recorded: Arc::new(Mutex::new(Recorded::default())),
    };
    let recorded = state.recorded.clone();
    let collections = state.collections.clone();

    let app = Router::new()
        .route("/upload", post(upload))
        .route("/chat", post(chat))
        .route("/collections", get(list))
        .route("/collections/{name}", delete(remove))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockApiHandle {
        addr,
        recorded,
        collections,
    }
}

fn record_request_id(state: &MockApi, headers: &HeaderMap) {
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        state.recorded.lock().unwrap().request_ids.push(id.to_string());
    }
}

async fn upload(
    State(state): State<MockApi>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    record_request_id(&state, &headers);

    let mut file: Option<(String, usize)> = None;
    let mut collection = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "files" => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.unwrap_or_default();
                file = Some((name, bytes.len()));
            }
            "collection_name" => collection = field.text().await.ok(),
            _ => {}
        }
    }

    match (file, collection) {
        (Some((name, size)), Some(collection)) => {
            state
                .recorded
                .lock()
                .unwrap()
                .uploads
                .push((name.clone(), size, collection.clone()));
            *state.collections.lock().unwrap().entry(collection.clone()).or_insert(0) += 1;
            (
                StatusCode::OK,
                Json(json!({"filename": name, "collection_name": collection, "chunks": 1})),
            )
        }
        _ => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "files and collection_name are required"})),
        ),
    }
}

async fn chat(
    State(state): State<MockApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record_request_id(&state, &headers);
    state.recorded.lock().unwrap().chats.push(body.clone());

    let query = body["query"].as_str().unwrap_or_default();
    let collection = body["collection_name"].as_str().unwrap_or_default();

    if !state.collections.lock().unwrap().contains_key(collection) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": format!("Collection {} not found", collection)})),
        );
    }
    if query == "silence" {
        return (StatusCode::OK, Json(json!({"sources": []})));
    }
    (StatusCode::OK, Json(json!({"answer": format!("echo: {}", query)})))
}

async fn list(State(state): State<MockApi>, headers: HeaderMap) -> Json<Value> {
    record_request_id(&state, &headers);
    let collections = state.collections.lock().unwrap().clone();

    let entries: Vec<Value> = collections
        .iter()
        .map(|(name, count)| json!({"name": name, "document_count": count}))
        .collect();

    Json(match state.listing_shape {
        "wrapped" => json!({"collections": entries}),
        "map" => Value::Object(
            collections
                .iter()
                .map(|(name, count)| (name.clone(), json!({"document_count": count})))
                .collect(),
        ),
        _ => Value::Array(entries),
    })
}

async fn remove(
    State(state): State<MockApi>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> (StatusCode, Json<Value>) {
    record_request_id(&state, &headers);
    if state.collections.lock().unwrap().remove(&name).is_some() {
        (StatusCode::OK, Json(json!({"deleted": name})))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Collection not found"})),
        )
    }
}
