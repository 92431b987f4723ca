//! Stand-in for the document API, for trying the console locally.
//!
//! ```text
//! cargo run --example mock_api
//! cargo run -- --endpoint http://127.0.0.1:8000/health
//! cargo run --bin rag-cli -- --url http://127.0.0.1:8000 collections list
//! ```

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

type Collections = Arc<Mutex<BTreeMap<String, u64>>>;

#[tokio::main]
async fn main() {
    let collections: Collections = Arc::new(Mutex::new(BTreeMap::from([("Resume".to_string(), 0)])));

    let app = Router::new()
        .route("/health", get(|| async { Json(json!({"status": "ok"})) }))
        .route("/upload", post(upload))
        .route("/chat", post(chat))
        .route("/collections", get(list))
        .route("/collections/{name}", delete(remove))
        .with_state(collections);

    let addr = SocketAddr::from(([127, 0, 0, 1], 8000));
    println!("Mock document API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn upload(State(collections): State<Collections>, mut multipart: Multipart) -> Json<Value> {
    let mut files = Vec::new();
    let mut collection = "Resume".to_string();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "collection_name" {
            collection = field.text().await.unwrap_or_default();
        } else if name == "files" {
            files.push(field.file_name().unwrap_or("upload").to_string());
        }
    }
    *collections.lock().unwrap().entry(collection.clone()).or_insert(0) += files.len() as u64;
    Json(json!({"uploaded": files, "collection_name": collection}))
}

async fn chat(Json(body): Json<Value>) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or_default();
    Json(json!({"response": format!("You asked: {}", query)}))
}

async fn list(State(collections): State<Collections>) -> Json<Value> {
    let list: Vec<Value> = collections
        .lock()
        .unwrap()
        .iter()
        .map(|(name, count)| json!({"name": name, "document_count": count}))
        .collect();
    Json(json!({ "collections": list }))
}

async fn remove(
    State(collections): State<Collections>,
    Path(name): Path<String>,
) -> (StatusCode, Json<Value>) {
    match collections.lock().unwrap().remove(&name) {
        Some(_) => (StatusCode::OK, Json(json!({"deleted": name}))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Collection not found"})),
        ),
    }
}
