//! API client tests against the in-process mock API.

use std::io::Write;

use serde_json::json;

use rag_console::api::types::EMPTY_REPLY;
use rag_console::api::{ApiClient, ApiError};
use rag_console::config::ApiConfig;

mod common;

fn client_for(api: &common::MockApiHandle) -> ApiClient {
    let config = ApiConfig {
        base_url: api.base_url(),
        ..ApiConfig::default()
    };
    ApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_upload_sends_file_and_collection() {
    let api = common::start_mock_api("array").await;
    let client = client_for(&api);

    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(b"ten bytes!").unwrap();

    let reply = client.upload(file.path(), None).await.unwrap();
    assert_eq!(reply["collection_name"], "Resume");

    let recorded = api.recorded.lock().unwrap();
    assert_eq!(recorded.uploads.len(), 1);
    let (name, size, collection) = &recorded.uploads[0];
    assert!(name.ends_with(".txt"));
    assert_eq!(*size, 10);
    assert_eq!(collection, "Resume");
}

#[tokio::test]
async fn test_upload_to_named_collection() {
    let api = common::start_mock_api("array").await;
    let client = client_for(&api);
    let file = tempfile::NamedTempFile::new().unwrap();

    client.upload(file.path(), Some("Papers")).await.unwrap();
    assert_eq!(api.collections.lock().unwrap().get("Papers"), Some(&1));
}

#[tokio::test]
async fn test_chat_returns_reply_field() {
    let api = common::start_mock_api("array").await;
    let client = client_for(&api);

    let reply = client.chat("  what is in my resume?  ", None).await.unwrap();
    assert_eq!(reply, "echo: what is in my resume?");

    let recorded = api.recorded.lock().unwrap();
    assert_eq!(recorded.chats[0]["query"], "what is in my resume?");
    assert_eq!(recorded.chats[0]["collection_name"], "Resume");
}

#[tokio::test]
async fn test_chat_without_reply_text_uses_fallback() {
    let api = common::start_mock_api("array").await;
    let client = client_for(&api);

    let reply = client.chat("silence", None).await.unwrap();
    assert_eq!(reply, EMPTY_REPLY);
}

#[tokio::test]
async fn test_chat_error_carries_detail() {
    let api = common::start_mock_api("array").await;
    let client = client_for(&api);

    let err = client.chat("hello", Some("Missing")).await.unwrap_err();
    match err {
        ApiError::Status { status, detail } => {
            assert_eq!(status, 404);
            assert_eq!(detail, "Collection Missing not found");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_list_collections_in_every_shape() {
    for shape in ["array", "wrapped", "map"] {
        let api = common::start_mock_api(shape).await;
        let client = client_for(&api);

        let mut list = client.list_collections().await.unwrap();
        list.sort_by(|a, b| a.name.cmp(&b.name));

        let names: Vec<_> = list.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["My Notes", "Resume"], "shape {}", shape);
        assert_eq!(list[1].document_count, Some(json!(2)), "shape {}", shape);
    }
}

#[tokio::test]
async fn test_delete_collection_with_spaces() {
    let api = common::start_mock_api("array").await;
    let client = client_for(&api);

    client.delete_collection("My Notes").await.unwrap();
    assert!(!api.collections.lock().unwrap().contains_key("My Notes"));

    let err = client.delete_collection("My Notes").await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
    assert_eq!(err.to_string(), "server returned 404: Collection not found");
}

#[tokio::test]
async fn test_every_request_has_unique_id() {
    let api = common::start_mock_api("array").await;
    let client = client_for(&api);

    client.list_collections().await.unwrap();
    client.list_collections().await.unwrap();

    let recorded = api.recorded.lock().unwrap();
    assert_eq!(recorded.request_ids.len(), 2);
    assert_ne!(recorded.request_ids[0], recorded.request_ids[1]);
}

#[tokio::test]
async fn test_unreachable_api_is_transport_error() {
    let config = ApiConfig {
        base_url: "http://127.0.0.1:9".into(),
        ..ApiConfig::default()
    };
    let client = ApiClient::new(&config).unwrap();

    let err = client.list_collections().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
