//! Request/response types and error definitions for the remote API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reply shown when the chat endpoint answers without any text.
pub const EMPTY_REPLY: &str = "Sorry, I received an empty response.";

/// Fields that may carry the chat reply, in order of preference.
const REPLY_FIELDS: [&str; 5] = ["response", "message", "reply", "text", "answer"];

/// Fields that may carry a collection's name, in order of preference.
const NAME_FIELDS: [&str; 4] = ["name", "collection_name", "id", "title"];

/// Errors that can occur while talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or protocol failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("server returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// Local file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Response body was not the JSON we expected.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Base URL or path could not be turned into a request URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Input rejected before any request was made.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub query: String,
    pub collection_name: String,
}

/// Pull the reply text out of a chat response.
///
/// The first non-empty string among the known reply fields wins.
pub fn extract_reply(body: &Value) -> String {
    REPLY_FIELDS
        .iter()
        .filter_map(|field| body.get(*field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or(EMPTY_REPLY)
        .to_string()
}

/// Turn an error body into a short detail string.
///
/// Prefers a JSON `detail` field, then the raw text.
pub fn error_detail(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        match json.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(detail) if !detail.is_null() => return detail.to_string(),
            _ => {}
        }
    }
    if body.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        body.to_string()
    }
}

/// One entry of the collection listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    pub name: String,
    /// Any non-null value the API sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_count: Option<Value>,
    /// Any non-empty, non-zero value the API sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    /// Every other field the API sent, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Collection {
    fn from_value(index: usize, value: Value) -> Self {
        let mut fields = match value {
            Value::Object(map) => map,
            Value::String(name) => {
                return Self {
                    name,
                    document_count: None,
                    created_at: None,
                    extra: Map::new(),
                }
            }
            _ => Map::new(),
        };

        let name = NAME_FIELDS
            .iter()
            .find_map(|field| match fields.get(*field) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| format!("Collection {}", index + 1));

        fields.remove("name");
        let document_count = take_if(&mut fields, "document_count", |v| !v.is_null());
        let created_at = take_if(&mut fields, "created_at", is_truthy);

        Self {
            name,
            document_count,
            created_at,
            extra: fields,
        }
    }
}

/// Normalize the shapes `GET /collections` is known to return.
///
/// - `[...]`
/// - `{"collections": [...]}` or `{"data": [...]}`
/// - `{"<name>": {...}, ...}`
pub fn parse_collections(body: Value) -> Vec<Collection> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            if matches!(map.get("collections"), Some(Value::Array(_))) {
                take_array(&mut map, "collections")
            } else if matches!(map.get("data"), Some(Value::Array(_))) {
                take_array(&mut map, "data")
            } else {
                map.into_iter()
                    .map(|(key, value)| {
                        let mut entry = Map::new();
                        entry.insert("name".to_string(), Value::String(key));
                        if let Value::Object(fields) = value {
                            entry.extend(fields);
                        }
                        Value::Object(entry)
                    })
                    .collect()
            }
        }
        _ => Vec::new(),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| Collection::from_value(i, item))
        .collect()
}

/// Move `key` out of `fields` only when `keep` accepts its value.
fn take_if(
    fields: &mut Map<String, Value>,
    key: &str,
    keep: impl Fn(&Value) -> bool,
) -> Option<Value> {
    if fields.get(key).is_some_and(keep) {
        fields.remove(key)
    } else {
        None
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Plain rendering of a JSON value: strings without quotes.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn take_array(map: &mut Map<String, Value>, key: &str) -> Vec<Value> {
    match map.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}
