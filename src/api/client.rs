//! HTTP client for the document API.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::Value;
use uuid::Uuid;

use crate::api::types::{
    error_detail, extract_reply, parse_collections, ApiError, ApiResult, ChatRequest, Collection,
};
use crate::config::ApiConfig;
use crate::observability::metrics;

/// Header carrying the per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client for the upload, chat and collection endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    collection: String,
}

impl ApiClient {
    /// Create a client from configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Self::with_client(client, config)
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    pub fn with_client(client: Client, config: &ApiConfig) -> ApiResult<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            collection: config.collection.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Collection used when a call does not name one.
    pub fn default_collection(&self) -> &str {
        &self.collection
    }

    /// Upload a file into a collection. Returns the API's JSON reply.
    pub async fn upload(&self, path: &Path, collection: Option<&str>) -> ApiResult<Value> {
        let collection = collection.unwrap_or(&self.collection);
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        tracing::info!(file = %file_name, size = bytes.len(), collection, "Uploading file");

        let form = Form::new()
            .part("files", Part::bytes(bytes).file_name(file_name))
            .text("collection_name", collection.to_string());

        let request = self.client.post(self.url(&["upload"])?).multipart(form);
        let response = self.send("upload", request).await?;
        read_json(response).await
    }

    /// Ask a question against a collection and return the reply text.
    pub async fn chat(&self, query: &str, collection: Option<&str>) -> ApiResult<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::InvalidInput("query must not be empty".into()));
        }

        let body = ChatRequest {
            query: query.to_string(),
            collection_name: collection.unwrap_or(&self.collection).to_string(),
        };

        let request = self.client.post(self.url(&["chat"])?).json(&body);
        let response = self.send("chat", request).await?;
        let json = read_json(response).await?;
        Ok(extract_reply(&json))
    }

    /// List collections, whichever shape the API returns them in.
    pub async fn list_collections(&self) -> ApiResult<Vec<Collection>> {
        let request = self.client.get(self.url(&["collections"])?);
        let response = self.send("collections", request).await?;
        let json = read_json(response).await?;
        Ok(parse_collections(json))
    }

    /// Delete a collection by name.
    pub async fn delete_collection(&self, name: &str) -> ApiResult<()> {
        if name.is_empty() {
            return Err(ApiError::InvalidInput("collection name must not be empty".into()));
        }

        let request = self.client.delete(self.url(&["collections", name])?);
        self.send("delete_collection", request).await?;
        tracing::info!(collection = name, "Collection deleted");
        Ok(())
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidInput(format!("{} cannot be a base URL", self.base_url)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn send(&self, endpoint: &'static str, request: RequestBuilder) -> ApiResult<Response> {
        let request_id = Uuid::new_v4();
        let result = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::record_api_request(endpoint, 0);
                tracing::debug!(%request_id, endpoint, error = %e, "API request failed");
                return Err(e.into());
            }
        };

        let status = response.status();
        metrics::record_api_request(endpoint, status.as_u16());
        tracing::debug!(%request_id, endpoint, status = status.as_u16(), "API request completed");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            detail: error_detail(&body),
        })
    }
}

/// Decode a JSON body; an empty body reads as `null`.
async fn read_json(response: Response) -> ApiResult<Value> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}
