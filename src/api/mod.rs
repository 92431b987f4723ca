//! Remote API access.
//!
//! # Endpoints
//! ```text
//! POST   /upload              multipart: files, collection_name
//! POST   /chat                {query, collection_name} → reply field
//! GET    /collections         array | {collections} | {data} | map
//! DELETE /collections/{name}
//! ```
//!
//! # Design Decisions
//! - One `reqwest::Client` per `ApiClient`, cloned cheaply
//! - Non-2xx responses carry the server's `detail` text
//! - Response shapes are normalized here, not by callers

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{ApiError, ApiResult, Collection};
