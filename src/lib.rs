//! Terminal console for a document/chat API: health monitoring plus
//! upload, chat and collection management.

pub mod api;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use api::ApiClient;
pub use config::ConsoleConfig;
pub use health::{HealthMonitor, HealthState, HealthStatus, PollHandle};
pub use lifecycle::Shutdown;
