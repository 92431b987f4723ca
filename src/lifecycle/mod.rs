//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Trigger → every subscribed task leaves its loop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Stopping the health schedule lets in-flight probes finish
//! - One trigger is enough; repeated signals are ignored

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
