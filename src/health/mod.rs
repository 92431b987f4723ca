//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Periodic timer / manual refresh
//!     → Probe the health endpoint (bounded by a timeout)
//!     → Update state.rs through a watch channel
//!
//! Display (display.rs):
//!     watch::Receiver<HealthState>
//!     → colour + label + last-checked time
//! ```
//!
//! # Design Decisions
//! - The monitor is the single owner and writer of the state
//! - Readers subscribe; they never mutate
//! - Overlapping probes are last-writer-wins unless configured to skip

pub mod active;
pub mod display;
pub mod state;

pub use active::{HealthMonitor, MonitorError, PollHandle};
pub use state::{HealthState, HealthStatus};
