//! API health state.
//!
//! # States
//! - Checking: a probe is running (also the state before the first result)
//! - Healthy: last completed probe got a 2xx
//! - Down: last completed probe failed (non-2xx, timeout, network error)
//!
//! # State Transitions
//! ```text
//! any state → Checking: probe starts
//! Checking → Healthy | Down: probe resolves, last_checked stamped
//! ```
//!
//! # Design Decisions
//! - No hysteresis: every probe result is taken as-is
//! - Failure causes are collapsed into Down
//! - `last_checked` only moves forward

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health status of the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Checking,
    Healthy,
    Down,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Checking => "checking",
            HealthStatus::Healthy => "healthy",
            HealthStatus::Down => "down",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status plus the time the last probe finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HealthState {
    pub status: HealthStatus,
    pub last_checked: Option<DateTime<Utc>>,
}

impl HealthState {
    /// Enter the checking phase. The previous stamp is kept.
    pub(crate) fn begin_probe(&mut self) {
        self.status = HealthStatus::Checking;
    }

    /// Record a finished probe.
    pub(crate) fn complete_probe(&mut self, healthy: bool, now: DateTime<Utc>) {
        self.status = if healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::Down
        };
        // Wall clock may step backwards; the stamp must not.
        self.last_checked = Some(match self.last_checked {
            Some(prev) if prev > now => prev,
            _ => now,
        });
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
