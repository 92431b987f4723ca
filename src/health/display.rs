//! Status indicator rendering.

use chrono::Local;
use serde::Serialize;

use crate::health::state::{HealthState, HealthStatus};

/// Indicator colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorColor {
    Amber,
    Green,
    Red,
}

impl IndicatorColor {
    pub fn hex(&self) -> &'static str {
        match self {
            IndicatorColor::Amber => "#FF9800",
            IndicatorColor::Green => "#4CAF50",
            IndicatorColor::Red => "#F44336",
        }
    }
}

/// How a status is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub color: IndicatorColor,
    pub pulsing: bool,
    pub label: &'static str,
}

impl HealthStatus {
    pub fn indicator(&self) -> Indicator {
        match self {
            HealthStatus::Checking => Indicator {
                color: IndicatorColor::Amber,
                pulsing: true,
                label: "Checking...",
            },
            HealthStatus::Healthy => Indicator {
                color: IndicatorColor::Green,
                pulsing: false,
                label: "API Healthy",
            },
            HealthStatus::Down => Indicator {
                color: IndicatorColor::Red,
                pulsing: false,
                label: "API Down",
            },
        }
    }
}

/// One-line rendering, e.g. `● API Healthy (Last checked: 14:03:22)`.
pub fn status_line(state: &HealthState) -> String {
    let indicator = state.status.indicator();
    match state.last_checked {
        Some(at) => format!(
            "● {} (Last checked: {})",
            indicator.label,
            at.with_timezone(&Local).format("%H:%M:%S")
        ),
        None => format!("● {}", indicator.label),
    }
}

/// JSON view of a state with its indicator, for machine consumers.
pub fn status_json(state: &HealthState) -> serde_json::Value {
    serde_json::json!({
        "status": state.status,
        "last_checked": state.last_checked,
        "indicator": {
            "color": state.status.indicator().color,
            "hex": state.status.indicator().color.hex(),
            "pulsing": state.status.indicator().pulsing,
            "label": state.status.indicator().label,
        },
    })
}
