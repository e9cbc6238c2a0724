pub mod stage;

pub use stage::{ForwardStage, ReturnStage, StageFilter};

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Milestone, OrderRecord};

use stage::{FORWARD_PRECEDENCE, RETURN_TIMELINE};

/// Coarse triage category rendered as a flat background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Gray,
    Red,
    Orange,
    Green,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Gray => "gray",
            Severity::Red => "red",
            Severity::Orange => "orange",
            Severity::Green => "green",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const RETURN_PENDING_SUFFIX: &str = " - Return pending";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLabel {
    pub label: String,
    pub severity: Severity,
}

/// Render-ready status of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatus {
    pub label: String,
    pub severity: Severity,
    /// Latest forward milestone date. May belong to a different stage than
    /// the one named by `label` when dates were entered out of order.
    pub latest_date: Option<NaiveDate>,
}

/// Derive label, severity and latest date for an order. Never fails.
pub fn derive_status(order: &OrderRecord) -> OrderStatus {
    let StatusLabel { label, severity } = derive_status_label(order);
    OrderStatus {
        label,
        severity,
        latest_date: derive_latest_date(order),
    }
}

/// Label and severity by workflow precedence, with the return override.
pub fn derive_status_label(order: &OrderRecord) -> StatusLabel {
    let (label, severity) = forward_stage(order).describe(order);

    match return_stage(order).map(|stage| stage.describe()) {
        None => StatusLabel { label, severity },
        Some(Some((return_label, return_severity))) => StatusLabel {
            label: return_label.to_string(),
            severity: return_severity,
        },
        Some(None) => StatusLabel {
            label: format!("{label}{RETURN_PENDING_SUFFIX}"),
            severity,
        },
    }
}

/// The most advanced forward milestone present, by precedence.
pub fn forward_stage(order: &OrderRecord) -> ForwardStage {
    FORWARD_PRECEDENCE
        .iter()
        .find(|(milestone, _)| order.has(*milestone))
        .map(|(_, stage)| *stage)
        .unwrap_or(ForwardStage::New)
}

/// Return-workflow stage, or `None` for an order not flagged as a return.
///
/// Unlike the forward timeline, the chronologically latest return milestone
/// wins; equal dates fall back to the order of [`RETURN_TIMELINE`].
pub fn return_stage(order: &OrderRecord) -> Option<ReturnStage> {
    if !order.is_return {
        return None;
    }

    let latest = RETURN_TIMELINE
        .iter()
        .filter_map(|(milestone, stage)| order.milestone_date(*milestone).map(|d| (d, *stage)))
        .fold(None, |best, (date, stage)| match best {
            Some((best_date, _)) if best_date >= date => best,
            _ => Some((date, stage)),
        });

    Some(latest.map_or(ReturnStage::Pending, |(_, stage)| stage))
}

/// Maximum date among all present forward-timeline milestones.
pub fn derive_latest_date(order: &OrderRecord) -> Option<NaiveDate> {
    Milestone::FORWARD
        .iter()
        .filter_map(|m| order.milestone_date(*m))
        .max()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
