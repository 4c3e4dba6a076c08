// src/model/recommendation.rs

use serde::Serialize;
use std::fmt;

/// Qualitative projected-stock verdict for one SKU over its horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockStatus {
    /// Projected stock stays at or above the OOS threshold until resupply.
    #[serde(rename = "sufficient")]
    Sufficient,
    /// Projected stock dips below the OOS threshold before the next arrival.
    #[serde(rename = "shortage before resupply")]
    ShortageBeforeResupply,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Sufficient => write!(f, "sufficient"),
            StockStatus::ShortageBeforeResupply => write!(f, "shortage before resupply"),
        }
    }
}

/// Recommended daily sell-through reduction that keeps projected stock above
/// the OOS threshold until resupply.
///
/// `rate_after_arrival` is present only when the horizon splits into a
/// pre-first-arrival and a post-first-arrival segment; with no inbound
/// shipments a single rate covers the whole horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanReduction {
    pub rate_until_arrival: u32,
    pub rate_after_arrival: Option<u32>,
}

/// One computed replenishment recommendation. Produced once per SKU per
/// `calculate` run; consumers serialize it as-is and never recompute fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub sku: String,
    /// Planning horizon in days (sum of the three lead-time legs).
    pub h_days: u32,
    /// Total planned demand over the horizon, units.
    pub demand_h: f64,
    /// Inbound units arriving within the horizon.
    pub inbound: u64,
    /// On-hand at both stock points plus inbound within the horizon.
    pub coverage: f64,
    /// Demand over the horizon plus both safety-stock targets.
    pub target: f64,
    /// `max(0, target - coverage)`.
    pub shortage: f64,
    pub moq_step: u32,
    /// Shortage rounded up to the next `moq_step` multiple (0 if no shortage).
    pub order_qty: u32,
    pub stock_status: StockStatus,
    /// Reduced daily rate until the first arrival, when a reduction applies.
    pub reduce_plan_to: Option<u32>,
    /// Reduced daily rate after the first arrival, when the horizon has one.
    pub reduce_plan_to_after: Option<u32>,
    // Reference stocks at the first three arrivals, display-clamped at zero.
    pub stock_before_1: Option<f64>,
    pub stock_after_1: Option<f64>,
    pub stock_before_2: Option<f64>,
    pub stock_after_2: Option<f64>,
    pub stock_before_3: Option<f64>,
    pub stock_after_3: Option<f64>,
    /// Projected stock at horizon end, before the computed order arrives.
    pub stock_before_order: f64,
    /// Projected stock at horizon end, after the computed order arrives.
    pub stock_after_order: f64,
    pub algo_version: String,
}
