// src/model/sku.rs

use chrono::NaiveDate;

/// Planning parameters for a single SKU.
///
/// All fields are fully resolved by the time a value reaches the engine:
/// optional columns in the uploaded plan are filled from `EngineSettings`
/// defaults during ingestion, and `sku` is already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct SkuInput {
    /// Normalized SKU identifier, used as the join key against in-transit rows.
    pub sku: String,
    /// On-hand units in the factory-side fulfillment buffer.
    pub stock_ff: u32,
    /// On-hand units at the marketplace stock point.
    pub stock_mp: u32,
    /// Planned daily sell-through rate, units per day.
    pub plan_sales_per_day: f64,
    /// Production lead time, days.
    pub prod_lead_time_days: u32,
    /// Transit leg: factory country -> regional hub, days.
    pub lead_time_cn_msk: u32,
    /// Transit leg: regional hub -> marketplace, days.
    pub lead_time_msk_mp: u32,
    /// Percentage of `safety_stock_mp` that forms the out-of-stock risk
    /// threshold (0..=100).
    pub oos_safety_mp_pct: f64,
    /// Minimum-stock target at the marketplace.
    pub safety_stock_mp: u32,
    /// Minimum-stock target at the fulfillment buffer.
    pub safety_stock_ff: u32,
    /// Order quantities are rounded up to a multiple of this step (>= 1).
    pub moq_step: u32,
}

impl SkuInput {
    /// Total on-hand stock across both stock points. Widened so the sum
    /// cannot wrap even with both counters at their maximum.
    pub fn on_hand(&self) -> u64 {
        self.stock_ff as u64 + self.stock_mp as u64
    }
}

/// One shipment batch already dispatched but not yet arrived.
///
/// `eta_cn_msk` is the arrival date at the regional hub; the final
/// `lead_time_msk_mp` leg is still ahead of it.
#[derive(Debug, Clone, PartialEq)]
pub struct InTransitItem {
    pub sku: String,
    pub qty: u32,
    pub eta_cn_msk: NaiveDate,
}

/// Normalizes a SKU string for use as a join key.
///
/// Hand-filled spreadsheets arrive with non-breaking spaces, long dash
/// variants and stray casing; a shipment row that differs from its plan row
/// in any of those would silently fail to match. Both sides of the join go
/// through this exact function.
///
/// Steps: map non-breaking spaces to plain spaces and dash variants to `-`,
/// lowercase, trim, collapse internal whitespace runs, collapse spaces
/// around `/`.
pub fn normalize_sku(raw: &str) -> String {
    let mut mapped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\u{00A0}' | '\u{2007}' | '\u{202F}' => mapped.push(' '),
            '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' => mapped.push('-'),
            _ => mapped.extend(ch.to_lowercase()),
        }
    }

    // split_whitespace both trims and collapses runs
    let mut collapsed = String::with_capacity(mapped.len());
    for token in mapped.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(token);
    }

    collapsed
        .replace(" / ", "/")
        .replace("/ ", "/")
        .replace(" /", "/")
}
