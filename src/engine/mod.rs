// src/engine/mod.rs

pub mod projection;
pub mod resolver;
pub mod settings;
pub mod solver;

use chrono::NaiveDate;
use tracing::debug;

use crate::model::recommendation::Recommendation;
use crate::model::sku::{InTransitItem, SkuInput};
use settings::EngineSettings;

/// Computes one recommendation per input SKU, in input order.
///
/// Pure function of its arguments: `today` is injected rather than read
/// from a clock, and no state is shared between SKUs, so identical inputs
/// always yield identical output. Matching against the read-only
/// `in_transit` list is done by (already normalized) SKU string.
pub fn calculate(
    items: &[SkuInput],
    in_transit: &[InTransitItem],
    today: NaiveDate,
    settings: &EngineSettings,
) -> Vec<Recommendation> {
    items
        .iter()
        .map(|x| recommend(x, in_transit, today, settings))
        .collect()
}

fn recommend(
    x: &SkuInput,
    in_transit: &[InTransitItem],
    today: NaiveDate,
    settings: &EngineSettings,
) -> Recommendation {
    let inbound = resolver::resolve(x, in_transit, today);
    let solved = solver::solve(x, &inbound, settings);

    debug!(
        sku = %x.sku,
        h_days = inbound.horizon_days,
        inbound = inbound.inbound_within_h,
        order_qty = solved.order_qty,
        status = %solved.status,
        "sku planned"
    );

    let event = |i: usize| solved.projection.events.get(i);
    Recommendation {
        sku: x.sku.clone(),
        h_days: inbound.horizon_days,
        demand_h: solved.demand_h,
        inbound: inbound.inbound_within_h,
        coverage: solved.coverage,
        target: solved.target,
        shortage: solved.shortage,
        moq_step: x.moq_step,
        order_qty: solved.order_qty,
        stock_status: solved.status,
        reduce_plan_to: solved.reduction.map(|r| r.rate_until_arrival),
        reduce_plan_to_after: solved.reduction.and_then(|r| r.rate_after_arrival),
        stock_before_1: event(0).map(|e| e.before_clamped),
        stock_after_1: event(0).map(|e| e.after_clamped),
        stock_before_2: event(1).map(|e| e.before_clamped),
        stock_after_2: event(1).map(|e| e.after_clamped),
        stock_before_3: event(2).map(|e| e.before_clamped),
        stock_after_3: event(2).map(|e| e.after_clamped),
        stock_before_order: solved.projection.end_stock_clamped,
        stock_after_order: solved.projection.end_stock_clamped + solved.order_qty as f64,
        algo_version: settings.algo_version.clone(),
    }
}
