// src/engine/solver.rs
//
// Replenishment solver: turns a resolved inbound schedule and a stock
// projection into a target, a shortage and a rounded order quantity. When
// projected stock dips under the OOS threshold before the next arrival, it
// also derives a smoothed reduced sales rate that avoids the dip.

use crate::engine::projection::{breaches_threshold, project, Projection, RateSchedule};
use crate::engine::resolver::{ArrivalEvent, ResolvedInbound};
use crate::engine::settings::EngineSettings;
use crate::model::recommendation::{PlanReduction, StockStatus};
use crate::model::sku::SkuInput;

/// Iteration budget for the reduced-rate binary search. Halving the
/// `[0, plan]` interval 32 times is far below any displayable precision.
const RATE_SEARCH_ITERS: u32 = 32;

/// Everything the solver derives for one SKU.
#[derive(Debug, Clone)]
pub struct Solved {
    pub demand_h: f64,
    pub coverage: f64,
    pub target: f64,
    pub shortage: f64,
    pub order_qty: u32,
    pub status: StockStatus,
    pub reduction: Option<PlanReduction>,
    /// Projection at the rates the aggregates were computed with.
    pub projection: Projection,
}

/// Minimum acceptable projected stock: a percentage of the marketplace
/// safety-stock target.
pub fn oos_threshold(x: &SkuInput) -> f64 {
    x.oos_safety_mp_pct / 100.0 * x.safety_stock_mp as f64
}

/// Smallest non-negative multiple of `moq_step` covering the shortage.
pub fn order_qty(shortage: f64, moq_step: u32) -> u32 {
    if shortage <= 0.0 {
        return 0;
    }
    let steps = (shortage / moq_step as f64).ceil() as u32;
    steps * moq_step
}

pub fn solve(x: &SkuInput, inbound: &ResolvedInbound, settings: &EngineSettings) -> Solved {
    let h = inbound.horizon_days;
    let on_hand = x.on_hand() as f64;
    let coverage = on_hand + inbound.inbound_within_h as f64;
    let threshold = oos_threshold(x);

    let plan_rates = RateSchedule::flat(x.plan_sales_per_day);
    let baseline = project(on_hand, &inbound.events, h, &plan_rates);

    let (status, rates, reduction) = if breaches_threshold(baseline.min_stock, threshold) {
        let (rates, reduction) =
            reduce_rates(x, inbound, on_hand, threshold + settings.soft_buffer);
        (StockStatus::ShortageBeforeResupply, rates, reduction)
    } else {
        (StockStatus::Sufficient, plan_rates, None)
    };

    // With no arrival splitting the horizon the reduction is advisory only;
    // aggregates stay at the plan rate. With a split, aggregates and
    // diagnostics follow the final smoothed rates.
    let projection = if rates == plan_rates {
        baseline
    } else {
        project(on_hand, &inbound.events, h, &rates)
    };

    let demand_h = demand_over_horizon(h, &rates);
    let target = demand_h + x.safety_stock_mp as f64 + x.safety_stock_ff as f64;
    let shortage = (target - coverage).max(0.0);
    let order_qty = order_qty(shortage, x.moq_step);

    Solved {
        demand_h,
        coverage,
        target,
        shortage,
        order_qty,
        status,
        reduction,
        projection,
    }
}

/// Total demand over the horizon under a two-piece rate schedule.
fn demand_over_horizon(horizon_days: u32, rates: &RateSchedule) -> f64 {
    let h = horizon_days as i64;
    let split = rates.switch_day.clamp(0, h);
    rates.until_arrival * split as f64 + rates.after_arrival * (h - split) as f64
}

/// Derives the reduced rate(s) keeping projected stock at or above
/// `threshold` over the whole horizon.
///
/// Single segment (no arrivals): closed form, one advisory rate; the
/// returned schedule stays at the plan rate so demand is unaffected.
/// Two segments: closed-form cap before the first arrival, binary search
/// after it, then a duration-weighted blend capped per segment, floored to
/// integers and re-verified against the full projection.
fn reduce_rates(
    x: &SkuInput,
    inbound: &ResolvedInbound,
    on_hand: f64,
    threshold: f64,
) -> (RateSchedule, Option<PlanReduction>) {
    let h = inbound.horizon_days as i64;
    let plan = x.plan_sales_per_day;
    if h == 0 {
        // Instantaneous replenishment: there are no days to stretch the plan over.
        return (RateSchedule::flat(plan), None);
    }

    let first = match inbound.events.first() {
        None => {
            let rate = max_rate_over(on_hand, h, threshold)
                .unwrap_or(plan)
                .clamp(0.0, plan)
                .floor();
            let reduction = PlanReduction {
                rate_until_arrival: rate as u32,
                rate_after_arrival: None,
            };
            return (RateSchedule::flat(plan), Some(reduction));
        }
        Some(first) => first,
    };

    let d1 = first.day;
    // Arrival today leaves no pre-arrival depletion to limit; keep the plan rate.
    let r1_raw = match max_rate_over(on_hand, d1, threshold) {
        Some(cap) => cap.clamp(0.0, plan),
        None => plan,
    };
    let stock_after_first = on_hand - r1_raw * d1 as f64 + first.qty as f64;
    let r2_raw = max_rate_after_first(
        stock_after_first,
        &inbound.events[1..],
        d1,
        h,
        threshold,
        plan,
    );

    // Blend toward a single figure where the segment caps allow it, so the
    // user is not shown two wildly different daily targets.
    let blended = (r1_raw * d1 as f64 + r2_raw * (h - d1) as f64) / h as f64;
    let mut r1 = blended.min(r1_raw).max(0.0).floor() as u32;
    let mut r2 = blended.min(r2_raw).max(0.0).floor() as u32;

    // Re-verify each rate against the projection points it can actually
    // move: the post-arrival rate reaches nothing before the first arrival,
    // and a point that sits under the threshold even with zero depletion
    // (stock already short before any selling happens) cannot be lifted by
    // any rate. Checking either kind would drain a rate to zero over a
    // segment it has no effect on.
    let zero_depletion = project(
        on_hand,
        &inbound.events,
        inbound.horizon_days,
        &two_piece(0, 0, d1),
    );
    let fixable: Vec<bool> = zero_depletion
        .events
        .iter()
        .map(|e| !breaches_threshold(e.before, threshold))
        .collect();
    let end_fixable = !breaches_threshold(zero_depletion.end_stock, threshold);

    let residual_breach = |schedule: &RateSchedule, movable_after: i64| {
        let p = project(on_hand, &inbound.events, inbound.horizon_days, schedule);
        if end_fixable && breaches_threshold(p.end_stock, threshold) {
            return true;
        }
        p.events.iter().zip(&fixable).any(|(e, fx)| {
            *fx && e.day > movable_after && breaches_threshold(e.before, threshold)
        })
    };

    let mut schedule = two_piece(r1, r2, d1);
    while residual_breach(&schedule, d1) && r2 > 0 {
        r2 -= 1;
        schedule = two_piece(r1, r2, d1);
    }
    while residual_breach(&schedule, 0) && r1 > 0 {
        r1 -= 1;
        schedule = two_piece(r1, r2, d1);
    }

    let reduction = PlanReduction {
        rate_until_arrival: r1,
        rate_after_arrival: Some(r2),
    };
    (schedule, Some(reduction))
}

fn two_piece(r1: u32, r2: u32, switch_day: i64) -> RateSchedule {
    RateSchedule {
        until_arrival: r1 as f64,
        after_arrival: r2 as f64,
        switch_day,
    }
}

/// Maximum rate keeping `start - rate * days >= threshold`. `None` when the
/// segment has no days, i.e. no depletion constrains the rate.
fn max_rate_over(start: f64, days: i64, threshold: f64) -> Option<f64> {
    if days <= 0 {
        return None;
    }
    Some(((start - threshold) / days as f64).max(0.0))
}

/// Maximum constant rate over `[from_day, horizon]` keeping the projected
/// minimum at or above `threshold`, given the stock right after the first
/// arrival and the remaining events. Found by bisection: feasibility is
/// monotone decreasing in the rate.
fn max_rate_after_first(
    start: f64,
    remaining_events: &[ArrivalEvent],
    from_day: i64,
    horizon: i64,
    threshold: f64,
    plan: f64,
) -> f64 {
    if horizon <= from_day {
        return plan;
    }
    let feasible = |rate: f64| {
        let min = min_stock_from(start, remaining_events, from_day, horizon, rate);
        !breaches_threshold(min, threshold)
    };
    if feasible(plan) {
        return plan;
    }
    if !feasible(0.0) {
        return 0.0;
    }
    let (mut lo, mut hi) = (0.0_f64, plan);
    for _ in 0..RATE_SEARCH_ITERS {
        let mid = 0.5 * (lo + hi);
        if feasible(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Minimum algebraic stock from `from_day` to `horizon` at a constant rate.
fn min_stock_from(
    start: f64,
    events: &[ArrivalEvent],
    from_day: i64,
    horizon: i64,
    rate: f64,
) -> f64 {
    let mut stock = start;
    let mut day = from_day;
    let mut min = start;
    for event in events {
        let before = stock - rate * (event.day - day) as f64;
        min = min.min(before);
        stock = before + event.qty as f64;
        day = event.day;
    }
    min.min(stock - rate * (horizon - day) as f64)
}
