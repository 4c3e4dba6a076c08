// src/engine/projection.rs
//
// Piecewise stock projection: walk the horizon in segments delimited by
// arrival events, depleting linearly at a daily rate inside each segment.
//
// Two stock tracks run in parallel. The algebraic track may go negative and
// drives every decision (minimum stock, threshold breach). The display track
// is clamped at zero at each segment end before an arrival is added and
// feeds the human-facing `stock_before_*` / `stock_after_*` diagnostics.

use crate::engine::resolver::ArrivalEvent;

/// Numeric tolerance for threshold comparisons.
pub const EPS: f64 = 1e-9;

/// Daily depletion rates over the horizon: one rate before the first arrival
/// day, one from it onward. The flat case uses the same rate for both.
///
/// `switch_day` always coincides with an event boundary (the first arrival),
/// so no projection segment ever straddles a rate change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSchedule {
    pub until_arrival: f64,
    pub after_arrival: f64,
    pub switch_day: i64,
}

impl RateSchedule {
    pub fn flat(rate: f64) -> Self {
        Self {
            until_arrival: rate,
            after_arrival: rate,
            switch_day: 0,
        }
    }

    /// Rate in effect for the segment starting at `day`.
    fn rate_from(&self, day: i64) -> f64 {
        if day < self.switch_day {
            self.until_arrival
        } else {
            self.after_arrival
        }
    }
}

/// Projected stock around one arrival event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventStock {
    pub day: i64,
    pub qty: u64,
    /// Algebraic stock just before the arrival.
    pub before: f64,
    /// Algebraic stock just after the arrival.
    pub after: f64,
    /// Display stock just before the arrival, floored at zero.
    pub before_clamped: f64,
    /// Display stock just after the arrival.
    pub after_clamped: f64,
}

/// Full projection of one SKU's stock over its horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Minimum algebraic stock across all pre-arrival points and horizon end.
    pub min_stock: f64,
    pub events: Vec<EventStock>,
    /// Algebraic stock at horizon end (just before a new order would arrive).
    pub end_stock: f64,
    /// Display stock at horizon end, floored at zero.
    pub end_stock_clamped: f64,
}

/// Simulates stock depletion from `today` (day 0) to day `horizon_days`.
///
/// `events` must be sorted by day with offsets in `[0, horizon_days]`, as
/// produced by the resolver. With no events the whole horizon is a single
/// depletion segment.
pub fn project(
    on_hand: f64,
    events: &[ArrivalEvent],
    horizon_days: u32,
    rates: &RateSchedule,
) -> Projection {
    let horizon = horizon_days as i64;
    let mut algebraic = on_hand;
    let mut display = on_hand.max(0.0);
    let mut day = 0i64;
    let mut min_stock = on_hand;
    let mut event_stocks = Vec::with_capacity(events.len());

    for event in events {
        let elapsed = (event.day - day) as f64;
        let rate = rates.rate_from(day);
        let before = algebraic - rate * elapsed;
        let before_clamped = (display - rate * elapsed).max(0.0);
        let after = before + event.qty as f64;
        let after_clamped = before_clamped + event.qty as f64;

        min_stock = min_stock.min(before);
        event_stocks.push(EventStock {
            day: event.day,
            qty: event.qty,
            before,
            after,
            before_clamped,
            after_clamped,
        });

        algebraic = after;
        display = after_clamped;
        day = event.day;
    }

    let elapsed = (horizon - day) as f64;
    let rate = rates.rate_from(day);
    let end_stock = algebraic - rate * elapsed;
    let end_stock_clamped = (display - rate * elapsed).max(0.0);
    min_stock = min_stock.min(end_stock);

    Projection {
        min_stock,
        events: event_stocks,
        end_stock,
        end_stock_clamped,
    }
}

/// Threshold breach test with tolerance against float-boundary flapping.
pub fn breaches_threshold(min_stock: f64, threshold: f64) -> bool {
    min_stock < threshold - EPS
}
