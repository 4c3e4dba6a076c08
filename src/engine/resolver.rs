// src/engine/resolver.rs

use chrono::{Duration, NaiveDate};

use crate::model::sku::{InTransitItem, SkuInput};

/// A quantity arriving at the marketplace on a given day offset from `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalEvent {
    pub day: i64,
    pub qty: u64,
}

/// Horizon and inbound schedule resolved for one SKU.
#[derive(Debug, Clone)]
pub struct ResolvedInbound {
    /// Planning horizon H: days until a newly placed order would arrive.
    pub horizon_days: u32,
    /// Total inbound units with a final arrival inside `[today, today + H]`.
    /// Wider than a single batch quantity so summing many batches cannot wrap.
    pub inbound_within_h: u64,
    /// Arrival events sorted by day offset, same-day batches merged.
    pub events: Vec<ArrivalEvent>,
}

/// H = production lead time + hub leg + marketplace leg.
pub fn horizon_days(x: &SkuInput) -> u32 {
    x.prod_lead_time_days + x.lead_time_cn_msk + x.lead_time_msk_mp
}

/// Partitions the shared in-transit list into this SKU's arrival schedule.
///
/// Each matching batch's hub ETA is pushed forward by the final transit leg
/// to get its marketplace arrival date, then expressed as a day offset from
/// `today`. Offsets outside `[0, H]` do not contribute: past-dated rows are
/// stale data, later ones arrive after a fresh order would.
///
/// SKU strings on both sides are expected to be normalized already (the
/// ingestion layer runs `normalize_sku` on every row).
pub fn resolve(x: &SkuInput, in_transit: &[InTransitItem], today: NaiveDate) -> ResolvedInbound {
    let h = horizon_days(x);
    let mut events: Vec<ArrivalEvent> = Vec::new();

    for item in in_transit.iter().filter(|item| item.sku == x.sku) {
        let arrival = item.eta_cn_msk + Duration::days(x.lead_time_msk_mp as i64);
        let day = (arrival - today).num_days();
        if day < 0 || day > h as i64 {
            continue;
        }
        // Only the per-day total matters to the projection.
        match events.iter_mut().find(|e| e.day == day) {
            Some(existing) => existing.qty += item.qty as u64,
            None => events.push(ArrivalEvent {
                day,
                qty: item.qty as u64,
            }),
        }
    }

    events.sort_by_key(|e| e.day);
    let inbound_within_h = events.iter().map(|e| e.qty).sum();

    ResolvedInbound {
        horizon_days: h,
        inbound_within_h,
        events,
    }
}
