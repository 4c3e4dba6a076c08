// src/io/reader.rs
//
// CSV ingestion for the two input sheets. Everything the engine must never
// see (missing columns, unparsable cells, out-of-range values, unresolved
// defaults, raw SKU strings) is dealt with here.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::engine::settings::EngineSettings;
use crate::model::sku::{normalize_sku, InTransitItem, SkuInput};

pub const PLAN_SHEET: &str = "plan";
pub const IN_TRANSIT_SHEET: &str = "in_transit";

const REQUIRED_PLAN_COLS: &[&str] = &["sku", "stock_ff", "stock_mp", "plan_sales_per_day"];
const REQUIRED_IN_TRANSIT_COLS: &[&str] = &["sku", "qty", "eta_cn_msk"];

/// "Bad template" conditions reported back to the user before the engine
/// ever runs.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("could not read the {sheet} sheet: {source}")]
    Unreadable {
        sheet: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("the {sheet} sheet is missing required column '{column}'")]
    MissingColumn {
        sheet: &'static str,
        column: &'static str,
    },
    #[error("{sheet} sheet, row {row}: {reason}")]
    BadRow {
        sheet: &'static str,
        row: usize,
        reason: String,
    },
}

/// One row of the plan sheet as uploaded. Optional columns fall back to
/// `EngineSettings` defaults during resolution.
#[derive(Debug, Deserialize)]
struct RawPlanRow {
    sku: String,
    stock_ff: u32,
    stock_mp: u32,
    plan_sales_per_day: f64,
    prod_lead_time_days: Option<u32>,
    lead_time_cn_msk: Option<u32>,
    lead_time_msk_mp: Option<u32>,
    oos_safety_mp_pct: Option<f64>,
    safety_stock_mp: Option<u32>,
    safety_stock_ff: Option<u32>,
    moq_step: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawTransitRow {
    sku: String,
    qty: u32,
    eta_cn_msk: NaiveDate,
}

/// Reads the plan sheet from a file path.
pub fn read_plan<P: AsRef<Path>>(
    path: P,
    settings: &EngineSettings,
) -> Result<Vec<SkuInput>, TemplateError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| TemplateError::Unreadable {
            sheet: PLAN_SHEET,
            source,
        })?;
    parse_plan(reader, settings)
}

/// Reads the plan sheet from any byte source (tests, in-memory buffers).
pub fn read_plan_from<R: Read>(
    reader: R,
    settings: &EngineSettings,
) -> Result<Vec<SkuInput>, TemplateError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    parse_plan(reader, settings)
}

/// Reads the in-transit sheet from a file path.
pub fn read_in_transit<P: AsRef<Path>>(path: P) -> Result<Vec<InTransitItem>, TemplateError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| TemplateError::Unreadable {
            sheet: IN_TRANSIT_SHEET,
            source,
        })?;
    parse_in_transit(reader)
}

/// Reads the in-transit sheet from any byte source.
pub fn read_in_transit_from<R: Read>(reader: R) -> Result<Vec<InTransitItem>, TemplateError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    parse_in_transit(reader)
}

fn parse_plan<R: Read>(
    mut reader: csv::Reader<R>,
    settings: &EngineSettings,
) -> Result<Vec<SkuInput>, TemplateError> {
    check_columns(&mut reader, PLAN_SHEET, REQUIRED_PLAN_COLS)?;

    let mut items = Vec::new();
    for (idx, row) in reader.deserialize::<RawPlanRow>().enumerate() {
        let row_no = idx + 2; // header occupies row 1
        let raw = row.map_err(|e| TemplateError::BadRow {
            sheet: PLAN_SHEET,
            row: row_no,
            reason: e.to_string(),
        })?;
        if raw.sku.trim().is_empty() {
            continue;
        }
        let item = resolve_plan_row(raw, settings).map_err(|reason| TemplateError::BadRow {
            sheet: PLAN_SHEET,
            row: row_no,
            reason,
        })?;
        items.push(item);
    }
    Ok(items)
}

fn parse_in_transit<R: Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<InTransitItem>, TemplateError> {
    check_columns(&mut reader, IN_TRANSIT_SHEET, REQUIRED_IN_TRANSIT_COLS)?;

    let mut items = Vec::new();
    for (idx, row) in reader.deserialize::<RawTransitRow>().enumerate() {
        let row_no = idx + 2;
        let raw = row.map_err(|e| TemplateError::BadRow {
            sheet: IN_TRANSIT_SHEET,
            row: row_no,
            reason: e.to_string(),
        })?;
        if raw.sku.trim().is_empty() {
            continue;
        }
        items.push(InTransitItem {
            sku: normalize_sku(&raw.sku),
            qty: raw.qty,
            eta_cn_msk: raw.eta_cn_msk,
        });
    }
    Ok(items)
}

fn check_columns<R: Read>(
    reader: &mut csv::Reader<R>,
    sheet: &'static str,
    required: &[&'static str],
) -> Result<(), TemplateError> {
    let headers = reader
        .headers()
        .map_err(|source| TemplateError::Unreadable { sheet, source })?;
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(TemplateError::MissingColumn { sheet, column });
        }
    }
    Ok(())
}

/// Range-checks a raw row and fills unset columns from settings defaults,
/// so the engine only ever sees fully resolved inputs.
fn resolve_plan_row(raw: RawPlanRow, settings: &EngineSettings) -> Result<SkuInput, String> {
    if raw.plan_sales_per_day < 0.0 {
        return Err("plan_sales_per_day must be >= 0".to_string());
    }
    let oos_safety_mp_pct = raw
        .oos_safety_mp_pct
        .unwrap_or(settings.default_oos_safety_mp_pct);
    if !(0.0..=100.0).contains(&oos_safety_mp_pct) {
        return Err("oos_safety_mp_pct must be between 0 and 100".to_string());
    }
    let moq_step = raw.moq_step.unwrap_or(settings.default_moq_step);
    if moq_step == 0 {
        return Err("moq_step must be >= 1".to_string());
    }

    Ok(SkuInput {
        sku: normalize_sku(&raw.sku),
        stock_ff: raw.stock_ff,
        stock_mp: raw.stock_mp,
        plan_sales_per_day: raw.plan_sales_per_day,
        prod_lead_time_days: raw
            .prod_lead_time_days
            .unwrap_or(settings.default_prod_lead_time_days),
        lead_time_cn_msk: raw
            .lead_time_cn_msk
            .unwrap_or(settings.default_lead_time_cn_msk),
        lead_time_msk_mp: raw
            .lead_time_msk_mp
            .unwrap_or(settings.default_lead_time_msk_mp),
        oos_safety_mp_pct,
        safety_stock_mp: raw
            .safety_stock_mp
            .unwrap_or(settings.default_safety_stock_mp),
        safety_stock_ff: raw
            .safety_stock_ff
            .unwrap_or(settings.default_safety_stock_ff),
        moq_step,
    })
}
