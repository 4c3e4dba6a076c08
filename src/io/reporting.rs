// src/io/reporting.rs

use std::error::Error;
use std::path::Path;

use serde::Serialize;

use crate::model::recommendation::Recommendation;

/// One-row summary of a calculation run, written next to the
/// recommendations for traceability.
#[derive(Debug, Clone, Serialize)]
pub struct RunLog {
    pub generated_at: String,
    pub algo_version: String,
    pub sku_count: usize,
    pub in_transit_count: usize,
    pub total_order_units: u64,
}

impl RunLog {
    pub fn new(recs: &[Recommendation], in_transit_count: usize, algo_version: &str) -> Self {
        Self {
            generated_at: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            algo_version: algo_version.to_string(),
            sku_count: recs.len(),
            in_transit_count,
            total_order_units: recs.iter().map(|r| r.order_qty as u64).sum(),
        }
    }
}

/// Writes the recommendations to a CSV file, one row per SKU, exactly as
/// computed by the engine.
pub fn write_recommendations<P: AsRef<Path>>(
    path: P,
    recs: &[Recommendation],
) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    for rec in recs {
        wtr.serialize(rec)?;
    }
    wtr.flush()?;

    println!(
        "Exported {} recommendations to '{}'",
        recs.len(),
        path.display()
    );
    Ok(())
}

/// Writes the run log as a single-row CSV.
pub fn write_run_log<P: AsRef<Path>>(path: P, log: &RunLog) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    wtr.serialize(log)?;
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::recommendation::StockStatus;

    fn rec(sku: &str, order_qty: u32) -> Recommendation {
        Recommendation {
            sku: sku.to_string(),
            h_days: 50,
            demand_h: 725.0,
            inbound: 0,
            coverage: 1550.0,
            target: 975.0,
            shortage: 0.0,
            moq_step: 250,
            order_qty,
            stock_status: StockStatus::Sufficient,
            reduce_plan_to: None,
            reduce_plan_to_after: None,
            stock_before_1: None,
            stock_after_1: None,
            stock_before_2: None,
            stock_after_2: None,
            stock_before_3: None,
            stock_after_3: None,
            stock_before_order: 825.0,
            stock_after_order: 825.0,
            algo_version: "v1.2a".to_string(),
        }
    }

    #[test]
    fn run_log_totals_order_units() {
        let recs = vec![rec("a", 250), rec("b", 0), rec("c", 1000)];
        let log = RunLog::new(&recs, 7, "v1.2a");
        assert_eq!(log.sku_count, 3);
        assert_eq!(log.in_transit_count, 7);
        assert_eq!(log.total_order_units, 1250);
        assert_eq!(log.algo_version, "v1.2a");
    }

    #[test]
    fn recommendations_serialize_to_csv_rows() {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(rec("abc-123", 0)).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert!(out.starts_with("sku,h_days,demand_h,inbound,coverage"));
        assert!(out.contains("abc-123"));
        assert!(out.contains("sufficient"));
    }
}
