use std::error::Error;
use std::path::PathBuf;
use std::process;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use reorder_planner::engine::calculate;
use reorder_planner::engine::settings::EngineSettings;
use reorder_planner::io::{reader, reporting};
use reorder_planner::model::recommendation::StockStatus;

/// Computes replenishment recommendations for SKUs sold through a
/// factory -> regional hub -> marketplace fulfillment chain.
#[derive(Debug, Parser)]
#[command(name = "reorder-planner", version)]
struct Cli {
    /// SKU plan sheet (CSV)
    #[arg(long, default_value = "plan.csv")]
    plan: PathBuf,

    /// In-transit shipments sheet (CSV)
    #[arg(long = "in-transit", default_value = "in_transit.csv")]
    in_transit: PathBuf,

    /// Output file for the recommendations
    #[arg(long, default_value = "recommendations.csv")]
    output: PathBuf,

    /// Also write a one-row run log to this path
    #[arg(long)]
    run_log: Option<PathBuf>,

    /// Planning date (YYYY-MM-DD); defaults to the current date
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let settings = EngineSettings::from_env();
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    println!("=== Reorder Planner ({}) ===", settings.algo_version);
    println!("Planning date: {today}");

    // 1. LOAD INPUT
    let items = reader::read_plan(&cli.plan, &settings)?;
    let in_transit = reader::read_in_transit(&cli.in_transit)?;
    println!(
        "Loaded {} SKUs and {} in-transit batches",
        items.len(),
        in_transit.len()
    );

    // 2. CALCULATE
    let recs = calculate(&items, &in_transit, today, &settings);

    // 3. EXPORT
    reporting::write_recommendations(&cli.output, &recs)?;
    if let Some(path) = &cli.run_log {
        let log = reporting::RunLog::new(&recs, in_transit.len(), &settings.algo_version);
        reporting::write_run_log(path, &log)?;
    }

    // 4. SUMMARY
    let at_risk = recs
        .iter()
        .filter(|r| r.stock_status == StockStatus::ShortageBeforeResupply)
        .count();
    let to_order = recs.iter().filter(|r| r.order_qty > 0).count();
    let total_units: u64 = recs.iter().map(|r| r.order_qty as u64).sum();

    println!("\n=== Summary ===");
    println!("SKUs at OOS risk before resupply: {at_risk}");
    println!("SKUs needing an order: {to_order}");
    println!("Total units to order: {total_units}");

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
