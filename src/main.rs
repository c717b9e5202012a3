//! CLI entry point for city-ledger.
//!
//! Fetches transactions and customers, joins and enriches them, and writes
//! the transactions detail report and the per-city totals report.

use anyhow::Result;
use city_ledger::{
    config,
    fetch::BasicClient,
    geocode::{Gazetteer, GeoNames, PlaceResolver},
    output::write_report,
    pipeline::build_reports,
    sources::{fetch_customers, fetch_transactions},
    table::Table,
};
use clap::Parser;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "city_ledger")]
#[command(about = "Join transactions with customers and report totals per city", long_about = None)]
struct Cli {
    /// Endpoint serving the transactions JSON array
    #[arg(long, default_value = config::TRANSACTIONS_URL)]
    transactions_url: String,

    /// Endpoint serving the customers XML document
    #[arg(long, default_value = config::CUSTOMERS_URL)]
    customers_url: String,

    /// CSV file for the per-transaction report
    #[arg(long, default_value = config::TRANSACTIONS_REPORT)]
    transactions_out: String,

    /// CSV file for the per-city totals report
    #[arg(long, default_value = config::CITY_TOTALS_REPORT)]
    city_totals_out: String,

    /// Place list (`lat,lon,name,admin1,admin2,cc`) used for reverse geocoding.
    /// Defaults to the bundled GeoNames cities1000 dataset.
    #[arg(long, value_name = "CSV")]
    gazetteer: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| config::DEFAULT_LOG_FILE.to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("city_ledger.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let resolver: Box<dyn PlaceResolver> = match &cli.gazetteer {
        Some(path) => {
            let gazetteer = Gazetteer::load(path)?;
            info!(path = %path.display(), places = gazetteer.len(), "Gazetteer ready");
            Box::new(gazetteer)
        }
        None => {
            info!("Using bundled GeoNames places");
            Box::new(GeoNames::new())
        }
    };

    let client = BasicClient::new();
    let transactions = fetch_transactions(&client, &cli.transactions_url).await?;
    let customers = fetch_customers(&client, &cli.customers_url).await?;

    let reports = build_reports(
        &Table::from_records(transactions),
        &Table::from_records(customers),
        resolver.as_ref(),
    )?;

    write_report(&cli.transactions_out, &reports.transactions)?;
    write_report(&cli.city_totals_out, &reports.city_totals)?;

    info!(
        transactions_out = %cli.transactions_out,
        city_totals_out = %cli.city_totals_out,
        "Run complete"
    );
    Ok(())
}
