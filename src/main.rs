use anyhow::Context as _;
use clap::Parser;
use std::io;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use monthly_attendance::{
    AttendanceService, Config, TargetMonth, helpers::google::google_client_init, prompt,
};

/// Fills the monthly attendance spreadsheets and document from the calendar
/// and saves them as PDF.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Target month as YYYYMM (defaults to the current month in Tokyo)
    month: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let month = match cli.month.as_deref() {
        Some(value) => TargetMonth::from_compact(value)
            .context("Failed to parse date parameter")?,
        None => TargetMonth::current()?,
    };

    let confirmed = prompt::confirm(&month, &mut io::stdin().lock(), &mut io::stdout())
        .context("Failed to read confirmation")?;
    if !confirmed {
        return Ok(());
    }

    let config_path = Config::default_path()?;
    let config = Config::load(&config_path)?;
    info!("Loaded config");

    let token = config.access_token(&Config::base_dir()?)?;
    let client = google_client_init(&token)?;

    let report = AttendanceService::google(client, config)
        .process_month(month)
        .await?;

    for path in &report.spreadsheet_pdfs {
        info!("Spreadsheet: {}", path.display());
    }
    info!("Document: {}", report.document_pdf.display());
    info!("Done");

    Ok(())
}
