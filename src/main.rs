use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

use kuma_import::app::import_use_case::ImportUseCase;
use kuma_import::config::{Config, Credentials, Overrides};
use kuma_import::constants::DEFAULT_LOG_DIR;
use kuma_import::infra::kuma_client::KumaRestClient;
use kuma_import::{input, logging};

#[derive(Parser)]
#[command(name = "kuma-import")]
#[command(about = "Bulk import HTTPS monitors into Uptime Kuma from a CSV file")]
#[command(version)]
struct Cli {
    /// Config file (defaults to kuma-import.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// CSV file with `name` and `url` columns
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Base URL of the Uptime Kuma API
    #[arg(long)]
    url: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    timeout_seconds: Option<u64>,
    /// Check every row against the server without creating monitors
    #[arg(long)]
    dry_run: bool,
    /// Write a JSON report of the run to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

async fn run(cli: Cli, config: anyhow::Result<Config>) -> anyhow::Result<()> {
    let config = config?;
    config.validate()?;
    let credentials = Credentials::from_env()?;
    let rows = input::read_rows(&config.import.csv_file)?;

    info!(server = %config.kuma.url, csv = %config.import.csv_file.display(), "Starting import");
    println!("🔄 Importing monitors from {} into {}", config.import.csv_file.display(), config.kuma.url);

    let client = KumaRestClient::new(&config.kuma.url, Duration::from_secs(config.kuma.timeout_seconds))?;
    let mut use_case = ImportUseCase::new(Box::new(client), config.kuma.url.clone()).dry_run(cli.dry_run);
    let summary = use_case.run(rows, &credentials).await?;

    summary.print();

    if let Some(path) = cli.report {
        summary
            .write_json(&path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        println!("💾 Saved report to {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let overrides = Overrides {
        url: cli.url.clone(),
        csv_file: cli.csv.clone(),
        timeout_seconds: cli.timeout_seconds,
    };
    let config = Config::load(cli.config.as_deref())
        .map(|c| c.apply(overrides))
        .context("failed to load configuration");

    let log_dir = config
        .as_ref()
        .map(|c| c.logging.dir.clone())
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR));
    let _guard = logging::init_logging(&log_dir);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Import failed: {:#}", e);
            eprintln!("❌ Import failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
