//! PDF Monitor CLI
//!
//! Scheduled entry point: one `run` per invocation. Exit status is non-zero
//! when the run failed, so the scheduler can alert on it.

use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use pdf_monitor::{
    config,
    error::Result,
    models::{Config, Secrets},
    pipeline::{Monitor, MonitorSettings, report_failure},
    services::{AnthropicClient, HttpFetcher, PdfTextExtractor, SmtpNotifier},
    storage::LocalStorage,
    utils::http,
};

/// PDF Monitor - weekly document change reports
#[derive(Parser, Debug)]
#[command(
    name = "pdf-monitor",
    version,
    about = "Detects and summarizes changes in a published PDF"
)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "pdf-monitor.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, compare, summarize, notify and store the new snapshot
    Run,

    /// Validate configuration and environment
    Validate,

    /// Show the stored snapshot
    Info,
}

/// Initialize logging. `--verbose` wins over the configured level.
fn init_logging(verbose: bool, configured: &str) {
    let level = if verbose { "debug" } else { configured };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Document download client and language-model client.
fn build_clients(config: &Config) -> Result<(reqwest::Client, reqwest::Client)> {
    Ok((
        http::create_async_client(&config.http)?,
        http::create_api_client(&config.summary)?,
    ))
}

/// Build the services and execute one run.
///
/// Setup failures after the mailer exists are reported by email like any
/// other failed run. A mailer that cannot be built only fails the exit
/// status.
async fn run(config: &Config, secrets: &Secrets) -> Result<()> {
    let notifier = SmtpNotifier::new(&config.email, secrets)?;

    let (fetch_client, api_client) = match build_clients(config) {
        Ok(clients) => clients,
        Err(e) => {
            log::error!("Setup failed: {}", e);
            report_failure(&notifier, &secrets.pdf_url, Local::now().date_naive(), &e).await;
            return Err(e);
        }
    };

    let fetcher = HttpFetcher::new(fetch_client);
    let extractor = PdfTextExtractor::new();
    let store = LocalStorage::new(&config.storage.snapshot_path);
    let generator = AnthropicClient::new(api_client, secrets.api_key.clone(), &config.summary);

    let monitor = Monitor::new(
        MonitorSettings::new(config, secrets),
        &fetcher,
        &extractor,
        &store,
        &generator,
        &notifier,
    );
    let outcome = monitor.run().await?;

    log::info!("Report: {}", outcome.report.subject);
    if !outcome.delivery.is_sent() {
        log::warn!("Report was not delivered, see errors above");
    }
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let level = Config::load(&cli.config)
        .map(|c| c.logging.level)
        .unwrap_or_else(|_| "info".to_string());
    init_logging(cli.verbose, &level);

    log::info!("PDF Monitor starting...");
    log::info!("Configuration: {}", cli.config.display());

    match cli.command {
        Command::Run => {
            let (config, secrets) = config::load_all(&cli.config)?;
            log::debug!("Secrets loaded: {:?}", secrets);
            run(&config, &secrets).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            let file_config = config::load_config(&cli.config);

            if let Err(e) = file_config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            match Secrets::from_env() {
                Ok(secrets) => log::info!("✓ Environment OK (monitoring {})", secrets.pdf_url),
                Err(e) => {
                    log::error!("Environment validation failed: {}", e);
                    return Err(e);
                }
            }

            log::info!("All validations passed!");
        }

        Command::Info => {
            let file_config = config::load_config(&cli.config);
            let store = LocalStorage::new(&file_config.storage.snapshot_path);
            log::info!("Snapshot file: {}", store.path().display());

            match store.info().await? {
                Some(info) => {
                    log::info!("Size: {} bytes", info.bytes);
                    log::info!("SHA-256: {}", info.digest);
                    if let Some(modified) = info.modified {
                        log::info!("Last updated: {}", modified.format("%Y-%m-%d %H:%M:%S"));
                    }
                }
                None => log::info!("No snapshot found yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
