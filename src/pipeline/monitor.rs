// src/pipeline/monitor.rs

//! One monitoring run.
//!
//! Stages run strictly in order:
//!
//! ```text
//! Fetching → Extracting → LoadingPrevious → Detecting → (Summarizing)?
//!          → Notifying → Persisting → Done
//! ```
//!
//! A fatal error at any stage moves to `Error`: an error report is sent and
//! the error is returned to the caller. The snapshot is only written in
//! `Persisting`, after the report went out, so a failed run never advances
//! the baseline.

use std::fmt;

use chrono::{Local, NaiveDate};

use crate::error::{AppError, Result};
use crate::models::{Config, Report, Secrets, Snapshot};
use crate::pipeline::detect::{ChangeDetector, ChangeResult};
use crate::pipeline::summarize::{ChangeSummarizer, Summary, SummaryLimits};
use crate::services::{Delivery, DocumentFetcher, Notifier, TextExtractor, TextGenerator};
use crate::storage::SnapshotStore;

/// Summary text for a first run that is not sent to the language model.
pub const FIRST_RUN_NOTE: &str = "First run - no previous content to compare. \
The current document text has been stored as the baseline for future comparisons.";

/// Pipeline stage, used for step logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Extracting,
    LoadingPrevious,
    Detecting,
    Summarizing,
    Notifying,
    Persisting,
    Done,
    Error,
}

impl Stage {
    /// Number of working stages (excludes `Done` and `Error`).
    pub const TOTAL: usize = 7;

    fn number(self) -> usize {
        match self {
            Stage::Fetching => 1,
            Stage::Extracting => 2,
            Stage::LoadingPrevious => 3,
            Stage::Detecting => 4,
            Stage::Summarizing => 5,
            Stage::Notifying => 6,
            Stage::Persisting => 7,
            Stage::Done | Stage::Error => Self::TOTAL,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "Fetching",
            Stage::Extracting => "Extracting",
            Stage::LoadingPrevious => "Loading previous snapshot",
            Stage::Detecting => "Detecting changes",
            Stage::Summarizing => "Summarizing",
            Stage::Notifying => "Notifying",
            Stage::Persisting => "Persisting snapshot",
            Stage::Done => "Done",
            Stage::Error => "Error",
        };
        f.write_str(name)
    }
}

fn step(stage: Stage) {
    log::info!("[STEP {}/{}] {}", stage.number(), Stage::TOTAL, stage);
}

fn skip(stage: Stage) {
    log::info!("[STEP {}/{}] {} skipped", stage.number(), Stage::TOTAL, stage);
}

/// Send the error report for a failed run. Delivery problems are logged
/// and returned, never raised.
pub async fn report_failure(
    notifier: &dyn Notifier,
    url: &str,
    date: NaiveDate,
    error: &AppError,
) -> Delivery {
    let report = Report::error(url, date, error);
    let delivery = notifier.send(&report).await;
    if let Delivery::Failed(reason) = &delivery {
        log::warn!("Error report was not delivered: {}", reason);
    }
    delivery
}

/// Per-run settings derived from the config and environment.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Document to monitor
    pub url: String,
    pub summarize_first_run: bool,
    pub limits: SummaryLimits,
}

impl MonitorSettings {
    pub fn new(config: &Config, secrets: &Secrets) -> Self {
        Self {
            url: secrets.pdf_url.clone(),
            summarize_first_run: config.summary.summarize_first_run,
            limits: SummaryLimits::from(&config.summary),
        }
    }
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub change: ChangeResult,
    /// `None` when the summarizer was not involved
    pub summary: Option<Summary>,
    pub report: Report,
    pub delivery: Delivery,
}

/// Orchestrates a single run over injected services.
pub struct Monitor<'a> {
    settings: MonitorSettings,
    fetcher: &'a dyn DocumentFetcher,
    extractor: &'a dyn TextExtractor,
    store: &'a dyn SnapshotStore,
    summarizer: ChangeSummarizer<'a>,
    notifier: &'a dyn Notifier,
    detector: ChangeDetector,
}

impl<'a> Monitor<'a> {
    pub fn new(
        settings: MonitorSettings,
        fetcher: &'a dyn DocumentFetcher,
        extractor: &'a dyn TextExtractor,
        store: &'a dyn SnapshotStore,
        generator: &'a dyn TextGenerator,
        notifier: &'a dyn Notifier,
    ) -> Self {
        let summarizer = ChangeSummarizer::new(generator, settings.limits);
        Self {
            settings,
            fetcher,
            extractor,
            store,
            summarizer,
            notifier,
            detector: ChangeDetector::new(),
        }
    }

    /// Execute one run, dated today.
    pub async fn run(&self) -> Result<RunOutcome> {
        self.run_on(Local::now().date_naive()).await
    }

    /// Execute one run with reports dated `date`.
    pub async fn run_on(&self, date: NaiveDate) -> Result<RunOutcome> {
        log::info!("Monitoring {}", self.settings.url);

        match self.run_stages(date).await {
            Ok(outcome) => {
                log::info!("[{}] Run complete ({})", Stage::Done, outcome.change.label());
                Ok(outcome)
            }
            Err(e) => {
                log::error!("[{}] Run failed: {}", Stage::Error, e);
                report_failure(self.notifier, &self.settings.url, date, &e).await;
                Err(e)
            }
        }
    }

    async fn run_stages(&self, date: NaiveDate) -> Result<RunOutcome> {
        let url = self.settings.url.as_str();

        step(Stage::Fetching);
        let bytes = self.fetcher.fetch(url).await?;

        step(Stage::Extracting);
        let current = Snapshot::from(self.extractor.extract(&bytes)?);
        log::info!(
            "Current text: {} bytes, sha256 {}",
            current.len(),
            current.short_digest()
        );

        step(Stage::LoadingPrevious);
        let previous = self.store.load().await?;

        step(Stage::Detecting);
        let previous_text = previous.as_ref().map(Snapshot::text).unwrap_or_default();
        let change = self.detector.detect(previous_text, current.text());
        match &change {
            ChangeResult::FirstRun => log::info!("No previous snapshot, treating as first run"),
            ChangeResult::Unchanged => log::info!("No changes detected"),
            ChangeResult::Changed(diff) => log::info!(
                "Changes detected: {} lines added, {} lines removed",
                diff.inserted(),
                diff.deleted()
            ),
        }

        let (report, summary) = match &change {
            ChangeResult::Unchanged => {
                skip(Stage::Summarizing);
                (Report::no_changes(url, date), None)
            }
            ChangeResult::FirstRun if !self.settings.summarize_first_run => {
                skip(Stage::Summarizing);
                (Report::changes(url, date, FIRST_RUN_NOTE), None)
            }
            ChangeResult::FirstRun => {
                step(Stage::Summarizing);
                let summary = self.summarizer.summarize(current.text()).await;
                (Report::changes(url, date, &summary.to_string()), Some(summary))
            }
            ChangeResult::Changed(diff) => {
                step(Stage::Summarizing);
                let summary = self.summarizer.summarize(diff.as_str()).await;
                (Report::changes(url, date, &summary.to_string()), Some(summary))
            }
        };

        step(Stage::Notifying);
        let delivery = self.notifier.send(&report).await;

        step(Stage::Persisting);
        self.store.save(&current).await?;

        Ok(RunOutcome {
            change,
            summary,
            report,
            delivery,
        })
    }
}
