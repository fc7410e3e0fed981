//! Pipeline stages for a monitoring run.
//!
//! - `detect`: classify the current text against the stored snapshot
//! - `summarize`: turn a diff into a short natural-language summary
//! - `monitor`: run every stage in order and report the outcome

pub mod detect;
pub mod monitor;
pub mod summarize;

pub use detect::{ChangeDetector, ChangeResult, UnifiedDiff, detect_changes};
pub use monitor::{Monitor, MonitorSettings, RunOutcome, Stage, report_failure};
pub use summarize::{ChangeSummarizer, Summary, SummaryLimits};
