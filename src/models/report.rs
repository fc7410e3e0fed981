//! Email report built at the end of a run.

use std::fmt;

use chrono::NaiveDate;

pub const SUBJECT_NO_CHANGES: &str = "PDF Monitor: No Changes This Week";
pub const SUBJECT_CHANGES: &str = "PDF Monitor: Changes Detected";
pub const SUBJECT_ERROR: &str = "PDF Monitor: Error Occurred";

/// Subject and plain-text body of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub body: String,
}

impl Report {
    /// The document is identical to the previous snapshot.
    pub fn no_changes(url: &str, date: NaiveDate) -> Self {
        let body = format!(
            "Weekly PDF Monitoring Report - {date}\n\
             \n\
             No changes detected in the monitored PDF since last week.\n\
             \n\
             Document URL: {url}\n\
             Status: Up to date\n",
            date = date.format("%Y-%m-%d"),
        );
        Self {
            subject: SUBJECT_NO_CHANGES.to_string(),
            body,
        }
    }

    /// The document changed (or was seen for the first time).
    pub fn changes(url: &str, date: NaiveDate, summary: &str) -> Self {
        let body = format!(
            "Weekly PDF Monitoring Report - {date}\n\
             \n\
             Changes have been detected in the monitored PDF!\n\
             \n\
             SUMMARY:\n\
             {summary}\n\
             \n\
             Document URL: {url}\n\
             Status: Updated\n\
             \n\
             ---\n\
             This is an automated report from your PDF monitoring system.\n",
            date = date.format("%Y-%m-%d"),
        );
        Self {
            subject: SUBJECT_CHANGES.to_string(),
            body,
        }
    }

    /// The run failed before completing.
    pub fn error(url: &str, date: NaiveDate, error: &dyn fmt::Display) -> Self {
        let body = format!(
            "PDF Monitoring Error - {date}\n\
             \n\
             An error occurred while monitoring the PDF:\n\
             \n\
             Error: {error}\n\
             \n\
             Document URL: {url}\n\
             \n\
             Please check the scheduler logs for more details.\n",
            date = date.format("%Y-%m-%d"),
        );
        Self {
            subject: SUBJECT_ERROR.to_string(),
            body,
        }
    }
}
