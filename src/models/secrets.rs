//! Credentials and the monitored URL, read from the environment.

use std::fmt;

use url::Url;

use crate::error::{AppError, Result};

pub const PDF_URL: &str = "PDF_URL";
pub const CLAUDE_API_KEY: &str = "CLAUDE_API_KEY";
pub const SENDER_EMAIL: &str = "SENDER_EMAIL";
pub const SENDER_PASSWORD: &str = "SENDER_PASSWORD";
pub const RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";

/// Values that must never be written to a config file or a log line.
#[derive(Clone)]
pub struct Secrets {
    /// Document to monitor
    pub pdf_url: String,
    pub api_key: String,
    pub sender_email: String,
    pub sender_password: String,
    pub recipient_email: String,
}

impl Secrets {
    /// Read every required variable from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ => Err(AppError::config(format!(
                    "{key} environment variable not set"
                ))),
            }
        };

        let secrets = Self {
            pdf_url: require(PDF_URL)?,
            api_key: require(CLAUDE_API_KEY)?,
            sender_email: require(SENDER_EMAIL)?,
            sender_password: require(SENDER_PASSWORD)?,
            recipient_email: require(RECIPIENT_EMAIL)?,
        };
        secrets.validate()?;
        Ok(secrets)
    }

    /// The document URL must be absolute http(s).
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.pdf_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "{PDF_URL} must use http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("pdf_url", &self.pdf_url)
            .field("api_key", &"<redacted>")
            .field("sender_email", &self.sender_email)
            .field("sender_password", &"<redacted>")
            .field("recipient_email", &self.recipient_email)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env(&[
            (PDF_URL, "https://example.com/report.pdf"),
            (CLAUDE_API_KEY, "sk-test"),
            (SENDER_EMAIL, "bot@example.com"),
            (SENDER_PASSWORD, "hunter2"),
            (RECIPIENT_EMAIL, "me@example.com"),
        ])
    }

    #[test]
    fn reads_all_variables() {
        let vars = full_env();
        let secrets = Secrets::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(secrets.pdf_url, "https://example.com/report.pdf");
        assert_eq!(secrets.recipient_email, "me@example.com");
    }

    #[test]
    fn missing_variable_is_config_error() {
        let mut vars = full_env();
        vars.remove(SENDER_PASSWORD);
        let err = Secrets::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains(SENDER_PASSWORD)));
    }

    #[test]
    fn blank_variable_counts_as_missing() {
        let mut vars = full_env();
        vars.insert(CLAUDE_API_KEY.to_string(), "   ".to_string());
        assert!(Secrets::from_lookup(|k| vars.get(k).cloned()).is_err());
    }

    #[test]
    fn rejects_non_http_url() {
        let mut vars = full_env();
        vars.insert(PDF_URL.to_string(), "ftp://example.com/a.pdf".to_string());
        assert!(Secrets::from_lookup(|k| vars.get(k).cloned()).is_err());
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let vars = full_env();
        let secrets = Secrets::from_lookup(|k| vars.get(k).cloned()).unwrap();
        let printed = format!("{secrets:?}");
        assert!(!printed.contains("sk-test"));
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("bot@example.com"));
    }
}
