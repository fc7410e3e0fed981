//! Application configuration structures.
//!
//! Everything here is non-secret and may live in a TOML file. Credentials
//! come from the environment, see [`super::Secrets`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Document download settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Snapshot persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Language-model summarization settings
    #[serde(default)]
    pub summary: SummaryConfig,

    /// SMTP relay settings
    #[serde(default)]
    pub email: EmailConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.storage.snapshot_path.as_os_str().is_empty() {
            return Err(AppError::validation("storage.snapshot_path is empty"));
        }
        if self.summary.model.trim().is_empty() {
            return Err(AppError::validation("summary.model is empty"));
        }
        if self.summary.max_tokens == 0 {
            return Err(AppError::validation("summary.max_tokens must be > 0"));
        }
        if self.summary.timeout_secs == 0 {
            return Err(AppError::validation("summary.timeout_secs must be > 0"));
        }
        if self.summary.prompt_char_limit == 0 || self.summary.fallback_char_limit == 0 {
            return Err(AppError::validation(
                "summary character limits must be > 0",
            ));
        }
        if self.email.smtp_host.trim().is_empty() {
            return Err(AppError::validation("email.smtp_host is empty"));
        }
        if self.email.smtp_port == 0 {
            return Err(AppError::validation("email.smtp_port must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client settings for the document download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Where the previous run's text lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: defaults::snapshot_path(),
        }
    }
}

/// Language-model request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Base URL of the Messages API
    #[serde(default = "defaults::api_base_url")]
    pub api_base_url: String,

    /// Value of the `anthropic-version` header
    #[serde(default = "defaults::api_version")]
    pub api_version: String,

    #[serde(default = "defaults::model")]
    pub model: String,

    /// Upper bound on generated tokens
    #[serde(default = "defaults::max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "defaults::summary_timeout")]
    pub timeout_secs: u64,

    /// Diff characters embedded in the prompt
    #[serde(default = "defaults::prompt_char_limit")]
    pub prompt_char_limit: usize,

    /// Diff characters included in a fallback summary
    #[serde(default = "defaults::fallback_char_limit")]
    pub fallback_char_limit: usize,

    /// Summarize the whole document when there is no previous snapshot
    #[serde(default)]
    pub summarize_first_run: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_base_url: defaults::api_base_url(),
            api_version: defaults::api_version(),
            model: defaults::model(),
            max_tokens: defaults::max_tokens(),
            timeout_secs: defaults::summary_timeout(),
            prompt_char_limit: defaults::prompt_char_limit(),
            fallback_char_limit: defaults::fallback_char_limit(),
            summarize_first_run: false,
        }
    }
}

/// SMTP relay settings. Credentials are not configured here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    /// STARTTLS submission port
    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; pdf-monitor/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Storage defaults
    pub fn snapshot_path() -> PathBuf {
        PathBuf::from("previous_content.txt")
    }

    // Summary defaults
    pub fn api_base_url() -> String {
        "https://api.anthropic.com".into()
    }
    pub fn api_version() -> String {
        "2023-06-01".into()
    }
    pub fn model() -> String {
        "claude-3-5-sonnet-20241022".into()
    }
    pub fn max_tokens() -> u32 {
        1000
    }
    pub fn summary_timeout() -> u64 {
        120
    }
    pub fn prompt_char_limit() -> usize {
        8000
    }
    pub fn fallback_char_limit() -> usize {
        2000
    }

    // Email defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
