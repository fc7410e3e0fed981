// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::{HttpConfig, SummaryConfig};

/// Create the client used for the document download.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Create the client used for language-model requests.
pub fn create_api_client(config: &SummaryConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clients_build_from_defaults() {
        assert!(create_async_client(&HttpConfig::default()).is_ok());
        assert!(create_api_client(&SummaryConfig::default()).is_ok());
    }
}
