// src/services/fetcher.rs

//! Document download.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};

/// Retrieves the raw bytes of the monitored document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Single-attempt HTTP GET. The client's timeout bounds the whole request.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(url, format!("server returned {status}")));
        }

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.contains("pdf") {
                log::warn!("Unexpected content type '{}' for {}", content_type, url);
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::fetch(url, describe(&e)))?;

        log::info!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out ({error})")
    } else {
        error.to_string()
    }
}
