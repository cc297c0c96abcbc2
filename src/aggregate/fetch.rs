// src/aggregate/fetch.rs
//! Feed transport seam. The pipeline talks to feeds through
//! [`FeedTransport`] so tests can substitute fixture bodies for live
//! HTTP.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::HttpSection;

#[async_trait]
pub trait FeedTransport: Send + Sync {
    /// GET the feed URL and return its body as text. A non-success
    /// status is an error; callers treat any error as "feed contributes
    /// nothing".
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Production transport backed by a shared reqwest client.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(http: &HttpSection) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&http.user_agent)
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()
            .context("building feed HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedTransport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {status} from {url}");
        }

        response
            .text()
            .await
            .with_context(|| format!("reading body from {url}"))
    }
}
