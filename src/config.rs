// src/config.rs
//! Service configuration: regional feed lists, relevance keywords, and
//! HTTP client settings, loaded from TOML so sources can change without
//! touching pipeline code.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::aggregate::types::Region;

pub const DEFAULT_CONFIG_PATH: &str = "config/feeds.toml";
pub const ENV_CONFIG_PATH: &str = "NEWS_CONFIG_PATH";

fn default_user_agent() -> String {
    // Generic browser UA; several feed hosts refuse obvious bot agents.
    "Mozilla/5.0".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSection {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedsSection {
    pub local: Vec<String>,
    pub global: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceSection {
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpSection,
    pub feeds: FeedsSection,
    pub relevance: RelevanceSection,
}

impl AppConfig {
    /// Load from a TOML file. Uses NEWS_CONFIG_PATH or defaults to
    /// "config/feeds.toml".
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading feeds config at {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Load from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(toml_str).context("parsing feeds config")?;
        ensure!(
            !cfg.relevance.keywords.is_empty(),
            "feeds config must declare at least one relevance keyword"
        );
        Ok(cfg)
    }

    pub fn feeds_for(&self, region: Region) -> &[String] {
        match region {
            Region::Local => &self.feeds.local,
            Region::Global => &self.feeds.global,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOML: &str = r#"
[feeds]
local = ["https://example.vn/rss/ai.rss"]
global = ["https://example.org/blog/rss.xml", "https://example.com/feed"]

[relevance]
keywords = ["ai", "chatgpt"]
"#;

    #[test]
    fn parses_minimal_config_with_http_defaults() {
        let cfg = AppConfig::from_toml_str(TEST_TOML).expect("load test config");
        assert_eq!(cfg.feeds_for(Region::Local).len(), 1);
        assert_eq!(cfg.feeds_for(Region::Global).len(), 2);
        assert_eq!(cfg.http.user_agent, "Mozilla/5.0");
        assert_eq!(cfg.http.timeout_secs, 20);
    }

    #[test]
    fn http_section_is_overridable() {
        let toml_str = r#"
[http]
user_agent = "NewsBot/1.0"
timeout_secs = 5

[feeds]
local = []
global = ["https://example.com/feed"]

[relevance]
keywords = ["ai"]
"#;
        let cfg = AppConfig::from_toml_str(toml_str).expect("load");
        assert_eq!(cfg.http.user_agent, "NewsBot/1.0");
        assert_eq!(cfg.http.timeout_secs, 5);
        assert!(cfg.feeds_for(Region::Local).is_empty());
    }

    #[test]
    fn empty_keyword_list_is_rejected() {
        let toml_str = r#"
[feeds]
local = []
global = []

[relevance]
keywords = []
"#;
        assert!(AppConfig::from_toml_str(toml_str).is_err());
    }
}
