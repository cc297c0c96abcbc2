// tests/pipeline.rs
//
// Pipeline-level tests over fixture feed bodies: regional fan-out,
// cross-feed deduplication, failure tolerance, and the full
// fetch→rank→quota→interleave pass.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use ai_news_aggregator::aggregate::fetch::FeedTransport;
use ai_news_aggregator::aggregate::types::Region;
use ai_news_aggregator::aggregate::{aggregate, fetch_region};
use ai_news_aggregator::config::AppConfig;
use ai_news_aggregator::relevance::KeywordFilter;

const LOCAL_A: &str = "fixture://local-a";
const LOCAL_B: &str = "fixture://local-b";
const GLOBAL: &str = "fixture://global";

/// In-memory transport: URLs not in the map behave like a dead feed.
struct FixtureTransport {
    bodies: HashMap<&'static str, &'static str>,
}

impl FixtureTransport {
    fn with_all_feeds() -> Self {
        let mut bodies = HashMap::new();
        bodies.insert(LOCAL_A, include_str!("fixtures/local_feed_a.xml"));
        bodies.insert(LOCAL_B, include_str!("fixtures/local_feed_b.xml"));
        bodies.insert(GLOBAL, include_str!("fixtures/global_feed.xml"));
        Self { bodies }
    }
}

#[async_trait]
impl FeedTransport for FixtureTransport {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.bodies
            .get(url)
            .map(|body| body.to_string())
            .ok_or_else(|| anyhow!("HTTP 404 Not Found from {url}"))
    }
}

fn test_filter() -> KeywordFilter {
    let kws: Vec<String> = [
        "ai", "chatgpt", "openai", "gemini", "claude", "llm", "agent", "genai",
        "trí tuệ nhân tạo",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    KeywordFilter::new(&kws)
}

fn test_config() -> AppConfig {
    let toml_str = format!(
        r#"
[feeds]
local = ["{LOCAL_A}", "{LOCAL_B}"]
global = ["{GLOBAL}"]

[relevance]
keywords = ["ai", "chatgpt", "openai", "gemini", "claude", "llm", "agent", "genai", "trí tuệ nhân tạo"]
"#
    );
    AppConfig::from_toml_str(&toml_str).expect("test config")
}

#[tokio::test]
async fn region_fetch_merges_and_dedups_across_feeds() {
    let transport = FixtureTransport::with_all_feeds();
    let urls = vec![LOCAL_A.to_string(), LOCAL_B.to_string()];

    let items = fetch_region(&transport, &urls, Region::Local, &test_filter()).await;

    let links: Vec<&str> = items.iter().map(|i| i.link.as_str()).collect();
    // Weather item fails the relevance gate; the link-less GenAI item and
    // the repeated ChatGPT link are dropped by dedup; first occurrence
    // order is preserved.
    assert_eq!(
        links,
        vec![
            "https://local.example/ai-school",
            "https://shared.example/chatgpt-update",
            "https://local.example/business-ai",
        ]
    );
    // The surviving ChatGPT item is the first-seen copy from feed A.
    assert_eq!(items[1].source_url, LOCAL_A);
    assert!(items.iter().all(|i| i.region == Region::Local));
}

#[tokio::test]
async fn failing_feed_does_not_affect_siblings() {
    let transport = FixtureTransport::with_all_feeds();
    let urls = vec![LOCAL_A.to_string(), "fixture://dead".to_string()];

    let items = fetch_region(&transport, &urls, Region::Local, &test_filter()).await;
    assert_eq!(items.len(), 2, "healthy feed still contributes");
}

#[tokio::test]
async fn all_feeds_failing_yields_empty_not_error() {
    let transport = FixtureTransport {
        bodies: HashMap::new(),
    };
    let urls = vec![LOCAL_A.to_string(), LOCAL_B.to_string()];

    let items = fetch_region(&transport, &urls, Region::Local, &test_filter()).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn aggregate_balances_and_interleaves_regions() {
    let transport = FixtureTransport::with_all_feeds();
    let config = test_config();
    let filter = test_filter();

    let mixed = aggregate(&transport, &config, &filter, 4).await;

    let links: Vec<&str> = mixed.iter().map(|i| i.link.as_str()).collect();
    // Quotas 2/2; each region contributes its two most recent items,
    // alternating local-first.
    assert_eq!(
        links,
        vec![
            "https://local.example/ai-school",
            "https://global.example/openai-model",
            "https://shared.example/chatgpt-update",
            "https://global.example/gemini-agents",
        ]
    );
}

#[tokio::test]
async fn aggregate_underfills_when_both_regions_run_short() {
    let transport = FixtureTransport::with_all_feeds();
    let config = test_config();
    let filter = test_filter();

    // Quotas 4/4 against 3 local and 3 global eligible items: neither
    // list reaches past its quota boundary, so the result stays short.
    let mixed = aggregate(&transport, &config, &filter, 8).await;

    assert_eq!(mixed.len(), 6);
    let links: Vec<&str> = mixed.iter().map(|i| i.link.as_str()).collect();
    assert_eq!(
        links,
        vec![
            "https://local.example/ai-school",
            "https://global.example/openai-model",
            "https://shared.example/chatgpt-update",
            "https://global.example/gemini-agents",
            "https://local.example/business-ai",
            "https://global.example/claude-tricks",
        ]
    );
}

#[tokio::test]
async fn aggregate_output_invariants_hold() {
    let transport = FixtureTransport::with_all_feeds();
    let config = test_config();
    let filter = test_filter();

    for total in [1, 2, 5, 60] {
        let mixed = aggregate(&transport, &config, &filter, total).await;
        assert!(mixed.len() <= total, "never exceeds the requested total");

        let mut seen = std::collections::HashSet::new();
        for item in &mixed {
            assert!(!item.link.is_empty(), "no empty links in output");
            assert!(seen.insert(item.link.clone()), "no repeated links");
            assert!(item.summary.chars().count() <= 450);
        }
    }
}
