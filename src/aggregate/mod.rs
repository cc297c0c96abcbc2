// src/aggregate/mod.rs
//! The aggregation pipeline: concurrent multi-feed fetch, lenient
//! parsing, relevance filtering, link deduplication, recency ranking,
//! quota allocation, and regional interleaving.

pub mod fetch;
pub mod mix;
pub mod parse;
pub mod types;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::aggregate::fetch::FeedTransport;
use crate::aggregate::types::{FeedItem, Region};
use crate::config::AppConfig;
use crate::relevance::KeywordFilter;

/// One-time metrics registration (so series show up once a recorder is
/// installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "aggregate_items_parsed_total",
            "Items parsed from feed bodies, after the relevance gate."
        );
        describe_counter!(
            "aggregate_items_kept_total",
            "Items surviving link deduplication."
        );
        describe_counter!(
            "aggregate_dedup_dropped_total",
            "Items dropped for a repeated or empty link."
        );
        describe_counter!(
            "aggregate_feed_errors_total",
            "Feed fetches that failed (transport error or HTTP status)."
        );
    });
}

/// First-occurrence-wins uniqueness by link. An empty link never
/// survives; relative order of first occurrences is preserved.
pub fn dedup_by_link(items: Vec<FeedItem>) -> Vec<FeedItem> {
    let mut seen: HashSet<String> = HashSet::new();
    items
        .into_iter()
        .filter(|it| !it.link.is_empty() && seen.insert(it.link.clone()))
        .collect()
}

/// Stable sort by timestamp, most recent first. Ties keep their
/// original relative order.
pub fn rank_by_recency(items: &mut [FeedItem]) {
    items.sort_by(|a, b| b.ts.cmp(&a.ts));
}

/// Fetch every feed of one region concurrently, parse each body, and
/// merge the results deduplicated by link.
///
/// Best-effort fan-out: each feed settles independently, a failed or
/// slow feed never short-circuits its siblings, and failures degrade to
/// zero items for that feed.
pub async fn fetch_region(
    transport: &dyn FeedTransport,
    urls: &[String],
    region: Region,
    filter: &KeywordFilter,
) -> Vec<FeedItem> {
    let fetches = urls.iter().map(|url| async move {
        match transport.fetch(url).await {
            Ok(body) => {
                let now_ms = chrono::Utc::now().timestamp_millis();
                parse::parse_items(&body, url, region, filter, now_ms)
            }
            Err(e) => {
                warn!(target: "aggregate", error = ?e, url = %url, region = region.as_str(), "feed fetch failed");
                counter!("aggregate_feed_errors_total").increment(1);
                Vec::new()
            }
        }
    });

    let merged: Vec<FeedItem> = futures::future::join_all(fetches)
        .await
        .into_iter()
        .flatten()
        .collect();

    let parsed = merged.len();
    counter!("aggregate_items_parsed_total").increment(parsed as u64);

    let kept = dedup_by_link(merged);
    counter!("aggregate_dedup_dropped_total").increment((parsed - kept.len()) as u64);
    counter!("aggregate_items_kept_total").increment(kept.len() as u64);

    kept
}

/// Run one full aggregation: both regional pipelines concurrently, then
/// rank, allocate quotas, and interleave into at most `total` items.
///
/// Stateless across calls; the caller is expected to have clamped
/// `total` to a sane range.
pub async fn aggregate(
    transport: &dyn FeedTransport,
    config: &AppConfig,
    filter: &KeywordFilter,
    total: usize,
) -> Vec<FeedItem> {
    ensure_metrics_described();

    let (mut local, mut global) = tokio::join!(
        fetch_region(transport, config.feeds_for(Region::Local), Region::Local, filter),
        fetch_region(transport, config.feeds_for(Region::Global), Region::Global, filter),
    );

    rank_by_recency(&mut local);
    rank_by_recency(&mut global);

    let (local_pick, global_pick) = mix::allocate_quotas(&local, &global, total);
    let mixed = mix::interleave(local_pick, global_pick, total);

    info!(
        target: "aggregate",
        requested = total,
        local = local.len(),
        global = global.len(),
        returned = mixed.len(),
        "aggregation complete"
    );

    mixed
}
