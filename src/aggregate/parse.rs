// src/aggregate/parse.rs
//! Lenient RSS item extraction. Feed bodies in the wild are routinely
//! malformed, so this is deliberately not an XML parse: `<item>` blocks
//! and their sub-fields are located by tolerant first-match patterns,
//! case-insensitive, with extracted content trimmed.

use chrono::DateTime;
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::aggregate::types::{FeedItem, Region};
use crate::relevance::KeywordFilter;

pub const SUMMARY_MAX_CHARS: usize = 450;

fn item_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)<item\b[^>]*>(.*?)</item>").unwrap())
}

fn title_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").unwrap())
}

fn link_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)<link\b[^>]*>(.*?)</link>").unwrap())
}

fn description_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)<description\b[^>]*>(.*?)</description>").unwrap())
}

fn pub_date_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)<pubdate\b[^>]*>(.*?)</pubdate>").unwrap())
}

fn tags_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap())
}

fn ws_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// First occurrence of the tag inside `block`, trimmed; empty string
/// when the tag is missing.
fn first_tag(block: &str, re: &Regex) -> String {
    re.captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn strip_cdata(s: &str) -> &str {
    let s = s.strip_prefix("<![CDATA[").unwrap_or(s);
    s.strip_suffix("]]>").unwrap_or(s)
}

/// Replace HTML tags with spaces, then collapse runs of whitespace.
fn strip_html(s: &str) -> String {
    let no_tags = tags_re().replace_all(s, " ");
    ws_re().replace_all(no_tags.as_ref(), " ").trim().to_string()
}

fn decode_entities(s: &str) -> String {
    html_escape::decode_html_entities(s).to_string()
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Epoch milliseconds from a pubDate string. Feeds mostly use RFC 2822
/// (including obsolete zone names like "GMT"); a few emit RFC 3339.
/// Anything else is unparsable.
fn parse_pub_date_ms(raw: &str) -> Option<i64> {
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Extract relevance-filtered items from one raw feed body.
///
/// Items failing the keyword gate are discarded here; items without a
/// `<link>` are kept (with an empty link) and fall out later during
/// deduplication. `now_ms` is the timestamp fallback for items whose
/// pubDate is absent or unparsable.
pub fn parse_items(
    body: &str,
    source_url: &str,
    region: Region,
    filter: &KeywordFilter,
    now_ms: i64,
) -> Vec<FeedItem> {
    let mut items = Vec::new();

    for caps in item_re().captures_iter(body) {
        let block = caps.get(1).map(|m| m.as_str()).unwrap_or("");

        let title = first_tag(block, title_re());
        let link = first_tag(block, link_re());
        let raw_description = first_tag(block, description_re());
        let description = strip_cdata(&raw_description);
        let pub_date = first_tag(block, pub_date_re());

        if !filter.is_relevant(&format!("{title} {description}")) {
            continue;
        }

        let summary = truncate_chars(&decode_entities(&strip_html(description)), SUMMARY_MAX_CHARS);
        let ts = parse_pub_date_ms(&pub_date).unwrap_or(now_ms);

        items.push(FeedItem {
            region,
            source_url: source_url.to_string(),
            title: decode_entities(&title),
            link,
            summary,
            pub_date,
            ts,
        });
    }

    items
}
