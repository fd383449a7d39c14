//! Deterministic derivation rules applied to content before display
//!
//! Everything here is a pure function of its inputs so the admin console,
//! the public pages and the tests all agree on slugs, excerpts and
//! aggregates.

use std::collections::HashMap;

use crate::model::{AnalyticsEvent, Comment, Post, TrafficSource, DIRECT_REFERRER};

/// Character budget for a derived excerpt.
const EXCERPT_BUDGET: usize = 140;

/// Derive a URL-safe slug from a post title.
///
/// Keeps letters of any script, digits and hyphens; collapses whitespace
/// runs into single hyphens; lowercases the result. Applied once at
/// creation; uniqueness is not enforced (slug lookups are last-write-wins).
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Derive an excerpt from post content when the author supplied none.
///
/// Strips markup tags, collapses whitespace, then truncates to the
/// character budget with an ellipsis marker.
pub fn excerpt_from(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    let mut in_tag = false;
    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }

    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_BUDGET {
        return flat;
    }
    let truncated: String = flat.chars().take(EXCERPT_BUDGET).collect();
    format!("{}…", truncated.trim_end())
}

/// Deterministic placeholder image URL, keyed by creation timestamp.
pub fn placeholder_image(timestamp_millis: i64) -> String {
    format!("https://picsum.photos/seed/{}/800/450", timestamp_millis)
}

/// Case-insensitive exact match between a post's category and a requested name.
pub fn matches_category(post: &Post, name: &str) -> bool {
    post.category.to_lowercase() == name.to_lowercase()
}

/// Group analytics events by referrer, count-descending.
///
/// Blank referrers count toward the [`DIRECT_REFERRER`] bucket. Ties are
/// broken by source name so the output is stable.
pub fn traffic_sources(events: &[AnalyticsEvent]) -> Vec<TrafficSource> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for event in events {
        let source = if event.referrer.trim().is_empty() {
            DIRECT_REFERRER
        } else {
            event.referrer.as_str()
        };
        *counts.entry(source).or_insert(0) += 1;
    }

    let mut sources: Vec<TrafficSource> = counts
        .into_iter()
        .map(|(source, count)| TrafficSource {
            source: source.to_string(),
            count,
        })
        .collect();
    sources.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));
    sources
}

/// Comments in display order: newest first, over the oldest-first storage.
pub fn display_comments(post: &Post) -> Vec<&Comment> {
    post.comments.iter().rev().collect()
}
