//! Content entities shared by the cache, the remote store and the engine
//!
//! Serde names are pinned to the remote schema so cached snapshots and
//! remote rows round-trip byte-compatible with the deployed backend:
//! post rows use bare lowercase fields, the settings payload is
//! camelCase, and analytics rows are snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reader comment, owned by its parent post.
///
/// Stored oldest-first; appended, never edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Creation-timestamp-derived id
    pub id: String,
    pub author: String,
    pub text: String,
    /// Creation date, `YYYY-MM-DD`
    pub date: String,
}

/// A published post as stored in the `posts` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Opaque stable id, assigned at creation
    pub id: String,
    pub title: String,
    pub excerpt: String,
    /// Rich text or markdown, opaque to the core
    pub content: String,
    pub category: String,
    pub author: String,
    /// Creation date, `YYYY-MM-DD`
    pub date: String,
    pub image: String,
    /// Derived once from the title; the human-facing lookup key
    pub slug: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Monotonic view counter; may be absent on old rows
    #[serde(default)]
    pub views: u64,
    /// Oldest-first; display reverses
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    /// The starter content shown before anything has been published.
    pub fn seed() -> Vec<Post> {
        vec![Post {
            id: "1".to_string(),
            title: "Welcome to your new site".to_string(),
            excerpt: "A quick tour of publishing, categories and comments.".to_string(),
            content: "<h1>Hello</h1><p>Head to the admin console to publish \
                      your first post. This placeholder disappears once real \
                      content is synced.</p>"
                .to_string(),
            category: "Notes".to_string(),
            author: "Editor".to_string(),
            date: "2024-05-20".to_string(),
            image: "https://picsum.photos/seed/welcome/800/450".to_string(),
            slug: "welcome-to-your-new-site".to_string(),
            tags: vec!["welcome".to_string()],
            views: 0,
            comments: Vec::new(),
        }]
    }
}

/// Fixed-shape platform-to-URL mapping; empty string means absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub youtube: String,
    #[serde(default)]
    pub instagram: String,
}

/// Ad client id plus the three named placement slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub main_page_slot: String,
    #[serde(default)]
    pub post_top_slot: String,
    #[serde(default)]
    pub post_bottom_slot: String,
}

/// The singleton site settings record (remote row `id = 1`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub brand_name: String,
    pub brand_sub_name: String,
    pub main_title: String,
    pub main_subtitle: String,
    /// Plaintext shared secret for the admin gate; see `crate::admin`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    #[serde(default)]
    pub about_content: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub ad_config: AdConfig,
    /// Remote connection URL entered through the admin console
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase_url: Option<String>,
    /// Remote connection key entered through the admin console
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase_key: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            brand_name: "The".to_string(),
            brand_sub_name: "Notebook".to_string(),
            main_title: "Notes on markets and code".to_string(),
            main_subtitle: "A personal record of crypto, software and the global economy."
                .to_string(),
            admin_password: Some("changeme".to_string()),
            about_content: "<h1>Hello.</h1><p>This site is where I keep my notes on \
                            markets, blockchain engineering and frontend development.</p>"
                .to_string(),
            categories: vec![
                "Crypto".to_string(),
                "Coding".to_string(),
                "Finance".to_string(),
                "Market".to_string(),
            ],
            social_links: SocialLinks::default(),
            ad_config: AdConfig {
                client_id: "ca-pub-XXXXXXXXXXXXXXXX".to_string(),
                main_page_slot: "1234567890".to_string(),
                post_top_slot: "2345678901".to_string(),
                post_bottom_slot: "3456789012".to_string(),
            },
            supabase_url: None,
            supabase_key: None,
        }
    }
}

impl SiteSettings {
    /// Overlay a partial payload onto this settings object, field by field.
    ///
    /// Present fields win; absent fields keep their current value. This is
    /// the one merge rule for settings, used both for cached snapshots over
    /// defaults and for remote payloads over the current state.
    pub fn merge(&mut self, partial: PartialSettings) {
        if let Some(v) = partial.brand_name {
            self.brand_name = v;
        }
        if let Some(v) = partial.brand_sub_name {
            self.brand_sub_name = v;
        }
        if let Some(v) = partial.main_title {
            self.main_title = v;
        }
        if let Some(v) = partial.main_subtitle {
            self.main_subtitle = v;
        }
        if let Some(v) = partial.admin_password {
            self.admin_password = Some(v);
        }
        if let Some(v) = partial.about_content {
            self.about_content = v;
        }
        if let Some(v) = partial.categories {
            self.categories = v;
        }
        if let Some(v) = partial.social_links {
            self.social_links = v;
        }
        if let Some(v) = partial.ad_config {
            self.ad_config = v;
        }
        if let Some(v) = partial.supabase_url {
            self.supabase_url = Some(v);
        }
        if let Some(v) = partial.supabase_key {
            self.supabase_key = Some(v);
        }
    }
}

/// A settings payload where every field is optional.
///
/// This is what the remote `settings.data` column and cached snapshots
/// deserialize into before being merged over the current state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_sub_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_config: Option<AdConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase_key: Option<String>,
}

/// One append-only page-view record in the `analytics` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub post_id: String,
    /// Traffic source; blank referrers are recorded as [`DIRECT_REFERRER`]
    pub referrer: String,
    pub timestamp: DateTime<Utc>,
}

/// Sentinel referrer for visits with no referrer information
pub const DIRECT_REFERRER: &str = "direct";

impl AnalyticsEvent {
    /// Record a visit to a post, defaulting a missing or blank referrer.
    pub fn new(post_id: impl Into<String>, referrer: Option<&str>) -> Self {
        let referrer = match referrer {
            Some(r) if !r.trim().is_empty() => r.to_string(),
            _ => DIRECT_REFERRER.to_string(),
        };
        Self {
            post_id: post_id.into(),
            referrer,
            timestamp: Utc::now(),
        }
    }
}

/// An aggregated traffic-source row for the admin analytics view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSource {
    pub source: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_is_field_level_remote_precedent() {
        let mut settings = SiteSettings::default();
        settings.brand_name = "A".to_string();
        settings.main_title = "local title".to_string();

        let partial = PartialSettings {
            main_title: Some("remote title".to_string()),
            about_content: Some("<p>remote about</p>".to_string()),
            ..Default::default()
        };
        settings.merge(partial);

        assert_eq!(settings.brand_name, "A");
        assert_eq!(settings.main_title, "remote title");
        assert_eq!(settings.about_content, "<p>remote about</p>");
    }

    #[test]
    fn settings_serialize_camel_case() {
        let settings = SiteSettings::default();
        let value = serde_json::to_value(&settings).unwrap();
        assert!(value.get("brandName").is_some());
        assert!(value.get("mainSubtitle").is_some());
        assert!(value["adConfig"].get("mainPageSlot").is_some());
        assert!(value["socialLinks"].get("twitter").is_some());
        // Unset credentials stay out of the payload entirely.
        assert!(value.get("supabaseUrl").is_none());
    }

    #[test]
    fn settings_round_trip_exactly() {
        let mut settings = SiteSettings::default();
        settings.supabase_url = Some("https://x.supabase.co".to_string());
        let raw = serde_json::to_string(&settings).unwrap();
        let back: SiteSettings = serde_json::from_str(&raw).unwrap();
        assert_eq!(settings, back);
    }

    #[test]
    fn post_tolerates_missing_counters() {
        let row = json!({
            "id": "9",
            "title": "t",
            "excerpt": "e",
            "content": "c",
            "category": "Crypto",
            "author": "a",
            "date": "2024-01-01",
            "image": "",
            "slug": "t"
        });
        let post: Post = serde_json::from_value(row).unwrap();
        assert_eq!(post.views, 0);
        assert!(post.comments.is_empty());
        assert!(post.tags.is_empty());
    }

    #[test]
    fn blank_referrer_becomes_direct() {
        assert_eq!(AnalyticsEvent::new("1", None).referrer, DIRECT_REFERRER);
        assert_eq!(AnalyticsEvent::new("1", Some("  ")).referrer, DIRECT_REFERRER);
        assert_eq!(
            AnalyticsEvent::new("1", Some("https://news.ycombinator.com")).referrer,
            "https://news.ycombinator.com"
        );
    }
}
