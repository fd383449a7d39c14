//! Connection configuration and the credential precedence chain
//!
//! Credentials come from two places: a pair embedded at build time
//! (deployment constant) and a pair the admin typed into the settings
//! console, persisted inside the cached [`SiteSettings`]. The build-time
//! pair wins whenever it looks well-formed; otherwise the stored pair is
//! used; if neither passes the plausibility check no client is built and
//! the site runs local-only.

use std::time::Duration;

use url::Url;

use crate::model::SiteSettings;

/// Keys shorter than this are assumed to be placeholders, not real API keys.
pub const MIN_KEY_LEN: usize = 20;

/// A remote connection pair: project URL plus API key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL of the hosted backend project
    pub url: String,
    /// The anonymous API key
    pub key: String,
}

impl Credentials {
    /// Create a new credential pair
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
        }
    }

    /// Read the build-time embedded pair, if one was compiled in
    pub fn from_build_env() -> Option<Self> {
        match (
            option_env!("BLOGSYNC_REMOTE_URL"),
            option_env!("BLOGSYNC_REMOTE_KEY"),
        ) {
            (Some(url), Some(key)) => Some(Self::new(url, key)),
            _ => None,
        }
    }

    /// Whether this pair is worth attempting a connection with:
    /// a parseable URL and a key of at least [`MIN_KEY_LEN`] characters.
    pub fn is_plausible(&self) -> bool {
        !self.url.is_empty() && Url::parse(&self.url).is_ok() && self.key.len() >= MIN_KEY_LEN
    }
}

/// Resolve the credential pair to use, build-time first.
///
/// Returns `None` when neither source yields a plausible pair; callers
/// must treat that as a valid local-only mode, not an error.
pub fn resolve_credentials(
    build: Option<&Credentials>,
    cached: Option<&SiteSettings>,
) -> Option<Credentials> {
    if let Some(creds) = build {
        if creds.is_plausible() {
            return Some(creds.clone());
        }
    }

    let settings = cached?;
    match (&settings.supabase_url, &settings.supabase_key) {
        (Some(url), Some(key)) => {
            let creds = Credentials::new(url.clone(), key.clone());
            creds.is_plausible().then_some(creds)
        }
        _ => None,
    }
}

/// Configuration options for the remote client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The per-request timeout; expired requests degrade to "unavailable"
    pub request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientOptions {
    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plausible(url: &str) -> Credentials {
        Credentials::new(url, "a".repeat(MIN_KEY_LEN))
    }

    #[test]
    fn short_key_is_not_plausible() {
        let creds = Credentials::new("https://example.supabase.co", "shortkey");
        assert!(!creds.is_plausible());
    }

    #[test]
    fn unparseable_url_is_not_plausible() {
        let creds = Credentials::new("not a url", "a".repeat(MIN_KEY_LEN));
        assert!(!creds.is_plausible());
    }

    #[test]
    fn build_time_pair_wins_when_plausible() {
        let build = plausible("https://build.example");
        let mut settings = SiteSettings::default();
        settings.supabase_url = Some("https://stored.example".to_string());
        settings.supabase_key = Some("b".repeat(MIN_KEY_LEN));

        let resolved = resolve_credentials(Some(&build), Some(&settings)).unwrap();
        assert_eq!(resolved.url, "https://build.example");
    }

    #[test]
    fn stored_pair_used_when_build_pair_malformed() {
        let build = Credentials::new("https://build.example", "short");
        let mut settings = SiteSettings::default();
        settings.supabase_url = Some("https://stored.example".to_string());
        settings.supabase_key = Some("b".repeat(MIN_KEY_LEN));

        let resolved = resolve_credentials(Some(&build), Some(&settings)).unwrap();
        assert_eq!(resolved.url, "https://stored.example");
    }

    #[test]
    fn no_plausible_source_yields_none() {
        let settings = SiteSettings::default();
        assert!(resolve_credentials(None, Some(&settings)).is_none());
        assert!(resolve_credentials(None, None).is_none());
    }
}
