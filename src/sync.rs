//! Synchronization / merge engine
//!
//! The one place that knows the precedence rules between the three data
//! sources: cloud database, local cache, in-memory state. Every page and
//! admin action goes through here instead of re-implementing the merge.
//!
//! Read path: publish the local snapshot immediately (fast, possibly
//! stale), then [`SyncEngine::refresh`] reconciles against the cloud and
//! writes the result back through the cache. Settings merge field by
//! field with remote precedence; posts are replaced wholesale when the
//! remote answers with a non-empty set.
//!
//! Write path: optimistic. The local cache is updated first so the admin
//! UI reflects the change immediately; the remote write's outcome only
//! decides the [`WriteStatus`] shown to the user. A cloud failure is not
//! rolled back; the next successful refresh reconciles. This is eventual
//! consistency, not transactional consistency.

use chrono::{Local, Utc};
use tracing::{debug, info};

use crate::config::{resolve_credentials, ClientOptions, Credentials};
use crate::derive::{excerpt_from, placeholder_image, slugify, traffic_sources};
use crate::model::{AnalyticsEvent, Comment, PartialSettings, Post, SiteSettings, TrafficSource};
use crate::remote::{Fetched, RemoteClient, RemoteStore};
use crate::store::{read_json, write_json, CacheStore, POSTS_KEY, SETTINGS_KEY};

/// A consistent (settings, posts) view for a page
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub settings: SiteSettings,
    pub posts: Vec<Post>,
}

/// Outcome of a write, surfaced to the user as a transient status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Confirmed by the cloud and mirrored locally
    Cloud,
    /// Applied to the local cache only; the cloud was unreachable or absent
    LocalOnly,
    /// Rejected before any write (empty title or content)
    Invalid,
}

/// Form/editor state for creating or editing a post
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    /// Present when editing an existing post
    pub id: Option<String>,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub author: String,
    pub image: String,
    pub tags: Vec<String>,
}

/// The shared engine consumed by all page-level view models
pub struct SyncEngine<S: CacheStore> {
    store: S,
    remote: Option<RemoteStore>,
    build_credentials: Option<Credentials>,
    options: ClientOptions,
}

impl<S: CacheStore> SyncEngine<S> {
    /// Build an engine, running the credential precedence chain once:
    /// build-time pair first, then the pair stored in cached settings.
    pub fn new(store: S, build_credentials: Option<Credentials>, options: ClientOptions) -> Self {
        let cached: Option<SiteSettings> = {
            let mut settings = SiteSettings::default();
            match read_json::<PartialSettings>(&store, SETTINGS_KEY) {
                Some(partial) => {
                    settings.merge(partial);
                    Some(settings)
                }
                None => None,
            }
        };

        let remote = resolve_credentials(build_credentials.as_ref(), cached.as_ref())
            .map(|creds| RemoteStore::new(RemoteClient::new(&creds, &options)));

        if remote.is_some() {
            info!("cloud client configured");
        } else {
            info!("no cloud credentials, running local-only");
        }

        Self {
            store,
            remote,
            build_credentials,
            options,
        }
    }

    /// Whether a cloud client was constructed (the UI connectivity indicator)
    pub fn is_connected(&self) -> bool {
        self.remote.is_some()
    }

    /// Re-run the credential chain, picking up credentials the admin just
    /// saved into settings.
    pub fn reconnect(&mut self) {
        let cached = Some(self.local_snapshot().settings);
        self.remote = resolve_credentials(self.build_credentials.as_ref(), cached.as_ref())
            .map(|creds| RemoteStore::new(RemoteClient::new(&creds, &self.options)));
    }

    /// The synchronous local view: defaults overlaid with the cached
    /// settings snapshot, and the cached posts (or seed content).
    ///
    /// Published before any network round-trip so the first paint never
    /// waits on the cloud.
    pub fn local_snapshot(&self) -> Snapshot {
        let mut settings = SiteSettings::default();
        if let Some(partial) = read_json::<PartialSettings>(&self.store, SETTINGS_KEY) {
            settings.merge(partial);
        }

        let posts = read_json::<Vec<Post>>(&self.store, POSTS_KEY).unwrap_or_else(Post::seed);

        Snapshot { settings, posts }
    }

    /// Reconcile against the cloud and return the merged view.
    ///
    /// Settings: remote fields win, absent fields keep local values.
    /// Posts: a non-empty remote set replaces the local set wholesale; an
    /// empty or unavailable remote leaves local state untouched. The
    /// reconciled result is written through to the cache either way a
    /// remote answer arrived.
    pub async fn refresh(&self) -> Snapshot {
        let mut snapshot = self.local_snapshot();

        let Some(remote) = &self.remote else {
            return snapshot;
        };

        if let Fetched::Data(partial) = remote.fetch_settings().await {
            snapshot.settings.merge(partial);
            write_json(&self.store, SETTINGS_KEY, &snapshot.settings);
        }

        if let Fetched::Data(posts) = remote.fetch_posts().await {
            snapshot.posts = posts;
            write_json(&self.store, POSTS_KEY, &snapshot.posts);
        }

        snapshot
    }

    /// Create or update a post from editor state.
    ///
    /// New posts get an id from the creation timestamp, today's date, a
    /// slug derived from the title, an excerpt derived from the content
    /// when none was supplied, and a placeholder image when none was
    /// supplied. Edits keep the submitted id along with views and
    /// comments, and recompute slug and date from the submitted title.
    pub async fn publish_post(&self, draft: PostDraft) -> (WriteStatus, Option<Post>) {
        if draft.title.trim().is_empty() || draft.content.trim().is_empty() {
            return (WriteStatus::Invalid, None);
        }

        let snapshot = self.local_snapshot();
        let mut posts = snapshot.posts;

        let slug = slugify(&draft.title);
        let date = Utc::now().format("%Y-%m-%d").to_string();
        let now_millis = Utc::now().timestamp_millis();

        let existing = draft
            .id
            .as_deref()
            .and_then(|id| posts.iter().position(|p| p.id == id));

        let post = match existing {
            Some(index) => {
                let previous = &posts[index];
                Post {
                    id: previous.id.clone(),
                    title: draft.title,
                    excerpt: draft.excerpt,
                    content: draft.content,
                    category: draft.category,
                    author: draft.author,
                    date,
                    image: draft.image,
                    slug,
                    tags: draft.tags,
                    views: previous.views,
                    comments: previous.comments.clone(),
                }
            }
            // A submitted id is kept even when the cached slot is gone
            // (best-effort cache writes can drop it); minting a fresh id
            // here would leave the old row orphaned in the cloud.
            None => Post {
                id: draft.id.unwrap_or_else(|| now_millis.to_string()),
                excerpt: if draft.excerpt.trim().is_empty() {
                    excerpt_from(&draft.content)
                } else {
                    draft.excerpt
                },
                category: if draft.category.is_empty() {
                    snapshot.settings.categories.first().cloned().unwrap_or_default()
                } else {
                    draft.category
                },
                author: if draft.author.is_empty() {
                    snapshot.settings.brand_name.clone()
                } else {
                    draft.author
                },
                image: if draft.image.is_empty() {
                    placeholder_image(now_millis)
                } else {
                    draft.image
                },
                title: draft.title,
                content: draft.content,
                date,
                slug,
                tags: draft.tags,
                views: 0,
                comments: Vec::new(),
            },
        };

        // Optimistic splice: edited in place, new posts prepended so the
        // unsorted cache approximates date-descending order.
        match existing {
            Some(index) => posts[index] = post.clone(),
            None => posts.insert(0, post.clone()),
        }
        write_json(&self.store, POSTS_KEY, &posts);

        let status = match &self.remote {
            Some(remote) => {
                if remote.upsert_post(&post).await {
                    WriteStatus::Cloud
                } else {
                    WriteStatus::LocalOnly
                }
            }
            None => WriteStatus::LocalOnly,
        };
        (status, Some(post))
    }

    /// Persist settings: cache write-through first, then the cloud.
    pub async fn save_settings(&self, settings: &SiteSettings) -> WriteStatus {
        write_json(&self.store, SETTINGS_KEY, settings);

        match &self.remote {
            Some(remote) => {
                if remote.upsert_settings(settings).await {
                    WriteStatus::Cloud
                } else {
                    WriteStatus::LocalOnly
                }
            }
            None => WriteStatus::LocalOnly,
        }
    }

    /// Delete a post. The local prune always happens; a missing or failing
    /// cloud connection degrades to `LocalOnly`, never to a failure.
    pub async fn delete_post(&self, id: &str) -> WriteStatus {
        let status = match &self.remote {
            Some(remote) => {
                if remote.delete_post(id).await {
                    WriteStatus::Cloud
                } else {
                    WriteStatus::LocalOnly
                }
            }
            None => WriteStatus::LocalOnly,
        };

        let mut posts = self.local_snapshot().posts;
        posts.retain(|p| p.id != id);
        write_json(&self.store, POSTS_KEY, &posts);

        status
    }

    /// Append a reader comment to a post, resolved by slug.
    ///
    /// Validation failures and unknown slugs return `None`; otherwise the
    /// updated post is returned and both stores updated (cloud best-effort).
    pub async fn add_comment(&self, slug: &str, author: &str, text: &str) -> Option<Post> {
        if author.trim().is_empty() || text.trim().is_empty() {
            return None;
        }

        let mut post = self.resolve_post(slug).await?;
        post.comments.push(Comment {
            id: Utc::now().timestamp_millis().to_string(),
            author: author.to_string(),
            text: text.to_string(),
            date: Utc::now().format("%Y-%m-%d").to_string(),
        });

        if let Some(remote) = &self.remote {
            remote.upsert_post(&post).await;
        }
        self.splice_cached(&post);

        Some(post)
    }

    /// Resolve a post for a public page view.
    ///
    /// On a cloud hit, two side effects fire: the view counter is bumped
    /// (read-then-write; lossy under concurrent readers, accepted) and an
    /// analytics event is appended in the background. Neither can fail the
    /// render; the returned post is the one that resolved.
    pub async fn view_post(&self, slug: &str, referrer: Option<&str>) -> Option<Post> {
        let Some(remote) = &self.remote else {
            return self.local_post(slug);
        };

        match remote.fetch_post_by_slug(slug).await {
            Fetched::Data(post) => {
                let mut bumped = post.clone();
                bumped.views += 1;
                remote.upsert_post(&bumped).await;
                self.splice_cached(&bumped);

                let event = AnalyticsEvent::new(&post.id, referrer);
                let remote = remote.clone();
                tokio::spawn(async move {
                    remote.append_event(&event).await;
                });

                // The rendered count is the one the cloud answered with;
                // the bump lands on the next reader.
                Some(post)
            }
            outcome => {
                debug!(slug, ?outcome, "cloud miss, trying local cache");
                self.local_post(slug)
            }
        }
    }

    /// Traffic-source breakdown for one post, count-descending.
    pub async fn post_traffic(&self, post_id: &str) -> Vec<TrafficSource> {
        let Some(remote) = &self.remote else {
            return Vec::new();
        };
        match remote.fetch_events(post_id).await {
            Fetched::Data(events) => traffic_sources(&events),
            _ => Vec::new(),
        }
    }

    /// Count of recorded visits since local midnight; 0 when unavailable.
    pub async fn visits_since_midnight(&self) -> u64 {
        let Some(remote) = &self.remote else {
            return 0;
        };
        let midnight = Local::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|dt| dt.and_local_timezone(Local).single());
        match midnight {
            Some(midnight) => remote.count_events_since(midnight.with_timezone(&Utc)).await,
            None => 0,
        }
    }

    /// Cloud first (the authority once it answers), local cache otherwise.
    async fn resolve_post(&self, slug: &str) -> Option<Post> {
        if let Some(remote) = &self.remote {
            if let Fetched::Data(post) = remote.fetch_post_by_slug(slug).await {
                return Some(post);
            }
        }
        self.local_post(slug)
    }

    fn local_post(&self, slug: &str) -> Option<Post> {
        self.local_snapshot().posts.into_iter().find(|p| p.slug == slug)
    }

    /// Replace a post by id in the cached collection, if it is present.
    fn splice_cached(&self, post: &Post) {
        let mut posts = self.local_snapshot().posts;
        if let Some(slot) = posts.iter_mut().find(|p| p.id == post.id) {
            *slot = post.clone();
            write_json(&self.store, POSTS_KEY, &posts);
        }
    }
}
