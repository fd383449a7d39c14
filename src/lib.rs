//! blogsync
//!
//! The data core of a personal publishing site: posts, site settings and
//! page-view analytics live in a hosted cloud database, mirrored into a
//! local cache for fast first paint and offline fallback. The crate's
//! center is the [`sync::SyncEngine`], which owns the merge precedence
//! rules (remote-over-local per field for settings, wholesale replacement
//! for posts when the remote answers) and the optimistic-local /
//! confirmed-cloud write path. Rendering, routing and the rich-text
//! editor are not here; embedders consume snapshots and statuses.

pub mod admin;
pub mod config;
pub mod derive;
pub mod error;
pub mod fetch;
pub mod model;
pub mod remote;
pub mod store;
pub mod sync;

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{ClientOptions, Credentials};
    pub use crate::model::{Post, SiteSettings};
    pub use crate::store::{CacheStore, FileStore, MemoryStore};
    pub use crate::sync::{PostDraft, Snapshot, SyncEngine, WriteStatus};
}
