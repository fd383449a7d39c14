//! Remote data client: CRUD and query primitives over the hosted backend
//!
//! The wire protocol is plain PostgREST-style HTTP CRUD. `client` holds the
//! low-level table/query surface; `store` narrows it to the three logical
//! collections (`posts`, `settings`, `analytics`) and converts every error
//! into a tri-state [`Fetched`] outcome at the boundary.

mod client;
mod query;
mod store;

pub use client::{RemoteClient, TableClient};
pub use query::{DeleteBuilder, InsertBuilder, SelectBuilder, UpsertBuilder};
pub use store::{Fetched, RemoteStore};
