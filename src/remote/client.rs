//! Table-level entry points for the PostgREST-style API

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::config::{ClientOptions, Credentials};
use crate::remote::query::{DeleteBuilder, InsertBuilder, SelectBuilder, UpsertBuilder};

/// Low-level client for the hosted backend
#[derive(Debug, Clone)]
pub struct RemoteClient {
    /// The base URL for the backend project
    url: String,

    /// The anonymous API key
    key: String,

    /// HTTP client, shared across table handles
    http: Client,

    /// Per-request timeout
    timeout: Duration,
}

impl RemoteClient {
    /// Create a new client from a resolved credential pair
    pub fn new(credentials: &Credentials, options: &ClientOptions) -> Self {
        Self {
            url: credentials.url.trim_end_matches('/').to_string(),
            key: credentials.key.clone(),
            http: Client::new(),
            timeout: options.request_timeout,
        }
    }

    /// Get a handle for operations on a specific table
    pub fn from(&self, table: &str) -> TableClient {
        TableClient {
            url: format!("{}/rest/v1/{}", self.url, table),
            key: self.key.clone(),
            http: self.http.clone(),
            timeout: self.timeout,
        }
    }
}

/// Operations scoped to one table
#[derive(Debug, Clone)]
pub struct TableClient {
    url: String,
    key: String,
    http: Client,
    timeout: Duration,
}

impl TableClient {
    /// Select specific columns from the table
    pub fn select(&self, columns: &str) -> SelectBuilder {
        SelectBuilder::new(
            self.url.clone(),
            self.key.clone(),
            columns,
            self.http.clone(),
            self.timeout,
        )
    }

    /// Insert a row into the table
    pub fn insert<T: Serialize>(&self, values: T) -> InsertBuilder<T> {
        InsertBuilder::new(
            self.url.clone(),
            self.key.clone(),
            values,
            self.http.clone(),
            self.timeout,
        )
    }

    /// Upsert a row (insert, or replace on primary-key conflict)
    pub fn upsert<T: Serialize>(&self, values: T) -> UpsertBuilder<T> {
        UpsertBuilder::new(
            self.url.clone(),
            self.key.clone(),
            values,
            self.http.clone(),
            self.timeout,
        )
    }

    /// Delete rows from the table
    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(
            self.url.clone(),
            self.key.clone(),
            self.http.clone(),
            self.timeout,
        )
    }
}
