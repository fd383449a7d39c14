//! Query builders for the remote table client

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Error;
use crate::fetch::Fetch;

const CLIENT_INFO: &str = "blogsync/0.1.0";

/// Accumulates query-string parameters
#[derive(Debug, Clone, Default)]
struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    fn add(&mut self, key: &str, value: &str) {
        self.params.insert(key.to_string(), value.to_string());
    }

    fn into_map(self) -> HashMap<String, String> {
        self.params
    }
}

/// Builder for SELECT queries
pub struct SelectBuilder {
    url: String,
    key: String,
    client: Client,
    timeout: Duration,
    query: QueryParams,
}

impl SelectBuilder {
    pub(crate) fn new(
        url: String,
        key: String,
        columns: &str,
        client: Client,
        timeout: Duration,
    ) -> Self {
        let mut query = QueryParams::default();
        query.add("select", columns);

        Self {
            url,
            key,
            client,
            timeout,
            query,
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<T: ToString>(mut self, column: &str, value: T) -> Self {
        self.query.add(column, &format!("eq.{}", value.to_string()));
        self
    }

    /// Filter rows where column is greater than or equal to a value
    pub fn gte<T: ToString>(mut self, column: &str, value: T) -> Self {
        self.query.add(column, &format!("gte.{}", value.to_string()));
        self
    }

    /// Order the results by a column
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.query.add("order", &format!("{}.{}", column, direction));
        self
    }

    /// Limit the number of rows returned
    pub fn limit(mut self, count: i32) -> Self {
        self.query.add("limit", &count.to_string());
        self
    }

    /// Execute the query and return the matching rows
    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>, Error> {
        let fetch = Fetch::get(&self.client, &self.url)
            .header("apikey", &self.key)
            .header("Authorization", &format!("Bearer {}", self.key))
            .header("X-Client-Info", CLIENT_INFO)
            .timeout(self.timeout)
            .query(self.query.into_map());

        let result = fetch.execute::<Vec<T>>().await?;
        Ok(result)
    }

    /// Execute the query and return the first matching row
    pub async fn execute_one<T: DeserializeOwned>(self) -> Result<Option<T>, Error> {
        let results = self.limit(1).execute::<T>().await?;
        Ok(results.into_iter().next())
    }
}

/// Builder for INSERT queries
pub struct InsertBuilder<T: Serialize> {
    url: String,
    key: String,
    values: T,
    client: Client,
    timeout: Duration,
}

impl<T: Serialize> InsertBuilder<T> {
    pub(crate) fn new(
        url: String,
        key: String,
        values: T,
        client: Client,
        timeout: Duration,
    ) -> Self {
        Self {
            url,
            key,
            values,
            client,
            timeout,
        }
    }

    /// Execute the insert without returning the inserted row
    pub async fn execute_no_return(self) -> Result<(), Error> {
        let fetch = Fetch::post(&self.client, &self.url)
            .header("apikey", &self.key)
            .header("Authorization", &format!("Bearer {}", self.key))
            .header("X-Client-Info", CLIENT_INFO)
            .header("Prefer", "return=minimal")
            .timeout(self.timeout)
            .json(&self.values)?;

        fetch.execute_no_content().await
    }
}

/// Builder for UPSERT queries
pub struct UpsertBuilder<T: Serialize> {
    url: String,
    key: String,
    values: T,
    client: Client,
    timeout: Duration,
}

impl<T: Serialize> UpsertBuilder<T> {
    pub(crate) fn new(
        url: String,
        key: String,
        values: T,
        client: Client,
        timeout: Duration,
    ) -> Self {
        Self {
            url,
            key,
            values,
            client,
            timeout,
        }
    }

    /// Execute the upsert without returning the row
    pub async fn execute_no_return(self) -> Result<(), Error> {
        let fetch = Fetch::post(&self.client, &self.url)
            .header("apikey", &self.key)
            .header("Authorization", &format!("Bearer {}", self.key))
            .header("X-Client-Info", CLIENT_INFO)
            .header("Prefer", "return=minimal,resolution=merge-duplicates")
            .timeout(self.timeout)
            .json(&self.values)?;

        fetch.execute_no_content().await
    }
}

/// Builder for DELETE queries
pub struct DeleteBuilder {
    url: String,
    key: String,
    client: Client,
    timeout: Duration,
    query: QueryParams,
}

impl DeleteBuilder {
    pub(crate) fn new(url: String, key: String, client: Client, timeout: Duration) -> Self {
        Self {
            url,
            key,
            client,
            timeout,
            query: QueryParams::default(),
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<V: ToString>(mut self, column: &str, value: V) -> Self {
        self.query.add(column, &format!("eq.{}", value.to_string()));
        self
    }

    /// Execute the delete without returning the removed rows
    pub async fn execute_no_return(self) -> Result<(), Error> {
        let fetch = Fetch::delete(&self.client, &self.url)
            .header("apikey", &self.key)
            .header("Authorization", &format!("Bearer {}", self.key))
            .header("X-Client-Info", CLIENT_INFO)
            .header("Prefer", "return=minimal")
            .timeout(self.timeout)
            .query(self.query.into_map());

        fetch.execute_no_content().await
    }
}
