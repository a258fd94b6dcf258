//! Hosted backend over HTTP.
//!
//! Tables are reached through a PostgREST-style API under `/rest/v1`,
//! objects through `/storage/v1/object`. Every request carries the project
//! API key both as `apikey` and as a bearer token.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;

use crate::error::{FimsError, Result};

use super::filter::query_value;
use super::{Backend, Filter, Row};

/// Backend talking to a hosted table + storage service.
pub struct RestBackend {
    base_url: String,
    api_key: String,
    client: Client,
}

impl RestBackend {
    /// Create a backend for the service at `base_url`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("fims/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FimsError::backend("client setup", e))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// The service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str, filter: &Filter) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/rest/v1/{}", self.base_url, table))
            .map_err(|e| FimsError::backend("url", e))?;
        {
            let mut query = url.query_pairs_mut();
            for (column, value) in filter.conditions() {
                query.append_pair(column, &format!("eq.{}", query_value(value)));
            }
        }
        if filter.is_empty() {
            url.set_query(None);
        }
        Ok(url)
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authorized(request)
            .send()
            .map_err(|e| FimsError::backend(operation, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(FimsError::backend(
                operation,
                format!("HTTP {}: {}", status, body.trim()),
            ));
        }
        Ok(response)
    }

    fn rows(&self, operation: &str, request: RequestBuilder) -> Result<Vec<Row>> {
        self.send(operation, request)?
            .json::<Vec<Row>>()
            .map_err(|e| FimsError::backend(operation, e))
    }

    fn single(&self, operation: &str, request: RequestBuilder) -> Result<Row> {
        self.rows(operation, request)?
            .into_iter()
            .next()
            .ok_or_else(|| FimsError::backend(operation, "no row returned"))
    }
}

impl Backend for RestBackend {
    fn insert(&mut self, table: &str, row: Row) -> Result<Row> {
        let url = self.table_url(table, &Filter::new())?;
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(&vec![row]);
        let stored = self.single("insert", request)?;
        tracing::debug!("Inserted row into {}", table);
        Ok(stored)
    }

    fn update(&mut self, table: &str, id: &str, patch: Row) -> Result<Row> {
        let url = self.table_url(table, &Filter::new().eq("id", id))?;
        let request = self
            .client
            .patch(url)
            .header("Prefer", "return=representation")
            .json(&patch);
        let stored = self.single("update", request)?;
        tracing::debug!("Updated row {} in {}", id, table);
        Ok(stored)
    }

    fn upsert(&mut self, table: &str, row: Row, on_conflict: &str) -> Result<Row> {
        let mut url = self.table_url(table, &Filter::new())?;
        url.query_pairs_mut().append_pair("on_conflict", on_conflict);
        let request = self
            .client
            .post(url)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&vec![row]);
        let stored = self.single("upsert", request)?;
        tracing::debug!("Upserted row into {} on {}", table, on_conflict);
        Ok(stored)
    }

    fn delete(&mut self, table: &str, filter: &Filter) -> Result<usize> {
        let url = self.table_url(table, filter)?;
        let request = self
            .client
            .delete(url)
            .header("Prefer", "return=representation");
        let removed = self.rows("delete", request)?.len();
        tracing::debug!("Deleted {} row(s) from {}", removed, table);
        Ok(removed)
    }

    fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>> {
        let mut url = self.table_url(table, filter)?;
        url.query_pairs_mut().append_pair("select", "*");
        self.rows("select", self.client.get(url))
    }

    fn upload(
        &mut self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()> {
        let request = self
            .client
            .post(self.object_url(bucket, path))
            .header("Content-Type", content_type)
            .body(bytes.to_vec());
        self.send("upload", request)?;
        tracing::debug!("Uploaded {}/{} ({} bytes)", bucket, path, bytes.len());
        Ok(())
    }

    fn remove_object(&mut self, bucket: &str, path: &str) -> Result<()> {
        let request = self.client.delete(self.object_url(bucket, path));
        self.send("remove object", request)?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, path
        )
    }
}
