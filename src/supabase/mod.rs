pub mod auth;

use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Thin PostgREST client. Every table operation is an immediate round trip;
/// there is no cache, queue or retry layer in front of it.
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    // Set by the session controller on every auth change. Requests fall back
    // to the anon key while no user is signed in.
    access_token: RwLock<Option<String>>,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            anon_key: anon_key.into(),
            access_token: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().expect("session token lock poisoned") = token;
    }

    fn bearer(&self) -> String {
        self.access_token
            .read()
            .expect("session token lock poisoned")
            .clone()
            .unwrap_or_else(|| self.anon_key.clone())
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let resp = self
            .http
            .get(self.rest_url(table))
            .query(query)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .send()
            .await?;
        Self::expect_rows(resp).await
    }

    pub async fn insert<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &str,
        rows: &B,
    ) -> Result<Vec<T>> {
        let resp = self
            .http
            .post(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        Self::expect_rows(resp).await
    }

    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &str,
        filter: &[(&str, &str)],
        patch: &B,
    ) -> Result<Vec<T>> {
        let resp = self
            .http
            .patch(self.rest_url(table))
            .query(filter)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        Self::expect_rows(resp).await
    }

    /// Deleting rows that no longer exist is a successful no-op at the service.
    pub async fn delete(&self, table: &str, filter: &[(&str, &str)]) -> Result<()> {
        let resp = self
            .http
            .delete(self.rest_url(table))
            .query(filter)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .send()
            .await?;
        Self::expect_ok(resp).await
    }

    /// Create-or-update keyed by the table's primary key.
    pub async fn upsert<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<Vec<T>> {
        let resp = self
            .http
            .post(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(row)
            .send()
            .await?;
        Self::expect_rows(resp).await
    }

    /// Startup reachability check: fetch at most one row id from `table`.
    /// Only success or failure matters to the caller.
    pub async fn probe(&self, table: &str) -> Result<()> {
        let resp = self
            .http
            .get(self.rest_url(table))
            .query(&[("select", "id"), ("limit", "1")])
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .send()
            .await?;
        Self::expect_ok(resp).await
    }

    async fn expect_ok(resp: reqwest::Response) -> Result<()> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Service {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    async fn expect_rows<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<T>> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Service {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json().await?)
    }
}
