use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::dto::UserProfile;
use crate::error::{Error, Result};
use crate::supabase::SupabaseClient;

const TABLE: &str = "profiles";

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>>;
    /// Create-or-update keyed by user id; a second save with the same key
    /// must update the existing row, never duplicate it.
    async fn upsert(&self, profile: UserProfile) -> Result<UserProfile>;
}

pub struct SupabaseProfileRepo {
    client: Arc<SupabaseClient>,
}

impl SupabaseProfileRepo {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileRepo for SupabaseProfileRepo {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let key = format!("eq.{user_id}");
        let rows: Vec<UserProfile> = self
            .client
            .select(TABLE, &[("select", "*"), ("id", &key), ("limit", "1")])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert(&self, profile: UserProfile) -> Result<UserProfile> {
        let rows: Vec<UserProfile> = self.client.upsert(TABLE, &profile).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::UnexpectedResponse("upsert returned no representation".into()))
    }
}
