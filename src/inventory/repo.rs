use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::dto::{InventoryItem, NewInventoryItem};
use crate::error::{Error, Result};
use crate::supabase::SupabaseClient;

const TABLE: &str = "products";

/// Remote access to the pantry collection. Injected as a trait object so the
/// backend is swappable in tests.
#[async_trait]
pub trait InventoryRepo: Send + Sync {
    /// All items owned by `user_id`, sorted by name.
    async fn list(&self, user_id: Uuid) -> Result<Vec<InventoryItem>>;
    async fn insert(&self, item: NewInventoryItem) -> Result<InventoryItem>;
    /// Receipt import path: one call, server-assigned ids come back.
    async fn insert_many(&self, items: Vec<NewInventoryItem>) -> Result<Vec<InventoryItem>>;
    /// `None` when the row no longer exists.
    async fn set_quantity(&self, id: Uuid, quantity: i64) -> Result<Option<InventoryItem>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

pub struct SupabaseInventoryRepo {
    client: Arc<SupabaseClient>,
}

impl SupabaseInventoryRepo {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InventoryRepo for SupabaseInventoryRepo {
    async fn list(&self, user_id: Uuid) -> Result<Vec<InventoryItem>> {
        let owner = format!("eq.{user_id}");
        self.client
            .select(TABLE, &[("select", "*"), ("user_id", &owner), ("order", "name.asc")])
            .await
    }

    async fn insert(&self, item: NewInventoryItem) -> Result<InventoryItem> {
        let rows = self.insert_many(vec![item]).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::UnexpectedResponse("insert returned no representation".into()))
    }

    async fn insert_many(&self, items: Vec<NewInventoryItem>) -> Result<Vec<InventoryItem>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        self.client.insert(TABLE, &items).await
    }

    async fn set_quantity(&self, id: Uuid, quantity: i64) -> Result<Option<InventoryItem>> {
        let filter = format!("eq.{id}");
        let rows: Vec<InventoryItem> = self
            .client
            .update(TABLE, &[("id", &filter)], &serde_json::json!({ "quantity": quantity }))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let filter = format!("eq.{id}");
        self.client.delete(TABLE, &[("id", &filter)]).await
    }
}
