use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::dto::{NewShoppingItem, ShoppingItem};
use crate::error::{Error, Result};
use crate::supabase::SupabaseClient;

const TABLE: &str = "shopping_list";

#[async_trait]
pub trait ShoppingRepo: Send + Sync {
    /// Unchecked items come before checked ones.
    async fn list(&self, user_id: Uuid) -> Result<Vec<ShoppingItem>>;
    async fn insert(&self, item: NewShoppingItem) -> Result<ShoppingItem>;
    async fn insert_many(&self, items: Vec<NewShoppingItem>) -> Result<Vec<ShoppingItem>>;
    /// `None` when the row no longer exists.
    async fn set_checked(&self, id: Uuid, checked: bool) -> Result<Option<ShoppingItem>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

pub struct SupabaseShoppingRepo {
    client: Arc<SupabaseClient>,
}

impl SupabaseShoppingRepo {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ShoppingRepo for SupabaseShoppingRepo {
    async fn list(&self, user_id: Uuid) -> Result<Vec<ShoppingItem>> {
        let owner = format!("eq.{user_id}");
        self.client
            .select(
                TABLE,
                &[("select", "*"), ("user_id", &owner), ("order", "is_checked.asc")],
            )
            .await
    }

    async fn insert(&self, item: NewShoppingItem) -> Result<ShoppingItem> {
        let rows = self.insert_many(vec![item]).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::UnexpectedResponse("insert returned no representation".into()))
    }

    async fn insert_many(&self, items: Vec<NewShoppingItem>) -> Result<Vec<ShoppingItem>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        self.client.insert(TABLE, &items).await
    }

    async fn set_checked(&self, id: Uuid, checked: bool) -> Result<Option<ShoppingItem>> {
        let filter = format!("eq.{id}");
        let rows: Vec<ShoppingItem> = self
            .client
            .update(TABLE, &[("id", &filter)], &serde_json::json!({ "is_checked": checked }))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let filter = format!("eq.{id}");
        self.client.delete(TABLE, &[("id", &filter)]).await
    }
}

#[cfg(test)]
pub(crate) mod mem {
    use std::sync::Mutex;

    use time::OffsetDateTime;

    use super::*;

    #[derive(Default)]
    pub struct MemoryShoppingRepo {
        rows: Mutex<Vec<ShoppingItem>>,
    }

    #[async_trait]
    impl ShoppingRepo for MemoryShoppingRepo {
        async fn list(&self, user_id: Uuid) -> Result<Vec<ShoppingItem>> {
            let rows = self.rows.lock().expect("lock");
            let mut out: Vec<ShoppingItem> = rows
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect();
            // stable partition: unchecked first, insertion order within
            out.sort_by_key(|r| r.is_checked);
            Ok(out)
        }

        async fn insert(&self, item: NewShoppingItem) -> Result<ShoppingItem> {
            let rows = self.insert_many(vec![item]).await?;
            Ok(rows.into_iter().next().expect("one row inserted"))
        }

        async fn insert_many(&self, items: Vec<NewShoppingItem>) -> Result<Vec<ShoppingItem>> {
            let mut rows = self.rows.lock().expect("lock");
            let mut inserted = Vec::with_capacity(items.len());
            for item in items {
                let row = ShoppingItem {
                    id: Uuid::new_v4(),
                    user_id: item.user_id,
                    name: item.name,
                    quantity: item.quantity,
                    is_checked: item.is_checked,
                    category: item.category,
                    created_at: Some(OffsetDateTime::now_utc()),
                };
                rows.push(row.clone());
                inserted.push(row);
            }
            Ok(inserted)
        }

        async fn set_checked(&self, id: Uuid, checked: bool) -> Result<Option<ShoppingItem>> {
            let mut rows = self.rows.lock().expect("lock");
            for row in rows.iter_mut() {
                if row.id == id {
                    row.is_checked = checked;
                    return Ok(Some(row.clone()));
                }
            }
            Ok(None)
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            self.rows.lock().expect("lock").retain(|r| r.id != id);
            Ok(())
        }
    }
}
