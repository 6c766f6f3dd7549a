use tracing::{error, instrument};
use uuid::Uuid;

use super::dto::{NewShoppingItem, ShoppingItem};
use super::repo::ShoppingRepo as _;
use crate::ai::{AiModel as _, StockEntry};
use crate::error::Result;
use crate::inventory::InventoryRepo as _;
use crate::profile;
use crate::state::AppState;

/// Inserted in place of suggestions when the model call fails. Receipt
/// extraction degrades to an empty list instead; the mismatch is inherited
/// behavior, kept deliberately.
pub const SUGGESTION_ERROR_SENTINEL: &str = "Erreur suggestion";

const MAX_SUGGESTIONS: usize = 5;

pub async fn list_items(st: &AppState, user_id: Uuid) -> Result<Vec<ShoppingItem>> {
    st.shopping.list(user_id).await
}

pub async fn add_item(st: &AppState, user_id: Uuid, name: &str) -> Result<Option<ShoppingItem>> {
    if name.is_empty() {
        return Ok(None);
    }
    let item = st.shopping.insert(NewShoppingItem::new(user_id, name)).await?;
    Ok(Some(item))
}

/// Flips the checked flag from its currently displayed value.
pub async fn toggle_checked(
    st: &AppState,
    id: Uuid,
    current: bool,
) -> Result<Option<ShoppingItem>> {
    st.shopping.set_checked(id, !current).await
}

/// Removing an already-removed item is harmless.
pub async fn delete_item(st: &AppState, id: Uuid) -> Result<()> {
    st.shopping.delete(id).await
}

/// Builds a stock snapshot, asks the model for purchase ideas biased by the
/// user's transport mode, and appends them to the list unchecked. There is no
/// approval step between generation and insertion.
#[instrument(skip(st))]
pub async fn generate_suggestions(st: &AppState, user_id: Uuid) -> Result<Vec<ShoppingItem>> {
    let inventory = st.inventory.list(user_id).await?;
    let snapshot: Vec<StockEntry> = inventory
        .iter()
        .map(|i| StockEntry {
            name: i.name.clone(),
            quantity: i.quantity,
        })
        .collect();
    let mode = profile::services::transport_mode(st, user_id).await?;

    let mut names = match st.ai.suggest_purchases(&snapshot, mode).await {
        Ok(names) => names,
        Err(e) => {
            error!(error = %e, "suggestion generation failed");
            vec![SUGGESTION_ERROR_SENTINEL.to_string()]
        }
    };
    names.truncate(MAX_SUGGESTIONS);

    let items: Vec<NewShoppingItem> = names
        .into_iter()
        .map(|name| NewShoppingItem::new(user_id, name))
        .collect();
    st.shopping.insert_many(items).await
}
