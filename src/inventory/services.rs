use bytes::Bytes;
use tracing::{error, instrument};
use uuid::Uuid;

use super::dto::{InventoryItem, NewInventoryItem, DEFAULT_CATEGORY};
use super::repo::InventoryRepo as _;
use crate::ai::AiModel as _;
use crate::error::Result;
use crate::state::AppState;

pub async fn list_items(st: &AppState, user_id: Uuid) -> Result<Vec<InventoryItem>> {
    st.inventory.list(user_id).await
}

pub async fn create_item(
    st: &AppState,
    user_id: Uuid,
    name: &str,
    quantity: i64,
) -> Result<InventoryItem> {
    st.inventory
        .insert(NewInventoryItem::new(user_id, name, quantity))
        .await
}

/// Negative targets are refused before any remote call; `Ok(None)` means
/// nothing changed (refused, or the row is gone).
pub async fn adjust_quantity(
    st: &AppState,
    id: Uuid,
    new_quantity: i64,
) -> Result<Option<InventoryItem>> {
    if new_quantity < 0 {
        return Ok(None);
    }
    st.inventory.set_quantity(id, new_quantity).await
}

/// Removing an already-removed item is harmless.
pub async fn delete_item(st: &AppState, id: Uuid) -> Result<()> {
    st.inventory.delete(id).await
}

/// Receipt import: extract candidates from the image, apply defaults, insert
/// them in one call. A failed extraction imports nothing; there is no
/// partial-failure reporting.
#[instrument(skip(st, image))]
pub async fn import_receipt(
    st: &AppState,
    user_id: Uuid,
    image: Bytes,
    content_type: &str,
) -> Result<Vec<InventoryItem>> {
    let extracted = match st.ai.extract_receipt_items(image, content_type).await {
        Ok(items) => items,
        Err(e) => {
            error!(error = %e, "receipt extraction failed");
            Vec::new()
        }
    };
    if extracted.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<NewInventoryItem> = extracted
        .into_iter()
        .map(|item| {
            let mut row = NewInventoryItem::new(user_id, item.name, item.quantity);
            row.category = item.category.unwrap_or_else(|| DEFAULT_CATEGORY.into());
            row.expiry_date = item.expiry_date;
            row
        })
        .collect();
    st.inventory.insert_many(rows).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::macros::date;

    use super::*;
    use crate::ai::test_models::FailingModel;
    use crate::inventory::DEFAULT_MIN_THRESHOLD;
    use crate::state::AppState;

    #[tokio::test]
    async fn negative_adjust_leaves_stored_quantity_unchanged() {
        let st = AppState::fake();
        let user_id = Uuid::new_v4();
        let item = create_item(&st, user_id, "Lait", 2).await.expect("insert");

        let refused = adjust_quantity(&st, item.id, -1).await.expect("no error");
        assert!(refused.is_none());

        let listed = list_items(&st, user_id).await.expect("list");
        assert_eq!(listed[0].quantity, 2);
    }

    #[tokio::test]
    async fn adjust_then_list_reflects_the_new_quantity() {
        let st = AppState::fake();
        let user_id = Uuid::new_v4();
        let item = create_item(&st, user_id, "Riz", 1).await.expect("insert");

        let updated = adjust_quantity(&st, item.id, 4)
            .await
            .expect("no error")
            .expect("row exists");
        assert_eq!(updated.quantity, 4);

        let listed = list_items(&st, user_id).await.expect("list");
        assert_eq!(listed[0].quantity, 4);
    }

    #[tokio::test]
    async fn adjusting_a_missing_row_changes_nothing() {
        let st = AppState::fake();
        let updated = adjust_quantity(&st, Uuid::new_v4(), 3).await.expect("no error");
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn deleting_twice_is_a_noop_the_second_time() {
        let st = AppState::fake();
        let user_id = Uuid::new_v4();
        let item = create_item(&st, user_id, "Pain", 1).await.expect("insert");

        delete_item(&st, item.id).await.expect("first delete");
        delete_item(&st, item.id).await.expect("second delete is harmless");
        assert!(list_items(&st, user_id).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let st = AppState::fake();
        let user_id = Uuid::new_v4();
        create_item(&st, user_id, "Yaourt", 1).await.expect("insert");
        create_item(&st, user_id, "Beurre", 1).await.expect("insert");
        create_item(&st, user_id, "Oeufs", 1).await.expect("insert");

        let names: Vec<String> = list_items(&st, user_id)
            .await
            .expect("list")
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Beurre", "Oeufs", "Yaourt"]);
    }

    #[tokio::test]
    async fn manual_entry_gets_the_catch_all_category_and_threshold() {
        let st = AppState::fake();
        let item = create_item(&st, Uuid::new_v4(), "Chocolat", 1).await.expect("insert");
        assert_eq!(item.category, DEFAULT_CATEGORY);
        assert_eq!(item.min_threshold, DEFAULT_MIN_THRESHOLD);
    }

    #[tokio::test]
    async fn offline_receipt_import_inserts_the_two_canned_items() {
        let st = AppState::fake();
        let user_id = Uuid::new_v4();

        let imported = import_receipt(&st, user_id, Bytes::from_static(b"jpeg"), "image/jpeg")
            .await
            .expect("import");
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].name, "Pommes");
        assert_eq!(imported[0].quantity, 6);
        assert_eq!(imported[0].category, "Fruits & Légumes");
        assert_eq!(imported[0].expiry_date, Some(date!(2024 - 06 - 01)));
        assert_eq!(imported[0].min_threshold, DEFAULT_MIN_THRESHOLD);
        assert_eq!(imported[1].name, "Lait");
        assert_eq!(imported[1].quantity, 2);
        assert_eq!(imported[1].category, "Produits Laitiers");

        // inserted rows are visible on the next fetch
        let listed = list_items(&st, user_id).await.expect("list");
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn failed_extraction_imports_nothing() {
        let st = AppState::fake_with_model(Arc::new(FailingModel));
        let user_id = Uuid::new_v4();

        let imported = import_receipt(&st, user_id, Bytes::from_static(b"jpeg"), "image/jpeg")
            .await
            .expect("error is swallowed");
        assert!(imported.is_empty());
        assert!(list_items(&st, user_id).await.expect("list").is_empty());
    }
}
