use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::inventory::{InventoryItem, InventoryRepo as _};
use crate::shopping::{ShoppingItem, ShoppingRepo as _};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub quantity: i64,
}

/// Numbers shown on the overview screen.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OverviewStats {
    pub total_items: usize,
    pub low_stock: usize,
    pub shopping_list_count: usize,
    pub by_category: Vec<CategoryCount>,
}

/// Pure aggregation over already-fetched rows; categories come back sorted
/// by name.
pub fn compute(products: &[InventoryItem], shopping: &[ShoppingItem]) -> OverviewStats {
    let low_stock = products.iter().filter(|p| p.is_critical()).count();
    let mut by_category: BTreeMap<&str, i64> = BTreeMap::new();
    for p in products {
        *by_category.entry(p.category.as_str()).or_default() += p.quantity;
    }
    OverviewStats {
        total_items: products.len(),
        low_stock,
        shopping_list_count: shopping.len(),
        by_category: by_category
            .into_iter()
            .map(|(category, quantity)| CategoryCount {
                category: category.to_string(),
                quantity,
            })
            .collect(),
    }
}

pub async fn fetch(st: &AppState, user_id: Uuid) -> Result<OverviewStats> {
    let products = st.inventory.list(user_id).await?;
    let shopping = st.shopping.list(user_id).await?;
    Ok(compute(&products, &shopping))
}
