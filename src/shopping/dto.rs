use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A `shopping_list` row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub is_checked: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewShoppingItem {
    pub user_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub is_checked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NewShoppingItem {
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            quantity: 1,
            is_checked: false,
            category: None,
        }
    }
}
