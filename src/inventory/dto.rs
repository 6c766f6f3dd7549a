use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Catch-all label applied when an item arrives without a category.
pub const DEFAULT_CATEGORY: &str = "Divers";
/// Below-or-equal this quantity an item counts as critical.
pub const DEFAULT_MIN_THRESHOLD: i64 = 2;

time::serde::format_description!(ymd, Date, "[year]-[month]-[day]");

/// A `products` row as stored remotely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    #[serde(default, with = "ymd::option")]
    pub expiry_date: Option<Date>,
    pub min_threshold: i64,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl InventoryItem {
    pub fn is_critical(&self) -> bool {
        self.quantity <= self.min_threshold
    }
}

/// Insert payload; the service assigns id and created_at.
#[derive(Debug, Clone, Serialize)]
pub struct NewInventoryItem {
    pub user_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub category: String,
    #[serde(with = "ymd::option", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<Date>,
    pub min_threshold: i64,
}

impl NewInventoryItem {
    pub fn new(user_id: Uuid, name: impl Into<String>, quantity: i64) -> Self {
        Self {
            user_id,
            name: name.into(),
            quantity,
            category: DEFAULT_CATEGORY.into(),
            expiry_date: None,
            min_threshold: DEFAULT_MIN_THRESHOLD,
        }
    }
}
