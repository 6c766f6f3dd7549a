use serde::Serialize;
use time::Date;

/// One line of the inventory snapshot embedded into the suggestion prompt.
#[derive(Debug, Clone, Serialize)]
pub struct StockEntry {
    pub name: String,
    pub quantity: i64,
}

/// A candidate inventory item extracted from a receipt image, already
/// normalized (positive quantity, parsed expiry date).
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedItem {
    pub name: String,
    pub quantity: i64,
    pub expiry_date: Option<Date>,
    pub category: Option<String>,
}
