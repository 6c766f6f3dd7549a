mod dto;
pub mod repo;
pub mod services;

pub use dto::{InventoryItem, NewInventoryItem, DEFAULT_CATEGORY, DEFAULT_MIN_THRESHOLD};
pub use repo::InventoryRepo;
