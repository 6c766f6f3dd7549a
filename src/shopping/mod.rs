mod dto;
pub mod repo;
pub mod services;

pub use dto::{NewShoppingItem, ShoppingItem};
pub use repo::ShoppingRepo;
