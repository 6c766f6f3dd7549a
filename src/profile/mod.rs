mod dto;
pub mod repo;
pub mod services;

pub use dto::{TransportMode, UserProfile};
pub use repo::ProfileRepo;
