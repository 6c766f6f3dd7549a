pub mod ai;
pub mod config;
pub mod error;
pub mod inventory;
pub mod overview;
pub mod profile;
pub mod session;
pub mod shopping;
pub mod state;
pub mod supabase;

pub use error::{Error, Result};
