//! Recipe sharing with shared, self-merging shopping lists.
//!
//! The merge and quantity logic lives in `cookshare-core`; this crate adds
//! SQLite persistence, the service layer, the HTTP API and the CLI.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod server;
pub mod service;

pub use config::Config;
pub use error::AppError;
pub use service::{AddRecipeOutcome, ShoppingListService};
