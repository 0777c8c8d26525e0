//! LibraryDB server
//!
//! REST JSON backend for a small lending library: books imported from
//! OpenLibrary, stock buckets per condition grade, rentals, accounts with
//! Redis-backed sessions and personal wishlists.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod openlibrary;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
