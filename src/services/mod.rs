//! Business logic services

pub mod auth;
pub mod catalog;
pub mod redis;
pub mod rents;
pub mod stock;
pub mod wishlist;

use std::sync::Arc;

use crate::{config::AuthConfig, openlibrary::CatalogSource, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub stock: stock::StockService,
    pub rents: rents::RentsService,
    pub wishlist: wishlist::WishlistService,
    pub sessions: Arc<dyn redis::SessionStore>,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        sessions: Arc<dyn redis::SessionStore>,
        catalog_source: Arc<dyn CatalogSource>,
    ) -> Self {
        let catalog = catalog::CatalogService::new(repository.clone(), catalog_source);
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config, sessions.clone()),
            stock: stock::StockService::new(repository.clone(), catalog.clone()),
            rents: rents::RentsService::new(repository.clone()),
            wishlist: wishlist::WishlistService::new(repository.clone()),
            catalog,
            sessions,
            repository,
        }
    }
}
