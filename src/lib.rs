//! Availability and reservation quotes for lodge units.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod messages;
pub mod models;
pub mod pricing;
pub mod routes;

use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::AppCache;
use crate::config::Config;
use crate::messages::{MessageComposer, StoreTemplates};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, cache: AppCache, config: Config) -> Self {
        Self {
            db,
            cache,
            config: Arc::new(config),
        }
    }

    /// Composer reading templates from the store through the cache
    pub fn composer(&self) -> MessageComposer<StoreTemplates> {
        MessageComposer::new(StoreTemplates::new(self.db.clone(), self.cache.clone()))
    }
}
