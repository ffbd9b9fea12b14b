//! Sources of message templates for the composer.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::AppCache;
use crate::db;
use crate::error::{AppError, Result};

use super::template::TemplateSet;

/// Supplies the current template set for one composition.
#[async_trait]
pub trait TemplateProvider: Send + Sync {
    async fn fetch_templates(&self) -> Result<Arc<TemplateSet>>;
}

/// Fixed in-memory templates.
#[derive(Debug, Clone)]
pub struct StaticTemplates(pub Arc<TemplateSet>);

impl StaticTemplates {
    pub fn new(set: TemplateSet) -> Self {
        Self(Arc::new(set))
    }
}

#[async_trait]
impl TemplateProvider for StaticTemplates {
    async fn fetch_templates(&self) -> Result<Arc<TemplateSet>> {
        Ok(self.0.clone())
    }
}

/// Templates from the `message_templates` table, cached until invalidated
/// or expired.
#[derive(Clone)]
pub struct StoreTemplates {
    pool: PgPool,
    cache: AppCache,
}

impl StoreTemplates {
    pub fn new(pool: PgPool, cache: AppCache) -> Self {
        Self { pool, cache }
    }
}

#[async_trait]
impl TemplateProvider for StoreTemplates {
    async fn fetch_templates(&self) -> Result<Arc<TemplateSet>> {
        if let Some(cached) = self.cache.templates.get(AppCache::TEMPLATES_KEY).await {
            tracing::debug!("Cache HIT for message templates");
            return Ok(cached);
        }

        tracing::debug!("Cache MISS for message templates");
        let seen = self.cache.template_generation();
        let rows = db::list_message_templates(&self.pool)
            .await
            .map_err(|e| AppError::TemplateFetch(e.to_string()))?;
        let set = Arc::new(TemplateSet::from_templates(rows));

        self.cache.insert_templates(set.clone(), seen).await;

        Ok(set)
    }
}
