//! In-memory caching using moka
//!
//! Message templates and tariff periods are read on every quote but change
//! only through the admin surface, so both are cached with a TTL and
//! invalidated explicitly on update.
//!
//! Each cache carries a generation counter bumped on invalidation. A reader
//! notes the generation before going to the store and only caches what it
//! loaded if no invalidation happened in between.

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::db::queries;
use crate::messages::TemplateSet;
use crate::models::TariffPeriod;

/// Application cache holding templates and tariff periods
#[derive(Clone)]
pub struct AppCache {
    /// Template set (singleton)
    pub templates: Cache<String, Arc<TemplateSet>>,
    /// Tariff periods (singleton)
    pub periods: Cache<String, Arc<Vec<TariffPeriod>>>,
    template_generation: Arc<AtomicU64>,
    period_generation: Arc<AtomicU64>,
}

/// Which cached data to drop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheScope {
    Templates,
    Periods,
    #[default]
    All,
}

impl AppCache {
    pub const TEMPLATES_KEY: &'static str = "templates";
    pub const PERIODS_KEY: &'static str = "periods";

    /// Create a cache whose entries expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            templates: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            periods: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            template_generation: Arc::new(AtomicU64::new(0)),
            period_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Generation to pass to [`AppCache::insert_templates`] after a store read
    pub fn template_generation(&self) -> u64 {
        self.template_generation.load(Ordering::SeqCst)
    }

    pub fn period_generation(&self) -> u64 {
        self.period_generation.load(Ordering::SeqCst)
    }

    /// Cache a template set read at generation `seen`. Returns false when an
    /// invalidation happened since, leaving the cache empty.
    pub async fn insert_templates(&self, set: Arc<TemplateSet>, seen: u64) -> bool {
        insert_if_current(
            &self.templates,
            Self::TEMPLATES_KEY,
            &self.template_generation,
            seen,
            set,
        )
        .await
    }

    /// Cache tariff periods read at generation `seen`
    pub async fn insert_periods(&self, periods: Arc<Vec<TariffPeriod>>, seen: u64) -> bool {
        insert_if_current(
            &self.periods,
            Self::PERIODS_KEY,
            &self.period_generation,
            seen,
            periods,
        )
        .await
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            templates_cached: self.templates.entry_count() > 0,
            periods_cached: self.periods.entry_count() > 0,
        }
    }

    pub fn invalidate_templates(&self) {
        self.template_generation.fetch_add(1, Ordering::SeqCst);
        self.templates.invalidate_all();
        info!("Template cache invalidated");
    }

    pub fn invalidate_periods(&self) {
        self.period_generation.fetch_add(1, Ordering::SeqCst);
        self.periods.invalidate_all();
        info!("Tariff period cache invalidated");
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.template_generation.fetch_add(1, Ordering::SeqCst);
        self.period_generation.fetch_add(1, Ordering::SeqCst);
        self.templates.invalidate_all();
        self.periods.invalidate_all();
        info!("All caches invalidated");
    }

    pub fn invalidate(&self, scope: CacheScope) {
        match scope {
            CacheScope::Templates => self.invalidate_templates(),
            CacheScope::Periods => self.invalidate_periods(),
            CacheScope::All => self.invalidate_all(),
        }
    }
}

async fn insert_if_current<V>(
    cache: &Cache<String, V>,
    key: &str,
    generation: &AtomicU64,
    seen: u64,
    value: V,
) -> bool
where
    V: Clone + Send + Sync + 'static,
{
    if generation.load(Ordering::SeqCst) != seen {
        debug!("Skipping stale {} cache insert", key);
        return false;
    }

    cache.insert(key.to_string(), value).await;

    // An invalidation may have landed between the check and the insert
    if generation.load(Ordering::SeqCst) != seen {
        cache.invalidate(key).await;
        debug!("Dropped stale {} cache entry", key);
        return false;
    }
    true
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(10 * 60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub templates_cached: bool,
    pub periods_cached: bool,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every `every`.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool, every: Duration) {
    let mut interval = interval(every);
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Preload templates and periods
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    let seen = cache.template_generation();
    match queries::list_message_templates(db).await {
        Ok(rows) => {
            let set = TemplateSet::from_templates(rows);
            let missing = set.missing_keys();
            if !missing.is_empty() {
                warn!("Message templates missing from the store: {:?}", missing);
            }
            cache.insert_templates(Arc::new(set), seen).await;
        }
        Err(e) => warn!("Failed to warm template cache: {}", e),
    }

    let seen = cache.period_generation();
    match queries::list_tariff_periods(db).await {
        Ok(periods) => {
            cache.insert_periods(Arc::new(periods), seen).await;
        }
        Err(e) => warn!("Failed to warm tariff period cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_invalidate_templates_only() {
        let cache = AppCache::default();
        cache
            .templates
            .insert(
                AppCache::TEMPLATES_KEY.to_string(),
                Arc::new(TemplateSet::defaults()),
            )
            .await;
        cache
            .periods
            .insert(
                AppCache::PERIODS_KEY.to_string(),
                Arc::new(vec![TariffPeriod {
                    id: Uuid::new_v4(),
                    name: "Alta".to_string(),
                    start_date: "2024-01-01".parse().unwrap(),
                    end_date: "2024-02-28".parse().unwrap(),
                    degree: crate::models::Degree::First,
                    deposit_percentage: dec!(30),
                }]),
            )
            .await;

        cache.invalidate_templates();

        assert!(cache.templates.get(AppCache::TEMPLATES_KEY).await.is_none());
        assert!(cache.periods.get(AppCache::PERIODS_KEY).await.is_some());

        cache.invalidate_periods();
        assert!(cache.periods.get(AppCache::PERIODS_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = AppCache::new(Duration::from_secs(60));
        cache
            .templates
            .insert(
                AppCache::TEMPLATES_KEY.to_string(),
                Arc::new(TemplateSet::defaults()),
            )
            .await;
        assert!(cache.templates.get(AppCache::TEMPLATES_KEY).await.is_some());

        cache.invalidate_all();
        assert!(cache.templates.get(AppCache::TEMPLATES_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_insert_after_invalidation_is_dropped() {
        let cache = AppCache::default();
        let seen = cache.template_generation();

        // Admin update lands while a reader is still loading
        cache.invalidate_templates();

        let stored = cache
            .insert_templates(Arc::new(TemplateSet::defaults()), seen)
            .await;
        assert!(!stored);
        assert!(cache.templates.get(AppCache::TEMPLATES_KEY).await.is_none());

        let fresh = cache.template_generation();
        assert!(
            cache
                .insert_templates(Arc::new(TemplateSet::defaults()), fresh)
                .await
        );
        assert!(cache.templates.get(AppCache::TEMPLATES_KEY).await.is_some());
    }

    #[tokio::test]
    async fn test_period_generation_is_independent() {
        let cache = AppCache::default();
        let seen = cache.period_generation();

        cache.invalidate_templates();
        assert!(cache.insert_periods(Arc::new(Vec::new()), seen).await);

        cache.invalidate(CacheScope::All);
        assert!(!cache.insert_periods(Arc::new(Vec::new()), seen).await);
        assert!(cache.periods.get(AppCache::PERIODS_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_by_scope() {
        let cache = AppCache::default();
        cache
            .insert_templates(Arc::new(TemplateSet::defaults()), cache.template_generation())
            .await;
        cache
            .insert_periods(Arc::new(Vec::new()), cache.period_generation())
            .await;

        cache.invalidate(CacheScope::Periods);
        assert!(cache.templates.get(AppCache::TEMPLATES_KEY).await.is_some());
        assert!(cache.periods.get(AppCache::PERIODS_KEY).await.is_none());

        cache.invalidate(CacheScope::Templates);
        assert!(cache.templates.get(AppCache::TEMPLATES_KEY).await.is_none());
    }

    #[test]
    fn test_scope_parses_lowercase() {
        let scope: CacheScope = serde_json::from_str("\"periods\"").unwrap();
        assert_eq!(scope, CacheScope::Periods);
        assert_eq!(CacheScope::default(), CacheScope::All);
    }
}
