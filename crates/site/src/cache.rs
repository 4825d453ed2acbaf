//! Cached read access to published projects.
//!
//! Project pages are read far more often than projects change, so listings
//! and slug lookups are kept in a `moka` cache with a short TTL. Donations
//! never go through the cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;
use winter_gifts_core::backend::SiteBackend;
use winter_gifts_core::{BackendError, Project};

/// Cache key for project reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Published,
    Slug(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Projects(Arc<Vec<Project>>),
    Project(Box<Project>),
}

/// Published project reads in front of the backend.
#[derive(Clone)]
pub struct ProjectCache {
    backend: Arc<dyn SiteBackend>,
    cache: Cache<CacheKey, CacheValue>,
}

impl ProjectCache {
    #[must_use]
    pub fn new(backend: Arc<dyn SiteBackend>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(ttl)
            .build();
        Self { backend, cache }
    }

    /// Published projects, newest first.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a cache miss that cannot be filled.
    pub async fn published(&self) -> Result<Arc<Vec<Project>>, BackendError> {
        if let Some(CacheValue::Projects(projects)) = self.cache.get(&CacheKey::Published).await {
            debug!("Cache hit for published projects");
            return Ok(projects);
        }

        let projects = Arc::new(self.backend.published_projects().await?);
        self.cache
            .insert(CacheKey::Published, CacheValue::Projects(Arc::clone(&projects)))
            .await;
        Ok(projects)
    }

    /// A published project by slug. Misses are not cached.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a cache miss that cannot be filled.
    pub async fn by_slug(&self, slug: &str) -> Result<Option<Project>, BackendError> {
        let key = CacheKey::Slug(slug.to_string());
        if let Some(CacheValue::Project(project)) = self.cache.get(&key).await {
            debug!(slug, "Cache hit for project");
            return Ok(Some(*project));
        }

        let project = self.backend.project_by_slug(slug).await?;
        if let Some(project) = &project {
            self.cache
                .insert(key, CacheValue::Project(Box::new(project.clone())))
                .await;
        }
        Ok(project)
    }
}
