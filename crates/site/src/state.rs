//! Application state shared across handlers.

use std::sync::Arc;

use winter_gifts_core::backend::SiteBackend;
use winter_gifts_core::gifts::GiftContent;
use winter_gifts_core::{Locale, LocaleResolver};

use crate::cache::ProjectCache;
use crate::config::SiteConfig;
use crate::i18n::{Catalogs, Messages};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The backend is a trait object
/// so the same router runs against `PostgreSQL` in production and in-memory
/// fakes in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    backend: Arc<dyn SiteBackend>,
    projects: ProjectCache,
    resolver: LocaleResolver,
    catalogs: Catalogs,
    gifts: GiftContent,
}

impl AppState {
    /// Create a new application state.
    ///
    /// `catalogs` must already be validated against `config.locales`.
    #[must_use]
    pub fn new(
        config: SiteConfig,
        backend: Arc<dyn SiteBackend>,
        catalogs: Catalogs,
        gifts: GiftContent,
    ) -> Self {
        let projects = ProjectCache::new(Arc::clone(&backend), config.project_cache_ttl);
        let resolver = LocaleResolver::new(config.locales.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                projects,
                resolver,
                catalogs,
                gifts,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the backend.
    #[must_use]
    pub fn backend(&self) -> &dyn SiteBackend {
        self.inner.backend.as_ref()
    }

    /// Cached published projects.
    #[must_use]
    pub fn projects(&self) -> &ProjectCache {
        &self.inner.projects
    }

    #[must_use]
    pub fn resolver(&self) -> &LocaleResolver {
        &self.inner.resolver
    }

    /// Messages for a resolved locale.
    #[must_use]
    pub fn messages(&self, locale: Locale) -> Messages {
        self.inner.catalogs.messages(locale)
    }

    /// Children's gift wishes loaded at startup.
    #[must_use]
    pub fn gifts(&self) -> &GiftContent {
        &self.inner.gifts
    }
}
