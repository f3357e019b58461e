//! View modules and lazy view loading.

use crate::routes::{Residency, Route, RouteError, View};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A loaded view
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewModule {
    /// Which view this is
    pub view: View,
    /// Chunk the view was loaded from, `None` for resident views
    pub chunk: Option<String>,
}

impl ViewModule {
    /// A view that ships with the application
    #[must_use]
    pub const fn resident(view: View) -> Self {
        Self { view, chunk: None }
    }
}

/// Future returned by [`ViewLoader::load`]
pub type ViewLoadFuture<'a> = Pin<Box<dyn Future<Output = Result<ViewModule, String>> + Send + 'a>>;

/// Acquires lazy views
pub trait ViewLoader: Send + Sync {
    /// Load `view`
    fn load(&self, view: View) -> ViewLoadFuture<'_>;
}

/// Loader that resolves every view to a named chunk immediately
#[derive(Clone, Copy, Debug, Default)]
pub struct ChunkLoader;

impl ChunkLoader {
    /// Chunk name for `view`
    #[must_use]
    pub const fn chunk_name(view: View) -> &'static str {
        match view {
            View::Home => "home",
            View::Article => "article",
            View::About => "about",
            View::Topics => "topics",
        }
    }
}

impl ViewLoader for ChunkLoader {
    fn load(&self, view: View) -> ViewLoadFuture<'_> {
        Box::pin(async move {
            Ok(ViewModule {
                view,
                chunk: Some(Self::chunk_name(view).to_string()),
            })
        })
    }
}

/// Resident and lazily loaded views
///
/// Each lazy view is loaded at most once; concurrent navigations share the
/// same load. A failed load leaves the slot empty so the next navigation
/// tries again.
pub struct ViewRegistry {
    loader: Arc<dyn ViewLoader>,
    lazy: HashMap<View, OnceCell<ViewModule>>,
}

impl ViewRegistry {
    /// Registry backed by `loader`
    pub fn new(loader: Arc<dyn ViewLoader>) -> Self {
        Self {
            loader,
            lazy: HashMap::new(),
        }
    }

    /// Registry with a slot for every lazy route of `routes`
    pub fn for_routes<'a>(loader: Arc<dyn ViewLoader>, routes: impl IntoIterator<Item = &'a Route>) -> Self {
        let mut registry = Self::new(loader);
        for route in routes {
            if route.residency == Residency::Lazy {
                registry.lazy.entry(route.view).or_default();
            }
        }
        registry
    }

    /// Get the module for the view `route` points at, loading it if needed
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::ViewLoad`] if the loader fails.
    pub async fn acquire(&self, route: &Route) -> Result<ViewModule, RouteError> {
        let Some(slot) = self.lazy.get(&route.view) else {
            return Ok(ViewModule::resident(route.view));
        };

        slot.get_or_try_init(|| async {
            tracing::debug!(view = ?route.view, "Loading lazy view");
            metrics::counter!("reader.views.loaded").increment(1);
            self.loader.load(route.view).await.map_err(|reason| {
                tracing::warn!(view = ?route.view, %reason, "Lazy view failed to load");
                RouteError::ViewLoad {
                    view: route.view,
                    reason,
                }
            })
        })
        .await
        .cloned()
    }

    /// Whether `view` is lazy and already loaded
    #[must_use]
    pub fn is_loaded(&self, view: View) -> bool {
        self.lazy.get(&view).is_some_and(OnceCell::initialized)
    }
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("lazy", &self.lazy)
            .finish_non_exhaustive()
    }
}
