//! Navigation: route resolution, lazy view acquisition and the mount hook.

use crate::actions::request_post_list;
use crate::article::set_post_id;
use crate::routes::{MountParams, RouteError, RouteMatch, RouteTable};
use crate::store::{ReaderStore, RootAction};
use crate::views::{ChunkLoader, ViewLoader, ViewModule, ViewRegistry};
use blogflux_runtime::StoreError;
use std::sync::Arc;

/// Outcome of a navigation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    /// The matched route and its params
    pub matched: RouteMatch,
    /// The view module to render
    pub module: ViewModule,
}

/// Resolves paths to views
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    views: ViewRegistry,
}

impl Router {
    /// Router over `table`, loading lazy views through `loader`
    pub fn new(table: RouteTable, loader: Arc<dyn ViewLoader>) -> Self {
        let views = ViewRegistry::for_routes(loader, table.routes());
        Self { table, views }
    }

    /// The reader's routes with the default chunk loader
    #[must_use]
    pub fn blog() -> Self {
        Self::new(RouteTable::blog(), Arc::new(ChunkLoader))
    }

    /// Route table in use
    #[must_use]
    pub const fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Lazy view registry in use
    #[must_use]
    pub const fn views(&self) -> &ViewRegistry {
        &self.views
    }

    /// Resolve `path` and acquire its view
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NotFound`] if nothing matches, or
    /// [`RouteError::ViewLoad`] if a lazy view fails to load.
    #[tracing::instrument(skip(self))]
    pub async fn navigate(&self, path: &str) -> Result<Navigation, RouteError> {
        let matched = self.table.resolve(path)?;
        let module = self.views.acquire(&matched.route).await?;
        tracing::debug!(view = ?module.view, params = ?matched.params, "Navigated");
        Ok(Navigation { matched, module })
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::blog()
    }
}

/// Intents the mount hook dispatches for `path`, in order
///
/// `SetPostId` when the path names a post, then exactly one
/// `RequestPostList` carrying whatever id and page were found.
#[must_use]
pub fn mount_actions(path: &str) -> Vec<RootAction> {
    let params = MountParams::parse(path);
    let mut actions = Vec::with_capacity(2);
    if let Some(id) = &params.id {
        actions.push(set_post_id(id.clone()).into());
    }
    actions.push(request_post_list(params.request_params()).into());
    actions
}

/// Run the mount hook for `path` against `store`
///
/// Returns the params that were extracted.
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
#[tracing::instrument(skip(store))]
pub async fn mount(store: &ReaderStore, path: &str) -> Result<MountParams, StoreError> {
    for action in mount_actions(path) {
        store.send(action).await?;
    }
    Ok(MountParams::parse(path))
}
