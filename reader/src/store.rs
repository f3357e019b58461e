//! Root state, root intents and the composed root reducer.

use crate::actions::AppAction;
use crate::article::{ArticleAction, ArticleReducer, ArticleState};
use crate::environment::ReaderEnvironment;
use crate::home::{HomeAction, HomeReducer, HomeState};
use crate::reducer::AppReducer;
use crate::saga::PostListSaga;
use crate::types::AppState;
use blogflux_core::composition::{combine_reducers, scope_reducer, CombinedReducer, SharedReducer};
use blogflux_runtime::{Store, StoreConfig};
use std::sync::Arc;

/// Whole reader state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RootState {
    /// Application slice
    pub app: AppState,
    /// Home view slice
    pub home: HomeState,
    /// Article view slice
    pub article: ArticleState,
}

/// Every intent the reader understands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RootAction {
    /// Application intent
    App(AppAction),
    /// Home view intent
    Home(HomeAction),
    /// Article view intent
    Article(ArticleAction),
}

impl From<AppAction> for RootAction {
    fn from(action: AppAction) -> Self {
        Self::App(action)
    }
}

impl From<HomeAction> for RootAction {
    fn from(action: HomeAction) -> Self {
        Self::Home(action)
    }
}

impl From<ArticleAction> for RootAction {
    fn from(action: ArticleAction) -> Self {
        Self::Article(action)
    }
}

/// The composed root reducer
pub type RootReducer = CombinedReducer<RootState, RootAction, ReaderEnvironment>;

/// Store running the reader
pub type ReaderStore = Store<RootState, RootAction, ReaderEnvironment, RootReducer>;

/// Compose the slice reducers and the post-list saga
///
/// Slice reducers run before the saga, so state is updated before any
/// follow-up effect is started.
#[must_use]
pub fn root_reducer() -> RootReducer {
    let app = scope_reducer(
        AppReducer::new(),
        |root: &mut RootState| &mut root.app,
        |action: &RootAction| match action {
            RootAction::App(app) => Some(app.clone()),
            _ => None,
        },
        RootAction::App,
    );
    let home = scope_reducer(
        HomeReducer,
        |root: &mut RootState| &mut root.home,
        |action: &RootAction| match action {
            RootAction::Home(home) => Some(home.clone()),
            _ => None,
        },
        RootAction::Home,
    );
    let article = scope_reducer(
        ArticleReducer,
        |root: &mut RootState| &mut root.article,
        |action: &RootAction| match action {
            RootAction::Article(article) => Some(article.clone()),
            _ => None,
        },
        RootAction::Article,
    );

    let reducers: Vec<SharedReducer<RootState, RootAction, ReaderEnvironment>> = vec![
        Arc::new(app),
        Arc::new(home),
        Arc::new(article),
        Arc::new(PostListSaga::new()),
    ];
    combine_reducers(reducers)
}

/// Create a store with the initial reader state
#[must_use]
pub fn new_store(environment: ReaderEnvironment) -> ReaderStore {
    Store::new(RootState::default(), root_reducer(), environment)
}

/// Create a store with a custom runtime configuration
#[must_use]
pub fn new_store_with_config(environment: ReaderEnvironment, config: StoreConfig) -> ReaderStore {
    Store::with_config(RootState::default(), root_reducer(), environment, config)
}
