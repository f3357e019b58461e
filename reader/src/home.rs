//! Home view state: whether the home view should still trigger its own fetch.

use blogflux_core::{effect::Effect, reducer::Reducer, SmallVec};

/// State of the home view
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeState {
    /// Whether the home view should fetch posts by itself when shown
    ///
    /// Cleared once a post list has arrived.
    pub will_auto_fetch_posts: bool,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            will_auto_fetch_posts: true,
        }
    }
}

/// Intents handled by the home view
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HomeAction {
    /// Enable or disable the automatic fetch
    SetWillAutoFetchPosts(bool),
}

/// Enable or disable the home view's automatic fetch
#[must_use]
pub const fn set_will_auto_fetch_posts(enabled: bool) -> HomeAction {
    HomeAction::SetWillAutoFetchPosts(enabled)
}

/// Reducer for [`HomeState`]
#[derive(Clone, Debug, Default)]
pub struct HomeReducer;

impl Reducer for HomeReducer {
    type State = HomeState;
    type Action = HomeAction;
    type Environment = crate::environment::ReaderEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            HomeAction::SetWillAutoFetchPosts(enabled) => state.will_auto_fetch_posts = enabled,
        }
        SmallVec::new()
    }
}
