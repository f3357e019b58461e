//! Reducer for the application slice.

use crate::actions::AppAction;
use crate::environment::ReaderEnvironment;
use crate::types::AppState;
use blogflux_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Folds application intents into [`AppState`]
///
/// Pure: fetching is the orchestrator's job, so this reducer never returns
/// effects. Intents it does not know leave the state untouched.
#[derive(Clone, Debug, Default)]
pub struct AppReducer;

impl AppReducer {
    /// Creates a new app reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = ReaderEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::ToggleSidebar(toggle) => {
                state.is_mobile_side_bar_show = toggle.is_mobile_side_bar_show;
            },
            AppAction::ReceivePostList(list) => {
                tracing::debug!(
                    posts = list.len(),
                    total = list.total,
                    total_pages = list.total_pages,
                    "Received post list"
                );
                state.posts = list;
                state.last_error = None;
            },
            AppAction::PostListFailed { error } => {
                tracing::warn!(%error, "Post list fetch failed");
                state.last_error = Some(error);
            },
            AppAction::RequestPostList(_) | AppAction::PostListFetched(_) => {},
        }

        SmallVec::new()
    }
}
