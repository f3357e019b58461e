//! Article view state: the post the current route points at.

use blogflux_core::{effect::Effect, reducer::Reducer, SmallVec};

/// State of the article view
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticleState {
    /// Id of the post being read, as it appeared in the URL
    pub post_id: Option<String>,
}

/// Intents handled by the article view
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArticleAction {
    /// Point the article view at a post
    SetPostId(String),
}

/// Point the article view at a post
#[must_use]
pub fn set_post_id(id: impl Into<String>) -> ArticleAction {
    ArticleAction::SetPostId(id.into())
}

/// Reducer for [`ArticleState`]
#[derive(Clone, Debug, Default)]
pub struct ArticleReducer;

impl Reducer for ArticleReducer {
    type State = ArticleState;
    type Action = ArticleAction;
    type Environment = crate::environment::ReaderEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ArticleAction::SetPostId(id) => state.post_id = Some(id),
        }
        SmallVec::new()
    }
}
