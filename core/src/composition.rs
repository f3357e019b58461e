//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a child reducer on one slice of a parent state
//!   and one family of the parent's actions
//!
//! # Examples
//!
//! ```ignore
//! use blogflux_core::composition::{combine_reducers, scope_reducer};
//!
//! let home = scope_reducer(
//!     HomeReducer,
//!     |root: &mut RootState| &mut root.home,
//!     |action: &RootAction| match action {
//!         RootAction::Home(home) => Some(home.clone()),
//!         _ => None,
//!     },
//!     RootAction::Home,
//! );
//!
//! let root = combine_reducers(vec![Arc::new(app), Arc::new(home)]);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::sync::Arc;

/// Shared, thread-safe reducer trait object
pub type SharedReducer<S, A, E> = Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Run several reducers over the same state and action, in order.
///
/// Effects are concatenated in reducer order; `Effect::None` is dropped.
/// Later reducers see the state left by earlier ones, so a reducer that
/// only orchestrates can be placed last and read up-to-date state.
///
/// # Examples
///
/// ```
/// use blogflux_core::{Effect, Reducer, SmallVec};
/// use blogflux_core::composition::{combine_reducers, SharedReducer};
/// use std::sync::Arc;
///
/// #[derive(Clone, Default)]
/// struct Feed {
///     page: u32,
///     requests: u32,
/// }
///
/// #[derive(Clone)]
/// enum FeedAction {
///     GoTo(u32),
/// }
///
/// struct Pager;
/// struct RequestCounter;
///
/// impl Reducer for Pager {
///     type State = Feed;
///     type Action = FeedAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut Feed, action: FeedAction, _env: &()) -> SmallVec<[Effect<FeedAction>; 4]> {
///         let FeedAction::GoTo(page) = action;
///         state.page = page;
///         SmallVec::new()
///     }
/// }
///
/// impl Reducer for RequestCounter {
///     type State = Feed;
///     type Action = FeedAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut Feed, _action: FeedAction, _env: &()) -> SmallVec<[Effect<FeedAction>; 4]> {
///         state.requests += 1;
///         SmallVec::new()
///     }
/// }
///
/// let reducers: Vec<SharedReducer<Feed, FeedAction, ()>> =
///     vec![Arc::new(Pager), Arc::new(RequestCounter)];
/// let feed = combine_reducers(reducers);
///
/// let mut state = Feed::default();
/// let _ = feed.reduce(&mut state, FeedAction::GoTo(3), &());
/// assert_eq!((state.page, state.requests), (3, 1));
/// ```
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`]. Cheap to clone.
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<SharedReducer<S, A, E>>,
}

impl<S, A, E> Clone for CombinedReducer<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.clone(),
        }
    }
}

impl<S, A, E> std::fmt::Debug for CombinedReducer<S, A, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("reducers", &self.reducers.len())
            .finish()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects.into_iter().filter(|e| !e.is_none()));
        }

        all_effects
    }
}

/// Focus a child reducer on one slice of a parent state.
///
/// `extract_action` picks the parent actions meant for the child; the child
/// is not called for any other action. Child effects are mapped back into
/// parent actions with `embed_action`.
///
/// # Examples
///
/// ```
/// use blogflux_core::{Effect, Reducer, SmallVec};
/// use blogflux_core::composition::scope_reducer;
///
/// #[derive(Clone, Default)]
/// struct Sidebar {
///     open: bool,
/// }
///
/// #[derive(Clone)]
/// enum SidebarAction {
///     Show(bool),
/// }
///
/// struct SidebarReducer;
///
/// impl Reducer for SidebarReducer {
///     type State = Sidebar;
///     type Action = SidebarAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut Sidebar, action: SidebarAction, _env: &()) -> SmallVec<[Effect<SidebarAction>; 4]> {
///         let SidebarAction::Show(open) = action;
///         state.open = open;
///         SmallVec::new()
///     }
/// }
///
/// #[derive(Clone, Default)]
/// struct Layout {
///     sidebar: Sidebar,
///     title: String,
/// }
///
/// #[derive(Clone)]
/// enum LayoutAction {
///     Sidebar(SidebarAction),
///     Retitle(String),
/// }
///
/// let layout = scope_reducer(
///     SidebarReducer,
///     |layout: &mut Layout| &mut layout.sidebar,
///     |action: &LayoutAction| match action {
///         LayoutAction::Sidebar(inner) => Some(inner.clone()),
///         LayoutAction::Retitle(_) => None,
///     },
///     LayoutAction::Sidebar,
/// );
///
/// let mut state = Layout::default();
/// let _ = layout.reduce(&mut state, LayoutAction::Sidebar(SidebarAction::Show(true)), &());
/// assert!(state.sidebar.open);
/// ```
pub fn scope_reducer<S, SubS, A, SubA, E, R>(
    reducer: R,
    state_slice: fn(&mut S) -> &mut SubS,
    extract_action: fn(&A) -> Option<SubA>,
    embed_action: fn(SubA) -> A,
) -> ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    ScopedReducer {
        reducer,
        state_slice,
        extract_action,
        embed_action,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on a subset of state and actions.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, E, R> {
    reducer: R,
    state_slice: fn(&mut S) -> &mut SubS,
    extract_action: fn(&A) -> Option<SubA>,
    embed_action: fn(SubA) -> A,
    _phantom: std::marker::PhantomData<fn() -> E>,
}

impl<S, SubS, A, SubA, E, R> Reducer for ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
    SubA: Send + 'static,
    A: Send + 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(child_action) = (self.extract_action)(&action) else {
            return SmallVec::new();
        };

        let child_state = (self.state_slice)(state);

        self.reducer
            .reduce(child_state, child_action, env)
            .into_iter()
            .map(|effect| effect.map(self.embed_action))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{smallvec, SmallVec};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Reader {
        page: u32,
        visited: Vec<u32>,
        loading: bool,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum ReaderAction {
        Open(u32),
        Loaded,
    }

    /// Moves to the requested page and asks for it to be loaded
    struct Navigation;

    impl Reducer for Navigation {
        type State = Reader;
        type Action = ReaderAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                ReaderAction::Open(page) => {
                    state.page = page;
                    state.loading = true;
                    smallvec![Effect::send(ReaderAction::Loaded)]
                },
                ReaderAction::Loaded => {
                    state.loading = false;
                    smallvec![Effect::None]
                },
            }
        }
    }

    /// Records every page opened, reading the page set by [`Navigation`]
    struct History;

    impl Reducer for History {
        type State = Reader;
        type Action = ReaderAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            if matches!(action, ReaderAction::Open(_)) {
                state.visited.push(state.page);
            }
            SmallVec::new()
        }
    }

    fn reader() -> CombinedReducer<Reader, ReaderAction, ()> {
        let reducers: Vec<SharedReducer<Reader, ReaderAction, ()>> = vec![Arc::new(Navigation), Arc::new(History)];
        combine_reducers(reducers)
    }

    #[test]
    fn test_combined_reducers_run_in_order() {
        let combined = reader();
        let mut state = Reader::default();

        let effects = combined.reduce(&mut state, ReaderAction::Open(4), &());

        assert_eq!(state.page, 4);
        assert_eq!(state.visited, vec![4]);
        assert!(state.loading);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_combined_reducers_drop_none_effects() {
        let combined = reader();
        let mut state = Reader::default();

        let effects = combined.reduce(&mut state, ReaderAction::Loaded, &());

        assert!(effects.is_empty());
        assert!(!state.loading);
    }

    #[test]
    fn test_combined_reducer_clones_share_reducers() {
        let combined = reader();
        let copy = combined.clone();
        let mut state = Reader::default();

        let _ = combined.reduce(&mut state, ReaderAction::Open(1), &());
        let _ = copy.reduce(&mut state, ReaderAction::Open(2), &());

        assert_eq!(state.visited, vec![1, 2]);
        assert_eq!(format!("{copy:?}"), "CombinedReducer { reducers: 2 }");
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct App {
        reader: Reader,
        title: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum AppAction {
        Reader(ReaderAction),
        Retitle(String),
    }

    fn scoped() -> impl Reducer<State = App, Action = AppAction, Environment = ()> {
        scope_reducer(
            Navigation,
            |app: &mut App| &mut app.reader,
            |action: &AppAction| match action {
                AppAction::Reader(inner) => Some(inner.clone()),
                AppAction::Retitle(_) => None,
            },
            AppAction::Reader,
        )
    }

    #[test]
    fn test_scoped_reducer_updates_its_slice() {
        let scoped = scoped();
        let mut state = App {
            title: "Blog".to_string(),
            ..App::default()
        };

        let _ = scoped.reduce(&mut state, AppAction::Reader(ReaderAction::Open(7)), &());

        assert_eq!(state.reader.page, 7);
        assert!(state.reader.loading);
        assert_eq!(state.title, "Blog");
    }

    #[test]
    fn test_scoped_reducer_ignores_foreign_actions() {
        let scoped = scoped();
        let mut state = App::default();

        let effects = scoped.reduce(&mut state, AppAction::Retitle("News".to_string()), &());

        assert!(effects.is_empty());
        assert_eq!(state, App::default());
    }

    #[tokio::test]
    async fn test_scoped_reducer_embeds_child_effects() {
        let scoped = scoped();
        let mut state = App::default();

        let mut effects = scoped.reduce(&mut state, AppAction::Reader(ReaderAction::Open(1)), &());

        let Some(Effect::Future(fut)) = effects.pop() else {
            unreachable!("Open returns a single send effect");
        };
        assert_eq!(fut.await, Some(AppAction::Reader(ReaderAction::Loaded)));
    }
}
