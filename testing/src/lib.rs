//! # Blogflux Testing
//!
//! Testing utilities and helpers for the blogflux reducer architecture.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Effect assertions and an offline effect resolver
//! - Async polling helpers for store-level tests
//!
//! ## Example
//!
//! ```ignore
//! use blogflux_testing::{effects::resolve_all, ReducerTest};
//!
//! #[tokio::test]
//! async fn test_request_fetches() {
//!     let effects = reducer.reduce(&mut state, request_post_list(params), &env);
//!     let produced = resolve_all(effects).await;
//!     assert!(matches!(produced[0], AppAction::PostListFetched(Ok(_))));
//! }
//! ```


pub use reducer_test::{assertions, ReducerTest};

/// Resolve effects without a store
///
/// Handy for checking what a reducer's effects would feed back without
/// spinning up the runtime. Cancellation is ignored.
pub mod effects {
    use blogflux_core::{effect::Effect, EffectId};
    use futures::future::{BoxFuture, FutureExt};

    /// Run `effect` to completion and collect every action it produces, in order
    ///
    /// `Parallel` children are resolved one after the other so the output is
    /// deterministic.
    pub fn resolve<A>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>>
    where
        A: Send + 'static,
    {
        async move {
            match effect {
                Effect::None => Vec::new(),
                Effect::Future(fut) => fut.await.into_iter().collect(),
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    let mut actions = Vec::new();
                    for effect in effects {
                        actions.extend(resolve(effect).await);
                    }
                    actions
                },
                Effect::Cancellable { effect, .. } => resolve(*effect).await,
            }
        }
        .boxed()
    }

    /// Resolve every effect a reducer returned
    pub async fn resolve_all<A, I>(effects: I) -> Vec<A>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut actions = Vec::new();
        for effect in effects {
            actions.extend(resolve(effect).await);
        }
        actions
    }

    /// Ids of every cancellable effect, including nested ones
    #[must_use]
    pub fn cancellable_ids<A>(effects: &[Effect<A>]) -> Vec<EffectId> {
        let mut ids = Vec::new();
        for effect in effects {
            match effect {
                Effect::Cancellable { id, effect } => {
                    ids.push(*id);
                    ids.extend(cancellable_ids(std::slice::from_ref(effect.as_ref())));
                },
                Effect::Parallel(children) | Effect::Sequential(children) => {
                    ids.extend(cancellable_ids(children));
                },
                Effect::None | Effect::Future(_) => {},
            }
        }
        ids
    }
}

/// Test helpers and utilities
pub mod helpers {
    use std::future::Future;
    use std::time::Duration;

    /// Install a test-friendly tracing subscriber honouring `RUST_LOG`
    ///
    /// Safe to call from every test; only the first call installs anything.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Poll `check` until it holds or `timeout` elapses
    ///
    /// Returns whether the condition was observed.
    pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if check().await {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}
