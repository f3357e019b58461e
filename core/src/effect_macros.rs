//! Declarative macros for building effects in reducers.

/// Create a latest-wins `Effect::Cancellable` around an async block
///
/// Every invocation with the same id supersedes the previous one.
///
/// # Example
///
/// ```rust,ignore
/// use blogflux_core::{cancellable_effect, EffectId};
///
/// const FETCH: EffectId = EffectId::new("post-list-fetch");
///
/// cancellable_effect! {
///     id: FETCH,
///     async {
///         let result = get_post_list(&client, query).await;
///         Some(AppAction::PostListFetched(result))
///     }
/// }
/// ```
#[macro_export]
macro_rules! cancellable_effect {
    (
        id: $id:expr,
        async { $($body:tt)* }
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $id,
            effect: ::std::boxed::Box::new($crate::effect::Effect::Future(
                ::std::boxed::Box::pin(async move { $($body)* }),
            )),
        }
    };
}
