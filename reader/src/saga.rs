//! Post-list fetch orchestration.
//!
//! Every `RequestPostList` starts a fetch under the [`POST_LIST_FETCH`]
//! effect id. Starting a new one aborts the previous fetch along with the
//! actions its result fans out into. Nothing produced by a superseded fetch
//! reaches the reducers, so only the latest request can land in the state.
//!
//! ```text
//! RequestPostList ──► fetch (cancellable) ──► PostListFetched
//!                                               │
//!                       Ok ──► ReceivePostList, Home(SetWillAutoFetchPosts(false))
//!                       Err ─► PostListFailed
//! ```

use crate::actions::{post_list_failed, receive_post_list, AppAction};
use crate::adapter::format_post_list_data;
use crate::client::{FetchClient, FetchError, FetchResponse, PostListQuery, RequestDescriptor};
use crate::environment::ReaderEnvironment;
use crate::home::set_will_auto_fetch_posts;
use crate::store::{RootAction, RootState};
use crate::types::{PostListState, RequestParams};
use blogflux_core::{cancellable_effect, effect::Effect, reducer::Reducer, smallvec, EffectId, SmallVec};
use std::sync::Arc;

/// Effect id shared by every post-list fetch
pub const POST_LIST_FETCH: EffectId = EffectId::new("post-list-fetch");

/// Header carrying the total number of posts
pub const TOTAL_HEADER: &str = "X-WP-Total";

/// Header carrying the total number of pages
pub const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

/// Page requested when the intent does not name one
pub const DEFAULT_PAGE: u32 = 1;

/// Orchestrates post-list fetches with latest-wins semantics
///
/// Operates on the root state so it can address both the application slice
/// and the home view. It never mutates state itself.
#[derive(Clone, Debug, Default)]
pub struct PostListSaga;

impl PostListSaga {
    /// Creates a new saga
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for PostListSaga {
    type State = RootState;
    type Action = RootAction;
    type Environment = ReaderEnvironment;

    fn reduce(
        &self,
        _state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let RootAction::App(action) = action else {
            return SmallVec::new();
        };

        match action {
            AppAction::RequestPostList(params) => {
                let query = build_query(&params, env.default_per_page);
                let client = Arc::clone(&env.client);
                metrics::counter!("reader.post_list.requested").increment(1);

                smallvec![cancellable_effect! {
                    id: POST_LIST_FETCH,
                    async {
                        let result = get_post_list(client.as_ref(), query).await;
                        Some(RootAction::App(AppAction::PostListFetched(result)))
                    }
                }]
            },
            AppAction::PostListFetched(Ok(list)) => {
                metrics::counter!("reader.post_list.received").increment(1);
                smallvec![Effect::chain(vec![
                    Effect::send(RootAction::App(receive_post_list(list))),
                    Effect::send(RootAction::Home(set_will_auto_fetch_posts(false))),
                ])]
            },
            AppAction::PostListFetched(Err(error)) => {
                metrics::counter!("reader.post_list.failed").increment(1);
                smallvec![Effect::send(RootAction::App(post_list_failed(&error)))]
            },
            AppAction::ToggleSidebar(_)
            | AppAction::ReceivePostList(_)
            | AppAction::PostListFailed { .. } => SmallVec::new(),
        }
    }
}

/// Fill in the defaults a request left out
///
/// `{ page: 1, per_page: default_per_page }` overridden field by field.
#[must_use]
pub fn build_query(params: &RequestParams, default_per_page: u32) -> PostListQuery {
    PostListQuery {
        page: params.page.unwrap_or(DEFAULT_PAGE),
        per_page: params.per_page.unwrap_or(default_per_page),
        id: params.id.clone(),
    }
}

/// Fetch one page of posts and merge it with its pagination totals
///
/// # Errors
///
/// Returns the client's [`FetchError`], or [`FetchError::Malformed`] if the
/// body is not a post list.
pub async fn get_post_list(
    client: &dyn FetchClient,
    query: PostListQuery,
) -> Result<PostListState, FetchError> {
    let response = client.fetch(RequestDescriptor::post_list(query)).await?;

    let total = count_header(&response, TOTAL_HEADER);
    let total_pages = count_header(&response, TOTAL_PAGES_HEADER);
    let posts = format_post_list_data(&response.data)?;

    tracing::debug!(posts = posts.ids.len(), total, total_pages, "Fetched post list");
    Ok(PostListState::from_normalized(posts, total, total_pages))
}

/// Read a pagination header as a count
///
/// Missing or non-numeric values count as 0.
#[must_use]
pub fn count_header(response: &FetchResponse, name: &str) -> u64 {
    let Some(raw) = response.header(name) else {
        tracing::warn!(header = name, "Pagination header missing, using 0");
        return 0;
    };

    parse_leading_digits(raw).unwrap_or_else(|| {
        tracing::warn!(header = name, value = raw, "Pagination header is not a number, using 0");
        0
    })
}

/// Parse the base-10 digits at the start of `raw`, ignoring leading whitespace
/// and anything after the digits
fn parse_leading_digits(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    digits.parse().ok()
}
