//! Application intents and their creators.

use crate::client::FetchError;
use crate::types::{PostListState, RequestParams, SidebarToggle};

/// Intents handled by the application slice and the post-list orchestrator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppAction {
    /// Show or hide the mobile sidebar
    ToggleSidebar(SidebarToggle),

    /// Fetch a post list, superseding any fetch still in flight
    RequestPostList(RequestParams),

    /// Replace the post list
    ReceivePostList(PostListState),

    /// Outcome of the current fetch (internal feedback from the fetch effect)
    PostListFetched(Result<PostListState, FetchError>),

    /// The current fetch failed; the post list is kept as it was
    PostListFailed {
        /// Error message
        error: String,
    },
}

/// Show or hide the mobile sidebar
///
/// `toggle_sidebar(SidebarToggle::default())` hides it.
#[must_use]
pub const fn toggle_sidebar(payload: SidebarToggle) -> AppAction {
    AppAction::ToggleSidebar(payload)
}

/// Request a post list
///
/// No validation happens here; defaults are applied when the fetch is issued.
#[must_use]
pub const fn request_post_list(params: RequestParams) -> AppAction {
    AppAction::RequestPostList(params)
}

/// Hand a fetched post list to the reducer
#[must_use]
pub const fn receive_post_list(list: PostListState) -> AppAction {
    AppAction::ReceivePostList(list)
}

/// Report a failed post-list fetch
#[must_use]
pub fn post_list_failed(error: &FetchError) -> AppAction {
    AppAction::PostListFailed {
        error: error.to_string(),
    }
}
