//! Core domain types for the blog reader.
//!
//! The application slice holds the sidebar flag and the normalized post list:
//! an ordered list of ids plus an id-keyed record map.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Numeric identifier of a post
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(u64);

impl PostId {
    /// Creates a new `PostId`
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the inner numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized post, keyed by its [`PostId`]
///
/// Text fields hold the API's rendered HTML as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Post identifier
    pub id: u64,
    /// URL slug
    pub slug: String,
    /// Canonical link
    pub link: String,
    /// Rendered title
    pub title: String,
    /// Rendered excerpt
    pub excerpt: String,
    /// Rendered content
    pub content: String,
    /// Publication time as reported by the API (site-local, no offset)
    pub published_at: Option<NaiveDateTime>,
    /// Author id
    pub author: u64,
    /// Category ids
    pub categories: Vec<u64>,
    /// Tag ids
    pub tags: Vec<u64>,
}

impl PostRecord {
    /// The record's key
    #[must_use]
    pub const fn post_id(&self) -> PostId {
        PostId(self.id)
    }
}

/// Ids and records produced by the data adapter, without pagination totals
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedPosts {
    /// Post ids in response order
    pub ids: Vec<PostId>,
    /// Records keyed by id
    pub data: HashMap<PostId, PostRecord>,
}

/// Normalized post-list state
///
/// Every id in `ids` has a record in `data`, and `ids` keeps the order the
/// API returned the posts in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostListState {
    /// Post ids in response order
    pub ids: Vec<PostId>,
    /// Records keyed by id
    pub data: HashMap<PostId, PostRecord>,
    /// Total number of posts reported by the API
    pub total: u64,
    /// Total number of pages reported by the API
    pub total_pages: u64,
}

impl PostListState {
    /// Combine adapter output with the pagination totals
    #[must_use]
    pub fn from_normalized(posts: NormalizedPosts, total: u64, total_pages: u64) -> Self {
        Self {
            ids: posts.ids,
            data: posts.data,
            total,
            total_pages,
        }
    }

    /// Records in list order
    pub fn iter(&self) -> impl Iterator<Item = &PostRecord> {
        self.ids.iter().filter_map(|id| self.data.get(id))
    }

    /// Number of posts in the list
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the list holds no posts
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Application state slice
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Whether the mobile sidebar is shown
    pub is_mobile_side_bar_show: bool,
    /// The current post list
    pub posts: PostListState,
    /// Message of the last failed post-list fetch, cleared by the next success
    pub last_error: Option<String>,
}

/// Payload of the sidebar toggle intent
///
/// The default payload hides the sidebar.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarToggle {
    /// Whether the sidebar should be shown
    pub is_mobile_side_bar_show: bool,
}

/// Parameters of a post-list request
///
/// Missing fields are filled in when the fetch is issued, not when the
/// intent is created.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    /// Page number (defaults to 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size (defaults to the configured page size)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    /// Post id the current route points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RequestParams {
    /// Request a given page
    #[must_use]
    pub const fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: None,
            id: None,
        }
    }

    /// Whether no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.page.is_none() && self.per_page.is_none() && self.id.is_none()
    }
}
