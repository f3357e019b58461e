//! Route table and URL parsing.
//!
//! Routes are tried top-down and the first match wins:
//!
//! | pattern           | match  | view    | residency |
//! |-------------------|--------|---------|-----------|
//! | `/`               | exact  | Home    | resident  |
//! | `/page/:page/`    | exact  | Home    | resident  |
//! | `/posts/:postId/` | exact  | Article | lazy      |
//! | `/about/`         | prefix | About   | resident  |
//! | `/topics/`        | prefix | Topics  | lazy      |
//!
//! Matching is segment-wise and case-insensitive, and a trailing slash is
//! optional on both sides.

use crate::types::RequestParams;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

/// Errors raised while routing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No route matches the path
    #[error("No route matches {0:?}")]
    NotFound(String),

    /// A lazy view could not be loaded
    #[error("Failed to load view {view:?}: {reason}")]
    ViewLoad {
        /// View being loaded
        view: View,
        /// Loader error
        reason: String,
    },
}

/// Views the reader can show
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum View {
    /// Post list
    Home,
    /// Single post
    Article,
    /// About page
    About,
    /// Topic index
    Topics,
}

/// Whether a view is available up front or acquired on first navigation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Residency {
    /// Always loaded
    Resident,
    /// Loaded on first navigation, then cached
    Lazy,
}

/// How a pattern is compared with a path
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// The whole path must match
    Exact,
    /// The pattern must match a leading run of segments
    Prefix,
}

/// One entry of the route table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Path pattern; `:name` segments capture
    pub pattern: &'static str,
    /// Exact or prefix match
    pub kind: MatchKind,
    /// View rendered for this route
    pub view: View,
    /// Whether the view is loaded lazily
    pub residency: Residency,
}

impl Route {
    /// Build a route
    #[must_use]
    pub const fn new(pattern: &'static str, kind: MatchKind, view: View, residency: Residency) -> Self {
        Self {
            pattern,
            kind,
            view,
            residency,
        }
    }

    /// Match `path` against this route, returning the captured params
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let pattern: Vec<&str> = segments(self.pattern).collect();
        let path: Vec<&str> = segments(strip_query(path)).collect();

        let fits = match self.kind {
            MatchKind::Exact => path.len() == pattern.len(),
            MatchKind::Prefix => path.len() >= pattern.len(),
        };
        if !fits {
            return None;
        }

        let mut params = HashMap::new();
        for (expected, actual) in pattern.iter().zip(&path) {
            if let Some(name) = expected.strip_prefix(':') {
                params.insert(name.to_string(), (*actual).to_string());
            } else if !expected.eq_ignore_ascii_case(actual) {
                return None;
            }
        }
        Some(params)
    }
}

/// Result of resolving a path
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    /// The route that matched
    pub route: Route,
    /// Captured named params
    pub params: HashMap<String, String>,
}

impl RouteMatch {
    /// View to render
    #[must_use]
    pub const fn view(&self) -> View {
        self.route.view
    }

    /// Captured param by name
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Ordered route table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a table from routes in priority order
    #[must_use]
    pub const fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The reader's route table
    #[must_use]
    pub fn blog() -> Self {
        Self::new(vec![
            Route::new("/", MatchKind::Exact, View::Home, Residency::Resident),
            Route::new("/page/:page/", MatchKind::Exact, View::Home, Residency::Resident),
            Route::new("/posts/:postId/", MatchKind::Exact, View::Article, Residency::Lazy),
            Route::new("/about/", MatchKind::Prefix, View::About, Residency::Resident),
            Route::new("/topics/", MatchKind::Prefix, View::Topics, Residency::Lazy),
        ])
    }

    /// Routes in priority order
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// First route matching `path`
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NotFound`] if no route matches.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch, RouteError> {
        self.routes
            .iter()
            .find_map(|route| {
                route.matches(path).map(|params| RouteMatch {
                    route: route.clone(),
                    params,
                })
            })
            .ok_or_else(|| RouteError::NotFound(path.to_string()))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::blog()
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[allow(clippy::expect_used)] // Literal pattern, checked by tests
static POST_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/posts/(\d+)/").expect("post id pattern is valid"));

#[allow(clippy::expect_used)] // Literal pattern, checked by tests
static PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/page/(\d+)/").expect("page pattern is valid"));

/// What the mount hook extracts from the initial URL
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MountParams {
    /// Post id from a `/posts/<digits>/` segment
    pub id: Option<String>,
    /// Page number from a `/page/<digits>/` segment, as captured
    pub page: Option<String>,
}

impl MountParams {
    /// Extract the post id and page number from `path`
    ///
    /// Each is looked for independently anywhere in the path; a missing match
    /// leaves the field empty.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = strip_query(path);
        let id = POST_ID_RE
            .captures(path)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        let page = PAGE_RE
            .captures(path)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        Self { id, page }
    }

    /// Parameters for the initial post-list request
    ///
    /// A page number past `u32::MAX` is requested as `u32::MAX`; no such page
    /// exists, so the API rejects it the same way it would the real number.
    #[must_use]
    pub fn request_params(&self) -> RequestParams {
        let page = self.page.as_deref().map(|raw| {
            raw.parse().unwrap_or_else(|_| {
                tracing::warn!(page = raw, "Page number out of range, requesting u32::MAX");
                u32::MAX
            })
        });
        RequestParams {
            page,
            per_page: None,
            id: self.id.clone(),
        }
    }
}
