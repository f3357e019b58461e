//! # Blogflux Reader
//!
//! State and routing core of a blog reader backed by a WordPress-style
//! content API.
//!
//! - [`actions`]: typed intents and their creators
//! - [`reducer`]: folds intents into the application state
//! - [`saga`]: post-list fetching with latest-wins cancellation
//! - [`routes`] / [`router`] / [`views`]: URL to view mapping, lazy views and
//!   the mount hook that starts the first fetch
//!
//! ## Example
//!
//! ```ignore
//! use blogflux_reader::{config::ReaderConfig, environment::ReaderEnvironment, router, store};
//!
//! let config = ReaderConfig::from_env()?;
//! let store = store::new_store(ReaderEnvironment::from_config(&config)?);
//! router::mount(&store, "/page/2/").await?;
//! ```

pub mod actions;
pub mod adapter;
pub mod article;
pub mod client;
pub mod config;
pub mod environment;
pub mod home;
pub mod mocks;
pub mod reducer;
pub mod router;
pub mod routes;
pub mod saga;
pub mod store;
pub mod types;
pub mod views;

pub use actions::AppAction;
pub use client::{FetchClient, FetchError, FetchResponse, HttpFetchClient, RequestDescriptor};
pub use config::{ConfigError, ReaderConfig};
pub use environment::ReaderEnvironment;
pub use router::{mount, Navigation, Router};
pub use routes::{RouteError, RouteTable, View};
pub use store::{new_store, ReaderStore, RootAction, RootState};
pub use types::{AppState, PostId, PostListState, PostRecord, RequestParams};
